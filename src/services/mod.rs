// Services - movie and review stores plus the rating aggregator they share

pub mod movie_store;
pub mod rating_aggregator;
pub mod review_store;

pub use movie_store::MovieStore;
pub use review_store::ReviewStore;
