// Records and request payloads for the movie review API

pub mod movie;
pub mod review;

pub use movie::{
    CreateMovieRequest, Movie, MovieChanges, MovieWithReviews, NewMovie, UpdateMovieRequest,
};
pub use review::{
    CreateReviewRequest, NewReview, RatingInput, Review, ReviewChanges, ReviewWithMovie,
    UpdateReviewRequest, MAX_RATING, MIN_RATING,
};
