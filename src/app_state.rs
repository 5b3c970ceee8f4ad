use std::sync::Arc;

use crate::{
    config::Config,
    database::MovieReviewDatabase,
    services::{MovieStore, ReviewStore},
};

#[derive(Clone)]
pub struct AppState {
    pub movies: MovieStore,
    pub reviews: ReviewStore,
    pub database: Arc<MovieReviewDatabase>,
    pub config: Config,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        // Initialize database
        let database =
            MovieReviewDatabase::new(&config.database.url, config.database.max_connections).await?;
        database.init().await?;

        Ok(Self::with_database(Arc::new(database), config))
    }

    pub fn with_database(database: Arc<MovieReviewDatabase>, config: Config) -> Self {
        Self {
            movies: MovieStore::new(database.clone()),
            reviews: ReviewStore::new(database.clone()),
            database,
            config,
        }
    }
}
