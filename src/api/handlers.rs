pub mod health;
pub mod movies;
pub mod reviews;

use crate::core::{MovieId, ReviewId};
use crate::error::{AppError, AppResult};

/// Path ids that are not well-formed can't name a record, so they are 404s.
fn parse_movie_id(raw: &str) -> AppResult<MovieId> {
    MovieId::parse(raw).ok_or_else(AppError::movie_not_found)
}

fn parse_review_id(raw: &str) -> AppResult<ReviewId> {
    ReviewId::parse(raw).ok_or_else(AppError::review_not_found)
}

pub async fn api_not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}
