use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use super::parse_review_id;
use crate::app_state::AppState;
use crate::error::AppResult;
use crate::models::{CreateReviewRequest, Review, ReviewWithMovie, UpdateReviewRequest};

pub async fn create_review(
    State(state): State<AppState>,
    payload: Result<Json<CreateReviewRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Review>)> {
    let Json(request) = payload?;
    let review = state.reviews.create(request).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

pub async fn list_reviews(State(state): State<AppState>) -> AppResult<Json<Vec<ReviewWithMovie>>> {
    Ok(Json(state.reviews.list().await?))
}

pub async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ReviewWithMovie>> {
    let id = parse_review_id(&id)?;
    Ok(Json(state.reviews.get_by_id(id).await?))
}

pub async fn update_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateReviewRequest>, JsonRejection>,
) -> AppResult<Json<Review>> {
    let id = parse_review_id(&id)?;
    let Json(request) = payload?;
    Ok(Json(state.reviews.update(id, request).await?))
}

pub async fn delete_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let id = parse_review_id(&id)?;
    state.reviews.delete(id).await?;
    Ok(Json(json!({ "message": "Review deleted" })))
}
