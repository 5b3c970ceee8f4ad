use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::parse_movie_id;
use crate::app_state::AppState;
use crate::error::AppResult;
use crate::models::{CreateMovieRequest, MovieWithReviews, UpdateMovieRequest};

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub movies: Vec<MovieWithReviews>,
}

pub async fn create_movie(
    State(state): State<AppState>,
    payload: Result<Json<CreateMovieRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<MovieWithReviews>)> {
    let Json(request) = payload?;
    let movie = state.movies.create(request).await?;
    Ok((StatusCode::CREATED, Json(movie)))
}

pub async fn list_movies(State(state): State<AppState>) -> AppResult<Json<Vec<MovieWithReviews>>> {
    Ok(Json(state.movies.list().await?))
}

pub async fn get_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MovieWithReviews>> {
    let id = parse_movie_id(&id)?;
    Ok(Json(state.movies.get_by_id(id).await?))
}

pub async fn update_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateMovieRequest>, JsonRejection>,
) -> AppResult<Json<MovieWithReviews>> {
    let id = parse_movie_id(&id)?;
    let Json(request) = payload?;
    Ok(Json(state.movies.update(id, request).await?))
}

pub async fn delete_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let id = parse_movie_id(&id)?;
    state.movies.delete(id).await?;
    Ok(Json(json!({ "message": "Movie deleted" })))
}

pub async fn search_movies(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> AppResult<Json<SearchResponse>> {
    let Query(params) = params?;
    let movies = state
        .movies
        .search(params.search.as_deref().unwrap_or_default())
        .await?;
    Ok(Json(SearchResponse { movies }))
}
