// HTTP surface - routes mounted under /api, plus CORS, request tracing and optional static frontend

pub mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::app_state::AppState;
use handlers::{
    api_not_found,
    health::health_check,
    movies::{create_movie, delete_movie, get_movie, list_movies, search_movies, update_movie},
    reviews::{create_review, delete_review, get_review, list_reviews, update_review},
};

pub fn create_api_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))

        // Movie operations
        .route("/movies", post(create_movie).get(list_movies))
        .route(
            "/movies/{id}",
            get(get_movie).put(update_movie).delete(delete_movie),
        )
        .route("/search", get(search_movies))

        // Review operations
        .route("/reviews", post(create_review).get(list_reviews))
        .route(
            "/reviews/{id}",
            get(get_review).put(update_review).delete(delete_review),
        )

        .fallback(api_not_found)
        .with_state(state)
}

/// Full application: API under `/api`, the static frontend (if configured) everywhere else.
pub fn build_app(state: AppState) -> Router {
    let static_dir = state.config.static_dir.clone();

    let mut app = Router::new().nest("/api", create_api_router(state));
    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            ),
    )
}
