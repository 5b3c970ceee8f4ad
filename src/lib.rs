// Movie Review API - movies, their reviews, and a transactionally maintained average rating

// HTTP routes and handlers
pub mod api;

// Shared application state and configuration
pub mod app_state;
pub mod config;

// Core types and primitives
pub mod core;

// SQLite storage and schema
pub mod database;

// Records and request payloads
pub mod models;

// Movie/review stores and the rating aggregator
pub mod services;

// AppError and its JSON error responses
pub mod error;

// Re-exports for convenience
pub use api::build_app;
pub use app_state::AppState;
pub use config::Config;
pub use error::{AppError, AppResult};
