use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::app_state::AppState;
use crate::error::AppResult;

pub async fn health_check(State(state): State<AppState>) -> AppResult<Json<Value>> {
    state.database.ping().await?;
    Ok(Json(json!({ "status": "ok" })))
}
