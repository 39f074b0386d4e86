use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

use crate::AppState;

pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "tools": state.registry.len(),
        "cache_entries": state.governor.cache().len(),
        "telegram": {
            "notifications": state.registry.notifier().is_enabled(),
            "commands": state.telegram.is_some(),
        }
    }))
}
