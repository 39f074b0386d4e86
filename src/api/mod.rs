//! # API Module
//!
//! HTTP surface of the server, mounted under `/api`:
//!
//! - `GET /api/health` - liveness plus tool and Telegram status
//! - `GET /api/tools` - tool descriptors in registration order
//! - `POST /api/tools/:name` - call a tool; the body is its arguments and the
//!   reply is the `{success, data?, error?}` envelope
//! - `POST /api/rpc` - MCP JSON-RPC over HTTP

pub mod health;
pub mod tools;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::AppState;

pub fn router(state: AppState) -> Router {
    let api_router = Router::new()
        .route("/health", get(health::health_handler))
        .route("/tools", get(tools::list_tools_handler))
        .route("/tools/:name", post(tools::call_tool_handler))
        // JSON-RPC endpoint for MCP tool calls
        .route("/rpc", post(tools::rpc_handler));

    Router::new()
        .nest("/api", api_router)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
