use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};
use tracing::warn;

use crate::{
    blockchain::models::CallEnvelope,
    mcp::{
        handler::handle_mcp_request,
        protocol::{error_codes, Request, Response},
    },
    AppState,
};

pub async fn list_tools_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({ "tools": state.registry.list() }))
}

/// The body is the tool's arguments; an empty body means `{}`.
pub async fn call_tool_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Bytes,
) -> impl IntoResponse {
    let args = if body.iter().all(u8::is_ascii_whitespace) {
        json!({})
    } else {
        match serde_json::from_slice::<Value>(&body) {
            Ok(args) => args,
            Err(e) => {
                warn!(tool = %name, error = %e, "Rejected malformed tool arguments");
                return (
                    StatusCode::BAD_REQUEST,
                    Json(CallEnvelope::failure(format!("Invalid JSON body: {}", e))),
                );
            }
        }
    };

    let status = if state.registry.contains(&name) {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    };
    (status, Json(state.registry.call(&name, args).await))
}

// Forward JSON-RPC requests over HTTP to the MCP handler
pub async fn rpc_handler(State(state): State<AppState>, body: Bytes) -> Json<Response> {
    let req = match serde_json::from_slice::<Request>(&body) {
        Ok(req) => req,
        Err(e) => {
            warn!(error = %e, "JSON-RPC parse error");
            return Json(Response::error(
                Value::Null,
                error_codes::PARSE_ERROR,
                format!("Parse error: {}", e),
            ));
        }
    };

    match handle_mcp_request(req, state).await {
        Some(resp) => Json(resp),
        None => Json(Response::error(
            Value::Null,
            error_codes::INVALID_REQUEST,
            "Notifications are not supported over HTTP",
        )),
    }
}
