//! # MCP Handler
//!
//! Implements the Model Context Protocol methods on top of the tool
//! registry:
//!
//! - `initialize` - server info, protocol version and capabilities
//! - `ping` - liveness
//! - `tools/list` - descriptors in registration order
//! - `tools/call` - dispatch by name; tool failures stay inside the result
//!   (`isError: true`) instead of becoming JSON-RPC errors
//!
//! Any method equal to a registered tool name is accepted as shorthand for
//! `tools/call` with `params` as the arguments.

use serde_json::{json, Value};
use tracing::info;

use crate::{
    blockchain::models::CallEnvelope,
    mcp::protocol::{error_codes, Request, Response, MCP_PROTOCOL_VERSION},
    telegram::format,
    utils, AppState,
};

// Result with a text content block for chat clients, and the envelope
// itself for JSON-aware ones.
fn make_texty_result(text: String, envelope: &CallEnvelope) -> Value {
    json!({
        "content": [{ "type": "text", "text": text }],
        "isError": !envelope.success,
        "structuredContent": envelope,
    })
}

fn envelope_text(name: &str, args: &Value, envelope: &CallEnvelope) -> String {
    match (&envelope.data, &envelope.error) {
        (Some(data), _) => format::summary(name, args, data)
            .unwrap_or_else(|| serde_json::to_string_pretty(data).unwrap_or_default()),
        (None, Some(error)) => error.clone(),
        (None, None) => String::new(),
    }
}

/// This is the main dispatcher for all incoming MCP requests.
pub async fn handle_mcp_request(req: Request, state: AppState) -> Option<Response> {
    info!(method = %req.method, "Handling MCP request");

    if req.is_notification() {
        return None;
    }

    let response = match req.method.as_str() {
        "initialize" => handle_initialize(&req),
        "ping" => Response::success(req.id.clone(), json!({})),
        "tools/list" => handle_tools_list(&req, &state),
        "tools/call" => handle_tool_call(req, state).await,
        // Direct method calls from CLI clients are rewritten into tools/call
        name if state.registry.contains(name) => {
            let arguments = req.params.clone().unwrap_or_else(|| json!({}));
            let wrapped = Request::tool_call(req.id.clone(), name, arguments);
            handle_tool_call(wrapped, state).await
        }
        _ => Response::error(
            req.id,
            error_codes::METHOD_NOT_FOUND,
            format!("Method not found: {}", req.method),
        ),
    };

    Some(response)
}

/// Handles a 'tools/call' request by dispatching it through the registry.
async fn handle_tool_call(req: Request, state: AppState) -> Response {
    let Some(params) = req.params.as_ref() else {
        return Response::error(req.id, error_codes::INVALID_PARAMS, "Missing 'params' object");
    };

    let tool_name: String = match utils::get_required_arg(params, "name") {
        Ok(name) => name,
        Err(e) => return Response::error(req.id, error_codes::INVALID_PARAMS, e.to_string()),
    };

    let args = params.get("arguments").cloned().unwrap_or_else(|| json!({}));
    let envelope = state.registry.call(&tool_name, args.clone()).await;
    let text = envelope_text(&tool_name, &args, &envelope);

    Response::success(req.id.clone(), make_texty_result(text, &envelope))
}

/// Handles the 'initialize' request.
fn handle_initialize(req: &Request) -> Response {
    let server_info = json!({
        "name": "blockchain_mcp",
        "version": env!("CARGO_PKG_VERSION")
    });
    let capabilities = json!({ "tools": { "listChanged": false } });
    let instructions = "Blockchain data tools: wallet balances, gas prices, FRAX transfers, \
         crypto conversion and Telegram messaging. Calls are rate limited per key and \
         responses are cached briefly.";

    Response::success(
        req.id.clone(),
        json!({
            "serverInfo": server_info,
            "protocolVersion": MCP_PROTOCOL_VERSION,
            "capabilities": capabilities,
            "instructions": instructions
        }),
    )
}

fn handle_tools_list(req: &Request, state: &AppState) -> Response {
    Response::success(req.id.clone(), json!({ "tools": state.registry.list() }))
}
