// JSON-RPC wire types and the MCP method dispatcher.
pub mod handler;
pub mod protocol;
