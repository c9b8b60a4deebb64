//! Model Context Protocol surface.
//!
//! [`protocol`] holds the JSON-RPC 2.0 envelope types, [`server`] dispatches MCP methods onto
//! the tool, prompt and resource registries, and [`transport`] moves newline-delimited messages
//! between a byte stream and the server.

pub mod error;
pub mod protocol;
pub mod server;
pub mod transport;

pub use error::McpError;
pub use protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, MCP_PROTOCOL_VERSION};
pub use server::{McpServer, ServerInfo};
pub use transport::StdioTransport;
