use super::protocol::{
    JSONRPC_VERSION, JsonRpcError, JsonRpcRequest, JsonRpcResponse, MCP_PROTOCOL_VERSION,
};
use crate::config::ServerConfig;
use crate::engine::Engine;
use crate::session::Session;
use crate::tools::{self, ToolError, ToolOutput};
use crate::{prompts, resources};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::collections::HashMap;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Deserialize)]
struct ToolCallParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

#[derive(Debug, Deserialize)]
struct PromptGetParams {
    name: String,
    #[serde(default)]
    arguments: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct ResourceReadParams {
    uri: String,
}

/// Request dispatcher for a single MCP client.
///
/// Owns the engine [`Session`] for the lifetime of the connection; requests are handled one at
/// a time, in arrival order.
pub struct McpServer<E: Engine> {
    session: Session<E>,
    info: ServerInfo,
    initialized: bool,
}

impl<E: Engine> McpServer<E> {
    pub fn new(session: Session<E>, config: &ServerConfig) -> Self {
        info!("Creating MCP server '{}' v{}", config.name, config.version);
        Self {
            session,
            info: ServerInfo {
                name: config.name.clone(),
                version: config.version.clone(),
            },
            initialized: false,
        }
    }

    pub fn info(&self) -> &ServerInfo {
        &self.info
    }

    pub fn session(&self) -> &Session<E> {
        &self.session
    }

    /// Whether the client has completed the `initialize` handshake.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn shutdown(&mut self) {
        self.session.shutdown();
    }

    /// Handles one message. Notifications produce no response.
    pub fn handle(&mut self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let Some(id) = request.id.clone() else {
            self.handle_notification(&request);
            return None;
        };

        if request.jsonrpc != JSONRPC_VERSION {
            return Some(JsonRpcResponse::failure(
                id,
                JsonRpcError::invalid_request(format!(
                    "Unsupported JSON-RPC version '{}'",
                    request.jsonrpc
                )),
            ));
        }

        debug!("Handling request {} '{}'", id, request.method);
        let result = match request.method.as_str() {
            "initialize" => Ok(self.initialize()),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": tools::catalog() })),
            "tools/call" => self.call_tool(request.params),
            "prompts/list" => Ok(json!({ "prompts": prompts::catalog() })),
            "prompts/get" => self.get_prompt(request.params),
            "resources/list" => Ok(json!({ "resources": resources::catalog() })),
            "resources/read" => self.read_resource(request.params),
            other => Err(JsonRpcError::method_not_found(other)),
        };

        Some(match result {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(error) => {
                warn!("Request '{}' failed: {}", request.method, error.message);
                JsonRpcResponse::failure(id, error)
            }
        })
    }

    fn handle_notification(&mut self, request: &JsonRpcRequest) {
        match request.method.as_str() {
            "notifications/initialized" => {
                info!("Client completed initialization");
                self.initialized = true;
            }
            other => debug!("Ignoring notification '{}'", other),
        }
    }

    fn initialize(&mut self) -> Value {
        info!("Initializing MCP session");
        json!({
            "protocolVersion": MCP_PROTOCOL_VERSION,
            "capabilities": {
                "tools": { "listChanged": false },
                "prompts": { "listChanged": false },
                "resources": { "subscribe": false, "listChanged": false },
            },
            "serverInfo": {
                "name": self.info.name,
                "version": self.info.version,
            },
        })
    }

    fn call_tool(&mut self, params: Option<Value>) -> Result<Value, JsonRpcError> {
        let params: ToolCallParams = decode_params(params)?;
        info!("Calling tool '{}'", params.name);

        let output = tokio::task::block_in_place(|| {
            tools::call(&self.session, &params.name, params.arguments)
        })
        .map_err(|e| match e {
            ToolError::UnknownTool(_) | ToolError::InvalidArguments { .. } => {
                JsonRpcError::invalid_params(e.to_string())
            }
        })?;

        let content = match output {
            ToolOutput::Text(text) => json!({ "type": "text", "text": text }),
            ToolOutput::Image(image) => json!({
                "type": "image",
                "data": base64::Engine::encode(
                    &base64::engine::general_purpose::STANDARD,
                    &image.data,
                ),
                "mimeType": image.mime_type,
            }),
        };
        Ok(json!({ "content": [content], "isError": false }))
    }

    fn get_prompt(&self, params: Option<Value>) -> Result<Value, JsonRpcError> {
        let params: PromptGetParams = decode_params(params)?;
        let text = prompts::render(&params.name, &params.arguments)
            .map_err(|e| JsonRpcError::invalid_params(e.to_string()))?;
        let description = prompts::catalog()
            .into_iter()
            .find(|p| p.name == params.name)
            .map(|p| p.description)
            .unwrap_or_default();

        Ok(json!({
            "description": description,
            "messages": [{
                "role": "user",
                "content": { "type": "text", "text": text },
            }],
        }))
    }

    fn read_resource(&self, params: Option<Value>) -> Result<Value, JsonRpcError> {
        let params: ResourceReadParams = decode_params(params)?;
        let text = tokio::task::block_in_place(|| resources::read(&self.session, &params.uri))
            .ok_or_else(|| {
                JsonRpcError::invalid_params(format!("Unknown resource: {}", params.uri))
            })?;

        Ok(json!({
            "contents": [{
                "uri": params.uri,
                "mimeType": "text/plain",
                "text": text,
            }],
        }))
    }
}

fn decode_params<T: DeserializeOwned>(params: Option<Value>) -> Result<T, JsonRpcError> {
    let params = params.unwrap_or_else(|| json!({}));
    serde_json::from_value(params).map_err(|e| JsonRpcError::invalid_params(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::mock::MockEngine;
    use crate::mcp::protocol::{INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND};

    fn server(engine: MockEngine) -> McpServer<MockEngine> {
        McpServer::new(
            Session::from_engine(engine, &[]),
            &ServerConfig::default(),
        )
    }

    fn request(method: &str, params: Value) -> JsonRpcRequest {
        JsonRpcRequest::new(1, method, Some(params))
    }

    #[test]
    fn initialize_reports_server_info_and_capabilities() {
        let mut server = server(MockEngine::new());
        let response = server.handle(request("initialize", json!({}))).unwrap();
        let result = response.result.unwrap();

        assert_eq!(result["protocolVersion"], MCP_PROTOCOL_VERSION);
        assert_eq!(result["serverInfo"]["name"], "PyMOL");
        assert!(result["capabilities"]["tools"].is_object());
        assert!(result["capabilities"]["prompts"].is_object());
        assert!(result["capabilities"]["resources"].is_object());
    }

    #[test]
    fn initialized_notification_has_no_response() {
        let mut server = server(MockEngine::new());
        let notification: JsonRpcRequest = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "method": "notifications/initialized"
        }))
        .unwrap();

        assert!(server.handle(notification).is_none());
        assert!(server.is_initialized());
    }

    #[test]
    fn unknown_method_is_method_not_found() {
        let mut server = server(MockEngine::new());
        let response = server.handle(request("sampling/createMessage", json!({}))).unwrap();
        assert_eq!(response.error.unwrap().code, METHOD_NOT_FOUND);
    }

    #[test]
    fn wrong_jsonrpc_version_is_invalid_request() {
        let mut server = server(MockEngine::new());
        let mut req = request("ping", json!({}));
        req.jsonrpc = "1.0".to_string();
        let response = server.handle(req).unwrap();
        assert_eq!(response.error.unwrap().code, INVALID_REQUEST);
    }

    #[test]
    fn tools_list_includes_every_tool() {
        let mut server = server(MockEngine::new());
        let response = server.handle(request("tools/list", json!({}))).unwrap();
        let tools = response.result.unwrap()["tools"].as_array().unwrap().clone();

        assert_eq!(tools.len(), tools::catalog().len());
        let fetch = tools.iter().find(|t| t["name"] == "fetch_structure").unwrap();
        assert_eq!(fetch["inputSchema"]["required"], json!(["pdb_id"]));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn tools_call_returns_text_content() {
        let mut server = server(MockEngine::new());
        let response = server
            .handle(request(
                "tools/call",
                json!({ "name": "fetch_structure", "arguments": { "pdb_id": "1dn2" } }),
            ))
            .unwrap();
        let result = response.result.unwrap();

        assert_eq!(result["isError"], false);
        assert_eq!(result["content"][0]["type"], "text");
        assert_eq!(result["content"][0]["text"], "Successfully fetched 1dn2");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn tools_call_engine_failure_is_still_text() {
        let mut server = server(MockEngine::new().failing("zoom", "empty selection"));
        let response = server
            .handle(request("tools/call", json!({ "name": "zoom_selection" })))
            .unwrap();

        assert!(response.error.is_none());
        assert_eq!(
            response.result.unwrap()["content"][0]["text"],
            "Error zooming on all: empty selection"
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn tools_call_render_returns_base64_image() {
        let mut server = server(MockEngine::new().with_png(b"\x89PNG"));
        let response = server
            .handle(request("tools/call", json!({ "name": "render_image" })))
            .unwrap();
        let result = response.result.unwrap();
        let content = &result["content"][0];

        assert_eq!(content["type"], "image");
        assert_eq!(content["mimeType"], "image/png");
        assert_eq!(content["data"], "iVBORw==");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn tools_call_unknown_tool_is_invalid_params() {
        let mut server = server(MockEngine::new());
        let response = server
            .handle(request("tools/call", json!({ "name": "nope" })))
            .unwrap();
        let error = response.error.unwrap();
        assert_eq!(error.code, INVALID_PARAMS);
        assert_eq!(error.message, "Unknown tool: nope");
    }

    #[test]
    fn tools_call_without_name_is_invalid_params() {
        let mut server = server(MockEngine::new());
        let response = server.handle(request("tools/call", json!({}))).unwrap();
        assert_eq!(response.error.unwrap().code, INVALID_PARAMS);
    }

    #[test]
    fn prompts_get_renders_user_message() {
        let mut server = server(MockEngine::new());
        let response = server
            .handle(request(
                "prompts/get",
                json!({ "name": "basic_visualization", "arguments": { "pdb_id": "4hhb" } }),
            ))
            .unwrap();
        let result = response.result.unwrap();

        assert_eq!(result["messages"][0]["role"], "user");
        let text = result["messages"][0]["content"]["text"].as_str().unwrap();
        assert!(text.contains("PDB ID 4hhb"));
        assert_eq!(
            result["description"],
            "Create a prompt for basic protein visualization"
        );
    }

    #[test]
    fn prompts_get_missing_argument_is_invalid_params() {
        let mut server = server(MockEngine::new());
        let response = server
            .handle(request("prompts/get", json!({ "name": "basic_visualization" })))
            .unwrap();
        assert_eq!(response.error.unwrap().code, INVALID_PARAMS);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn resources_read_returns_session_state() {
        let mut server = server(MockEngine::new().with_objects(&["1dn2"]));
        let response = server
            .handle(request(
                "resources/read",
                json!({ "uri": resources::SESSION_STATE_URI }),
            ))
            .unwrap();
        let result = response.result.unwrap();
        let contents = &result["contents"][0];

        assert_eq!(contents["uri"], resources::SESSION_STATE_URI);
        assert!(contents["text"].as_str().unwrap().contains("Object: 1dn2"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn resources_read_unknown_uri_is_invalid_params() {
        let mut server = server(MockEngine::new());
        let response = server
            .handle(request("resources/read", json!({ "uri": "pymol://nothing" })))
            .unwrap();
        assert_eq!(response.error.unwrap().code, INVALID_PARAMS);
    }

    #[test]
    fn shutdown_quits_engine() {
        let mut server = server(MockEngine::new());
        server.shutdown();
        assert_eq!(server.session().engine().unwrap().commands(), vec!["quit"]);
    }
}
