use super::error::McpError;
use super::protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
use super::server::McpServer;
use crate::engine::Engine;
use serde_json::Value;
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout,
};
use tracing::{debug, info, trace, warn};

/// Newline-delimited JSON-RPC over a pair of byte streams.
///
/// Each line read is one message; each response is written as one line and flushed.
pub struct StdioTransport<R, W> {
    reader: R,
    writer: W,
}

impl StdioTransport<BufReader<Stdin>, Stdout> {
    /// Standard input and output of the current process.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl<R, W> StdioTransport<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Serves requests until the input stream ends.
    pub async fn run<E: Engine>(&mut self, server: &mut McpServer<E>) -> Result<(), McpError> {
        info!("Listening for MCP messages");
        let mut line = Vec::new();
        loop {
            line.clear();
            if self.reader.read_until(b'\n', &mut line).await? == 0 {
                info!("Input closed, stopping transport");
                return Ok(());
            }

            // Raw bytes; invalid UTF-8 is answered with a parse error like any other bad line.
            let message = line.trim_ascii();
            if message.is_empty() {
                continue;
            }
            trace!("<- {}", String::from_utf8_lossy(message));

            let response = match serde_json::from_slice::<JsonRpcRequest>(message) {
                Ok(request) => server.handle(request),
                Err(e) => {
                    warn!("Discarding malformed message: {}", e);
                    Some(Self::reject(message, e))
                }
            };

            if let Some(response) = response {
                self.send(&response).await?;
            }
        }
    }

    fn reject(message: &[u8], err: serde_json::Error) -> JsonRpcResponse {
        // Valid JSON that is not a request still gets its id echoed back.
        match serde_json::from_slice::<Value>(message) {
            Ok(value) => {
                let id = value.get("id").cloned().unwrap_or(Value::Null);
                JsonRpcResponse::failure(id, JsonRpcError::invalid_request(err.to_string()))
            }
            Err(_) => {
                JsonRpcResponse::failure(Value::Null, JsonRpcError::parse_error(err.to_string()))
            }
        }
    }

    async fn send(&mut self, response: &JsonRpcResponse) -> Result<(), McpError> {
        let mut payload = serde_json::to_string(response)?;
        debug!("-> response for id {}", response.id);
        trace!("-> {}", payload);
        payload.push('\n');
        self.writer.write_all(payload.as_bytes()).await?;
        self.writer.flush().await?;
        Ok(())
    }
}
