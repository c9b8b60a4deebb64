use super::schema::InputSchema;
use super::{ToolSpec, forward};
use crate::engine::Engine;
use crate::session::Session;
use serde::Deserialize;
use tracing::{error, info};

#[derive(Debug, Deserialize)]
pub struct RunArgs {
    pub command: String,
}

pub fn specs() -> Vec<ToolSpec> {
    vec![ToolSpec {
        name: "run_command",
        description: "Run a PyMOL command directly.",
        input_schema: InputSchema::new()
            .string("command", "PyMOL command to run")
            .into_value(),
    }]
}

/// Hands a raw command line to the engine's own parser.
pub fn run_command<E: Engine>(session: &Session<E>, command: &str) -> String {
    info!("do {}", command);
    match forward(session, |cmd| cmd.run(command)) {
        Ok(()) => format!("Executed: {}", command),
        Err(e) => {
            error!("do '{}' failed: {}", command, e);
            format!("Error executing '{}': {}", command, e)
        }
    }
}
