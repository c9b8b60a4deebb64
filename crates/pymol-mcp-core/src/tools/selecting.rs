//! Named selections and object visibility.

use super::schema::InputSchema;
use super::{ToolSpec, forward};
use crate::engine::Engine;
use crate::session::Session;
use serde::Deserialize;
use tracing::{error, info};

#[derive(Debug, Deserialize)]
pub struct SelectArgs {
    pub name: String,
    pub selection: String,
}

#[derive(Debug, Deserialize)]
pub struct NameArgs {
    pub name: String,
}

pub fn specs() -> Vec<ToolSpec> {
    vec![
        ToolSpec {
            name: "create_selection",
            description: "Create a named selection.",
            input_schema: InputSchema::new()
                .string("name", "Name for the selection")
                .string("selection", "PyMOL selection expression")
                .into_value(),
        },
        ToolSpec {
            name: "enable_object",
            description: "Enable (show) an object or selection.",
            input_schema: InputSchema::new()
                .string("name", "Name of the object or selection")
                .into_value(),
        },
        ToolSpec {
            name: "disable_object",
            description: "Disable (hide) an object or selection.",
            input_schema: InputSchema::new()
                .string("name", "Name of the object or selection")
                .into_value(),
        },
    ]
}

pub fn create_selection<E: Engine>(session: &Session<E>, name: &str, selection: &str) -> String {
    info!("select {}, {}", name, selection);
    match forward(session, |cmd| cmd.select(name, selection)) {
        Ok(count) => format!(
            "Created selection '{}' for {} with {} atoms",
            name, selection, count
        ),
        Err(e) => {
            error!("select {} failed: {}", name, e);
            format!(
                "Error creating selection '{}' for {}: {}",
                name, selection, e
            )
        }
    }
}

pub fn enable_object<E: Engine>(session: &Session<E>, name: &str) -> String {
    match forward(session, |cmd| cmd.enable(name)) {
        Ok(()) => format!("Enabled {}", name),
        Err(e) => {
            error!("enable {} failed: {}", name, e);
            format!("Error enabling {}: {}", name, e)
        }
    }
}

pub fn disable_object<E: Engine>(session: &Session<E>, name: &str) -> String {
    match forward(session, |cmd| cmd.disable(name)) {
        Ok(()) => format!("Disabled {}", name),
        Err(e) => {
            error!("disable {} failed: {}", name, e);
            format!("Error disabling {}: {}", name, e)
        }
    }
}
