//! Read-only views of the engine's session, published as MCP resources.

use crate::engine::{Engine, EngineError, NameKind};
use crate::session::Session;
use serde::Serialize;
use tracing::{error, info};

pub const SESSION_STATE_URI: &str = "pymol://session/state";

#[derive(Debug, Clone, Serialize)]
pub struct ResourceSpec {
    pub uri: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "mimeType")]
    pub mime_type: &'static str,
}

pub fn catalog() -> Vec<ResourceSpec> {
    vec![ResourceSpec {
        uri: SESSION_STATE_URI,
        name: "get_pymol_state",
        description: "Get information about the current PyMOL session state including loaded objects, selections, and view.",
        mime_type: "text/plain",
    }]
}

/// Reads a resource by URI, or `None` when no resource has that URI.
pub fn read<E: Engine>(session: &Session<E>, uri: &str) -> Option<String> {
    match uri {
        SESSION_STATE_URI => Some(session_state(session)),
        _ => None,
    }
}

/// A text summary of loaded objects, named selections and the current view matrix.
pub fn session_state<E: Engine>(session: &Session<E>) -> String {
    info!("Getting PyMOL session state");
    let cmd = match session.cmd() {
        Ok(cmd) => cmd,
        Err(e) => return format!("Error: {}", e),
    };

    match describe(cmd) {
        Ok(text) => {
            info!("Successfully retrieved PyMOL session state");
            text
        }
        Err(e) => {
            error!("Error retrieving PyMOL state: {}", e);
            format!("Error retrieving PyMOL state: {}", e)
        }
    }
}

fn describe<E: Engine>(cmd: &E) -> Result<String, EngineError> {
    let objects = cmd.get_names(NameKind::Objects)?;
    let selections = cmd.get_names(NameKind::Selections)?;
    let view = cmd.get_view()?;

    let mut lines = vec!["PyMOL Session State:".to_string()];
    if objects.is_empty() {
        lines.push("\nNo objects loaded.".to_string());
    } else {
        lines.push("\nLoaded Objects:".to_string());
        lines.extend(objects.iter().map(|o| format!("Object: {}", o)));
    }

    if selections.is_empty() {
        lines.push("\nNo selections defined.".to_string());
    } else {
        lines.push("\nActive Selections:".to_string());
        lines.extend(selections.iter().map(|s| format!("Selection: {}", s)));
    }

    lines.push(format!("\nView matrix: {}", format_view(&view)));
    Ok(lines.join("\n"))
}

/// Parenthesised and comma separated, the way PyMOL itself prints a view.
fn format_view(view: &[f64]) -> String {
    let values: Vec<String> = view.iter().map(|v| format!("{:?}", v)).collect();
    format!("({})", values.join(", "))
}
