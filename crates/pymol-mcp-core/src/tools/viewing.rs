use super::schema::InputSchema;
use super::{ToolSpec, default_selection, forward};
use crate::engine::Engine;
use crate::session::Session;
use serde::Deserialize;
use tracing::error;

#[derive(Debug, Deserialize)]
pub struct ZoomArgs {
    #[serde(default = "default_selection")]
    pub selection: String,
}

pub fn specs() -> Vec<ToolSpec> {
    vec![ToolSpec {
        name: "zoom_selection",
        description: "Zoom the camera on a selection.",
        input_schema: InputSchema::new()
            .string_or("selection", "all", "PyMOL selection expression")
            .into_value(),
    }]
}

pub fn zoom_selection<E: Engine>(session: &Session<E>, selection: &str) -> String {
    match forward(session, |cmd| cmd.zoom(selection)) {
        Ok(()) => format!("Zoomed on {}", selection),
        Err(e) => {
            error!("zoom {} failed: {}", selection, e);
            format!("Error zooming on {}: {}", selection, e)
        }
    }
}
