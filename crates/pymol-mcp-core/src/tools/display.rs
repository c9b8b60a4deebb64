//! Representations, colors and labels.

use super::schema::InputSchema;
use super::{ToolSpec, default_selection, forward};
use crate::engine::Engine;
use crate::session::Session;
use serde::Deserialize;
use tracing::{error, info};

#[derive(Debug, Deserialize)]
pub struct RepresentationArgs {
    pub representation: String,
    #[serde(default = "default_selection")]
    pub selection: String,
}

#[derive(Debug, Deserialize)]
pub struct ColorArgs {
    pub color: String,
    #[serde(default = "default_selection")]
    pub selection: String,
}

#[derive(Debug, Deserialize)]
pub struct LabelArgs {
    pub selection: String,
    pub text: String,
}

const REPRESENTATION_HELP: &str =
    "Type of representation (cartoon, surface, sticks, lines, spheres, etc.)";
const SELECTION_HELP: &str = "PyMOL selection expression";

pub fn specs() -> Vec<ToolSpec> {
    vec![
        ToolSpec {
            name: "show_representation",
            description: "Show a representation for a selection.",
            input_schema: InputSchema::new()
                .string("representation", REPRESENTATION_HELP)
                .string_or("selection", "all", SELECTION_HELP)
                .into_value(),
        },
        ToolSpec {
            name: "hide_representation",
            description: "Hide a representation for a selection.",
            input_schema: InputSchema::new()
                .string("representation", REPRESENTATION_HELP)
                .string_or("selection", "all", SELECTION_HELP)
                .into_value(),
        },
        ToolSpec {
            name: "color_selection",
            description: "Color a selection.",
            input_schema: InputSchema::new()
                .string("color", "Color name or RGB/RGBA hex code")
                .string_or("selection", "all", SELECTION_HELP)
                .into_value(),
        },
        ToolSpec {
            name: "add_label",
            description: "Add a label to atoms in a selection.",
            input_schema: InputSchema::new()
                .string("selection", SELECTION_HELP)
                .string("text", "Label text or PyMOL expression")
                .into_value(),
        },
    ]
}

pub fn show_representation<E: Engine>(
    session: &Session<E>,
    representation: &str,
    selection: &str,
) -> String {
    info!("show {}, {}", representation, selection);
    match forward(session, |cmd| cmd.show(representation, selection)) {
        Ok(()) => format!("Showing {} for {}", representation, selection),
        Err(e) => {
            error!("show {} failed: {}", representation, e);
            format!("Error showing {} for {}: {}", representation, selection, e)
        }
    }
}

pub fn hide_representation<E: Engine>(
    session: &Session<E>,
    representation: &str,
    selection: &str,
) -> String {
    info!("hide {}, {}", representation, selection);
    match forward(session, |cmd| cmd.hide(representation, selection)) {
        Ok(()) => format!("Hiding {} for {}", representation, selection),
        Err(e) => {
            error!("hide {} failed: {}", representation, e);
            format!("Error hiding {} for {}: {}", representation, selection, e)
        }
    }
}

pub fn color_selection<E: Engine>(session: &Session<E>, color: &str, selection: &str) -> String {
    info!("color {}, {}", color, selection);
    match forward(session, |cmd| cmd.color(color, selection)) {
        Ok(()) => format!("Colored {} with {}", selection, color),
        Err(e) => {
            error!("color {} failed: {}", color, e);
            format!("Error coloring {} with {}: {}", selection, color, e)
        }
    }
}

pub fn add_label<E: Engine>(session: &Session<E>, selection: &str, text: &str) -> String {
    info!("label {}, {}", selection, text);
    match forward(session, |cmd| cmd.label(selection, text)) {
        Ok(()) => format!("Added label '{}' to {}", text, selection),
        Err(e) => {
            error!("label failed: {}", e);
            format!("Error adding label: {}", e)
        }
    }
}
