//! # Tools Module
//!
//! The remotely invocable operations. Each handler obtains the engine's command object from
//! the [`Session`], forwards its parameters verbatim, and turns the outcome into a display
//! string. Engine failures never escape a handler: they are rendered with a per-tool prefix.
//!
//! ## Organization
//!
//! Handlers are grouped the way the engine groups its own commands:
//!
//! - [`io`] - Fetching, loading and saving structures
//! - [`display`] - Representations, colors and labels
//! - [`selecting`] - Named selections and object visibility
//! - [`viewing`] - Camera placement
//! - [`measuring`] - Distances, angles and dihedrals
//! - [`imaging`] - OpenGL drawing, ray tracing and PNG output
//! - [`control`] - Raw command execution
//! - [`info`] - Listing objects and selections
//!
//! [`call`] decodes a tool's JSON arguments (applying defaults) and dispatches by name;
//! [`catalog`] describes every tool for discovery.

pub mod control;
pub mod display;
pub mod imaging;
pub mod info;
pub mod io;
pub mod measuring;
pub mod schema;
pub mod selecting;
pub mod viewing;

use crate::engine::{Engine, EngineError};
use crate::session::Session;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

pub const PNG_MIME_TYPE: &str = "image/png";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub data: Vec<u8>,
    pub mime_type: &'static str,
}

impl ImagePayload {
    pub fn png(data: Vec<u8>) -> Self {
        Self {
            data,
            mime_type: PNG_MIME_TYPE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutput {
    Text(String),
    Image(ImagePayload),
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments for '{tool}': {source}")]
    InvalidArguments {
        tool: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Discovery entry for a single tool.
#[derive(Debug, Clone, Serialize)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Every tool the server offers, in presentation order.
pub fn catalog() -> Vec<ToolSpec> {
    let mut specs = Vec::new();
    specs.extend(io::specs());
    specs.extend(display::specs());
    specs.extend(selecting::specs());
    specs.extend(viewing::specs());
    specs.extend(measuring::specs());
    specs.extend(imaging::specs());
    specs.extend(control::specs());
    specs.extend(info::specs());
    specs
}

/// Decodes `arguments` for the named tool and runs its handler.
///
/// Only argument decoding and name lookup can fail here; engine failures are part of the
/// returned text.
pub fn call<E: Engine>(
    session: &Session<E>,
    name: &str,
    arguments: Value,
) -> Result<ToolOutput, ToolError> {
    debug!("Dispatching tool '{}' with arguments {}", name, arguments);
    let text = match name {
        "fetch_structure" => {
            let args: io::FetchArgs = decode(name, arguments)?;
            io::fetch_structure(session, &args.pdb_id)
        }
        "load_structure" => {
            let args: io::LoadArgs = decode(name, arguments)?;
            io::load_structure(session, &args.file_path)
        }
        "save_structure" => {
            let args: io::SaveArgs = decode(name, arguments)?;
            io::save_structure(session, &args.filename, &args.selection, args.state)
        }
        "show_representation" => {
            let args: display::RepresentationArgs = decode(name, arguments)?;
            display::show_representation(session, &args.representation, &args.selection)
        }
        "hide_representation" => {
            let args: display::RepresentationArgs = decode(name, arguments)?;
            display::hide_representation(session, &args.representation, &args.selection)
        }
        "color_selection" => {
            let args: display::ColorArgs = decode(name, arguments)?;
            display::color_selection(session, &args.color, &args.selection)
        }
        "add_label" => {
            let args: display::LabelArgs = decode(name, arguments)?;
            display::add_label(session, &args.selection, &args.text)
        }
        "create_selection" => {
            let args: selecting::SelectArgs = decode(name, arguments)?;
            selecting::create_selection(session, &args.name, &args.selection)
        }
        "enable_object" => {
            let args: selecting::NameArgs = decode(name, arguments)?;
            selecting::enable_object(session, &args.name)
        }
        "disable_object" => {
            let args: selecting::NameArgs = decode(name, arguments)?;
            selecting::disable_object(session, &args.name)
        }
        "zoom_selection" => {
            let args: viewing::ZoomArgs = decode(name, arguments)?;
            viewing::zoom_selection(session, &args.selection)
        }
        "measure_distance" => {
            let args: measuring::DistanceArgs = decode(name, arguments)?;
            measuring::measure_distance(session, &args.atom1, &args.atom2, &args.name)
        }
        "measure_angle" => {
            let args: measuring::AngleArgs = decode(name, arguments)?;
            measuring::measure_angle(session, &args.atom1, &args.atom2, &args.atom3, &args.name)
        }
        "measure_dihedral" => {
            let args: measuring::DihedralArgs = decode(name, arguments)?;
            measuring::measure_dihedral(
                session,
                [
                    args.atom1.as_str(),
                    args.atom2.as_str(),
                    args.atom3.as_str(),
                    args.atom4.as_str(),
                ],
                &args.name,
            )
        }
        "draw_image" => {
            let args: imaging::DrawArgs = decode(name, arguments)?;
            imaging::draw_image(session, args.width, args.height)
        }
        "ray_trace" => {
            let args: imaging::RayArgs = decode(name, arguments)?;
            imaging::ray_trace(session, args.width, args.height)
        }
        "save_png" => {
            let args: imaging::SavePngArgs = decode(name, arguments)?;
            imaging::save_png(session, &args.filename, args.width, args.height, args.ray)
        }
        "render_image" => {
            let args: imaging::RenderArgs = decode(name, arguments)?;
            let image = imaging::render_image(session, args.width, args.height, args.ray_trace);
            return Ok(ToolOutput::Image(image));
        }
        "run_command" => {
            let args: control::RunArgs = decode(name, arguments)?;
            control::run_command(session, &args.command)
        }
        "list_objects" => info::list_objects(session),
        "list_selections" => info::list_selections(session),
        _ => return Err(ToolError::UnknownTool(name.to_string())),
    };
    Ok(ToolOutput::Text(text))
}

fn decode<T: DeserializeOwned>(tool: &str, arguments: Value) -> Result<T, ToolError> {
    let arguments = match arguments {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    serde_json::from_value(arguments).map_err(|source| ToolError::InvalidArguments {
        tool: tool.to_string(),
        source,
    })
}

/// Runs `op` against the session's command object.
pub(crate) fn forward<E, T, F>(session: &Session<E>, op: F) -> Result<T, EngineError>
where
    E: Engine,
    F: FnOnce(&E) -> Result<T, EngineError>,
{
    let cmd = session.cmd()?;
    op(cmd)
}

/// Resolves a relative path against the current working directory.
pub(crate) fn absolute_path(path: &str) -> String {
    let candidate = Path::new(path);
    if candidate.is_absolute() {
        return path.to_string();
    }
    std::path::absolute(candidate)
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| path.to_string())
}

pub(crate) fn default_selection() -> String {
    "all".to_string()
}

pub(crate) fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::mock::MockEngine;
    use serde_json::json;
    use std::collections::HashSet;

    fn session() -> Session<MockEngine> {
        Session::from_engine(MockEngine::new(), &[])
    }

    fn sample_arguments(spec: &ToolSpec) -> Value {
        let mut args = serde_json::Map::new();
        for required in spec.input_schema["required"].as_array().unwrap() {
            args.insert(required.as_str().unwrap().to_string(), json!("x"));
        }
        Value::Object(args)
    }

    #[test]
    fn catalog_names_are_unique() {
        let names: Vec<_> = catalog().iter().map(|s| s.name).collect();
        let unique: HashSet<_> = names.iter().collect();
        assert_eq!(names.len(), unique.len());
        assert_eq!(names.len(), 21);
    }

    #[test]
    fn every_catalog_entry_dispatches() {
        let session = session();
        for spec in catalog() {
            let result = call(&session, spec.name, sample_arguments(&spec));
            assert!(result.is_ok(), "tool '{}' failed to dispatch: {:?}", spec.name, result);
        }
    }

    #[test]
    fn unknown_tool_is_rejected() {
        let result = call(&session(), "spin_molecule", json!({}));
        assert!(matches!(result, Err(ToolError::UnknownTool(name)) if name == "spin_molecule"));
    }

    #[test]
    fn missing_required_argument_is_invalid() {
        let result = call(&session(), "fetch_structure", json!({}));
        assert!(matches!(
            result,
            Err(ToolError::InvalidArguments { tool, .. }) if tool == "fetch_structure"
        ));
    }

    #[test]
    fn null_arguments_are_treated_as_empty() {
        let result = call(&session(), "zoom_selection", Value::Null).unwrap();
        assert_eq!(result, ToolOutput::Text("Zoomed on all".to_string()));
    }

    #[test]
    fn wrong_argument_type_is_invalid() {
        let result = call(&session(), "draw_image", json!({ "width": "wide" }));
        assert!(matches!(result, Err(ToolError::InvalidArguments { .. })));
    }

    #[test]
    fn negative_size_is_left_for_the_engine_to_reject() {
        let engine = MockEngine::new().failing("viewport", "invalid viewport size");
        let session = Session::from_engine(engine, &[]);

        let result = call(&session, "draw_image", json!({ "width": -1, "height": 600 })).unwrap();

        assert_eq!(
            result,
            ToolOutput::Text("Error preparing image: invalid viewport size".to_string())
        );
        assert_eq!(
            session.engine().unwrap().calls(),
            vec![crate::engine::mock::Call::new("viewport", &["-1", "600"])]
        );
    }

    #[test]
    fn absolute_path_leaves_absolute_paths_alone() {
        assert_eq!(absolute_path("/tmp/out.png"), "/tmp/out.png");
    }

    #[test]
    fn absolute_path_resolves_relative_paths_against_cwd() {
        let cwd = std::env::current_dir().unwrap();
        let resolved = absolute_path("out.pdb");
        assert_eq!(resolved, cwd.join("out.pdb").display().to_string());
    }
}
