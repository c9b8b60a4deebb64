//! Structure loading and saving.

use super::schema::InputSchema;
use super::{ToolSpec, absolute_path, default_selection, forward};
use crate::engine::Engine;
use crate::session::Session;
use serde::Deserialize;
use tracing::{error, info};

#[derive(Debug, Deserialize)]
pub struct FetchArgs {
    pub pdb_id: String,
}

#[derive(Debug, Deserialize)]
pub struct LoadArgs {
    pub file_path: String,
}

#[derive(Debug, Deserialize)]
pub struct SaveArgs {
    pub filename: String,
    #[serde(default = "default_selection")]
    pub selection: String,
    #[serde(default = "current_state")]
    pub state: i32,
}

fn current_state() -> i32 {
    -1
}

pub fn specs() -> Vec<ToolSpec> {
    vec![
        ToolSpec {
            name: "fetch_structure",
            description: "Fetch a structure from the Protein Data Bank.",
            input_schema: InputSchema::new()
                .string("pdb_id", "The 4-character PDB ID code (e.g., '1dn2')")
                .into_value(),
        },
        ToolSpec {
            name: "load_structure",
            description: "Load a structure from a local file.",
            input_schema: InputSchema::new()
                .string(
                    "file_path",
                    "Path to the structure file (e.g., PDB, CIF, MOL, etc.)",
                )
                .into_value(),
        },
        ToolSpec {
            name: "save_structure",
            description: "Save a structure to a file.",
            input_schema: InputSchema::new()
                .string("filename", "Output filename")
                .string_or("selection", "all", "PyMOL selection to save")
                .integer_or("state", -1, "State to save (-1 = current)")
                .into_value(),
        },
    ]
}

pub fn fetch_structure<E: Engine>(session: &Session<E>, pdb_id: &str) -> String {
    info!("Fetching structure with PDB ID: {}", pdb_id);
    match forward(session, |cmd| cmd.fetch(pdb_id)) {
        Ok(()) => {
            info!("Successfully fetched PDB ID {}", pdb_id);
            format!("Successfully fetched {}", pdb_id)
        }
        Err(e) => {
            error!("Error fetching PDB ID {}: {}", pdb_id, e);
            format!("Error fetching {}: {}", pdb_id, e)
        }
    }
}

pub fn load_structure<E: Engine>(session: &Session<E>, file_path: &str) -> String {
    let file_path = absolute_path(file_path);
    info!("Loading structure from {}", file_path);
    match forward(session, |cmd| cmd.load(&file_path)) {
        Ok(()) => format!("Successfully loaded {}", file_path),
        Err(e) => {
            error!("Error loading {}: {}", file_path, e);
            format!("Error loading {}: {}", file_path, e)
        }
    }
}

pub fn save_structure<E: Engine>(
    session: &Session<E>,
    filename: &str,
    selection: &str,
    state: i32,
) -> String {
    let filename = absolute_path(filename);
    info!("Saving {} (state {}) to {}", selection, state, filename);
    match forward(session, |cmd| cmd.save(&filename, selection, state)) {
        Ok(()) => format!("Saved {} to {}", selection, filename),
        Err(e) => {
            error!("Error saving to {}: {}", filename, e);
            format!("Error saving to {}: {}", filename, e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineError;
    use crate::engine::mock::{Call, MockEngine};

    #[test]
    fn fetch_forwards_code_and_reports_success() {
        let session = Session::from_engine(MockEngine::new(), &[]);
        let message = fetch_structure(&session, "1dn2");

        assert_eq!(message, "Successfully fetched 1dn2");
        assert_eq!(
            session.engine().unwrap().calls(),
            vec![Call::new("fetch", &["1dn2"])]
        );
    }

    #[test]
    fn fetch_failure_is_prefixed() {
        let engine = MockEngine::new().failing("fetch", "unable to fetch file: '9zzz'");
        let session = Session::from_engine(engine, &[]);

        assert_eq!(
            fetch_structure(&session, "9zzz"),
            "Error fetching 9zzz: unable to fetch file: '9zzz'"
        );
    }

    #[test]
    fn fetch_against_failed_session_reports_initialization_error() {
        let session: Session<MockEngine> = Session::start(
            || Err(EngineError::Launch("no display".to_string())),
            &[],
        );

        assert_eq!(
            fetch_structure(&session, "1abc"),
            "Error fetching 1abc: PyMOL not properly initialized: Failed to launch PyMOL: no display"
        );
    }

    #[test]
    fn load_makes_relative_paths_absolute() {
        let session = Session::from_engine(MockEngine::new(), &[]);
        let expected = std::env::current_dir()
            .unwrap()
            .join("protein.pdb")
            .display()
            .to_string();

        let message = load_structure(&session, "protein.pdb");

        assert_eq!(message, format!("Successfully loaded {}", expected));
        assert_eq!(
            session.engine().unwrap().calls(),
            vec![Call::new("load", &[expected.as_str()])]
        );
    }

    #[test]
    fn load_failure_mentions_resolved_path() {
        let engine = MockEngine::new().failing("load", "File not found");
        let session = Session::from_engine(engine, &[]);

        assert_eq!(
            load_structure(&session, "/data/missing.cif"),
            "Error loading /data/missing.cif: File not found"
        );
    }

    #[test]
    fn save_forwards_selection_and_state() {
        let session = Session::from_engine(MockEngine::new(), &[]);
        let message = save_structure(&session, "/tmp/out.pdb", "chain A", 2);

        assert_eq!(message, "Saved chain A to /tmp/out.pdb");
        assert_eq!(
            session.engine().unwrap().calls(),
            vec![Call::new("save", &["/tmp/out.pdb", "chain A", "2"])]
        );
    }

    #[test]
    fn save_args_default_to_all_and_current_state() {
        let args: SaveArgs =
            serde_json::from_value(serde_json::json!({ "filename": "x.pdb" })).unwrap();
        assert_eq!(args.selection, "all");
        assert_eq!(args.state, -1);
    }

    #[test]
    fn save_failure_is_prefixed() {
        let engine = MockEngine::new().failing("save", "Permission denied");
        let session = Session::from_engine(engine, &[]);

        assert_eq!(
            save_structure(&session, "/root/out.pdb", "all", -1),
            "Error saving to /root/out.pdb: Permission denied"
        );
    }
}
