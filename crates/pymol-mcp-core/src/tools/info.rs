//! Listing what the engine currently holds.

use super::schema::InputSchema;
use super::{ToolSpec, forward};
use crate::engine::{Engine, NameKind};
use crate::session::Session;
use tracing::error;

pub fn specs() -> Vec<ToolSpec> {
    vec![
        ToolSpec {
            name: "list_objects",
            description: "List all objects currently loaded in PyMOL.",
            input_schema: InputSchema::new().into_value(),
        },
        ToolSpec {
            name: "list_selections",
            description: "List all selections currently defined in PyMOL.",
            input_schema: InputSchema::new().into_value(),
        },
    ]
}

pub fn list_objects<E: Engine>(session: &Session<E>) -> String {
    match forward(session, |cmd| cmd.get_names(NameKind::Objects)) {
        Ok(objects) if objects.is_empty() => "No objects currently loaded in PyMOL.".to_string(),
        Ok(objects) => format!("Loaded objects:\n{}", objects.join("\n")),
        Err(e) => {
            error!("get_names objects failed: {}", e);
            format!("Error listing objects: {}", e)
        }
    }
}

pub fn list_selections<E: Engine>(session: &Session<E>) -> String {
    match forward(session, |cmd| cmd.get_names(NameKind::Selections)) {
        Ok(selections) if selections.is_empty() => {
            "No selections currently defined in PyMOL.".to_string()
        }
        Ok(selections) => format!("Defined selections:\n{}", selections.join("\n")),
        Err(e) => {
            error!("get_names selections failed: {}", e);
            format!("Error listing selections: {}", e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::mock::{Call, MockEngine};

    #[test]
    fn list_objects_joins_names_one_per_line() {
        let engine = MockEngine::new().with_objects(&["1dn2", "ligand"]);
        let session = Session::from_engine(engine, &[]);
        assert_eq!(list_objects(&session), "Loaded objects:\n1dn2\nligand");
        assert_eq!(
            session.engine().unwrap().calls(),
            vec![Call::new("get_names", &["objects"])]
        );
    }

    #[test]
    fn list_objects_reports_empty_session() {
        let session = Session::from_engine(MockEngine::new(), &[]);
        assert_eq!(list_objects(&session), "No objects currently loaded in PyMOL.");
    }

    #[test]
    fn list_selections_queries_selection_names() {
        let engine = MockEngine::new().with_selections(&["site", "lig"]);
        let session = Session::from_engine(engine, &[]);
        assert_eq!(list_selections(&session), "Defined selections:\nsite\nlig");
        assert_eq!(
            session.engine().unwrap().calls(),
            vec![Call::new("get_names", &["selections"])]
        );
    }

    #[test]
    fn list_selections_reports_none_defined() {
        let session = Session::from_engine(MockEngine::new(), &[]);
        assert_eq!(
            list_selections(&session),
            "No selections currently defined in PyMOL."
        );
    }

    #[test]
    fn listing_failures_are_prefixed() {
        let engine = MockEngine::new().failing("get_names", "engine busy");
        let session = Session::from_engine(engine, &[]);
        assert_eq!(list_objects(&session), "Error listing objects: engine busy");
        assert_eq!(
            list_selections(&session),
            "Error listing selections: engine busy"
        );
    }
}
