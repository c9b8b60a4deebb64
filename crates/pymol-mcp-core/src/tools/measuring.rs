//! Geometry measurements.
//!
//! The engine computes the values and creates the measurement objects; these handlers only
//! format the returned number to two decimals.

use super::schema::InputSchema;
use super::{ToolSpec, forward};
use crate::engine::Engine;
use crate::session::Session;
use serde::Deserialize;
use tracing::{error, info};

#[derive(Debug, Deserialize)]
pub struct DistanceArgs {
    pub atom1: String,
    pub atom2: String,
    #[serde(default = "default_distance_name")]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct AngleArgs {
    pub atom1: String,
    pub atom2: String,
    pub atom3: String,
    #[serde(default = "default_angle_name")]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct DihedralArgs {
    pub atom1: String,
    pub atom2: String,
    pub atom3: String,
    pub atom4: String,
    #[serde(default = "default_dihedral_name")]
    pub name: String,
}

fn default_distance_name() -> String {
    "dist01".to_string()
}

fn default_angle_name() -> String {
    "angle01".to_string()
}

fn default_dihedral_name() -> String {
    "dihedral01".to_string()
}

pub fn specs() -> Vec<ToolSpec> {
    vec![
        ToolSpec {
            name: "measure_distance",
            description: "Measure the distance between two atoms.",
            input_schema: InputSchema::new()
                .string("atom1", "First atom selection")
                .string("atom2", "Second atom selection")
                .string_or("name", "dist01", "Name for the measurement object")
                .into_value(),
        },
        ToolSpec {
            name: "measure_angle",
            description: "Measure the angle between three atoms.",
            input_schema: InputSchema::new()
                .string("atom1", "First atom selection")
                .string("atom2", "Second atom selection (vertex)")
                .string("atom3", "Third atom selection")
                .string_or("name", "angle01", "Name for the measurement object")
                .into_value(),
        },
        ToolSpec {
            name: "measure_dihedral",
            description: "Measure the dihedral angle between four atoms.",
            input_schema: InputSchema::new()
                .string("atom1", "First atom selection")
                .string("atom2", "Second atom selection")
                .string("atom3", "Third atom selection")
                .string("atom4", "Fourth atom selection")
                .string_or("name", "dihedral01", "Name for the measurement object")
                .into_value(),
        },
    ]
}

pub fn measure_distance<E: Engine>(
    session: &Session<E>,
    atom1: &str,
    atom2: &str,
    name: &str,
) -> String {
    info!("distance {}, {}, {}", name, atom1, atom2);
    match forward(session, |cmd| cmd.distance(name, atom1, atom2)) {
        Ok(d) => format!("Distance between {} and {} is {:.2} Å", atom1, atom2, d),
        Err(e) => {
            error!("distance {} failed: {}", name, e);
            format!("Error measuring distance: {}", e)
        }
    }
}

pub fn measure_angle<E: Engine>(
    session: &Session<E>,
    atom1: &str,
    atom2: &str,
    atom3: &str,
    name: &str,
) -> String {
    info!("angle {}, {}, {}, {}", name, atom1, atom2, atom3);
    match forward(session, |cmd| cmd.angle(name, atom1, atom2, atom3)) {
        Ok(v) => format!(
            "Angle between {}, {}, and {} is {:.2}°",
            atom1, atom2, atom3, v
        ),
        Err(e) => {
            error!("angle {} failed: {}", name, e);
            format!("Error measuring angle: {}", e)
        }
    }
}

pub fn measure_dihedral<E: Engine>(session: &Session<E>, atoms: [&str; 4], name: &str) -> String {
    let [atom1, atom2, atom3, atom4] = atoms;
    info!("dihedral {}, {}, {}, {}, {}", name, atom1, atom2, atom3, atom4);
    match forward(session, |cmd| cmd.dihedral(name, atom1, atom2, atom3, atom4)) {
        Ok(v) => format!(
            "Dihedral angle between {}, {}, {}, and {} is {:.2}°",
            atom1, atom2, atom3, atom4, v
        ),
        Err(e) => {
            error!("dihedral {} failed: {}", name, e);
            format!("Error measuring dihedral angle: {}", e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::mock::{Call, MockEngine};

    #[test]
    fn distance_is_rounded_to_two_decimals() {
        let session = Session::from_engine(MockEngine::new().with_measurement(3.14159), &[]);
        assert_eq!(
            measure_distance(&session, "resi 10 and name CA", "resi 20 and name CA", "dist01"),
            "Distance between resi 10 and name CA and resi 20 and name CA is 3.14 Å"
        );
        assert_eq!(
            session.engine().unwrap().calls(),
            vec![Call::new(
                "distance",
                &["dist01", "resi 10 and name CA", "resi 20 and name CA"]
            )]
        );
    }

    #[test]
    fn angle_forwards_vertex_in_middle() {
        let session = Session::from_engine(MockEngine::new().with_measurement(109.5), &[]);
        assert_eq!(
            measure_angle(&session, "a1", "a2", "a3", "angle01"),
            "Angle between a1, a2, and a3 is 109.50°"
        );
        assert_eq!(
            session.engine().unwrap().calls(),
            vec![Call::new("angle", &["angle01", "a1", "a2", "a3"])]
        );
    }

    #[test]
    fn dihedral_keeps_sign() {
        let session = Session::from_engine(MockEngine::new().with_measurement(-60.257), &[]);
        assert_eq!(
            measure_dihedral(&session, ["a", "b", "c", "d"], "phi"),
            "Dihedral angle between a, b, c, and d is -60.26°"
        );
        assert_eq!(
            session.engine().unwrap().calls(),
            vec![Call::new("dihedral", &["phi", "a", "b", "c", "d"])]
        );
    }

    #[test]
    fn measurement_failures_use_generic_prefixes() {
        let engine = MockEngine::new()
            .failing("distance", "Selection 1 is empty")
            .failing("angle", "Selection 2 is empty")
            .failing("dihedral", "Selection 3 is empty");
        let session = Session::from_engine(engine, &[]);

        assert_eq!(
            measure_distance(&session, "x", "y", "d"),
            "Error measuring distance: Selection 1 is empty"
        );
        assert_eq!(
            measure_angle(&session, "x", "y", "z", "a"),
            "Error measuring angle: Selection 2 is empty"
        );
        assert_eq!(
            measure_dihedral(&session, ["w", "x", "y", "z"], "t"),
            "Error measuring dihedral angle: Selection 3 is empty"
        );
    }

    #[test]
    fn measurement_names_have_defaults() {
        let distance: DistanceArgs =
            serde_json::from_value(serde_json::json!({ "atom1": "a", "atom2": "b" })).unwrap();
        let angle: AngleArgs = serde_json::from_value(
            serde_json::json!({ "atom1": "a", "atom2": "b", "atom3": "c" }),
        )
        .unwrap();
        let dihedral: DihedralArgs = serde_json::from_value(
            serde_json::json!({ "atom1": "a", "atom2": "b", "atom3": "c", "atom4": "d" }),
        )
        .unwrap();

        assert_eq!(distance.name, "dist01");
        assert_eq!(angle.name, "angle01");
        assert_eq!(dihedral.name, "dihedral01");
    }
}
