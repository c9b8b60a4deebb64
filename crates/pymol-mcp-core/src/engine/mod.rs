//! # Engine Module
//!
//! The seam between this crate and the external molecular-graphics engine.
//!
//! ## Overview
//!
//! PyMOL owns every piece of molecular state: loaded objects, named selections, the camera
//! and the rendering buffers. This crate never inspects that state directly. Instead, it talks
//! to the engine through the [`Engine`] trait, a one-to-one restatement of the subset of the
//! `cmd` vocabulary that the server exposes.
//!
//! ## Architecture
//!
//! - **Command Object** ([`Engine`]) - One method per forwarded engine command
//! - **Error Handling** ([`error`]) - Failure type whose `Display` is the engine's own message
//! - **Test Double** (`mock`) - A recording engine for exercising handlers without PyMOL

pub mod error;
#[cfg(any(test, feature = "testing"))]
pub mod mock;

pub use error::EngineError;

/// The 18-value view matrix reported by `get_view`.
///
/// Layout follows the engine: a 3x3 rotation matrix, the camera position, the origin of
/// rotation and the front/back clipping planes followed by the orthoscopic flag.
pub type ViewMatrix = [f64; 18];

/// Which family of names a `get_names` query returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameKind {
    Objects,
    Selections,
}

impl NameKind {
    /// The literal the engine expects as the `type` argument of `get_names`.
    pub fn as_str(&self) -> &'static str {
        match self {
            NameKind::Objects => "objects",
            NameKind::Selections => "selections",
        }
    }
}

/// The command object of the external molecular-visualization engine.
///
/// Every method forwards its parameters verbatim to the engine command of the same name and
/// reports the engine's own failure through [`EngineError`]. Implementations must not
/// reinterpret selection expressions, representation names or colors; validation is the
/// engine's job.
pub trait Engine: Send {
    /// Downloads a structure from the Protein Data Bank (`cmd.fetch`).
    fn fetch(&self, code: &str) -> Result<(), EngineError>;

    /// Loads a structure file from disk (`cmd.load`).
    fn load(&self, path: &str) -> Result<(), EngineError>;

    /// Writes `selection` in `state` to `path` (`cmd.save`). A state of `-1` means current.
    fn save(&self, path: &str, selection: &str, state: i32) -> Result<(), EngineError>;

    fn show(&self, representation: &str, selection: &str) -> Result<(), EngineError>;

    fn hide(&self, representation: &str, selection: &str) -> Result<(), EngineError>;

    fn color(&self, color: &str, selection: &str) -> Result<(), EngineError>;

    /// Creates a named selection and returns the number of atoms it contains.
    fn select(&self, name: &str, selection: &str) -> Result<usize, EngineError>;

    fn enable(&self, name: &str) -> Result<(), EngineError>;

    fn disable(&self, name: &str) -> Result<(), EngineError>;

    fn zoom(&self, selection: &str) -> Result<(), EngineError>;

    /// Creates a distance object and returns the distance in Ångström.
    fn distance(&self, name: &str, atom1: &str, atom2: &str) -> Result<f64, EngineError>;

    /// Creates an angle object and returns the angle in degrees; `atom2` is the vertex.
    fn angle(&self, name: &str, atom1: &str, atom2: &str, atom3: &str)
    -> Result<f64, EngineError>;

    /// Creates a dihedral object and returns the torsion in degrees.
    fn dihedral(
        &self,
        name: &str,
        atom1: &str,
        atom2: &str,
        atom3: &str,
        atom4: &str,
    ) -> Result<f64, EngineError>;

    /// Labels the atoms of `selection` with a label expression.
    fn label(&self, selection: &str, expression: &str) -> Result<(), EngineError>;

    fn viewport(&self, width: i32, height: i32) -> Result<(), EngineError>;

    /// Renders the scene with the OpenGL pipeline (`cmd.draw`).
    fn draw(&self) -> Result<(), EngineError>;

    /// Ray-traces the scene at the given size (`cmd.ray`).
    fn ray(&self, width: i32, height: i32) -> Result<(), EngineError>;

    /// Writes the most recent image to a PNG file (`cmd.png`).
    fn png(&self, path: &str) -> Result<(), EngineError>;

    /// Returns the most recent image as PNG-encoded bytes.
    fn png_bytes(&self) -> Result<Vec<u8>, EngineError>;

    /// Runs a raw command line through the engine's parser (`cmd.do`).
    fn run(&self, command: &str) -> Result<(), EngineError>;

    fn get_names(&self, kind: NameKind) -> Result<Vec<String>, EngineError>;

    fn get_view(&self) -> Result<ViewMatrix, EngineError>;

    /// Changes an engine setting (`cmd.set`). Values are passed in their textual form.
    fn set(&self, setting: &str, value: &str) -> Result<(), EngineError>;

    /// Terminates the engine (`cmd.quit`).
    fn quit(&self) -> Result<(), EngineError>;
}
