use pymol_mcp::engine::{Engine, EngineError, NameKind, ViewMatrix};
use pyo3::prelude::*;
use tracing::{debug, info};

/// Handle to `pymol.cmd` inside the embedded interpreter.
pub struct PyMolEngine {
    cmd: Py<PyAny>,
}

impl PyMolEngine {
    /// Imports `pymol`, finishes its launch with `args` and grabs the command module.
    ///
    /// `args` is the engine's own command line, program name first (e.g. `["pymol", "-cq"]`).
    pub fn launch(args: &[String]) -> Result<Self, EngineError> {
        info!("Launching PyMOL with arguments {:?}", args);
        Python::with_gil(|py| {
            let launch = || -> PyResult<Py<PyAny>> {
                let pymol = py.import("pymol")?;
                pymol.call_method1("finish_launching", (args.to_vec(),))?;
                Ok(pymol.getattr("cmd")?.unbind())
            };
            match launch() {
                Ok(cmd) => {
                    info!("PyMOL launched");
                    Ok(Self { cmd })
                }
                Err(err) => Err(EngineError::Launch(error_message(py, &err))),
            }
        })
    }

    fn with_cmd<T>(
        &self,
        command: &'static str,
        f: impl FnOnce(&Bound<'_, PyAny>) -> PyResult<T>,
    ) -> Result<T, EngineError> {
        debug!("cmd.{}", command);
        Python::with_gil(|py| {
            f(self.cmd.bind(py))
                .map_err(|err| EngineError::command(command, error_message(py, &err)))
        })
    }
}

/// The exception's own message, falling back to `Type: message` when it is blank.
fn error_message(py: Python<'_>, err: &PyErr) -> String {
    let message = err.value(py).to_string();
    if message.trim().is_empty() {
        err.to_string()
    } else {
        message
    }
}

fn view_from_values(values: Vec<f64>) -> Result<ViewMatrix, EngineError> {
    let len = values.len();
    ViewMatrix::try_from(values).map_err(|_| {
        EngineError::conversion("get_view", format!("expected 18 values, got {}", len))
    })
}

impl Engine for PyMolEngine {
    fn fetch(&self, code: &str) -> Result<(), EngineError> {
        self.with_cmd("fetch", |cmd| cmd.call_method1("fetch", (code,)).map(drop))
    }

    fn load(&self, path: &str) -> Result<(), EngineError> {
        self.with_cmd("load", |cmd| cmd.call_method1("load", (path,)).map(drop))
    }

    fn save(&self, path: &str, selection: &str, state: i32) -> Result<(), EngineError> {
        self.with_cmd("save", |cmd| {
            cmd.call_method1("save", (path, selection, state)).map(drop)
        })
    }

    fn show(&self, representation: &str, selection: &str) -> Result<(), EngineError> {
        self.with_cmd("show", |cmd| {
            cmd.call_method1("show", (representation, selection)).map(drop)
        })
    }

    fn hide(&self, representation: &str, selection: &str) -> Result<(), EngineError> {
        self.with_cmd("hide", |cmd| {
            cmd.call_method1("hide", (representation, selection)).map(drop)
        })
    }

    fn color(&self, color: &str, selection: &str) -> Result<(), EngineError> {
        self.with_cmd("color", |cmd| {
            cmd.call_method1("color", (color, selection)).map(drop)
        })
    }

    fn select(&self, name: &str, selection: &str) -> Result<usize, EngineError> {
        self.with_cmd("select", |cmd| {
            cmd.call_method1("select", (name, selection))?.extract()
        })
    }

    fn enable(&self, name: &str) -> Result<(), EngineError> {
        self.with_cmd("enable", |cmd| cmd.call_method1("enable", (name,)).map(drop))
    }

    fn disable(&self, name: &str) -> Result<(), EngineError> {
        self.with_cmd("disable", |cmd| cmd.call_method1("disable", (name,)).map(drop))
    }

    fn zoom(&self, selection: &str) -> Result<(), EngineError> {
        self.with_cmd("zoom", |cmd| cmd.call_method1("zoom", (selection,)).map(drop))
    }

    fn distance(&self, name: &str, atom1: &str, atom2: &str) -> Result<f64, EngineError> {
        self.with_cmd("distance", |cmd| {
            cmd.call_method1("distance", (name, atom1, atom2))?.extract()
        })
    }

    fn angle(
        &self,
        name: &str,
        atom1: &str,
        atom2: &str,
        atom3: &str,
    ) -> Result<f64, EngineError> {
        self.with_cmd("angle", |cmd| {
            cmd.call_method1("angle", (name, atom1, atom2, atom3))?.extract()
        })
    }

    fn dihedral(
        &self,
        name: &str,
        atom1: &str,
        atom2: &str,
        atom3: &str,
        atom4: &str,
    ) -> Result<f64, EngineError> {
        self.with_cmd("dihedral", |cmd| {
            cmd.call_method1("dihedral", (name, atom1, atom2, atom3, atom4))?
                .extract()
        })
    }

    fn label(&self, selection: &str, expression: &str) -> Result<(), EngineError> {
        self.with_cmd("label", |cmd| {
            cmd.call_method1("label", (selection, expression)).map(drop)
        })
    }

    fn viewport(&self, width: i32, height: i32) -> Result<(), EngineError> {
        self.with_cmd("viewport", |cmd| {
            cmd.call_method1("viewport", (width, height)).map(drop)
        })
    }

    fn draw(&self) -> Result<(), EngineError> {
        self.with_cmd("draw", |cmd| cmd.call_method0("draw").map(drop))
    }

    fn ray(&self, width: i32, height: i32) -> Result<(), EngineError> {
        self.with_cmd("ray", |cmd| cmd.call_method1("ray", (width, height)).map(drop))
    }

    fn png(&self, path: &str) -> Result<(), EngineError> {
        self.with_cmd("png", |cmd| cmd.call_method1("png", (path,)).map(drop))
    }

    fn png_bytes(&self) -> Result<Vec<u8>, EngineError> {
        let file = tempfile::Builder::new()
            .prefix("pymol-mcp-")
            .suffix(".png")
            .tempfile()?;
        let path = file.path().to_string_lossy().into_owned();
        self.png(&path)?;
        let bytes = std::fs::read(file.path())?;
        debug!("Read {} PNG bytes from {}", bytes.len(), path);
        Ok(bytes)
    }

    fn run(&self, command: &str) -> Result<(), EngineError> {
        self.with_cmd("do", |cmd| cmd.call_method1("do", (command,)).map(drop))
    }

    fn get_names(&self, kind: NameKind) -> Result<Vec<String>, EngineError> {
        self.with_cmd("get_names", |cmd| {
            cmd.call_method1("get_names", (kind.as_str(),))?.extract()
        })
    }

    fn get_view(&self) -> Result<ViewMatrix, EngineError> {
        let values: Vec<f64> =
            self.with_cmd("get_view", |cmd| cmd.call_method0("get_view")?.extract())?;
        view_from_values(values)
    }

    fn set(&self, setting: &str, value: &str) -> Result<(), EngineError> {
        self.with_cmd("set", |cmd| cmd.call_method1("set", (setting, value)).map(drop))
    }

    fn quit(&self) -> Result<(), EngineError> {
        self.with_cmd("quit", |cmd| cmd.call_method0("quit").map(drop))
    }
}
