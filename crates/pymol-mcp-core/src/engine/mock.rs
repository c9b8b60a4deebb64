//! A recording [`Engine`] used by the test suites.
//!
//! Every call is appended to an in-memory log together with its stringified arguments, and
//! any command can be scripted to fail with a fixed message.

use super::{Engine, EngineError, NameKind, ViewMatrix};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub command: &'static str,
    pub args: Vec<String>,
}

impl Call {
    pub fn new(command: &'static str, args: &[&str]) -> Self {
        Self {
            command,
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }
}

#[derive(Debug, Default)]
pub struct MockEngine {
    calls: Mutex<Vec<Call>>,
    failures: HashMap<&'static str, String>,
    objects: Vec<String>,
    selections: Vec<String>,
    select_count: usize,
    measurement: f64,
    view: ViewMatrix,
    png: Vec<u8>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, command: &'static str, message: &str) -> Self {
        self.failures.insert(command, message.to_string());
        self
    }

    pub fn with_objects(mut self, names: &[&str]) -> Self {
        self.objects = names.iter().map(|n| n.to_string()).collect();
        self
    }

    pub fn with_selections(mut self, names: &[&str]) -> Self {
        self.selections = names.iter().map(|n| n.to_string()).collect();
        self
    }

    pub fn with_select_count(mut self, count: usize) -> Self {
        self.select_count = count;
        self
    }

    pub fn with_measurement(mut self, value: f64) -> Self {
        self.measurement = value;
        self
    }

    pub fn with_view(mut self, view: ViewMatrix) -> Self {
        self.view = view;
        self
    }

    pub fn with_png(mut self, bytes: &[u8]) -> Self {
        self.png = bytes.to_vec();
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn commands(&self) -> Vec<&'static str> {
        self.calls().into_iter().map(|c| c.command).collect()
    }

    fn record(&self, command: &'static str, args: &[&str]) -> Result<(), EngineError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(Call::new(command, args));
        }
        match self.failures.get(command) {
            Some(message) => Err(EngineError::command(command, message.clone())),
            None => Ok(()),
        }
    }
}

impl Engine for MockEngine {
    fn fetch(&self, code: &str) -> Result<(), EngineError> {
        self.record("fetch", &[code])
    }

    fn load(&self, path: &str) -> Result<(), EngineError> {
        self.record("load", &[path])
    }

    fn save(&self, path: &str, selection: &str, state: i32) -> Result<(), EngineError> {
        self.record("save", &[path, selection, &state.to_string()])
    }

    fn show(&self, representation: &str, selection: &str) -> Result<(), EngineError> {
        self.record("show", &[representation, selection])
    }

    fn hide(&self, representation: &str, selection: &str) -> Result<(), EngineError> {
        self.record("hide", &[representation, selection])
    }

    fn color(&self, color: &str, selection: &str) -> Result<(), EngineError> {
        self.record("color", &[color, selection])
    }

    fn select(&self, name: &str, selection: &str) -> Result<usize, EngineError> {
        self.record("select", &[name, selection])?;
        Ok(self.select_count)
    }

    fn enable(&self, name: &str) -> Result<(), EngineError> {
        self.record("enable", &[name])
    }

    fn disable(&self, name: &str) -> Result<(), EngineError> {
        self.record("disable", &[name])
    }

    fn zoom(&self, selection: &str) -> Result<(), EngineError> {
        self.record("zoom", &[selection])
    }

    fn distance(&self, name: &str, atom1: &str, atom2: &str) -> Result<f64, EngineError> {
        self.record("distance", &[name, atom1, atom2])?;
        Ok(self.measurement)
    }

    fn angle(
        &self,
        name: &str,
        atom1: &str,
        atom2: &str,
        atom3: &str,
    ) -> Result<f64, EngineError> {
        self.record("angle", &[name, atom1, atom2, atom3])?;
        Ok(self.measurement)
    }

    fn dihedral(
        &self,
        name: &str,
        atom1: &str,
        atom2: &str,
        atom3: &str,
        atom4: &str,
    ) -> Result<f64, EngineError> {
        self.record("dihedral", &[name, atom1, atom2, atom3, atom4])?;
        Ok(self.measurement)
    }

    fn label(&self, selection: &str, expression: &str) -> Result<(), EngineError> {
        self.record("label", &[selection, expression])
    }

    fn viewport(&self, width: i32, height: i32) -> Result<(), EngineError> {
        self.record("viewport", &[&width.to_string(), &height.to_string()])
    }

    fn draw(&self) -> Result<(), EngineError> {
        self.record("draw", &[])
    }

    fn ray(&self, width: i32, height: i32) -> Result<(), EngineError> {
        self.record("ray", &[&width.to_string(), &height.to_string()])
    }

    fn png(&self, path: &str) -> Result<(), EngineError> {
        self.record("png", &[path])
    }

    fn png_bytes(&self) -> Result<Vec<u8>, EngineError> {
        self.record("png_bytes", &[])?;
        Ok(self.png.clone())
    }

    fn run(&self, command: &str) -> Result<(), EngineError> {
        self.record("do", &[command])
    }

    fn get_names(&self, kind: NameKind) -> Result<Vec<String>, EngineError> {
        self.record("get_names", &[kind.as_str()])?;
        Ok(match kind {
            NameKind::Objects => self.objects.clone(),
            NameKind::Selections => self.selections.clone(),
        })
    }

    fn get_view(&self) -> Result<ViewMatrix, EngineError> {
        self.record("get_view", &[])?;
        Ok(self.view)
    }

    fn set(&self, setting: &str, value: &str) -> Result<(), EngineError> {
        self.record("set", &[setting, value])
    }

    fn quit(&self) -> Result<(), EngineError> {
        self.record("quit", &[])
    }
}
