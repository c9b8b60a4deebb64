//! The process-wide engine lifecycle.
//!
//! A [`Session`] is created once at start-up, hands the engine's command object to every
//! request, and shuts the engine down once at the end. A failed start is not fatal: the
//! session remembers why it failed and every later request reports that reason instead of
//! reaching the engine.

use crate::engine::{Engine, EngineError};
use tracing::{debug, error, info};

/// Why the engine could not be brought up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitFailure {
    pub message: String,
    pub detail: String,
}

impl InitFailure {
    fn from_error(err: &EngineError) -> Self {
        Self {
            message: err.to_string(),
            detail: format!("{:?}", err),
        }
    }
}

pub struct Session<E: Engine> {
    engine: Option<E>,
    failure: Option<InitFailure>,
    closed: bool,
}

impl<E: Engine> Session<E> {
    /// Launches the engine and applies the start-up settings in order.
    ///
    /// Any failure, whether from the launcher or from one of the settings, is captured and
    /// logged; the returned session is then in the failed state. An engine that launched but
    /// could not be configured is kept so that [`Session::shutdown`] still quits it.
    pub fn start<F>(launch: F, settings: &[(String, String)]) -> Self
    where
        F: FnOnce() -> Result<E, EngineError>,
    {
        info!("Starting PyMOL initialization");
        let engine = match launch() {
            Ok(engine) => engine,
            Err(err) => return Self::failed(None, &err),
        };
        info!("PyMOL launched successfully");

        match Self::configure(&engine, settings) {
            Ok(()) => {
                info!("PyMOL initialization completed successfully");
                Self {
                    engine: Some(engine),
                    failure: None,
                    closed: false,
                }
            }
            Err(err) => Self::failed(Some(engine), &err),
        }
    }

    fn failed(engine: Option<E>, err: &EngineError) -> Self {
        let failure = InitFailure::from_error(err);
        error!("Error during PyMOL initialization: {}", failure.message);
        error!("{}", failure.detail);
        Self {
            engine,
            failure: Some(failure),
            closed: false,
        }
    }

    /// Wraps an engine that is already running.
    pub fn from_engine(engine: E, settings: &[(String, String)]) -> Self {
        Self::start(|| Ok(engine), settings)
    }

    fn configure(engine: &E, settings: &[(String, String)]) -> Result<(), EngineError> {
        debug!("Configuring {} PyMOL setting(s)", settings.len());
        for (name, value) in settings {
            debug!("set {} = {}", name, value);
            engine.set(name, value)?;
        }
        Ok(())
    }

    /// The engine's command object, or the reason it is unavailable.
    pub fn cmd(&self) -> Result<&E, EngineError> {
        if let Some(failure) = &self.failure {
            error!("PyMOL not properly initialized: {}", failure.message);
            error!("Traceback: {}", failure.detail);
            return Err(EngineError::NotInitialized(failure.message.clone()));
        }
        match &self.engine {
            Some(engine) if !self.closed => Ok(engine),
            _ => Err(EngineError::NotInitialized(
                "session has been shut down".to_string(),
            )),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.failure.is_none() && self.engine.is_some() && !self.closed
    }

    pub fn init_failure(&self) -> Option<&InitFailure> {
        self.failure.as_ref()
    }

    /// Read access to the engine regardless of lifecycle state, for inspection.
    pub fn engine(&self) -> Option<&E> {
        self.engine.as_ref()
    }

    /// Quits the engine if one was launched. Errors are logged, never returned; repeated
    /// calls are no-ops.
    pub fn shutdown(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        let Some(engine) = &self.engine else {
            debug!("Skipping PyMOL cleanup, engine was never started");
            return;
        };

        info!("Cleaning up PyMOL");
        match engine.quit() {
            Ok(()) => info!("PyMOL cleanup completed"),
            Err(e) => {
                error!("Error during PyMOL cleanup: {}", e);
                error!("{:?}", e);
            }
        }
    }
}

impl<E: Engine> Drop for Session<E> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
