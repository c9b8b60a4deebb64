use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Failed to launch PyMOL: {0}")]
    Launch(String),

    #[error("PyMOL not properly initialized: {0}")]
    NotInitialized(String),

    #[error("{message}")]
    Command {
        command: &'static str,
        message: String,
    },

    #[error("Unexpected result from '{command}': {message}")]
    Conversion {
        command: &'static str,
        message: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    pub fn command(command: &'static str, message: impl Into<String>) -> Self {
        Self::Command {
            command,
            message: message.into(),
        }
    }

    pub fn conversion(command: &'static str, message: impl Into<String>) -> Self {
        Self::Conversion {
            command,
            message: message.into(),
        }
    }

    /// The engine command this error originated from, if any.
    pub fn command_name(&self) -> Option<&'static str> {
        match self {
            Self::Command { command, .. } | Self::Conversion { command, .. } => Some(command),
            _ => None,
        }
    }
}
