use thiserror::Error;

pub const DEFAULT_SERVER_NAME: &str = "PyMOL";

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid value for '{name}': {reason}")]
    InvalidValue { name: &'static str, reason: String },
}

/// How the engine is started and prepared before the first request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Command line handed to the engine's launcher, program name first.
    pub launch_args: Vec<String>,
    /// Settings applied in order right after launch.
    pub startup_settings: Vec<(String, String)>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            launch_args: vec!["pymol".to_string(), "-cq".to_string()],
            startup_settings: vec![
                ("retain_order".to_string(), "1".to_string()),
                ("pdb_use_ter_records".to_string(), "1".to_string()),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub name: String,
    pub version: String,
    pub engine: EngineConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_SERVER_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            engine: EngineConfig::default(),
        }
    }
}

#[derive(Default)]
pub struct ServerConfigBuilder {
    name: Option<String>,
    version: Option<String>,
    launch_args: Option<Vec<String>>,
    startup_settings: Option<Vec<(String, String)>>,
}

impl ServerConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
    pub fn launch_args(mut self, args: Vec<String>) -> Self {
        self.launch_args = Some(args);
        self
    }
    pub fn startup_settings(mut self, settings: Vec<(String, String)>) -> Self {
        self.startup_settings = Some(settings);
        self
    }

    pub fn build(self) -> Result<ServerConfig, ConfigError> {
        let name = self
            .name
            .ok_or(ConfigError::MissingParameter("name"))?;
        if name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "name",
                reason: "server name cannot be empty".to_string(),
            });
        }

        let launch_args = self
            .launch_args
            .ok_or(ConfigError::MissingParameter("launch_args"))?;
        if launch_args.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "launch_args",
                reason: "at least the program name is required".to_string(),
            });
        }

        Ok(ServerConfig {
            name,
            version: self
                .version
                .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string()),
            engine: EngineConfig {
                launch_args,
                startup_settings: self
                    .startup_settings
                    .ok_or(ConfigError::MissingParameter("startup_settings"))?,
            },
        })
    }
}
