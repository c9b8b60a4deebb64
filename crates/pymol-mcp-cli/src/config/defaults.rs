use pymol_mcp::config::{DEFAULT_SERVER_NAME, EngineConfig};

pub struct DefaultsConfig {
    pub server_name: String,
    pub launch_args: Vec<String>,
    pub settings: Vec<(String, String)>,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        let engine = EngineConfig::default();
        Self {
            server_name: DEFAULT_SERVER_NAME.to_string(),
            launch_args: engine.launch_args,
            settings: engine.startup_settings,
        }
    }
}
