use super::defaults::DefaultsConfig;
use super::file::{FileConfig, SettingValue};
use crate::cli::Cli;
use crate::error::{CliError, Result};
use directories::ProjectDirs;
use pymol_mcp::config::{ServerConfig, ServerConfigBuilder};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const CONFIG_FILE_NAME: &str = "config.toml";

pub fn build_config(args: &Cli) -> Result<ServerConfig> {
    let config_path = match &args.config {
        Some(path) => Some(path.clone()),
        None => default_config_path().filter(|p| p.is_file()),
    };
    build_from(config_path.as_deref(), &args.set_values)
}

/// The per-user configuration file, e.g. `~/.config/pymol-mcp/config.toml` on Linux.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "pymol-mcp").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

fn build_from(config_path: Option<&Path>, set_values: &[String]) -> Result<ServerConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = match config_path {
        Some(path) => {
            info!("Using configuration file {}", path.display());
            FileConfig::from_file(path)?
        }
        None => {
            debug!("No configuration file, using built-in defaults");
            FileConfig::default()
        }
    };

    let mut file_config = apply_set_values(file_config, set_values)?;

    let server_file = file_config.server.take().unwrap_or_default();
    let engine_file = file_config.engine.take().unwrap_or_default();

    let name = server_file.name.unwrap_or(defaults.server_name);
    let launch_args = engine_file.launch_args.unwrap_or(defaults.launch_args);

    let mut settings = defaults.settings;
    for (key, value) in engine_file.settings.unwrap_or_default() {
        let value = value.to_engine_value();
        match settings.iter_mut().find(|(k, _)| *k == key) {
            Some(existing) => existing.1 = value,
            None => settings.push((key, value)),
        }
    }

    let config = ServerConfigBuilder::new()
        .name(name)
        .launch_args(launch_args)
        .startup_settings(settings)
        .build()?;
    debug!("Resolved configuration: {:?}", config);
    Ok(config)
}

fn apply_set_values(mut file_config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };

        match key {
            "server.name" => {
                file_config.server_mut().name = Some(value.to_string());
            }
            "engine.launch-args" => {
                let args = value
                    .split(',')
                    .map(str::trim)
                    .filter(|a| !a.is_empty())
                    .map(str::to_string)
                    .collect();
                file_config.engine_mut().launch_args = Some(args);
            }
            _ => match key.strip_prefix("engine.settings.") {
                Some(setting) if !setting.is_empty() => {
                    file_config
                        .engine_mut()
                        .set_setting(setting, SettingValue::Text(value.to_string()));
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            },
        }
    }
    Ok(file_config)
}
