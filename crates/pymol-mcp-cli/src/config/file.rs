use crate::error::{CliError, Result};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub server: Option<FileServerConfig>,
    pub engine: Option<FileEngineConfig>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileServerConfig {
    pub name: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileEngineConfig {
    pub launch_args: Option<Vec<String>>,
    /// Kept in file order, which is the order the engine applies them in.
    #[serde(default, deserialize_with = "ordered_settings")]
    pub settings: Option<Vec<(String, SettingValue)>>,
}

impl FileEngineConfig {
    /// Replaces an existing setting in place or appends a new one.
    pub fn set_setting(&mut self, key: &str, value: SettingValue) {
        let settings = self.settings.get_or_insert_with(Vec::new);
        match settings.iter_mut().find(|(k, _)| k == key) {
            Some(existing) => existing.1 = value,
            None => settings.push((key.to_string(), value)),
        }
    }
}

fn ordered_settings<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<Vec<(String, SettingValue)>>, D::Error>
where
    D: Deserializer<'de>,
{
    struct SettingsVisitor;

    impl<'de> Visitor<'de> for SettingsVisitor {
        type Value = Vec<(String, SettingValue)>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a table of setting names to values")
        }

        fn visit_map<A: MapAccess<'de>>(
            self,
            mut map: A,
        ) -> std::result::Result<Self::Value, A::Error> {
            let mut settings = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((key, value)) = map.next_entry::<String, SettingValue>()? {
                settings.push((key, value));
            }
            Ok(settings)
        }
    }

    deserializer.deserialize_map(SettingsVisitor).map(Some)
}

/// A start-up setting as written in the file. The engine takes every value as text.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum SettingValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Flag(bool),
}

impl SettingValue {
    pub fn to_engine_value(&self) -> String {
        match self {
            SettingValue::Text(s) => s.clone(),
            SettingValue::Integer(i) => i.to_string(),
            SettingValue::Float(f) => f.to_string(),
            SettingValue::Flag(true) => "on".to_string(),
            SettingValue::Flag(false) => "off".to_string(),
        }
    }
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn server_mut(&mut self) -> &mut FileServerConfig {
        self.server.get_or_insert_with(Default::default)
    }

    pub fn engine_mut(&mut self) -> &mut FileEngineConfig {
        self.engine.get_or_insert_with(Default::default)
    }
}
