use anyhow::{Context, Result};
use aquatrack_schemas::schema::Schema;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};

/// Looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "aquatrack.yaml";

/// Settings for a session, read from YAML and then overridden by command-line flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where readings are loaded from at startup and saved to.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    /// Record layout of the data file.
    #[serde(default)]
    pub schema: Schema,

    /// Default tracing filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_data_file() -> PathBuf {
    PathBuf::from("readings.csv")
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            schema: Schema::default(),
            log_level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from a YAML file. An empty file yields the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {:?}", path))?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML from {:?}", path))
    }

    /// Loads `explicit` if given (it must exist), otherwise `aquatrack.yaml` in the
    /// working directory if present, otherwise the defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::load(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn with_overrides(mut self, data_file: Option<PathBuf>, schema: Option<Schema>) -> Self {
        if let Some(data_file) = data_file {
            self.data_file = data_file;
        }
        if let Some(schema) = schema {
            self.schema = schema;
        }
        self
    }
}
