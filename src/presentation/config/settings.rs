use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub llm: LlmSettings,
    pub storage: StorageSettings,
    pub database: DatabaseSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub provider: AnnotatorProvider,
    pub api_key: String,
    pub model: String,
    pub request_timeout_secs: u64,
    pub requests_per_minute: u32,
    pub burst: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotatorProvider {
    OpenAi,
    Mock,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub root_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub json: bool,
}

impl Settings {
    /// Loads settings from a TOML file, falling back to defaults when the
    /// file is absent. Secrets and deployment-specific values come from the
    /// environment on top: `OPENAI_API_KEY` and `SERVER_PORT`.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let mut settings = if path.exists() {
            let raw = std::fs::read_to_string(path).map_err(SettingsError::Read)?;
            toml::from_str(&raw).map_err(SettingsError::Parse)?
        } else {
            Settings::default()
        };

        if let Ok(api_key) = std::env::var("OPENAI_API_KEY") {
            settings.llm.api_key = api_key;
        }
        if let Some(port) = std::env::var("SERVER_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
        {
            settings.server.port = port;
        }

        Ok(settings)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read config file: {0}")]
    Read(std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(toml::de::Error),
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            llm: LlmSettings::default(),
            storage: StorageSettings::default(),
            database: DatabaseSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: AnnotatorProvider::OpenAi,
            api_key: String::new(),
            model: "gpt-4o-2024-08-06".to_string(),
            request_timeout_secs: 30,
            // One call roughly every five seconds, matching the provider's
            // documented per-minute budget for this workload.
            requests_per_minute: 12,
            burst: 2,
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("data/staging"),
        }
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/klaksvik.db"),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}
