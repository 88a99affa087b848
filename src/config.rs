use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{AppError, AppResult};
use crate::session::DEFAULT_ENTITY_NAME;
use crate::store::StoreType;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StoreConfig {
    #[serde(rename = "type")]
    pub store_type: StoreType,
    /// Connection URL, e.g. "sqlite:./people.db" or "sqlite::memory:"
    pub url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            store_type: StoreType::Memory,
            url: None,
            max_connections: default_max_connections(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SessionConfig {
    /// Insert the sample people at startup
    #[serde(default)]
    pub seed_samples: bool,
    #[serde(default = "default_entity_name")]
    pub entity_name: String,
}

fn default_entity_name() -> String {
    DEFAULT_ENTITY_NAME.to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed_samples: false,
            entity_name: default_entity_name(),
        }
    }
}

impl AppConfig {
    /// Load configuration from YAML file
    pub fn load_from_file<P: AsRef<Path>>(config_path: P) -> AppResult<Self> {
        let path = config_path.as_ref();

        if !path.exists() {
            return Err(AppError::Configuration(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            AppError::Configuration(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        Self::from_yaml(&content)
            .map_err(|e| AppError::Configuration(format!("{} ({})", e, path.display())))
    }

    /// Parse a YAML document after expanding environment variables
    pub fn from_yaml(content: &str) -> AppResult<Self> {
        let expanded = expand_env_vars(content)?;

        let app_config: AppConfig = serde_yaml::from_str(&expanded)
            .map_err(|e| AppError::Configuration(format!("Failed to parse config: {}", e)))?;

        app_config.validate()?;
        Ok(app_config)
    }

    /// In-memory store on 127.0.0.1:3000 without sample data
    pub fn default_config() -> Self {
        AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
            },
            store: StoreConfig::default(),
            session: SessionConfig::default(),
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.store.store_type == StoreType::Sqlite && self.store.url.is_none() {
            return Err(AppError::Configuration(
                "store.url is required for the sqlite store".to_string(),
            ));
        }
        if self.store.max_connections == 0 {
            return Err(AppError::Configuration(
                "store.max_connections must be at least 1".to_string(),
            ));
        }
        if self.session.entity_name.trim().is_empty() {
            return Err(AppError::Configuration(
                "session.entity_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Expand `${VAR}` and `${VAR:-default}` references
fn expand_env_vars(content: &str) -> AppResult<String> {
    let mut expanded = String::with_capacity(content.len());
    let mut rest = content;

    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start + 2..].find('}') else {
            break;
        };

        expanded.push_str(&rest[..start]);
        let expr = &rest[start + 2..start + 2 + len];
        let (name, default) = match expr.split_once(":-") {
            Some((name, default)) => (name, Some(default)),
            None => (expr, None),
        };

        match (std::env::var(name), default) {
            (Ok(value), _) => expanded.push_str(&value),
            (Err(_), Some(default)) => expanded.push_str(default),
            (Err(_), None) => {
                return Err(AppError::Configuration(format!(
                    "Environment variable {} not found and no default provided",
                    name
                )))
            }
        }

        rest = &rest[start + 2 + len + 1..];
    }

    expanded.push_str(rest);
    Ok(expanded)
}
