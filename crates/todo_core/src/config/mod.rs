use crate::error::AppError;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_ENV_VAR: &str = "TODOAPP_CONFIG_PATH";
const APP_DIR_NAME: &str = "todoapp";

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Task file used when neither `--file` nor `TODOAPP_STORE_PATH` is given.
    #[serde(default)]
    pub store_path: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: Config,
    pub error: Option<AppError>,
}

/// `TODOAPP_CONFIG_PATH`, else `config.json` in the platform config directory.
pub fn config_path() -> Result<PathBuf, AppError> {
    match std::env::var(CONFIG_ENV_VAR) {
        Ok(path) if !path.trim().is_empty() => Ok(PathBuf::from(path)),
        _ => dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
            .ok_or_else(|| AppError::invalid_data("no config directory on this platform")),
    }
}

pub fn load_config_with_fallback() -> ConfigLoad {
    let loaded = match config_path() {
        Ok(path) => load_config_with_fallback_from_path(&path),
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    };

    if let Some(err) = loaded.error.as_ref() {
        warn!("using default configuration: {err}");
    }
    loaded
}

fn load_config_with_fallback_from_path(path: &Path) -> ConfigLoad {
    if !path.exists() {
        debug!("no config file at {}", path.display());
        return ConfigLoad {
            config: Config::default(),
            error: None,
        };
    }

    let (config, error) = match load_config_from_path(path) {
        Ok(config) => (config, None),
        Err(err) => (Config::default(), Some(err)),
    };
    ConfigLoad { config, error }
}

fn load_config_from_path(path: &Path) -> Result<Config, AppError> {
    let content = std::fs::read_to_string(path)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    serde_json::from_str(&content).map_err(|err| {
        AppError::invalid_data(format!("invalid JSON in {}: {}", path.display(), err))
    })
}
