use std::path::{Path, PathBuf};

use super::{schema::Config, validate::ConfigError};

const DEFAULT_CONFIG_PATH: &str = "config.toml";
const CONFIG_PATH_ENV: &str = "CANTINE_BOT_CONFIG";

pub fn resolve_config_path(cli_arg: Option<String>) -> PathBuf {
    cli_arg
        .filter(|value| !value.trim().is_empty())
        .or_else(|| std::env::var(CONFIG_PATH_ENV).ok())
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let path_str = path.display().to_string();
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path_str.clone(),
        source,
    })?;
    let config: Config = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path_str,
        source,
    })?;
    config.validate()?;
    Ok(config)
}
