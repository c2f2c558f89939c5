use chrono::format::{Item, StrftimeItems};
use thiserror::Error;

use super::schema::Config;
use crate::calendar::CalendarError;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Validation(String),
    #[error(transparent)]
    Calendar(#[from] CalendarError),
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Read { .. } => "CONFIG_READ_ERROR",
            Self::Parse { .. } => "CONFIG_PARSE_ERROR",
            Self::Validation(_) => "CONFIG_INVALID",
            Self::Calendar(error) => error.code(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rpc_code.trim().chars().count() < 2 {
            return Err(ConfigError::Validation(
                "rpc_code must have at least 2 characters".to_string(),
            ));
        }
        if self.zone.trim().is_empty() {
            return Err(ConfigError::Validation(
                "zone must not be empty".to_string(),
            ));
        }
        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::Validation(
                "user_agent must not be empty".to_string(),
            ));
        }
        validate_date_template("filename", &self.filename)?;
        validate_date_template("thumbname", &self.thumbname)?;
        validate_date_template("mail.subject", &self.mail.subject)?;
        if self.status_path.trim().is_empty() {
            return Err(ConfigError::Validation(
                "status_path must not be empty".to_string(),
            ));
        }
        if self.menus_base_url.trim().is_empty() {
            return Err(ConfigError::Validation(
                "menus_base_url must not be empty".to_string(),
            ));
        }
        if self.fetch_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "fetch_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if !self.vacations.url_template.contains("{zone}") {
            return Err(ConfigError::Validation(
                "vacations.url_template must contain the {zone} placeholder".to_string(),
            ));
        }
        if self.include_day_menu {
            let command = &self.day_menu.rasterize_command;
            if command.is_empty() {
                return Err(ConfigError::Validation(
                    "day_menu.rasterize_command must not be empty when include_day_menu is true"
                        .to_string(),
                ));
            }
            for placeholder in ["{input}", "{output}"] {
                if !command.iter().any(|arg| arg.contains(placeholder)) {
                    return Err(ConfigError::Validation(format!(
                        "day_menu.rasterize_command must reference {}",
                        placeholder
                    )));
                }
            }
        }
        if self.day_menu.rasterize_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "day_menu.rasterize_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.mail.transport.trim().is_empty() {
            return Err(ConfigError::Validation(
                "mail.transport must not be empty".to_string(),
            ));
        }
        if self.mail.from.trim().is_empty() {
            return Err(ConfigError::Validation(
                "mail.from must not be empty".to_string(),
            ));
        }
        if self.mail.to.iter().all(|address| address.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "mail.to must contain at least one address".to_string(),
            ));
        }
        Ok(())
    }
}

fn validate_date_template(field: &str, template: &str) -> Result<(), ConfigError> {
    if template.trim().is_empty() {
        return Err(ConfigError::Validation(format!(
            "{} must not be empty",
            field
        )));
    }
    if StrftimeItems::new(template).any(|item| matches!(item, Item::Error)) {
        return Err(ConfigError::Validation(format!(
            "{} is not a valid date template: {}",
            field, template
        )));
    }
    Ok(())
}
