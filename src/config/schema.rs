use serde::{Deserialize, Serialize};

use super::defaults::*;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub rpc_code: String,
    pub zone: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default)]
    pub include_day_menu: bool,
    #[serde(default = "default_filename")]
    pub filename: String,
    #[serde(default = "default_thumbname")]
    pub thumbname: String,
    #[serde(default = "default_status_path")]
    pub status_path: String,
    #[serde(default = "default_menus_base_url")]
    pub menus_base_url: String,
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
    #[serde(default)]
    pub vacations: Vacations,
    #[serde(default)]
    pub day_menu: DayMenu,
    pub mail: Mail,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Vacations {
    #[serde(default = "default_vacations_url_template")]
    pub url_template: String,
    #[serde(default)]
    pub cache_dir: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DayMenu {
    #[serde(default = "default_rasterize_command")]
    pub rasterize_command: Vec<String>,
    #[serde(default = "default_rasterize_timeout_secs")]
    pub rasterize_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Mail {
    pub transport: String,
    pub from: String,
    pub to: Vec<String>,
    #[serde(default)]
    pub bcc: Vec<String>,
    #[serde(default = "default_mail_subject")]
    pub subject: String,
    #[serde(default = "default_mail_text")]
    pub text: String,
}
