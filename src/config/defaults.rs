use std::path::PathBuf;

use super::schema::{DayMenu, Vacations};

pub(super) fn default_user_agent() -> String {
    concat!("cantine_bot/", env!("CARGO_PKG_VERSION")).to_string()
}

pub(super) fn default_filename() -> String {
    "menu-%G-%V.pdf".to_string()
}

pub(super) fn default_thumbname() -> String {
    "menu-%Y-%m-%d.png".to_string()
}

pub(super) fn default_status_path() -> String {
    let home = std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    home.join(".robotcantine.status.json")
        .to_string_lossy()
        .to_string()
}

pub(super) fn default_menus_base_url() -> String {
    "http://rpc01.com/menus".to_string()
}

pub(super) fn default_fetch_timeout_secs() -> u64 {
    60
}

pub(super) fn default_vacations_url_template() -> String {
    "https://fr.ftp.opendatasoft.com/openscol/fr-en-calendrier-scolaire/Zone-{zone}.ics"
        .to_string()
}

pub(super) fn default_rasterize_command() -> Vec<String> {
    ["gm", "convert", "-density", "150", "{input}[0]", "{output}"]
        .into_iter()
        .map(String::from)
        .collect()
}

pub(super) fn default_rasterize_timeout_secs() -> u64 {
    60
}

pub(super) fn default_mail_subject() -> String {
    "Menu de la semaine du %d/%m/%Y".to_string()
}

pub(super) fn default_mail_text() -> String {
    "Le menu de la cantine est en pièce jointe.\n\nSource : {URL}\n".to_string()
}

impl Default for Vacations {
    fn default() -> Self {
        Self {
            url_template: default_vacations_url_template(),
            cache_dir: None,
        }
    }
}

impl Default for DayMenu {
    fn default() -> Self {
        Self {
            rasterize_command: default_rasterize_command(),
            rasterize_timeout_secs: default_rasterize_timeout_secs(),
        }
    }
}
