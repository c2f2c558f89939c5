use std::fmt::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::calendar::WeekWindow;
use crate::config::{Config, ConfigError};

/// Downloads at or below this size are error pages or truncated transfers.
const MIN_CACHED_MENU_BYTES: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuFiles {
    pub menu: PathBuf,
    pub thumbnail: PathBuf,
}

impl MenuFiles {
    pub fn for_window(config: &Config, window: &WeekWindow) -> Result<Self, ConfigError> {
        Ok(Self {
            menu: PathBuf::from(render_date_template(&config.filename, window.week_monday)?),
            thumbnail: PathBuf::from(render_date_template(
                &config.thumbname,
                window.target_day,
            )?),
        })
    }
}

pub fn render_date_template(template: &str, date: NaiveDate) -> Result<String, ConfigError> {
    let mut rendered = String::new();
    write!(rendered, "{}", date.format(template)).map_err(|_| {
        ConfigError::Validation(format!("invalid date template: {}", template))
    })?;
    Ok(rendered)
}

pub async fn is_cached(path: &Path) -> bool {
    match tokio::fs::metadata(path).await {
        Ok(metadata) => metadata.is_file() && metadata.len() > MIN_CACHED_MENU_BYTES,
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use tempfile::tempdir;

    use super::{MenuFiles, is_cached, render_date_template};
    use crate::calendar::compute_week_window;
    use crate::config::fixtures::sample_config;

    #[test]
    fn renders_menu_and_thumbnail_names_from_the_window() {
        let saturday = NaiveDate::from_ymd_opt(2024, 9, 14).expect("valid date");
        let files = MenuFiles::for_window(&sample_config(), &compute_week_window(saturday))
            .expect("templates are valid");

        assert_eq!(files.menu.to_string_lossy(), "menu-2024-38.pdf");
        assert_eq!(files.thumbnail.to_string_lossy(), "menu-2024-09-16.png");
    }

    #[test]
    fn invalid_template_is_an_error() {
        let date = NaiveDate::from_ymd_opt(2024, 9, 14).expect("valid date");
        assert!(render_date_template("menu-%Q", date).is_err());
    }

    #[tokio::test]
    async fn small_files_do_not_count_as_cached() {
        let temp = tempdir().expect("tempdir should be created");
        let small = temp.path().join("small.pdf");
        let large = temp.path().join("large.pdf");
        std::fs::write(&small, vec![0u8; 512]).expect("small file written");
        std::fs::write(&large, vec![0u8; 20_000]).expect("large file written");

        assert!(!is_cached(&small).await);
        assert!(is_cached(&large).await);
        assert!(!is_cached(&temp.path().join("absent.pdf")).await);
    }
}
