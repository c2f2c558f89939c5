use std::path::Path;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Markers of the last successful send, the only state kept between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStatus {
    #[serde(
        default,
        deserialize_with = "deserialize_marker",
        skip_serializing_if = "Option::is_none"
    )]
    pub sent_week: Option<i64>,
    #[serde(
        default,
        deserialize_with = "deserialize_marker",
        skip_serializing_if = "Option::is_none"
    )]
    pub sent_day: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conf_hash: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Marker {
    Number(i64),
    Text(String),
}

// Older status files stored the day marker as a "YYYYDDD" string.
fn deserialize_marker<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Marker>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Marker::Number(value)) => Ok(Some(value)),
        Some(Marker::Text(text)) => text.trim().parse().map(Some).map_err(D::Error::custom),
    }
}

#[derive(Debug, Error)]
pub enum StatusError {
    #[error("failed to encode status: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to write status file {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}

impl StatusError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Encode(_) => "STATUS_ENCODE_ERROR",
            Self::Write { .. } => "STATUS_WRITE_ERROR",
        }
    }
}

/// A missing or unreadable status file reads as "nothing sent yet".
pub async fn read_status(path: &Path) -> RunStatus {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            return RunStatus::default();
        }
        Err(error) => {
            log::warn!(
                "status_unreadable path={} error={}",
                path.display(),
                error
            );
            return RunStatus::default();
        }
    };

    match serde_json::from_str::<RunStatus>(&content) {
        Ok(status) => status,
        Err(error) => {
            log::warn!("status_malformed path={} error={}", path.display(), error);
            RunStatus::default()
        }
    }
}

/// Replaces the status file through a rename so readers never see a torn file.
pub async fn write_status(path: &Path, status: &RunStatus) -> Result<(), StatusError> {
    let payload = format!("{}\n", serde_json::to_string(status)?);
    let write_error = |source: std::io::Error| StatusError::Write {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_error)?;
    }

    let tmp_path = path.with_extension("json.tmp");
    tokio::fs::write(&tmp_path, payload)
        .await
        .map_err(write_error)?;
    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(write_error)?;
    Ok(())
}
