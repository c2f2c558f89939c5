use thiserror::Error;

use crate::config::ConfigError;
use crate::crop::CropError;
use crate::fetch::FetchError;
use crate::mail::SendError;
use crate::status::StatusError;

/// Every way a run can abort. None of them is retried.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Crop(#[from] CropError),
    #[error(transparent)]
    Send(#[from] SendError),
    #[error(transparent)]
    Status(#[from] StatusError),
    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

impl RunError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(error) => error.code(),
            Self::Fetch(error) => error.code(),
            Self::Crop(error) => error.code(),
            Self::Send(error) => error.code(),
            Self::Status(error) => error.code(),
            Self::Io { .. } => "LOCAL_IO_ERROR",
        }
    }
}
