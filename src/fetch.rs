use std::time::Duration;

use reqwest::header::USER_AGENT;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("http client build failed: {0}")]
    Client(String),
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
    #[error("request to {url} returned status {status}")]
    Status { url: String, status: u16 },
    #[error("reading body of {url} failed: {message}")]
    Body { url: String, message: String },
}

impl FetchError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Client(_) => "FETCH_CLIENT_ERROR",
            Self::Transport { .. } => "FETCH_TRANSPORT_ERROR",
            Self::Status { .. } => "FETCH_STATUS_ERROR",
            Self::Body { .. } => "FETCH_BODY_ERROR",
        }
    }
}

pub trait Fetcher {
    async fn fetch(&self, url: &str, user_agent: &str) -> Result<Vec<u8>, FetchError>;
}

pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout_secs: u64) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|error| FetchError::Client(error.to_string()))?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str, user_agent: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, user_agent)
            .send()
            .await
            .map_err(|error| FetchError::Transport {
                url: url.to_string(),
                message: error.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|error| FetchError::Body {
            url: url.to_string(),
            message: error.to_string(),
        })?;
        Ok(body.to_vec())
    }
}

#[cfg(test)]
pub(crate) struct MockFetcher {
    responses: std::collections::HashMap<String, Vec<u8>>,
    requests: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl MockFetcher {
    pub(crate) fn new() -> Self {
        Self {
            responses: std::collections::HashMap::new(),
            requests: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_response(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
        self.responses.insert(url.to_string(), body.into());
        self
    }

    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("requests lock").clone()
    }
}

#[cfg(test)]
impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &str, _user_agent: &str) -> Result<Vec<u8>, FetchError> {
        self.requests.lock().expect("requests lock").push(url.to_string());
        self.responses
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Status {
                url: url.to_string(),
                status: 404,
            })
    }
}
