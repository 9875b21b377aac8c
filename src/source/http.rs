//! Reqwest-backed user source.
//!
//! Maps transport failures, non-2xx responses and undecodable bodies onto
//! [`FetchError`]; nothing here retries.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::{debug, warn};

use super::{PageRequest, UserSource};
use crate::error::{Context, FetchError, Result};
use crate::model::UserRecord;

pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";
pub const DEFAULT_PAGE_PARAM: &str = "_page";
pub const DEFAULT_LIMIT_PARAM: &str = "_limit";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Where and how to ask for pages.
#[derive(Clone, Debug)]
pub struct SourceConfig {
    pub base_url: String,
    pub page_param: String,
    pub limit_param: String,
    pub timeout: Duration,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_param: DEFAULT_PAGE_PARAM.to_string(),
            limit_param: DEFAULT_LIMIT_PARAM.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

pub struct HttpUserSource {
    client: Client,
    endpoint: Url,
    page_param: String,
    limit_param: String,
}

impl HttpUserSource {
    pub fn new(config: SourceConfig) -> Result<Self> {
        let raw = format!("{}/users", config.base_url.trim_end_matches('/'));
        let endpoint = Url::parse(&raw).with_ctx(|| format!("invalid base url {}", config.base_url))?;
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .with_ctx(|| "build http client".to_string())?;
        Ok(Self {
            client,
            endpoint,
            page_param: config.page_param,
            limit_param: config.limit_param,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl UserSource for HttpUserSource {
    async fn fetch_page(&self, request: PageRequest) -> std::result::Result<Vec<UserRecord>, FetchError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[
                (self.page_param.as_str(), request.page),
                (self.limit_param.as_str(), request.limit),
            ])
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(page = request.page, status = status.as_u16(), "user source returned an error status");
            return Err(FetchError::Status(status.as_u16()));
        }
        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        let users: Vec<UserRecord> =
            serde_json::from_slice(&body).map_err(|e| FetchError::Decode(e.to_string()))?;
        debug!(page = request.page, count = users.len(), "page decoded");
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_appends_users_path() {
        let src = HttpUserSource::new(SourceConfig {
            base_url: "http://127.0.0.1:9/api/".to_string(),
            ..SourceConfig::default()
        })
        .unwrap();
        assert_eq!(src.endpoint().as_str(), "http://127.0.0.1:9/api/users");
    }

    #[test]
    fn rejects_unparseable_base_url() {
        let res = HttpUserSource::new(SourceConfig {
            base_url: "not a url".to_string(),
            ..SourceConfig::default()
        });
        let err = res.err().unwrap();
        assert!(err.to_string().starts_with("invalid base url not a url"));
    }
}
