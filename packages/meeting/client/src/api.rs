use crate::config::ClientConfig;
use crate::error::{ClientError, ConfigError, Result};
use reqwest::{Client, Url};
use std::future::Future;
use tracing::{debug, info};

/// Outbound calls the session host makes on behalf of the store
pub trait MeetingBackend {
    /// Fire-and-forget trigger; progress arrives on the event stream.
    fn start_session(&self, symbol_key: &str, query: &str) -> impl Future<Output = Result<()>> + Send;

    /// Purge the server-side transcript for `symbol_key`.
    fn clear_history(&self, symbol_key: &str) -> impl Future<Output = Result<()>> + Send;
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    pub base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.request_timeout()).build()?;
        Ok(Self {
            client,
            base_url: config.rest_base().to_string(),
        })
    }

    pub fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> Result<Url> {
        let raw = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        Url::parse_with_params(&raw, params).map_err(|e| {
            ClientError::Config(ConfigError::Url {
                url: raw.clone(),
                reason: e.to_string(),
            })
        })
    }
}

impl MeetingBackend for ApiClient {
    async fn start_session(&self, symbol_key: &str, query: &str) -> Result<()> {
        let url = self.endpoint("meeting/start", &[("symbol_key", symbol_key), ("query", query)])?;
        info!(%symbol_key, "starting meeting");

        let resp = self.client.post(url).send().await?;
        if !resp.status().is_success() {
            return Err(ClientError::Status {
                action: "start meeting",
                status: resp.status(),
            });
        }

        debug!(%symbol_key, status = %resp.status(), "meeting start acknowledged");
        Ok(())
    }

    async fn clear_history(&self, symbol_key: &str) -> Result<()> {
        let url = self.endpoint("meeting/history", &[("symbol_key", symbol_key)])?;
        info!(%symbol_key, "clearing meeting history");

        let resp = self.client.delete(url).send().await?;
        if !resp.status().is_success() {
            return Err(ClientError::Status {
                action: "clear history",
                status: resp.status(),
            });
        }

        Ok(())
    }
}
