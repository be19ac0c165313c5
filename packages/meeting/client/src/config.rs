use crate::error::ConfigError;
use meeting_core::store::DEFAULT_AUTHOR;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const BASE_URL_ENV: &str = "MEETING_BASE_URL";
pub const WS_URL_ENV: &str = "MEETING_WS_URL";

/// Where the meeting backend lives and how to talk to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// REST root, e.g. `http://localhost:8000/api`
    pub base_url: String,
    /// WebSocket root; derived from `base_url` when unset
    pub ws_url: Option<String>,
    pub request_timeout_secs: u64,
    /// Display name put on the local user's messages
    pub user_name: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            ws_url: None,
            request_timeout_secs: 30,
            user_name: DEFAULT_AUTHOR.to_string(),
        }
    }
}

impl ClientConfig {
    /// Defaults, then the optional TOML file, then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(std::env::vars());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn apply_env<I>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            if value.is_empty() {
                continue;
            }
            match key.as_str() {
                BASE_URL_ENV => self.base_url = value,
                WS_URL_ENV => self.ws_url = Some(value),
                _ => {}
            }
        }
    }

    pub fn rest_base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// WebSocket root, either configured or derived from the REST root.
    pub fn ws_base(&self) -> Result<String, ConfigError> {
        if let Some(ws_url) = &self.ws_url {
            return Ok(ws_url.trim_end_matches('/').to_string());
        }

        let base = self.rest_base();
        if let Some(rest) = base.strip_prefix("https://") {
            Ok(format!("wss://{}", rest))
        } else if let Some(rest) = base.strip_prefix("http://") {
            Ok(format!("ws://{}", rest))
        } else {
            Err(ConfigError::Url {
                url: self.base_url.clone(),
                reason: "expected an http:// or https:// base URL".to_string(),
            })
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
