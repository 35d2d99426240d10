//! Client configuration.
//!
//! Loaded from YAML or built in code, then optionally overridden from the
//! environment:
//! - `RBM_BASE_URL` (default `https://rcsbusinessmessaging.googleapis.com/`)
//! - `RBM_AGENT_ID`
//! - `RBM_HTTP_TIMEOUT_SECS` (default 30)
//! - `RBM_PROXY_URL`

use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://rcsbusinessmessaging.googleapis.com/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// API root; requests go to `<base_url>v1/<path>`.
    pub base_url: String,
    /// Agent to act as. Required only when the credentials can act for more
    /// than one agent.
    pub agent_id: Option<String>,
    pub timeout_secs: u64,
    pub proxy_url: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            agent_id: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            proxy_url: None,
        }
    }
}

impl ClientConfig {
    /// Defaults plus environment overrides.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid YAML configuration: {}", e),
                ErrorContext::new().with_source("config_loader"),
            )
        })
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&raw).map_err(|e| match e {
            Error::Configuration { message, context } => Error::Configuration {
                message,
                context: context.with_details(path.display().to_string()),
            },
            other => other,
        })
    }

    /// Apply `RBM_*` variables on top of the current values. Unparseable
    /// numbers are ignored.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    /// [`with_env_overrides`](Self::with_env_overrides) over an arbitrary
    /// variable lookup.
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup("RBM_BASE_URL") {
            self.base_url = url;
        }
        if let Some(agent) = lookup("RBM_AGENT_ID") {
            self.agent_id = Some(agent).filter(|a| !a.is_empty());
        }
        if let Some(secs) = lookup("RBM_HTTP_TIMEOUT_SECS").and_then(|s| s.parse::<u64>().ok()) {
            self.timeout_secs = secs;
        }
        if let Some(proxy) = lookup("RBM_PROXY_URL") {
            self.proxy_url = Some(proxy).filter(|p| !p.is_empty());
        }
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_agent_id(mut self, agent_id: impl Into<String>) -> Self {
        self.agent_id = Some(agent_id.into());
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Parsed API version root (`<base_url>v1/`).
    pub fn api_root(&self) -> Result<Url> {
        let mut base = self.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let parsed = Url::parse(&base).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid base URL: {}", e),
                ErrorContext::new()
                    .with_field_path("base_url")
                    .with_details(self.base_url.clone()),
            )
        })?;
        parsed.join("v1/").map_err(|e| {
            Error::configuration_with_context(
                format!("cannot derive API root: {}", e),
                ErrorContext::new().with_field_path("base_url"),
            )
        })
    }
}
