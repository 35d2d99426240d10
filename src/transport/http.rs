use super::{HttpMethod, RemoteCall, RemoteInvoke, ResourcePath};
use crate::auth::Session;
use crate::config::ClientConfig;
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::Proxy;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// `reqwest`-backed [`RemoteInvoke`] for the RBM REST API.
pub struct HttpTransport {
    client: reqwest::Client,
    api_root: Url,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let api_root = config.api_root()?;

        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .pool_idle_timeout(Some(Duration::from_secs(90)));

        if let Some(proxy_url) = config.proxy_url.as_deref() {
            let proxy = Proxy::all(proxy_url).map_err(|e| {
                Error::configuration_with_context(
                    format!("invalid proxy URL: {}", e),
                    crate::ErrorContext::new().with_field_path("proxy_url"),
                )
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| Error::Transport(TransportError::Other(e.to_string())))?;

        Ok(Self { client, api_root })
    }

    pub fn api_root(&self) -> &str {
        self.api_root.as_str()
    }

    /// Each path segment is percent-encoded on its own.
    fn url_for(&self, path: &ResourcePath) -> Result<Url> {
        let mut url = self.api_root.clone();
        url.path_segments_mut()
            .map_err(|_| {
                Error::configuration_with_context(
                    "base URL cannot carry a path",
                    crate::ErrorContext::new().with_field_path("base_url"),
                )
            })?
            .pop_if_empty()
            .extend(path.segments());
        Ok(url)
    }
}

#[async_trait]
impl RemoteInvoke for HttpTransport {
    async fn invoke(&self, session: &Session, call: RemoteCall) -> Result<serde_json::Value> {
        let url = self.url_for(&call.path)?;
        let token = session.access_token().await?;

        let mut request = match call.method {
            HttpMethod::Get => self.client.get(url.clone()),
            HttpMethod::Post => self.client.post(url.clone()),
            HttpMethod::Delete => self.client.delete(url.clone()),
        }
        .bearer_auth(token);

        if !call.query.is_empty() {
            request = request.query(&call.query);
        }
        if let Some(body) = &call.body {
            request = request.json(body);
        }

        debug!(operation = call.operation, method = %call.method, url = %url, "sending request");

        let response = request
            .send()
            .await
            .map_err(|e| Error::Transport(TransportError::Http(e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::Transport(TransportError::Http(e)))?;

        if !status.is_success() {
            return Err(remote_error(status.as_u16(), &text));
        }

        if text.trim().is_empty() {
            return Ok(serde_json::Value::Object(Default::default()));
        }
        Ok(serde_json::from_str(&text)?)
    }
}

/// Google APIs report failures as `{"error": {"code", "message", "status"}}`.
fn remote_error(status: u16, body: &str) -> Error {
    #[derive(Deserialize)]
    struct Envelope {
        error: Detail,
    }
    #[derive(Deserialize)]
    struct Detail {
        #[serde(default)]
        message: Option<String>,
        #[serde(default)]
        status: Option<String>,
    }

    match serde_json::from_str::<Envelope>(body) {
        Ok(env) => Error::Remote {
            status,
            code: env.error.status,
            message: env.error.message.unwrap_or_default(),
        },
        Err(_) => Error::Remote {
            status,
            code: None,
            message: body.trim().to_string(),
        },
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn google_error_envelope_is_parsed() {
        let err = remote_error(
            404,
            r#"{"error":{"code":404,"message":"Requested entity was not found.","status":"NOT_FOUND"}}"#,
        );
        match err {
            Error::Remote {
                status,
                code,
                message,
            } => {
                assert_eq!(status, 404);
                assert_eq!(code.as_deref(), Some("NOT_FOUND"));
                assert_eq!(message, "Requested entity was not found.");
            }
            other => panic!("unexpected: {other}"),
        }
    }

    #[test]
    fn non_json_error_body_is_kept_verbatim() {
        let err = remote_error(502, "Bad Gateway\n");
        assert_eq!(err.to_string(), "Remote error: HTTP 502: Bad Gateway");
    }

    #[test]
    fn urls_join_api_root_and_path() {
        let t = HttpTransport::new(&ClientConfig::default().with_base_url("http://localhost:9"))
            .unwrap();
        assert_eq!(
            t.url_for(&ResourcePath::new("users:batchGet")).unwrap().as_str(),
            "http://localhost:9/v1/users:batchGet"
        );
        assert_eq!(
            t.url_for(&ResourcePath::new("phones/+1555/testers")).unwrap().as_str(),
            "http://localhost:9/v1/phones/+1555/testers"
        );
    }

    #[test]
    fn caller_ids_cannot_change_the_addressing() {
        let t = HttpTransport::new(&ClientConfig::default().with_base_url("http://localhost:9"))
            .unwrap();
        let path = ResourcePath::new("phones/+1555/agentMessages").join("../x?y#z");
        assert_eq!(
            t.url_for(&path).unwrap().as_str(),
            "http://localhost:9/v1/phones/+1555/agentMessages/..%2Fx%3Fy%23z"
        );
    }
}
