//! Ambient (application-default) credentials.
//!
//! Resolution order:
//! 1. `GOOGLE_APPLICATION_CREDENTIALS` naming a service-account key file.
//! 2. The GCE metadata server's default service account.

use super::{
    unix_now, CredentialMaterial, CredentialProvider, ServiceAccountProvider, Session,
    TokenSource,
};
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

pub const CREDENTIALS_ENV: &str = "GOOGLE_APPLICATION_CREDENTIALS";

const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";
const EXPIRY_MARGIN_SECS: i64 = 60;

/// Resolves credentials from the environment the process runs in.
pub struct AmbientCredentialProvider {
    http: reqwest::Client,
    metadata_url: String,
}

impl AmbientCredentialProvider {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            metadata_url: METADATA_TOKEN_URL.to_string(),
        }
    }

    /// Point the metadata fallback somewhere else (tests, emulators).
    pub fn with_metadata_url(mut self, url: impl Into<String>) -> Self {
        self.metadata_url = url.into();
        self
    }

    fn key_file_material(path: &str) -> Result<CredentialMaterial> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::credential_with_context(
                format!("cannot read credentials file: {}", e),
                ErrorContext::new()
                    .with_field_path(CREDENTIALS_ENV)
                    .with_details(path),
            )
        })?;

        #[derive(Deserialize)]
        struct KeyKind {
            #[serde(rename = "type")]
            kind: Option<String>,
        }
        let kind: KeyKind = serde_json::from_str(&raw)?;
        match kind.kind.as_deref() {
            Some("service_account") | None => CredentialMaterial::from_json_str(&raw),
            Some(other) => Err(Error::credential_with_context(
                format!("unsupported credential type '{}'", other),
                ErrorContext::new()
                    .with_field_path(CREDENTIALS_ENV)
                    .with_details(path)
                    .with_source("ambient"),
            )),
        }
    }
}

impl Default for AmbientCredentialProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialProvider for AmbientCredentialProvider {
    async fn session(&self, scope: &str) -> Result<Session> {
        if let Some(path) = std::env::var(CREDENTIALS_ENV).ok().filter(|p| !p.is_empty()) {
            info!(path = %path, "using service-account key from {}", CREDENTIALS_ENV);
            let material = Self::key_file_material(&path)?;
            return ServiceAccountProvider::with_http_client(material, self.http.clone())
                .session(scope)
                .await;
        }

        info!("no key file configured, using metadata server credentials");
        let source = MetadataTokenSource {
            http: self.http.clone(),
            url: self.metadata_url.clone(),
            scope: scope.to_string(),
            cached: Mutex::new(None),
        };
        Ok(Session::new(None, scope, Arc::new(source)))
    }
}

#[derive(Deserialize)]
struct MetadataToken {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

struct MetadataTokenSource {
    http: reqwest::Client,
    url: String,
    scope: String,
    cached: Mutex<Option<(String, i64)>>,
}

#[async_trait]
impl TokenSource for MetadataTokenSource {
    async fn access_token(&self) -> Result<String> {
        let mut cached = self.cached.lock().await;
        let now = unix_now();
        if let Some((token, expires_at)) = cached.as_ref() {
            if now < expires_at - EXPIRY_MARGIN_SECS {
                return Ok(token.clone());
            }
        }

        debug!(url = %self.url, "fetching token from metadata server");
        let response = self
            .http
            .get(&self.url)
            .header("Metadata-Flavor", "Google")
            .query(&[("scopes", self.scope.as_str())])
            .send()
            .await
            .map_err(|e| {
                Error::credential_with_context(
                    format!("metadata server unreachable: {}", e),
                    ErrorContext::new().with_source("ambient"),
                )
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::credential_with_context(
                format!("metadata server returned HTTP {}", status.as_u16()),
                ErrorContext::new().with_source("ambient"),
            ));
        }
        let parsed: MetadataToken = response.json().await.map_err(|e| {
            Error::credential_with_context(
                format!("invalid metadata token response: {}", e),
                ErrorContext::new().with_source("ambient"),
            )
        })?;

        let expires_at = now + parsed.expires_in.unwrap_or(3600);
        *cached = Some((parsed.access_token.clone(), expires_at));
        Ok(parsed.access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn key_file(contents: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    #[test]
    fn key_file_with_service_account_type_parses() {
        let file = key_file(
            r#"{"type":"service_account","client_email":"a@b.com","private_key":"K"}"#,
        );
        let m = AmbientCredentialProvider::key_file_material(file.path().to_str().unwrap())
            .unwrap();
        assert_eq!(m.identity, "a@b.com");
    }

    #[test]
    fn user_credentials_are_rejected() {
        let file = key_file(r#"{"type":"authorized_user","refresh_token":"r"}"#);
        let err = AmbientCredentialProvider::key_file_material(file.path().to_str().unwrap())
            .unwrap_err();
        assert!(err.to_string().contains("authorized_user"));
    }

    #[test]
    fn missing_key_file_is_a_credential_error() {
        let err = AmbientCredentialProvider::key_file_material("/nonexistent/rbm-key.json")
            .unwrap_err();
        assert!(matches!(err, Error::Credential { .. }));
    }

    #[tokio::test]
    async fn metadata_tokens_are_cached() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/token")
            .match_header("Metadata-Flavor", "Google")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"access_token":"meta-tok","expires_in":3599,"token_type":"Bearer"}"#)
            .expect(1)
            .create_async()
            .await;

        let source = MetadataTokenSource {
            http: reqwest::Client::new(),
            url: format!("{}/token", server.url()),
            scope: super::super::RBM_SCOPE.to_string(),
            cached: Mutex::new(None),
        };
        assert_eq!(source.access_token().await.unwrap(), "meta-tok");
        assert_eq!(source.access_token().await.unwrap(), "meta-tok");
        mock.assert_async().await;
    }
}
