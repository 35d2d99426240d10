//! Credentials and authenticated sessions.
//!
//! A [`Session`] is the handle every outbound request is issued under: who
//! the agent is, which scope it was granted, and where bearer tokens come
//! from. Sessions are produced by a [`CredentialProvider`]:
//!
//! | Provider | Source |
//! |----------|--------|
//! | [`ServiceAccountProvider`] | Explicit [`CredentialMaterial`] (identity + private key) |
//! | [`AmbientCredentialProvider`] | `GOOGLE_APPLICATION_CREDENTIALS`, then the GCE metadata server |
//! | [`StaticTokenProvider`] | A pre-minted bearer token |

mod ambient;
mod service_account;

pub use ambient::AmbientCredentialProvider;
pub use service_account::{ServiceAccountProvider, ServiceAccountTokenSource};

use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// OAuth scope granting access to the RBM agent API.
pub const RBM_SCOPE: &str = "https://www.googleapis.com/auth/rcsbusinessmessaging";

/// Token endpoint used when the credential material does not name one.
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Yields bearer tokens for a session. Implementations may cache and refresh.
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn access_token(&self) -> Result<String>;
}

/// Turns some form of credentials into a [`Session`] bound to `scope`.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn session(&self, scope: &str) -> Result<Session>;
}

/// Authenticated-session handle.
#[derive(Clone)]
pub struct Session {
    identity: Option<String>,
    scope: String,
    tokens: Arc<dyn TokenSource>,
}

impl Session {
    pub fn new(
        identity: Option<String>,
        scope: impl Into<String>,
        tokens: Arc<dyn TokenSource>,
    ) -> Self {
        Self {
            identity,
            scope: scope.into(),
            tokens,
        }
    }

    /// Service-account email, or `None` when the identity is implied by
    /// ambient credentials.
    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub async fn access_token(&self) -> Result<String> {
        self.tokens.access_token().await
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("identity", &self.identity)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

/// Service-account credentials: an identity and the private key it signs with.
///
/// Deserializes from a Google service-account key file (`client_email`,
/// `private_key`, ...) as well as from `{identity, privateKey}`.
#[derive(Clone, Deserialize)]
pub struct CredentialMaterial {
    #[serde(alias = "client_email")]
    pub identity: String,
    #[serde(alias = "privateKey")]
    pub private_key: String,
    #[serde(default, alias = "privateKeyId")]
    pub private_key_id: Option<String>,
    #[serde(default, alias = "tokenUri")]
    pub token_uri: Option<String>,
}

impl CredentialMaterial {
    pub fn new(identity: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            private_key: private_key.into(),
            private_key_id: None,
            token_uri: None,
        }
    }

    pub fn with_private_key_id(mut self, id: impl Into<String>) -> Self {
        self.private_key_id = Some(id.into());
        self
    }

    pub fn with_token_uri(mut self, uri: impl Into<String>) -> Self {
        self.token_uri = Some(uri.into());
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| {
            Error::credential_with_context(
                format!("invalid credential JSON: {}", e),
                ErrorContext::new().with_source("credential_material"),
            )
        })
    }

    /// Load a service-account key file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw).map_err(|e| match e {
            Error::Credential { message, context } => Error::Credential {
                message,
                context: context.with_details(path.display().to_string()),
            },
            other => other,
        })
    }

    pub fn token_uri(&self) -> &str {
        self.token_uri.as_deref().unwrap_or(DEFAULT_TOKEN_URI)
    }
}

impl fmt::Debug for CredentialMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialMaterial")
            .field("identity", &self.identity)
            .field("private_key", &"<redacted>")
            .field("private_key_id", &self.private_key_id)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

/// A fixed bearer token.
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait]
impl TokenSource for StaticToken {
    async fn access_token(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// Provider for an already-minted token, e.g. one issued by `gcloud auth print-access-token`.
pub struct StaticTokenProvider {
    identity: Option<String>,
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            identity: None,
            token: token.into(),
        }
    }

    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = Some(identity.into());
        self
    }
}

#[async_trait]
impl CredentialProvider for StaticTokenProvider {
    async fn session(&self, scope: &str) -> Result<Session> {
        Ok(Session::new(
            self.identity.clone(),
            scope,
            Arc::new(StaticToken::new(self.token.clone())),
        ))
    }
}

pub(crate) fn unix_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
