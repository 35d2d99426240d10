//! Service-account JWT-bearer token exchange.
//!
//! 1. Sign a JWT with the account's RSA key (RS256), naming the scope.
//! 2. POST it to the token endpoint as a `jwt-bearer` grant.
//! 3. Cache the access token until shortly before it expires.

use super::{unix_now, CredentialMaterial, CredentialProvider, Session, TokenSource};
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
const EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Debug, Serialize)]
struct JwtClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    exp: i64,
    iat: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    expires_at: i64,
}

impl CachedToken {
    fn is_fresh(&self, now: i64) -> bool {
        now < self.expires_at - EXPIRY_MARGIN_SECS
    }
}

/// Token source backed by a service account's private key.
pub struct ServiceAccountTokenSource {
    material: CredentialMaterial,
    scope: String,
    key: EncodingKey,
    http: reqwest::Client,
    cached: Mutex<Option<CachedToken>>,
}

impl ServiceAccountTokenSource {
    /// Parses the private key up front so a malformed key fails here.
    pub fn new(
        material: CredentialMaterial,
        scope: impl Into<String>,
        http: reqwest::Client,
    ) -> Result<Self> {
        // Key files store newlines escaped.
        let pem = material.private_key.replace("\\n", "\n");
        let key = EncodingKey::from_rsa_pem(pem.as_bytes()).map_err(|e| {
            Error::credential_with_context(
                format!("failed to load private key: {}", e),
                ErrorContext::new()
                    .with_field_path("private_key")
                    .with_source("service_account"),
            )
        })?;
        Ok(Self {
            material,
            scope: scope.into(),
            key,
            http,
            cached: Mutex::new(None),
        })
    }

    fn signed_assertion(&self, now: i64) -> Result<String> {
        let claims = JwtClaims {
            iss: &self.material.identity,
            scope: &self.scope,
            aud: self.material.token_uri(),
            exp: now + ASSERTION_LIFETIME_SECS,
            iat: now,
        };
        let header = Header {
            alg: Algorithm::RS256,
            kid: self.material.private_key_id.clone(),
            ..Default::default()
        };
        encode(&header, &claims, &self.key).map_err(|e| {
            Error::credential_with_context(
                format!("failed to sign JWT assertion: {}", e),
                ErrorContext::new().with_source("service_account"),
            )
        })
    }

    async fn fetch(&self, now: i64) -> Result<CachedToken> {
        let assertion = self.signed_assertion(now)?;
        let token_uri = self.material.token_uri();
        debug!(identity = %self.material.identity, token_uri, "exchanging JWT assertion");

        let response = self
            .http
            .post(token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| {
                Error::credential_with_context(
                    format!("token exchange request failed: {}", e),
                    ErrorContext::new().with_source("service_account"),
                )
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::credential_with_context(
                format!("token exchange failed (HTTP {}): {}", status.as_u16(), body),
                ErrorContext::new()
                    .with_details(token_uri)
                    .with_source("service_account"),
            ));
        }

        let parsed: TokenResponse = response.json().await.map_err(|e| {
            Error::credential_with_context(
                format!("invalid token response: {}", e),
                ErrorContext::new().with_source("service_account"),
            )
        })?;

        Ok(CachedToken {
            token: parsed.access_token,
            expires_at: now + parsed.expires_in.unwrap_or(ASSERTION_LIFETIME_SECS),
        })
    }
}

#[async_trait]
impl TokenSource for ServiceAccountTokenSource {
    async fn access_token(&self) -> Result<String> {
        let mut cached = self.cached.lock().await;
        let now = unix_now();
        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh(now)) {
            return Ok(token.token.clone());
        }
        let fresh = self.fetch(now).await?;
        let token = fresh.token.clone();
        *cached = Some(fresh);
        Ok(token)
    }
}

/// Builds sessions bound to an explicit service-account identity.
pub struct ServiceAccountProvider {
    material: CredentialMaterial,
    http: reqwest::Client,
}

impl ServiceAccountProvider {
    pub fn new(material: CredentialMaterial) -> Self {
        Self::with_http_client(material, reqwest::Client::new())
    }

    pub fn with_http_client(material: CredentialMaterial, http: reqwest::Client) -> Self {
        Self { material, http }
    }
}

#[async_trait]
impl CredentialProvider for ServiceAccountProvider {
    async fn session(&self, scope: &str) -> Result<Session> {
        let source =
            ServiceAccountTokenSource::new(self.material.clone(), scope, self.http.clone())?;
        Ok(Session::new(
            Some(self.material.identity.clone()),
            scope,
            Arc::new(source),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_key_fails_at_construction() {
        let material = CredentialMaterial::new("a@b.com", "KEY");
        let err = ServiceAccountTokenSource::new(material, super::super::RBM_SCOPE, reqwest::Client::new())
            .err()
            .unwrap();
        match err {
            Error::Credential { context, .. } => {
                assert_eq!(context.field_path.as_deref(), Some("private_key"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn cached_token_freshness_uses_margin() {
        let t = CachedToken {
            token: "x".into(),
            expires_at: 1_000,
        };
        assert!(t.is_fresh(900));
        assert!(!t.is_fresh(940));
        assert!(!t.is_fresh(1_000));
    }
}
