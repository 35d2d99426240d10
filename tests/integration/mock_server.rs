//! Mock HTTP server setup for integration tests

use mockito::{Matcher, Mock, Server, ServerGuard};
use rbm_lib_rust::{ClientConfig, CredentialMaterial, RbmClient};
use std::sync::Arc;

use super::recording::SequentialIds;

/// Test fixture that manages a mock RBM API and token endpoint.
pub struct MockServerFixture {
    pub server: ServerGuard,
    pub base_url: String,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let base_url = server.url();
        Self { server, base_url }
    }

    /// Client pointed at the mock server, with sequential ids.
    pub fn client(&self, config: ClientConfig) -> RbmClient {
        RbmClient::builder()
            .config(config)
            .base_url_override(&self.base_url)
            .id_generator(Arc::new(SequentialIds::default()))
            .build()
            .expect("client builds")
    }

    /// Service-account material whose token endpoint is this server.
    pub fn credentials(&self) -> CredentialMaterial {
        let pem = include_str!("../fixtures/service_account_key.pem");
        CredentialMaterial::new("agent@test-project.iam.gserviceaccount.com", pem)
            .with_private_key_id("test-key")
            .with_token_uri(format!("{}/token", self.base_url))
    }

    /// Token endpoint answering a JWT-bearer grant with `token`.
    pub async fn mock_token(&mut self, token: &str) -> Mock {
        self.server
            .mock("POST", "/token")
            .match_body(Matcher::UrlEncoded(
                "grant_type".into(),
                "urn:ietf:params:oauth:grant-type:jwt-bearer".into(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(format!(
                r#"{{"access_token":"{}","expires_in":3599,"token_type":"Bearer"}}"#,
                token
            ))
            .create_async()
            .await
    }

    /// API method under `/v1/`, matched by path prefix.
    pub async fn mock_api(
        &mut self,
        method: &str,
        path: &str,
        status: usize,
        body: &str,
    ) -> Mock {
        self.server
            .mock(method, Matcher::Regex(format!("^/v1/{}", regex::escape(path))))
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }
}
