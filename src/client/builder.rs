use crate::auth::{AmbientCredentialProvider, CredentialProvider};
use crate::client::core::RbmClient;
use crate::client::gate::AuthGate;
use crate::config::ClientConfig;
use crate::ids::{IdGenerator, UuidGenerator};
use crate::transport::RemoteInvoke;
use crate::Result;
use std::sync::Arc;

/// Builder for creating clients with custom configuration.
///
/// Building never touches the network; credentials are resolved by
/// [`RbmClient::initialize`].
pub struct RbmClientBuilder {
    config: Option<ClientConfig>,
    agent_id: Option<String>,
    base_url_override: Option<String>,
    transport: Option<Arc<dyn RemoteInvoke>>,
    ambient: Option<Arc<dyn CredentialProvider>>,
    ids: Arc<dyn IdGenerator>,
}

impl RbmClientBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            agent_id: None,
            base_url_override: None,
            transport: None,
            ambient: None,
            ids: Arc::new(UuidGenerator),
        }
    }

    /// Use this configuration instead of [`ClientConfig::from_env`].
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn agent_id(mut self, agent_id: impl Into<String>) -> Self {
        self.agent_id = Some(agent_id.into());
        self
    }

    /// Override the API base URL (mock servers, regional endpoints).
    pub fn base_url_override(mut self, base_url: impl Into<String>) -> Self {
        self.base_url_override = Some(base_url.into());
        self
    }

    /// Use a custom remote-invoke implementation instead of the HTTP transport.
    pub fn transport(mut self, transport: Arc<dyn RemoteInvoke>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Provider consulted when `initialize` is called without credential
    /// material. Defaults to [`AmbientCredentialProvider`].
    pub fn ambient_credentials(mut self, provider: Arc<dyn CredentialProvider>) -> Self {
        self.ambient = Some(provider);
        self
    }

    pub fn id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// Build the client. The configuration is validated here; the client
    /// starts uninitialized.
    pub fn build(self) -> Result<RbmClient> {
        let mut config = self.config.unwrap_or_else(ClientConfig::from_env);
        if let Some(agent_id) = self.agent_id {
            config.agent_id = Some(agent_id);
        }
        if let Some(base_url) = self.base_url_override {
            config.base_url = base_url;
        }
        config.api_root()?;

        Ok(RbmClient {
            config: Arc::new(config),
            gate: AuthGate::new(),
            ambient: self
                .ambient
                .unwrap_or_else(|| Arc::new(AmbientCredentialProvider::new())),
            transport_override: self.transport,
            ids: self.ids,
        })
    }
}

impl Default for RbmClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
