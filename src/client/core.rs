//! [`RbmClient`]: the session gate in front of payload building, request
//! shaping and remote invocation.
//!
//! Message and event operations generate a fresh id per call and return it
//! in a [`Dispatch`] next to the service response. Everything else returns
//! the response as-is.

use crate::auth::{CredentialMaterial, CredentialProvider, ServiceAccountProvider, Session, RBM_SCOPE};
use crate::client::gate::{AuthGate, Ready};
use crate::config::ClientConfig;
use crate::ids::IdGenerator;
use crate::payload;
use crate::services;
use crate::transport::{HttpTransport, RemoteCall, RemoteInvoke};
use crate::types::{
    CarouselRichCard, EventIntent, FileUpload, MessageIntent, Msisdn, StandaloneRichCard,
    TextMessage,
};
use crate::Result;
use futures::FutureExt;
use std::sync::Arc;
use tracing::{info, warn};

/// RBM agent client.
pub struct RbmClient {
    pub(crate) config: Arc<ClientConfig>,
    pub(crate) gate: AuthGate,
    pub(crate) ambient: Arc<dyn CredentialProvider>,
    pub(crate) transport_override: Option<Arc<dyn RemoteInvoke>>,
    pub(crate) ids: Arc<dyn IdGenerator>,
}

/// Outcome of a message or event dispatch: the id generated for it and the
/// service response, uninterpreted.
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatch {
    pub id: String,
    pub response: serde_json::Value,
}

impl RbmClient {
    /// Client configured from the environment, not yet initialized.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    pub fn builder() -> crate::client::builder::RbmClientBuilder {
        crate::client::builder::RbmClientBuilder::new()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.gate.is_ready()
    }

    /// The current session handle.
    pub fn session(&self) -> Result<Session> {
        Ok(self.gate.require_ready()?.session.clone())
    }

    /// Obtain a session and build the transport for it.
    ///
    /// With `credentials`, the session is bound to that service account;
    /// without, ambient credentials are used. The first token is fetched
    /// here so unusable credentials fail now rather than on the first send.
    /// Calling again replaces the session. Calls made while another
    /// initialization is in flight wait for it and share its outcome.
    pub async fn initialize(&self, credentials: Option<CredentialMaterial>) -> Result<()> {
        let provider: Arc<dyn CredentialProvider> = match credentials {
            Some(material) => Arc::new(ServiceAccountProvider::new(material)),
            None => Arc::clone(&self.ambient),
        };
        self.initialize_with(provider).await
    }

    /// [`initialize`](Self::initialize) with an explicit credential provider.
    pub async fn initialize_with(&self, provider: Arc<dyn CredentialProvider>) -> Result<()> {
        let config = Arc::clone(&self.config);
        let transport_override = self.transport_override.clone();

        let init = async move {
            let session = provider.session(RBM_SCOPE).await?;
            session.access_token().await?;
            let transport: Arc<dyn RemoteInvoke> = match transport_override {
                Some(t) => t,
                None => Arc::new(HttpTransport::new(&config)?),
            };
            Ok::<_, crate::Error>(Ready { session, transport })
        }
        .boxed();

        self.gate.initialize(init).await.map(|_| ())
    }

    fn agent_id(&self) -> Option<&str> {
        self.config.agent_id.as_deref()
    }

    async fn invoke(&self, ready: &Ready, call: RemoteCall) -> Result<serde_json::Value> {
        let operation = call.operation;
        info!(operation, path = %call.path, "dispatching");
        let result = ready.transport.invoke(&ready.session, call).await;
        if let Err(e) = &result {
            warn!(operation, error = %e, "remote call failed");
        }
        result
    }

    /// Ask whether the device behind `msisdn` supports RBM.
    pub async fn check_capability(&self, msisdn: &Msisdn) -> Result<serde_json::Value> {
        let ready = self.gate.require_ready()?;
        let request_id = self.ids.new_id();
        let call = services::capability_call(msisdn, &request_id, self.agent_id());
        self.invoke(&ready, call).await
    }

    /// Batched reachability lookup, sent as one request however long the
    /// list is (the service accepts up to [`services::MAX_BATCH_USERS`]).
    pub async fn get_users(&self, msisdns: &[Msisdn]) -> Result<serde_json::Value> {
        let ready = self.gate.require_ready()?;
        let call = services::batch_get_users_call(msisdns);
        self.invoke(&ready, call).await
    }

    /// Invite `msisdn` to test the agent.
    pub async fn send_tester_invite(&self, msisdn: &Msisdn) -> Result<serde_json::Value> {
        let ready = self.gate.require_ready()?;
        let call = services::create_tester_call(msisdn, self.agent_id());
        self.invoke(&ready, call).await
    }

    pub async fn send_is_typing(&self, msisdn: &Msisdn) -> Result<Dispatch> {
        self.send_event(msisdn, &EventIntent::IsTyping).await
    }

    /// Mark a user message as read.
    pub async fn send_read(&self, msisdn: &Msisdn, message_id: &str) -> Result<Dispatch> {
        self.send_event(msisdn, &EventIntent::read(message_id)).await
    }

    pub async fn send_event(&self, msisdn: &Msisdn, event: &EventIntent) -> Result<Dispatch> {
        let ready = self.gate.require_ready()?;
        let event_id = self.ids.new_id();
        let body = serde_json::to_value(payload::build_event(event))?;
        let call = services::create_event_call(msisdn, &event_id, self.agent_id(), body);
        let response = self.invoke(&ready, call).await?;
        Ok(Dispatch {
            id: event_id,
            response,
        })
    }

    /// Revoke an agent message the user has not yet received.
    pub async fn revoke_message(
        &self,
        msisdn: &Msisdn,
        message_id: &str,
    ) -> Result<serde_json::Value> {
        let ready = self.gate.require_ready()?;
        let call = services::revoke_message_call(msisdn, message_id, self.agent_id());
        self.invoke(&ready, call).await
    }

    /// Send any message intent.
    pub async fn send_message(
        &self,
        msisdn: &Msisdn,
        message: impl Into<MessageIntent>,
    ) -> Result<Dispatch> {
        let ready = self.gate.require_ready()?;
        let intent = message.into();
        let message_id = self.ids.new_id();
        let body = serde_json::to_value(payload::build_message(&intent))?;
        let call = services::create_message_call(msisdn, &message_id, self.agent_id(), body);
        tracing::debug!(kind = intent.kind(), message_id = %message_id, "built agent message");
        let response = self.invoke(&ready, call).await?;
        Ok(Dispatch {
            id: message_id,
            response,
        })
    }

    pub async fn send_text(&self, msisdn: &Msisdn, message: TextMessage) -> Result<Dispatch> {
        self.send_message(msisdn, message).await
    }

    pub async fn send_rich_card(
        &self,
        msisdn: &Msisdn,
        card: StandaloneRichCard,
    ) -> Result<Dispatch> {
        self.send_message(msisdn, card).await
    }

    pub async fn send_carousel_card(
        &self,
        msisdn: &Msisdn,
        carousel: CarouselRichCard,
    ) -> Result<Dispatch> {
        self.send_message(msisdn, carousel).await
    }

    /// Have the service fetch media from a public URL and host it.
    pub async fn upload_file(&self, upload: &FileUpload) -> Result<serde_json::Value> {
        let ready = self.gate.require_ready()?;
        let call = services::create_file_call(upload, self.agent_id());
        self.invoke(&ready, call).await
    }
}
