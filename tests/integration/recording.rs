//! In-process doubles: a transport that records calls and canned id/credential sources.

use async_trait::async_trait;
use rbm_lib_rust::auth::{CredentialProvider, Session, StaticTokenProvider};
use rbm_lib_rust::ids::IdGenerator;
use rbm_lib_rust::transport::{RemoteCall, RemoteInvoke};
use rbm_lib_rust::{ClientConfig, Error, RbmClient, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// One call as seen by the transport.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub identity: Option<String>,
    pub token: String,
    pub call: RemoteCall,
}

/// Records every call; answers with a fixed value or a fixed remote failure.
pub struct RecordingTransport {
    calls: Mutex<Vec<RecordedCall>>,
    response: serde_json::Value,
    fail_status: Option<u16>,
}

impl RecordingTransport {
    pub fn ok(response: serde_json::Value) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            response,
            fail_status: None,
        })
    }

    pub fn failing(status: u16) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            response: serde_json::Value::Null,
            fail_status: Some(status),
        })
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl RemoteInvoke for RecordingTransport {
    async fn invoke(&self, session: &Session, call: RemoteCall) -> Result<serde_json::Value> {
        let token = session.access_token().await?;
        self.calls.lock().unwrap().push(RecordedCall {
            identity: session.identity().map(String::from),
            token,
            call,
        });
        match self.fail_status {
            Some(status) => Err(Error::Remote {
                status,
                code: Some("INVALID_ARGUMENT".into()),
                message: "rejected by test double".into(),
            }),
            None => Ok(self.response.clone()),
        }
    }
}

/// `id-1`, `id-2`, ...
#[derive(Default)]
pub struct SequentialIds(AtomicUsize);

impl IdGenerator for SequentialIds {
    fn new_id(&self) -> String {
        format!("id-{}", self.0.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

/// Counts how many sessions it hands out.
pub struct CountingProvider {
    pub sessions: AtomicUsize,
    inner: StaticTokenProvider,
}

impl CountingProvider {
    pub fn new(identity: &str) -> Arc<Self> {
        Arc::new(Self {
            sessions: AtomicUsize::new(0),
            inner: StaticTokenProvider::new("counted-token").with_identity(identity),
        })
    }
}

#[async_trait]
impl CredentialProvider for CountingProvider {
    async fn session(&self, scope: &str) -> Result<Session> {
        self.sessions.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        self.inner.session(scope).await
    }
}

/// Hands out a fixed-token session after a delay.
pub struct SlowProvider {
    delay: std::time::Duration,
    inner: StaticTokenProvider,
}

impl SlowProvider {
    pub fn new(identity: &str, token: &str, delay_ms: u64) -> Arc<Self> {
        Arc::new(Self {
            delay: std::time::Duration::from_millis(delay_ms),
            inner: StaticTokenProvider::new(token).with_identity(identity),
        })
    }
}

#[async_trait]
impl CredentialProvider for SlowProvider {
    async fn session(&self, scope: &str) -> Result<Session> {
        tokio::time::sleep(self.delay).await;
        self.inner.session(scope).await
    }
}

/// Always fails to produce a session.
pub struct BrokenProvider;

#[async_trait]
impl CredentialProvider for BrokenProvider {
    async fn session(&self, _scope: &str) -> Result<Session> {
        Err(Error::credential("no usable credentials"))
    }
}

/// Client wired to `transport`, with sequential ids; not yet initialized.
pub fn client_with(transport: Arc<RecordingTransport>, config: ClientConfig) -> RbmClient {
    RbmClient::builder()
        .config(config)
        .transport(transport)
        .ambient_credentials(Arc::new(
            StaticTokenProvider::new("ambient-token").with_identity("ambient@test"),
        ))
        .id_generator(Arc::new(SequentialIds::default()))
        .build()
        .expect("client builds")
}
