//! # rbm-lib-rust
//!
//! Async client for the RCS Business Messaging (RBM) agent API.
//!
//! ## Overview
//!
//! Callers describe *what* to send (a text, a rich card, a carousel, a typing
//! indicator, a read receipt) as a typed intent. The client turns it into the
//! wire payload the service expects, gives it a fresh id, and dispatches it
//! under an authenticated session.
//!
//! ## Key Features
//!
//! - **Typed intents**: [`TextMessage`], [`StandaloneRichCard`], [`CarouselRichCard`],
//!   [`EventIntent`]; optional fields are omitted from payloads, never sent empty
//! - **Session gate**: every operation fails with [`Error::NotInitialized`]
//!   until [`RbmClient::initialize`] succeeds, without touching the network
//! - **Credentials**: explicit service-account material, or ambient credentials
//!   (`GOOGLE_APPLICATION_CREDENTIALS`, then the metadata server)
//! - **Pluggable transport**: [`transport::RemoteInvoke`], with a `reqwest`
//!   implementation by default
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rbm_lib_rust::{CredentialMaterial, Msisdn, RbmClient, Suggestion, TextMessage};
//!
//! #[tokio::main]
//! async fn main() -> rbm_lib_rust::Result<()> {
//!     let client = RbmClient::builder().agent_id("my-agent").build()?;
//!     client
//!         .initialize(Some(CredentialMaterial::from_json_file("rbm-key.json")?))
//!         .await?;
//!
//!     let to = Msisdn::new("+15551234567");
//!     let sent = client
//!         .send_text(
//!             &to,
//!             TextMessage::new("Hello!").with_suggestions(vec![Suggestion::reply("Hi", "hi")]),
//!         )
//!         .await?;
//!     println!("sent message {}", sent.id);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | The client facade, its builder and the session gate |
//! | [`types`] | Recipients and message/event intents |
//! | [`payload`] | Intent → wire payload builders |
//! | [`services`] | Request addressing for each API method |
//! | [`auth`] | Sessions and credential providers |
//! | [`transport`] | Remote invocation seam and the HTTP transport |
//! | [`config`] | Client configuration (YAML + environment) |
//! | [`ids`] | Identifier generation |

pub mod auth;
pub mod client;
pub mod config;
pub mod ids;
pub mod payload;
pub mod services;
pub mod transport;
pub mod types;

pub use auth::{CredentialMaterial, CredentialProvider, Session};
pub use client::{Dispatch, RbmClient, RbmClientBuilder};
pub use config::ClientConfig;
pub use types::{
    CardContent, CardWidth, CarouselRichCard, EventIntent, FileUpload, MessageIntent, Msisdn,
    StandaloneRichCard, Suggestion, TextMessage,
};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
