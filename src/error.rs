use crate::transport::TransportError;
use std::sync::Arc;
use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Field path or configuration key that caused the error (e.g., "config.base_url", "credentials.private_key")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected type, actual value)
    pub details: Option<String>,
    /// Source of the error (e.g., "service_account", "config_loader")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Unified error type for the RBM client.
#[derive(Debug, Error)]
pub enum Error {
    /// An operation was invoked before `initialize` completed successfully.
    /// No remote request is attempted when this is returned.
    #[error("RBM client is not initialized; call initialize() first")]
    NotInitialized,

    /// The shared initialization failed. Every caller that joined the same
    /// initialization receives the same underlying cause.
    #[error("Initialization failed: {0}")]
    Initialization(#[source] Arc<Error>),

    #[error("Credential error: {message}{}", format_context(.context))]
    Credential {
        message: String,
        context: ErrorContext,
    },

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Network transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Remote error: HTTP {status}{}: {message}", format_code(.code))]
    Remote {
        status: u16,
        /// Canonical status string from the error body (e.g. `NOT_FOUND`).
        code: Option<String>,
        message: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

fn format_code(code: &Option<String>) -> String {
    code.as_ref().map(|c| format!(" ({})", c)).unwrap_or_default()
}

impl Error {
    pub fn credential(msg: impl Into<String>) -> Self {
        Self::credential_with_context(msg, ErrorContext::new())
    }

    /// Create a new credential error with structured context
    pub fn credential_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Credential {
            message: msg.into(),
            context,
        }
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::configuration_with_context(msg, ErrorContext::new())
    }

    /// Create a new configuration error with structured context
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Credential { context, .. } | Error::Configuration { context, .. } => {
                Some(context)
            }
            Error::Initialization(inner) => inner.context(),
            _ => None,
        }
    }

    /// True when the remote call itself failed: the transport could not
    /// complete it, or the service answered with a non-success status.
    pub fn is_remote_failure(&self) -> bool {
        matches!(self, Error::Remote { .. } | Error::Transport(_))
    }

    /// HTTP status of a remote rejection, if any.
    pub fn remote_status(&self) -> Option<u16> {
        match self {
            Error::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}
