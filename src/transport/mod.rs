//! Remote invocation: the seam between request shaping and the network.
//!
//! Services produce a [`RemoteCall`] (method, addressing path, query, body);
//! a [`RemoteInvoke`] implementation executes it under a [`Session`].

pub mod http;

pub use http::{HttpTransport, TransportError};

use crate::auth::Session;
use crate::Result;
use async_trait::async_trait;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        })
    }
}

/// Resource path relative to the API version root, kept as segments so a
/// caller-supplied id is always exactly one segment on the wire.
#[derive(Clone, PartialEq, Eq)]
pub struct ResourcePath(Vec<String>);

impl ResourcePath {
    /// Path made of fixed segments separated by `/`.
    pub fn new(path: &str) -> Self {
        Self(
            path.split('/')
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
        )
    }

    /// Append one segment verbatim; `/`, `?` and `#` inside it are escaped
    /// by the transport rather than read as structure.
    pub fn join(mut self, segment: impl Into<String>) -> Self {
        self.0.push(segment.into());
        self
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl From<&str> for ResourcePath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}

impl fmt::Debug for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.to_string())
    }
}

impl PartialEq<&str> for ResourcePath {
    fn eq(&self, other: &&str) -> bool {
        self.to_string() == *other
    }
}

/// A fully shaped request, independent of any HTTP client.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteCall {
    /// API method name, for logs (e.g. `phones.agentMessages.create`).
    pub operation: &'static str,
    pub method: HttpMethod,
    /// e.g. `phones/+1555/agentMessages`
    pub path: ResourcePath,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl RemoteCall {
    pub fn new(operation: &'static str, method: HttpMethod, path: impl Into<ResourcePath>) -> Self {
        Self {
            operation,
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Add `name=value` only when a value is present.
    pub fn with_optional_query(self, name: impl Into<String>, value: Option<&str>) -> Self {
        match value {
            Some(v) => self.with_query(name, v),
            None => self,
        }
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// First value of a query parameter.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Executes a [`RemoteCall`] against the messaging service.
///
/// Implementations own retry, backoff and timeouts; the client adds none.
/// Responses are returned uninterpreted.
#[async_trait]
pub trait RemoteInvoke: Send + Sync {
    async fn invoke(&self, session: &Session, call: RemoteCall) -> Result<serde_json::Value>;
}
