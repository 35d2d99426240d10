//! Recipient phone numbers and the resource paths derived from them.

use crate::transport::ResourcePath;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A phone number in E.164 format.
///
/// Used verbatim in resource paths. The client performs no validation; a
/// malformed number is rejected by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Msisdn(String);

impl Msisdn {
    pub fn new(number: impl Into<String>) -> Self {
        Self(number.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `phones/<number>`
    pub fn phone_path(&self) -> ResourcePath {
        ResourcePath::new("phones").join(self.0.as_str())
    }

    /// `phones/<number>/agentMessages`
    pub fn agent_messages_path(&self) -> ResourcePath {
        self.phone_path().join("agentMessages")
    }

    /// `phones/<number>/agentMessages/<message_id>`
    pub fn agent_message_path(&self, message_id: &str) -> ResourcePath {
        self.agent_messages_path().join(message_id)
    }

    /// `phones/<number>/agentEvents`
    pub fn agent_events_path(&self) -> ResourcePath {
        self.phone_path().join("agentEvents")
    }

    /// `phones/<number>/testers`
    pub fn testers_path(&self) -> ResourcePath {
        self.phone_path().join("testers")
    }

    /// `phones/<number>/capabilities`
    pub fn capabilities_path(&self) -> ResourcePath {
        self.phone_path().join("capabilities")
    }
}

impl fmt::Display for Msisdn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Msisdn {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Msisdn {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for Msisdn {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
