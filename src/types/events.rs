//! Agent events: non-message signals sent to the user's device.

/// An event the agent can send. Each dispatch allocates its own event id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventIntent {
    /// Typing indicator.
    IsTyping,
    /// Read receipt for a message the user sent.
    Read { message_id: String },
}

impl EventIntent {
    pub fn read(message_id: impl Into<String>) -> Self {
        EventIntent::Read {
            message_id: message_id.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            EventIntent::IsTyping => "is_typing",
            EventIntent::Read { .. } => "read",
        }
    }
}
