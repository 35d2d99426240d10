//! Identifier generation for message ids, event ids and capability request ids.
//!
//! The three id spaces are never compared to each other, so one generator
//! serves all of them.

use uuid::Uuid;

/// Source of unique identifiers.
pub trait IdGenerator: Send + Sync {
    fn new_id(&self) -> String;
}

/// Random (v4) UUIDs: 122 random bits, collisions are not a practical concern.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn new_id(&self) -> String {
        new_id()
    }
}

/// Generate a fresh identifier with the default generator.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}
