//! Caller-facing types: recipients, message intents and event intents.

pub mod events;
pub mod message;
pub mod msisdn;

pub use events::EventIntent;
pub use message::{
    CardContent, CardWidth, CarouselRichCard, FileUpload, MessageIntent, StandaloneRichCard,
    Suggestion, TextMessage,
};
pub use msisdn::Msisdn;
