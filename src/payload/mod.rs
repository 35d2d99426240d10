//! Wire payloads for agent messages and agent events.
//!
//! Builders are pure: they map an intent to the minimal valid payload for its
//! variant. Optional fields the caller did not supply are left out of the
//! serialized JSON entirely rather than sent as `null` or empty.
//!
//! Message and event ids are not part of these bodies; they travel in the
//! request addressing (see [`crate::services`]).

use crate::types::message::{
    CardWidth, CarouselRichCard, MessageIntent, StandaloneRichCard, Suggestion, TextMessage,
};
use crate::types::EventIntent;
use serde::{Deserialize, Serialize};

/// `{ contentMessage: ... }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentMessage {
    pub content_message: ContentMessage,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<Suggestion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_info: Option<ContentInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rich_card: Option<RichCard>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentInfo {
    pub file_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force_refresh: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RichCard {
    StandaloneCard(StandaloneCard),
    CarouselCard(CarouselCard),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandaloneCard {
    pub card_orientation: CardOrientation,
    pub card_content: CardContentPayload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardOrientation {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardContentPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<Media>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<Suggestion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    pub height: MediaHeight,
    pub content_info: ContentInfo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaHeight {
    Short,
    Medium,
    Tall,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarouselCard {
    pub card_width: CardWidth,
    pub card_contents: Vec<serde_json::Value>,
}

/// `{ eventType, messageId? }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentEvent {
    pub event_type: EventType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    IsTyping,
    Read,
}

/// Build the payload for any message intent.
pub fn build_message(intent: &MessageIntent) -> AgentMessage {
    match intent {
        MessageIntent::Text(m) => build_text(m),
        MessageIntent::StandaloneRichCard(c) => build_standalone_card(c),
        MessageIntent::CarouselRichCard(c) => build_carousel_card(c),
    }
}

/// `{contentMessage: {text?, suggestions?, contentInfo?: {fileUrl}}}`
pub fn build_text(message: &TextMessage) -> AgentMessage {
    let text = message.text.clone().filter(|t| !t.is_empty());
    let content_info = message
        .file_url
        .as_ref()
        .filter(|u| !u.is_empty())
        .map(|url| ContentInfo {
            file_url: url.clone(),
            force_refresh: None,
        });

    AgentMessage {
        content_message: ContentMessage {
            text,
            suggestions: message.suggestions.clone(),
            content_info,
            rich_card: None,
        },
    }
}

/// Vertical standalone card with a tall image. Title and description are
/// always present, empty when not supplied.
pub fn build_standalone_card(card: &StandaloneRichCard) -> AgentMessage {
    let content = CardContentPayload {
        title: Some(card.title.clone().unwrap_or_default()),
        description: Some(card.description.clone().unwrap_or_default()),
        media: Some(Media {
            height: MediaHeight::Tall,
            content_info: ContentInfo {
                file_url: card.image_url.clone(),
                force_refresh: Some(false),
            },
        }),
        suggestions: card.suggestions.clone(),
    };

    rich_card_message(RichCard::StandaloneCard(StandaloneCard {
        card_orientation: CardOrientation::Vertical,
        card_content: content,
    }))
}

/// Carousel card; width defaults to [`CardWidth::Medium`].
pub fn build_carousel_card(card: &CarouselRichCard) -> AgentMessage {
    rich_card_message(RichCard::CarouselCard(CarouselCard {
        card_width: card.card_width.unwrap_or_default(),
        card_contents: card.card_contents.clone(),
    }))
}

fn rich_card_message(rich_card: RichCard) -> AgentMessage {
    AgentMessage {
        content_message: ContentMessage {
            rich_card: Some(rich_card),
            ..Default::default()
        },
    }
}

pub fn build_event(intent: &EventIntent) -> AgentEvent {
    match intent {
        EventIntent::IsTyping => AgentEvent {
            event_type: EventType::IsTyping,
            message_id: None,
        },
        EventIntent::Read { message_id } => AgentEvent {
            event_type: EventType::Read,
            message_id: Some(message_id.clone()),
        },
    }
}
