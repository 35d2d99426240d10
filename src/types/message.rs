//! Message intents: what the caller wants to send, before it is shaped into a
//! wire payload by [`crate::payload`].

use crate::payload::{CardContentPayload, ContentInfo, Media, MediaHeight};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// A suggested reply or action attached to a message or card.
///
/// Suggestions are forwarded to the service as-is; the constructors below
/// cover the common shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Suggestion(serde_json::Value);

impl Suggestion {
    pub fn reply(text: impl Into<String>, postback_data: impl Into<String>) -> Self {
        Self(json!({
            "reply": {
                "text": text.into(),
                "postbackData": postback_data.into(),
            }
        }))
    }

    pub fn dial(
        text: impl Into<String>,
        postback_data: impl Into<String>,
        phone_number: impl Into<String>,
    ) -> Self {
        Self(json!({
            "action": {
                "text": text.into(),
                "postbackData": postback_data.into(),
                "dialAction": { "phoneNumber": phone_number.into() },
            }
        }))
    }

    pub fn open_url(
        text: impl Into<String>,
        postback_data: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self(json!({
            "action": {
                "text": text.into(),
                "postbackData": postback_data.into(),
                "openUrlAction": { "url": url.into() },
            }
        }))
    }

    pub fn view_location(
        text: impl Into<String>,
        postback_data: impl Into<String>,
        latitude: f64,
        longitude: f64,
        label: impl Into<String>,
    ) -> Self {
        Self(json!({
            "action": {
                "text": text.into(),
                "postbackData": postback_data.into(),
                "viewLocationAction": {
                    "latLong": { "latitude": latitude, "longitude": longitude },
                    "label": label.into(),
                },
            }
        }))
    }

    /// Wrap an already-shaped suggestion object.
    pub fn raw(value: serde_json::Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}

/// Plain text message, optionally with suggestions and/or a media file.
///
/// Every field is optional; the builder mirrors whatever subset is supplied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextMessage {
    pub text: Option<String>,
    pub suggestions: Vec<Suggestion>,
    pub file_url: Option<String>,
}

impl TextMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    /// A message that carries only a media file.
    pub fn file(file_url: impl Into<String>) -> Self {
        Self {
            file_url: Some(file_url.into()),
            ..Default::default()
        }
    }

    pub fn with_suggestions(mut self, suggestions: Vec<Suggestion>) -> Self {
        self.suggestions = suggestions;
        self
    }

    pub fn with_file_url(mut self, file_url: impl Into<String>) -> Self {
        self.file_url = Some(file_url.into());
        self
    }
}

/// A single vertical rich card with a tall image.
#[derive(Debug, Clone, PartialEq)]
pub struct StandaloneRichCard {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: String,
    pub suggestions: Vec<Suggestion>,
}

impl StandaloneRichCard {
    pub fn new(image_url: impl Into<String>) -> Self {
        Self {
            title: None,
            description: None,
            image_url: image_url.into(),
            suggestions: Vec::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_suggestions(mut self, suggestions: Vec<Suggestion>) -> Self {
        self.suggestions = suggestions;
        self
    }
}

/// Width of the cards in a carousel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardWidth {
    Small,
    #[default]
    Medium,
}

/// A horizontally scrolling carousel of rich cards.
///
/// `card_contents` is forwarded unvalidated; the service checks the card
/// shape. [`CardContent`] builds a well-formed entry.
#[derive(Debug, Clone, PartialEq)]
pub struct CarouselRichCard {
    pub card_width: Option<CardWidth>,
    pub card_contents: Vec<serde_json::Value>,
}

impl CarouselRichCard {
    pub fn new(card_contents: Vec<serde_json::Value>) -> Self {
        Self {
            card_width: None,
            card_contents,
        }
    }

    pub fn with_card_width(mut self, width: CardWidth) -> Self {
        self.card_width = Some(width);
        self
    }

    /// Append a typed card.
    pub fn push_card(mut self, card: CardContent) -> Self {
        self.card_contents.push(card.to_value());
        self
    }
}

/// Typed helper for one carousel entry.
#[derive(Debug, Clone, PartialEq)]
pub struct CardContent {
    pub title: Option<String>,
    pub description: Option<String>,
    pub media_url: Option<String>,
    pub media_height: MediaHeight,
    pub suggestions: Vec<Suggestion>,
}

impl CardContent {
    pub fn new() -> Self {
        Self {
            title: None,
            description: None,
            media_url: None,
            media_height: MediaHeight::Medium,
            suggestions: Vec::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_media(mut self, url: impl Into<String>, height: MediaHeight) -> Self {
        self.media_url = Some(url.into());
        self.media_height = height;
        self
    }

    pub fn with_suggestions(mut self, suggestions: Vec<Suggestion>) -> Self {
        self.suggestions = suggestions;
        self
    }

    pub fn to_value(&self) -> serde_json::Value {
        let payload = CardContentPayload {
            title: self.title.clone(),
            description: self.description.clone(),
            media: self.media_url.as_ref().map(|url| Media {
                height: self.media_height,
                content_info: ContentInfo {
                    file_url: url.clone(),
                    force_refresh: Some(false),
                },
            }),
            suggestions: self.suggestions.clone(),
        };
        // Plain structs of strings and enums always serialize.
        serde_json::to_value(payload).unwrap_or(serde_json::Value::Null)
    }
}

impl Default for CardContent {
    fn default() -> Self {
        Self::new()
    }
}

/// The kinds of agent message the client can send.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageIntent {
    Text(TextMessage),
    StandaloneRichCard(StandaloneRichCard),
    CarouselRichCard(CarouselRichCard),
}

impl MessageIntent {
    pub fn kind(&self) -> &'static str {
        match self {
            MessageIntent::Text(_) => "text",
            MessageIntent::StandaloneRichCard(_) => "standalone_card",
            MessageIntent::CarouselRichCard(_) => "carousel_card",
        }
    }
}

impl From<TextMessage> for MessageIntent {
    fn from(m: TextMessage) -> Self {
        MessageIntent::Text(m)
    }
}

impl From<StandaloneRichCard> for MessageIntent {
    fn from(c: StandaloneRichCard) -> Self {
        MessageIntent::StandaloneRichCard(c)
    }
}

impl From<CarouselRichCard> for MessageIntent {
    fn from(c: CarouselRichCard) -> Self {
        MessageIntent::CarouselRichCard(c)
    }
}

/// Media to be uploaded to the service by URL, for later reuse in messages.
#[derive(Debug, Clone, PartialEq)]
pub struct FileUpload {
    pub file_url: String,
    pub thumbnail_url: Option<String>,
    pub content_description: Option<String>,
}

impl FileUpload {
    pub fn new(file_url: impl Into<String>) -> Self {
        Self {
            file_url: file_url.into(),
            thumbnail_url: None,
            content_description: None,
        }
    }

    pub fn with_thumbnail_url(mut self, url: impl Into<String>) -> Self {
        self.thumbnail_url = Some(url.into());
        self
    }

    pub fn with_content_description(mut self, description: impl Into<String>) -> Self {
        self.content_description = Some(description.into());
        self
    }
}
