//! The request/reply contract with the generative model service.
//!
//! These types describe WHAT is asked of the model, independent of any
//! vendor wire format. Backends translate them to their own protocol.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// MIME type used for screenshots attached to audit requests.
pub const JPEG_MIME: &str = "image/jpeg";

/// Speaker of a conversation turn, in the model service's vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// A base64-encoded image sent alongside a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineImage {
    pub mime_type: String,
    /// Standard base64, no data-URL prefix.
    pub data: String,
}

impl InlineImage {
    /// A JPEG image from already-encoded base64 data.
    pub fn jpeg(data: impl Into<String>) -> Self {
        Self {
            mime_type: JPEG_MIME.to_string(),
            data: data.into(),
        }
    }
}

/// One piece of a content turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Part {
    Text(String),
    InlineData(InlineImage),
}

/// One ordered turn of content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    pub role: Role,
    pub parts: Vec<Part>,
}

impl Content {
    /// A user turn holding a single text part.
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            parts: vec![Part::Text(text.into())],
        }
    }

    /// A model turn holding a single text part.
    pub fn model_text(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            parts: vec![Part::Text(text.into())],
        }
    }
}

/// Sampling and output constraints for one request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Sampling temperature; `None` leaves the service default.
    pub temperature: Option<f32>,
    /// When set, the reply must be JSON matching this JSON Schema document.
    pub response_schema: Option<Value>,
    /// Persona and rules applied to the whole conversation.
    pub system_instruction: Option<String>,
}

/// A single-shot generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub model: String,
    pub contents: Vec<Content>,
    pub config: GenerationConfig,
}

/// What came back from the service.
///
/// `text` holds raw JSON when a schema was requested, free text otherwise.
/// It is `None` when the service produced no text part at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationReply {
    pub text: Option<String>,
}

impl GenerationReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }
}
