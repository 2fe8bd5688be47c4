//! Gemini `generateContent` wire format.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use ciphersync_contracts::generation::{Content, GenerationRequest, Part, Role};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentRequest {
    pub contents: Vec<WireContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<WireContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<WireGenerationConfig>,
}

#[derive(Debug, Serialize)]
pub(crate) struct WireContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<&'static str>,
    pub parts: Vec<WirePart>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(crate) enum WirePart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineDataPayload,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InlineDataPayload {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_json_schema: Option<Value>,
}

impl From<&Content> for WireContent {
    fn from(content: &Content) -> Self {
        let role = match content.role {
            Role::User => "user",
            Role::Model => "model",
        };
        Self {
            role: Some(role),
            parts: content.parts.iter().map(WirePart::from).collect(),
        }
    }
}

impl From<&Part> for WirePart {
    fn from(part: &Part) -> Self {
        match part {
            Part::Text(text) => WirePart::Text { text: text.clone() },
            Part::InlineData(image) => WirePart::InlineData {
                inline_data: InlineDataPayload {
                    mime_type: image.mime_type.clone(),
                    data: image.data.clone(),
                },
            },
        }
    }
}

impl From<&GenerationRequest> for GenerateContentRequest {
    fn from(request: &GenerationRequest) -> Self {
        let config = &request.config;

        let system_instruction = config.system_instruction.as_ref().map(|text| WireContent {
            role: None,
            parts: vec![WirePart::Text { text: text.clone() }],
        });

        let generation_config = if config.temperature.is_some() || config.response_schema.is_some() {
            Some(WireGenerationConfig {
                temperature: config.temperature,
                response_mime_type: config.response_schema.as_ref().map(|_| "application/json"),
                response_json_schema: config.response_schema.clone(),
            })
        } else {
            None
        };

        Self {
            contents: request.contents.iter().map(WireContent::from).collect(),
            system_instruction,
            generation_config,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GenerateContentResponse {
    pub candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Candidate {
    pub content: Option<ContentResponse>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ContentResponse {
    #[serde(default)]
    pub parts: Vec<PartResponse>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PartResponse {
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    pub fn first_text(self) -> Option<String> {
        let parts = self
            .candidates?
            .into_iter()
            .next()?
            .content?
            .parts;
        let texts: Vec<String> = parts.into_iter().filter_map(|p| p.text).collect();
        if texts.is_empty() {
            None
        } else {
            Some(texts.concat())
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorWrapper {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: Option<String>,
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use ciphersync_contracts::generation::{
        Content, GenerationConfig, GenerationRequest, InlineImage, Part, Role,
    };

    use super::{GenerateContentRequest, GenerateContentResponse};

    #[test]
    fn structured_request_sets_json_mime_and_schema() {
        let request = GenerationRequest {
            model: "m".to_string(),
            contents: vec![Content {
                role: Role::User,
                parts: vec![
                    Part::Text("audit this".to_string()),
                    Part::InlineData(InlineImage::jpeg("QUJD")),
                ],
            }],
            config: GenerationConfig {
                temperature: Some(0.1),
                response_schema: Some(json!({ "type": "object" })),
                system_instruction: None,
            },
        };

        let body = serde_json::to_value(GenerateContentRequest::from(&request)).unwrap();

        assert_eq!(body["contents"][0]["role"], json!("user"));
        assert_eq!(body["contents"][0]["parts"][0], json!({ "text": "audit this" }));
        assert_eq!(
            body["contents"][0]["parts"][1],
            json!({ "inlineData": { "mimeType": "image/jpeg", "data": "QUJD" } })
        );
        assert_eq!(body["generationConfig"]["responseMimeType"], json!("application/json"));
        assert_eq!(body["generationConfig"]["responseJsonSchema"], json!({ "type": "object" }));
        assert!(body.get("systemInstruction").is_none());
    }

    #[test]
    fn chat_request_carries_system_instruction_and_model_role() {
        let request = GenerationRequest {
            model: "m".to_string(),
            contents: vec![Content::user_text("hi"), Content::model_text("hello"), Content::user_text("help")],
            config: GenerationConfig {
                temperature: Some(0.7),
                response_schema: None,
                system_instruction: Some("be defensive".to_string()),
            },
        };

        let body = serde_json::to_value(GenerateContentRequest::from(&request)).unwrap();

        assert_eq!(body["contents"][1]["role"], json!("model"));
        assert_eq!(body["systemInstruction"], json!({ "parts": [{ "text": "be defensive" }] }));
        assert!(body["generationConfig"].get("responseMimeType").is_none());
    }

    #[test]
    fn plain_request_omits_generation_config() {
        let request = GenerationRequest {
            model: "m".to_string(),
            contents: vec![Content::user_text("scan")],
            config: GenerationConfig::default(),
        };

        let body = serde_json::to_value(GenerateContentRequest::from(&request)).unwrap();

        assert!(body.get("generationConfig").is_none());
    }

    #[test]
    fn response_text_joins_first_candidate_parts() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [
                { "content": { "parts": [{ "text": "{\"a\":" }, { "text": "1}" }], "role": "model" } },
                { "content": { "parts": [{ "text": "ignored" }] } }
            ]
        }))
        .unwrap();
        assert_eq!(response.first_text().as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn response_without_text_is_none() {
        let blocked: GenerateContentResponse =
            serde_json::from_value(json!({ "promptFeedback": { "blockReason": "SAFETY" } })).unwrap();
        assert_eq!(blocked.first_text(), None);

        let empty: GenerateContentResponse =
            serde_json::from_value(json!({ "candidates": [{ "finishReason": "SAFETY" }] })).unwrap();
        assert_eq!(empty.first_text(), None);
    }
}
