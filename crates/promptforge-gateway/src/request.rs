//! Chat-completions wire types.
//!
//! The request body follows the OpenAI chat completions shape: a system
//! message carrying the extraction policy and a single user message whose
//! content is an ordered list of typed parts.

use serde::{Deserialize, Serialize};

/// One part of the user message content.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ImageUrl {
    pub url: String,
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text { text: text.into() }
    }

    pub fn image_url(url: impl Into<String>) -> Self {
        ContentPart::ImageUrl {
            image_url: ImageUrl { url: url.into() },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: f32,
}

#[derive(Debug, Serialize)]
pub struct Message {
    pub role: &'static str,
    pub content: MessageContent,
}

/// System messages carry plain text; the user message carries content parts.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_content_part_wire_shape() {
        let text = serde_json::to_value(ContentPart::text("TEXT INPUT:\nhello")).unwrap();
        assert_eq!(
            text,
            json!({"type": "text", "text": "TEXT INPUT:\nhello"})
        );

        let image = serde_json::to_value(ContentPart::image_url("https://x/y.png")).unwrap();
        assert_eq!(
            image,
            json!({"type": "image_url", "image_url": {"url": "https://x/y.png"}})
        );
    }

    #[test]
    fn test_request_wire_shape() {
        let request = ChatRequest {
            model: "gpt-4o".to_string(),
            messages: vec![
                Message {
                    role: "system",
                    content: MessageContent::Text("policy".to_string()),
                },
                Message {
                    role: "user",
                    content: MessageContent::Parts(vec![ContentPart::text("hi")]),
                },
            ],
            temperature: 0.3,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["messages"][0]["content"], json!("policy"));
        assert_eq!(value["messages"][1]["content"][0]["type"], json!("text"));
        assert!((value["temperature"].as_f64().unwrap() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_response_tolerates_missing_fields() {
        let parsed: ChatCompletionResponse = serde_json::from_value(json!({})).unwrap();
        assert!(parsed.choices.is_empty());

        let parsed: ChatCompletionResponse =
            serde_json::from_value(json!({"choices": [{"message": {}}]})).unwrap();
        assert!(parsed.choices[0].message.content.is_none());
    }
}
