use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

#[derive(Deserialize)]
pub struct ChatResponseMessage {
    pub content: Option<String>,
}

#[derive(Deserialize)]
pub struct ChatResponseChoice {
    pub message: ChatResponseMessage,
}

#[derive(Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<ChatResponseChoice>,
}

#[derive(Deserialize)]
pub struct ModelInfo {
    pub id: String,
}

#[derive(Deserialize)]
pub struct ModelsResponse {
    pub data: Vec<ModelInfo>,
}

fn extract_error_summary(value: &serde_json::Value) -> Option<String> {
    let summary = value
        .pointer("/error/message")
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .or_else(|| {
            value.get("error").and_then(|v| match v {
                serde_json::Value::String(s) => Some(s.to_string()),
                serde_json::Value::Object(map) => map
                    .get("message")
                    .and_then(|message| message.as_str().map(str::to_owned)),
                _ => None,
            })
        })
        .or_else(|| {
            value
                .get("message")
                .and_then(|v| v.as_str().map(str::to_owned))
        });

    summary.map(|text| {
        let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
        collapsed.trim().to_string()
    })
}

/// Reduce a provider error body to a single displayable line.
///
/// Providers wrap failures in a handful of JSON shapes; mine the usual
/// locations for a message and fall back to the collapsed raw body.
pub fn error_message_from_body(body: &str) -> String {
    let trimmed = body.trim();

    if trimmed.is_empty() {
        return "<empty response body>".to_string();
    }

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        if let Some(summary) = extract_error_summary(&value) {
            if !summary.is_empty() {
                return summary;
            }
        }
    }

    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub mod models;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_with_nested_message_is_summarized() {
        let raw = r#"{"error":{"message":"model overloaded","type":"invalid_request_error"}}"#;
        assert_eq!(error_message_from_body(raw), "model overloaded");
    }

    #[test]
    fn error_body_with_string_error_is_summarized() {
        let raw = r#"{"error":"bad key"}"#;
        assert_eq!(error_message_from_body(raw), "bad key");
    }

    #[test]
    fn error_body_with_top_level_message_is_summarized() {
        let raw = r#"{"message":"quota   exceeded"}"#;
        assert_eq!(error_message_from_body(raw), "quota exceeded");
    }

    #[test]
    fn non_json_error_body_is_collapsed() {
        assert_eq!(
            error_message_from_body("  upstream\ntimeout  "),
            "upstream timeout"
        );
        assert_eq!(error_message_from_body("   "), "<empty response body>");
    }

    #[test]
    fn chat_response_deserializes_first_choice_content() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":"Hi there."}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(
            parsed.choices[0].message.content.as_deref(),
            Some("Hi there.")
        );
    }

    #[test]
    fn models_response_deserializes_ids() {
        let raw = r#"{"object":"list","data":[{"id":"gpt-4o-mini"},{"id":"gpt-4o"}]}"#;
        let parsed: ModelsResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.data.len(), 2);
        assert_eq!(parsed.data[0].id, "gpt-4o-mini");
    }
}
