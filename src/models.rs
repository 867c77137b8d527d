use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Message {
    pub role: String,
    pub content: String
}

impl Message {

    pub fn system(content: impl Into<String>) -> Self {

        Message { role: "system".to_string(), content: content.into() }

    }

    pub fn user(content: impl Into<String>) -> Self {

        Message { role: "user".to_string(), content: content.into() }

    }

}

// body of POST .../chat/completions
// unset parameters are skipped so the service falls back to its own defaults
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChatCompletionBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub created: Option<i64>,
    #[serde(default)]
    pub system_fingerprint: Option<String>,
    #[serde(default)]
    pub usage: Option<Usage>
}

impl ChatCompletionResponse {

    pub fn created_at(&self) -> Option<DateTime<Utc>> {

        self.created.and_then(|secs| DateTime::from_timestamp(secs, 0))

    }

}

#[derive(Debug, Deserialize, Serialize)]
pub struct Choice {
    #[serde(default)]
    pub index: u32,
    pub message: ChoiceMessage,
    #[serde(default)]
    pub finish_reason: Option<String>
}

// content is null when nothing was generated (max_tokens = 0, content filter)
#[derive(Debug, Deserialize, Serialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64
}

// {"error": {"message": ..., "type": ..., "param": ..., "code": ...}}
#[derive(Debug, Deserialize, Serialize)]
pub struct ApiErrorEnvelope {
    pub error: ApiError
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ApiError {
    #[serde(default)]
    pub message: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub param: Option<String>,
    #[serde(default)]
    pub code: Option<serde_json::Value>
}
