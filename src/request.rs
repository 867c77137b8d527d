use chrono::{DateTime, Utc};
use crate::error::CompletionError;
use crate::models::{ChatCompletionBody, ChatCompletionResponse, Message, Usage};

pub const TEMPERATURE_RANGE: (f32, f32) = (0.0, 2.0);
pub const TOP_P_RANGE: (f32, f32) = (0.0, 1.0);
pub const PENALTY_RANGE: (f32, f32) = (-2.0, 2.0);

/// One completion request: a system prompt, a user prompt and the optional
/// generation parameters. Anything left as `None` is not sent, so the
/// service default applies (max_tokens 16, temperature 1, n 1, penalties 0).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub n: Option<u32>,
    pub presence_penalty: Option<f32>,
    pub frequency_penalty: Option<f32>,
    pub seed: Option<i64>
}

impl CompletionRequest {

    pub fn new(system_prompt: impl Into<String>, user_prompt: impl Into<String>) -> Self {

        CompletionRequest {
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
            ..Default::default()
        }

    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = Some(top_p);
        self
    }

    pub fn with_n(mut self, n: u32) -> Self {
        self.n = Some(n);
        self
    }

    pub fn with_presence_penalty(mut self, penalty: f32) -> Self {
        self.presence_penalty = Some(penalty);
        self
    }

    pub fn with_frequency_penalty(mut self, penalty: f32) -> Self {
        self.frequency_penalty = Some(penalty);
        self
    }

    pub fn with_seed(mut self, seed: i64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Rejects an empty prompt, penalties outside [-2, 2] and `n = 0`.
    /// Sampling ranges differ between compatible services, so temperature
    /// and top_p are only reported by [`Self::advisories`].
    pub fn validate(&self) -> Result<(), CompletionError> {

        if self.user_prompt.trim().is_empty() {
            return Err(CompletionError::invalid("user_prompt", "must not be empty"));
        }

        check_range("presence_penalty", self.presence_penalty, PENALTY_RANGE)?;
        check_range("frequency_penalty", self.frequency_penalty, PENALTY_RANGE)?;

        if self.n == Some(0) {
            return Err(CompletionError::invalid("n", "must be at least 1"));
        }

        Ok(())

    }

    // setting both is legal but usually a mistake
    pub fn sets_temperature_and_top_p(&self) -> bool {

        self.temperature.is_some() && self.top_p.is_some()

    }

    /// Sampling values outside the documented OpenAI ranges. The request is
    /// still sent and the service decides.
    pub fn advisories(&self) -> Vec<CompletionError> {

        [
            check_range("temperature", self.temperature, TEMPERATURE_RANGE),
            check_range("top_p", self.top_p, TOP_P_RANGE)
        ]
        .into_iter()
        .filter_map(Result::err)
        .collect()

    }

    pub fn messages(&self) -> Vec<Message> {

        let mut messages = Vec::with_capacity(2);
        if !self.system_prompt.trim().is_empty() {
            messages.push(Message::system(self.system_prompt.clone()));
        }
        messages.push(Message::user(self.user_prompt.clone()));
        messages

    }

    /// Wire body. `model` is `None` for Azure deployments, where the
    /// deployment in the URL selects the model.
    pub fn to_body(&self, model: Option<&str>) -> ChatCompletionBody {

        ChatCompletionBody {
            model: model.map(str::to_string),
            messages: self.messages(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            top_p: self.top_p,
            n: self.n,
            presence_penalty: self.presence_penalty,
            frequency_penalty: self.frequency_penalty,
            seed: self.seed
        }

    }

}

fn check_range(field: &str, value: Option<f32>, (min, max): (f32, f32)) -> Result<(), CompletionError> {

    match value {
        Some(v) if !v.is_finite() || v < min || v > max => Err(CompletionError::invalid(
            field,
            format!("{v} is outside [{min}, {max}]")
        )),
        _ => Ok(())
    }

}

/// Generated texts in the order the service returned them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Completions {
    pub texts: Vec<String>,
    pub finish_reasons: Vec<Option<String>>,
    pub usage: Option<Usage>,
    pub model: Option<String>,
    pub system_fingerprint: Option<String>,
    pub created: Option<DateTime<Utc>>
}

impl Completions {

    pub fn len(&self) -> usize {

        self.texts.len()

    }

    pub fn is_empty(&self) -> bool {

        self.texts.is_empty()

    }

    pub fn first(&self) -> Option<&str> {

        self.texts.first().map(String::as_str)

    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {

        self.texts.iter().map(String::as_str)

    }

}

impl From<ChatCompletionResponse> for Completions {

    fn from(response: ChatCompletionResponse) -> Self {

        let created = response.created_at();
        let mut texts = Vec::with_capacity(response.choices.len());
        let mut finish_reasons = Vec::with_capacity(response.choices.len());

        for choice in response.choices {
            texts.push(choice.message.content.unwrap_or_default());
            finish_reasons.push(choice.finish_reason);
        }

        Completions {
            texts,
            finish_reasons,
            usage: response.usage,
            model: response.model,
            system_fingerprint: response.system_fingerprint,
            created
        }

    }

}
