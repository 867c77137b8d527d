use std::time::Instant;
use reqwest::{Client, StatusCode};
use crate::config::ClientConfig;
use crate::error::CompletionError;
use crate::logger::log_completion;
use crate::models::{ApiErrorEnvelope, ChatCompletionResponse};
use crate::request::{CompletionRequest, Completions};

/// Sends completion requests to one configured endpoint, one call at a time.
///
/// The HTTP client is reused for every call; nothing else is kept between
/// calls, so there is no retry, backoff or caching.
#[derive(Debug, Clone)]
pub struct CompletionRequester {
    http_client: Client,
    config: ClientConfig
}

impl CompletionRequester {

    pub fn new(config: ClientConfig) -> Self {

        Self::with_client(Client::new(), config)

    }

    pub fn with_client(http_client: Client, config: ClientConfig) -> Self {

        CompletionRequester { http_client, config }

    }

    pub fn config(&self) -> &ClientConfig {

        &self.config

    }

    pub async fn complete(&self, request: &CompletionRequest) -> Result<Completions, CompletionError> {

        request.validate()?;

        for advisory in request.advisories() {
            tracing::warn!(error = %advisory, "sending anyway; the service decides");
        }

        if request.sets_temperature_and_top_p() {
            tracing::warn!(
                temperature = ?request.temperature,
                top_p = ?request.top_p,
                "both temperature and top_p are set; usually only one is changed"
            );
        }

        // azure deployments pick the model from the url
        let model = (!self.config.is_azure()).then_some(self.config.model.as_str());
        let body = request.to_body(model);
        tracing::debug!(?body, "sending completion request");

        let mut builder = self.http_client
            .post(self.config.completions_url())
            .timeout(self.config.timeout)
            .json(&body);

        builder = if self.config.is_azure() {
            builder.header("api-key", &self.config.api_key)
        } else {
            builder.header("Authorization", format!("Bearer {}", self.config.api_key))
        };

        let started = Instant::now();
        let response = builder.send().await.inspect_err(|e| {
            tracing::error!(error = %e, "completion request failed to send");
        })?;

        let status = response.status();
        if !status.is_success() {
            let text = match response.text().await {
                Ok(text) => text,
                Err(e) => {
                    tracing::debug!(error = %e, "could not read error body");
                    format!("could not read error body: {e}")
                }
            };
            let err = error_from_response(status, &text);
            tracing::error!(status = status.as_u16(), error = %err, "completion request rejected");
            return Err(err);
        }

        let completion: ChatCompletionResponse = response.json().await?;

        if completion.choices.is_empty() {
            return Err(CompletionError::remote(Some(status.as_u16()), "response contained no choices"));
        }

        let completions = Completions::from(completion);
        log_completion(
            completions.model.as_deref().unwrap_or(&self.config.model),
            completions.len(),
            completions.usage,
            started.elapsed()
        );

        Ok(completions)

    }

}

// 400/422 naming a parameter is a parameter rejection, everything else is
// the service failing us
fn error_from_response(status: StatusCode, text: &str) -> CompletionError {

    let envelope = serde_json::from_str::<ApiErrorEnvelope>(text).ok();
    let code = status.as_u16();

    let message = envelope
        .as_ref()
        .map(|e| e.error.message.clone())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            if text.trim().is_empty() {
                status.canonical_reason().unwrap_or("unknown error").to_string()
            } else {
                text.trim().to_string()
            }
        });

    if status == StatusCode::BAD_REQUEST || status == StatusCode::UNPROCESSABLE_ENTITY {
        if let Some(error) = envelope.as_ref().map(|e| &e.error) {
            if let Some(param) = error.param.as_deref().filter(|p| !p.is_empty()) {
                return CompletionError::invalid(param, message);
            }
            if error.kind.as_deref() == Some("invalid_request_error") {
                return CompletionError::invalid("request", message);
            }
        }
    }

    CompletionError::remote(Some(code), message)

}
