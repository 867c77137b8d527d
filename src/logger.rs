use std::time::Duration;
use tracing_subscriber::EnvFilter;
use crate::models::Usage;

// RUST_LOG wins, otherwise info
pub fn init() {

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into())
        )
        .init();

}

pub fn log_completion(
    model: &str,
    choices: usize,
    usage: Option<Usage>,
    elapsed: Duration,
) {

    let usage = usage.unwrap_or_default();
    tracing::info!(
        model,
        choices,
        prompt_tokens = usage.prompt_tokens,
        completion_tokens = usage.completion_tokens,
        total_tokens = usage.total_tokens,
        elapsed_ms = elapsed.as_millis() as u64,
        "completion received"
    );

}
