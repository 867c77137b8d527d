//! A thin client for hosted chat-completion APIs, plus parameter sweeps that
//! show how `max_tokens`, `temperature`, `top_p`, `n`, the presence and
//! frequency penalties, and `seed` shape the output.

pub mod client;
pub mod config;
pub mod error;
pub mod logger;
pub mod metrics;
pub mod models;
pub mod request;
pub mod walkthrough;

#[cfg(test)]
mod fake_service;

pub use client::CompletionRequester;
pub use config::ClientConfig;
pub use error::{CompletionError, ConfigError};
pub use metrics::{UsageSnapshot, UsageTally};
pub use request::{CompletionRequest, Completions};
