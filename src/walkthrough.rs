//! Parameter sweeps: the same prompt sent repeatedly while one generation
//! parameter changes, so the effect of that parameter can be read off the
//! outputs side by side.
//!
//! Calls are made one after another; the first failure ends the sweep.

use std::fmt::Display;
use crate::client::CompletionRequester;
use crate::error::CompletionError;
use crate::request::{CompletionRequest, Completions};

pub const MAX_TOKENS_VALUES: [u32; 4] = [0, 5, 20, 100];
pub const TEMPERATURE_VALUES: [f32; 4] = [0.0, 0.7, 1.2, 1.8];
pub const TOP_P_VALUES: [f32; 3] = [0.1, 0.5, 1.0];
pub const N_VALUES: [u32; 3] = [1, 2, 3];
pub const PENALTY_VALUES: [f32; 4] = [-2.0, 0.0, 1.0, 2.0];
pub const DEFAULT_SEED: i64 = 1234;

#[derive(Debug, Clone, PartialEq)]
pub struct SweepRun {
    pub label: String,
    pub completions: Completions
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeedReport {
    pub seed: i64,
    pub runs: Vec<SweepRun>,
    pub system_fingerprints: Vec<Option<String>>
}

impl SeedReport {

    /// True when every run produced byte-identical texts. Reproducibility is
    /// best effort on the service side, so `false` is not an error.
    pub fn identical(&self) -> bool {

        match self.runs.split_first() {
            Some((first, rest)) => rest
                .iter()
                .all(|run| run.completions.texts == first.completions.texts),
            None => true
        }

    }

}

async fn sweep<T, F>(
    requester: &CompletionRequester,
    base: &CompletionRequest,
    parameter: &str,
    values: &[T],
    apply: F
) -> Result<Vec<SweepRun>, CompletionError>
where
    T: Copy + Display,
    F: Fn(CompletionRequest, T) -> CompletionRequest
{

    let mut runs = Vec::with_capacity(values.len());

    for value in values {
        let request = apply(base.clone(), *value);
        tracing::debug!(parameter, %value, "sweep step");
        let completions = requester.complete(&request).await?;
        runs.push(SweepRun { label: format!("{parameter}={value}"), completions });
    }

    Ok(runs)

}

pub async fn max_tokens_sweep(
    requester: &CompletionRequester,
    base: &CompletionRequest,
    values: &[u32]
) -> Result<Vec<SweepRun>, CompletionError> {

    sweep(requester, base, "max_tokens", values, CompletionRequest::with_max_tokens).await

}

pub async fn temperature_sweep(
    requester: &CompletionRequester,
    base: &CompletionRequest,
    values: &[f32]
) -> Result<Vec<SweepRun>, CompletionError> {

    sweep(requester, base, "temperature", values, CompletionRequest::with_temperature).await

}

pub async fn top_p_sweep(
    requester: &CompletionRequester,
    base: &CompletionRequest,
    values: &[f32]
) -> Result<Vec<SweepRun>, CompletionError> {

    sweep(requester, base, "top_p", values, CompletionRequest::with_top_p).await

}

pub async fn n_sweep(
    requester: &CompletionRequester,
    base: &CompletionRequest,
    values: &[u32]
) -> Result<Vec<SweepRun>, CompletionError> {

    sweep(requester, base, "n", values, CompletionRequest::with_n).await

}

pub async fn presence_penalty_sweep(
    requester: &CompletionRequester,
    base: &CompletionRequest,
    values: &[f32]
) -> Result<Vec<SweepRun>, CompletionError> {

    sweep(requester, base, "presence_penalty", values, CompletionRequest::with_presence_penalty).await

}

pub async fn frequency_penalty_sweep(
    requester: &CompletionRequester,
    base: &CompletionRequest,
    values: &[f32]
) -> Result<Vec<SweepRun>, CompletionError> {

    sweep(requester, base, "frequency_penalty", values, CompletionRequest::with_frequency_penalty).await

}

/// Sends the same request `runs` times with a fixed seed and temperature 0.
pub async fn seed_reproducibility(
    requester: &CompletionRequester,
    base: &CompletionRequest,
    seed: i64,
    runs: usize
) -> Result<SeedReport, CompletionError> {

    let request = base.clone().with_seed(seed).with_temperature(0.0);
    let attempts: Vec<usize> = (1..=runs).collect();

    let runs = sweep(requester, &request, "run", &attempts, |r, _| r).await?;
    let system_fingerprints = runs
        .iter()
        .map(|run| run.completions.system_fingerprint.clone())
        .collect();

    Ok(SeedReport { seed, runs, system_fingerprints })

}
