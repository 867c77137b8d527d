use std::sync::atomic::{AtomicU64, Ordering};
use serde::Serialize;
use crate::request::Completions;

/// Running totals over the calls a caller chooses to record.
#[derive(Debug, Default)]
pub struct UsageTally {
    pub calls: AtomicU64,
    pub completions: AtomicU64,
    pub prompt_tokens: AtomicU64,
    pub completion_tokens: AtomicU64,
    pub total_tokens: AtomicU64,
}

impl UsageTally {
    pub fn new() -> Self {

        Self::default()

    }

    pub fn record(&self, completions: &Completions) {

        self.calls.fetch_add(1, Ordering::Relaxed);
        self.completions.fetch_add(completions.len() as u64, Ordering::Relaxed);

        // services that omit usage still count as a call
        if let Some(usage) = completions.usage {
            self.prompt_tokens.fetch_add(usage.prompt_tokens, Ordering::Relaxed);
            self.completion_tokens.fetch_add(usage.completion_tokens, Ordering::Relaxed);
            self.total_tokens.fetch_add(usage.total_tokens, Ordering::Relaxed);
        }

    }

    pub fn snapshot(&self) -> UsageSnapshot {

        UsageSnapshot {
            calls: self.calls.load(Ordering::Relaxed),
            completions: self.completions.load(Ordering::Relaxed),
            prompt_tokens: self.prompt_tokens.load(Ordering::Relaxed),
            completion_tokens: self.completion_tokens.load(Ordering::Relaxed),
            total_tokens: self.total_tokens.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct UsageSnapshot {
    pub calls: u64,
    pub completions: u64,
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

impl UsageSnapshot {
    pub fn tokens_per_call(&self) -> f64 {

        if self.calls == 0 {
            return 0.0;
        }
        self.total_tokens as f64 / self.calls as f64

    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::models::Usage;

    fn completions(n: usize, usage: Option<Usage>) -> Completions {

        Completions {
            texts: vec!["x".to_string(); n],
            usage,
            ..Default::default()
        }

    }

    #[test]
    fn test_tally_sums_usage() {

        let tally = UsageTally::new();
        tally.record(&completions(2, Some(Usage { prompt_tokens: 10, completion_tokens: 6, total_tokens: 16 })));
        tally.record(&completions(1, Some(Usage { prompt_tokens: 4, completion_tokens: 0, total_tokens: 4 })));
        tally.record(&completions(1, None));

        let snapshot = tally.snapshot();
        assert_eq!(snapshot, UsageSnapshot {
            calls: 3,
            completions: 4,
            prompt_tokens: 14,
            completion_tokens: 6,
            total_tokens: 20,
        });
        assert!((snapshot.tokens_per_call() - 20.0 / 3.0).abs() < 1e-9);

    }

    #[test]
    fn test_empty_tally() {

        assert_eq!(UsageTally::new().snapshot().tokens_per_call(), 0.0);

    }

}
