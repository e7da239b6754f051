//! Per-submission options.

use serde::{Deserialize, Serialize};

/// Options accepted by [`Backend::process_circuits`](crate::Backend::process_circuits).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmitOptions {
    /// Requested shots. Exact simulators ignore it.
    pub n_shots: Option<u32>,
    /// Check every circuit against the backend predicates first.
    pub valid_check: bool,
    /// Seed for any randomness in the backend.
    pub seed: Option<u64>,
    /// Backend-specific options.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Default for SubmitOptions {
    fn default() -> Self {
        Self {
            n_shots: None,
            valid_check: true,
            seed: None,
            extra: serde_json::Map::new(),
        }
    }
}

impl SubmitOptions {
    /// Default options: validation on, no seed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the shot count.
    #[must_use]
    pub fn with_shots(mut self, n_shots: u32) -> Self {
        self.n_shots = Some(n_shots);
        self
    }

    /// Turn predicate validation on or off.
    #[must_use]
    pub fn with_valid_check(mut self, valid_check: bool) -> Self {
        self.valid_check = valid_check;
        self
    }

    /// Set the seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Add a backend-specific option.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}
