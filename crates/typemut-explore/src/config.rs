/// Generator configuration: seeding, mutation depth and attempt budgets.
use serde::{Deserialize, Serialize};

use crate::mutate::MutationPolicy;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("max_multi_step must be at least 1")]
    ZeroMultiStep,

    #[error("mutate_retry_limit must be at least 1")]
    ZeroRetryLimit,

    #[error("max_attempts must be at least 1 when set")]
    ZeroAttemptBudget,

    #[error("{name} = {value} is outside [0, 0.95]")]
    ProbabilityOutOfRange { name: &'static str, value: f64 },
}

/// Configuration for a [`crate::generate::TypedMutGen`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// RNG seed. None = draw a fresh seed (logged, so the run can be replayed).
    pub seed: Option<u64>,
    /// Upper bound of the uniform 1..=k chain of mutations per candidate.
    pub max_multi_step: usize,
    /// Single-step retries before a seed is declared degenerate.
    pub mutate_retry_limit: usize,
    /// Consecutive non-accepted attempts tolerated before `generate` gives up.
    /// None = unbounded (may not terminate on degenerate corpora).
    pub max_attempts: Option<u64>,
    /// Ingredient gate probabilities.
    pub policy: MutationPolicy,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: None,
            max_multi_step: 5,
            mutate_retry_limit: 100,
            max_attempts: Some(10_000),
            policy: MutationPolicy::default(),
        }
    }
}

impl GeneratorConfig {
    /// Default configuration with a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_multi_step == 0 {
            return Err(ConfigError::ZeroMultiStep);
        }
        if self.mutate_retry_limit == 0 {
            return Err(ConfigError::ZeroRetryLimit);
        }
        if self.max_attempts == Some(0) {
            return Err(ConfigError::ZeroAttemptBudget);
        }
        if let Some((name, value)) = self.policy.out_of_range() {
            return Err(ConfigError::ProbabilityOutOfRange { name, value });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(GeneratorConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: GeneratorConfig =
            serde_json::from_str(r#"{ "seed": 7, "policy": { "string_ingredient_prob": 0.4 } }"#)
                .unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.max_multi_step, 5);
        assert_eq!(config.policy.string_ingredient_prob, 0.4);
        assert_eq!(config.policy.integer_ingredient_prob, 0.5);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let zero_steps = GeneratorConfig {
            max_multi_step: 0,
            ..GeneratorConfig::default()
        };
        assert_eq!(zero_steps.validate(), Err(ConfigError::ZeroMultiStep));

        let zero_budget = GeneratorConfig {
            max_attempts: Some(0),
            ..GeneratorConfig::default()
        };
        assert_eq!(zero_budget.validate(), Err(ConfigError::ZeroAttemptBudget));

        let mut bad_prob = GeneratorConfig::default();
        bad_prob.policy.float_ingredient_prob = -0.1;
        assert!(matches!(
            bad_prob.validate(),
            Err(ConfigError::ProbabilityOutOfRange {
                name: "float_ingredient_prob",
                ..
            })
        ));
    }
}
