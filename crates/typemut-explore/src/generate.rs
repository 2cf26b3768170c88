//! The generation loop.
//!
//! Each iteration runs `Select -> Mutate x k -> Dedup -> Oracle`, then
//! either accepts the candidate (harvest, append to corpus, emit) or drops
//! it. Rejections are never retried; the loop simply selects again. An
//! attempt budget bounds consecutive failures so a corpus that cannot
//! produce anything novel fails with `DegenerateSeed` instead of spinning.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{debug, info};
use typemut_ir::canonical::canonical_hash;
use typemut_ir::types::Value;

use crate::config::{ConfigError, GeneratorConfig};
use crate::corpus::SeedCorpus;
use crate::ingredient::IngredientStore;
use crate::mutate::Mutator;
use crate::oracle::{Oracle, Outcome};
use crate::rng::{generator_rng, resolve_seed};
use crate::select::{SeedSelector, UniformSelector};

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("invalid generator config: {0}")]
    Config(#[from] ConfigError),

    #[error("seed corpus is empty")]
    EmptyCorpus,

    #[error(
        "no novel accepted candidate after {attempts} consecutive attempts ({} accepted before giving up)",
        .accepted.len()
    )]
    DegenerateSeed {
        attempts: u64,
        /// Values accepted by this call before the budget ran out.
        accepted: Vec<Value>,
    },
}

/// Counters across the generator's lifetime.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationStats {
    /// Select/mutate/dedup/oracle rounds started.
    pub iterations: u64,
    /// Candidates accepted into the corpus.
    pub accepted: u64,
    /// Candidates dropped because their content was already in the corpus.
    pub duplicates: u64,
    /// Oracle verdicts: timeout.
    pub timeouts: u64,
    /// Oracle verdicts: exception.
    pub exceptions: u64,
    /// Rounds abandoned because the selected seed would not change.
    pub degenerate: u64,
    /// Oracle invocations.
    pub oracle_calls: u64,
}

/// What happened to one candidate.
#[derive(Debug, Clone, PartialEq)]
enum Attempt {
    Accepted(Value),
    Duplicate,
    Rejected,
    Degenerate,
}

/// Type-aware mutation generator.
///
/// Owns its seed corpus, ingredient store and RNG. `O` runs the target
/// program against each hash-novel candidate.
pub struct TypedMutGen<O: Oracle> {
    signature: String,
    contract_code: String,
    oracle: O,
    config: GeneratorConfig,
    seed: u64,
    rng: ChaCha8Rng,
    selector: Box<dyn SeedSelector>,
    ingredients: IngredientStore,
    corpus: SeedCorpus,
    stats: GenerationStats,
}

impl<O: Oracle> TypedMutGen<O> {
    /// Build a generator, harvesting every initial input and seeding the
    /// corpus with all of them.
    pub fn new(
        inputs: Vec<Value>,
        signature: impl Into<String>,
        contract_code: impl Into<String>,
        oracle: O,
        config: GeneratorConfig,
    ) -> Result<Self, GenerateError> {
        config.validate()?;
        let seed = resolve_seed(config.seed);
        let ingredients = IngredientStore::from_inputs(inputs.iter());
        let corpus = SeedCorpus::from_inputs(inputs);
        info!(
            seed,
            seeds = corpus.len(),
            ingredients = ingredients.total_len(),
            "generator initialized"
        );
        Ok(Self {
            signature: signature.into(),
            contract_code: contract_code.into(),
            oracle,
            config,
            seed,
            rng: generator_rng(seed),
            selector: Box::new(UniformSelector),
            ingredients,
            corpus,
            stats: GenerationStats::default(),
        })
    }

    /// Replace the seed selection strategy.
    pub fn with_selector(mut self, selector: Box<dyn SeedSelector>) -> Self {
        self.selector = selector;
        self
    }

    /// Produce exactly `count` newly accepted values, in acceptance order.
    pub fn generate(&mut self, count: usize) -> Result<Vec<Value>, GenerateError> {
        let mut accepted = Vec::with_capacity(count);
        if count == 0 {
            return Ok(accepted);
        }
        if self.corpus.is_empty() {
            return Err(GenerateError::EmptyCorpus);
        }

        let mut failures: u64 = 0;
        while accepted.len() < count {
            match self.attempt() {
                Attempt::Accepted(value) => {
                    accepted.push(value);
                    failures = 0;
                }
                Attempt::Duplicate | Attempt::Rejected | Attempt::Degenerate => {
                    failures += 1;
                    if self.config.max_attempts.is_some_and(|max| failures >= max) {
                        debug!(
                            attempts = failures,
                            accepted = accepted.len(),
                            "attempt budget exhausted"
                        );
                        return Err(GenerateError::DegenerateSeed {
                            attempts: failures,
                            accepted,
                        });
                    }
                }
            }
        }
        Ok(accepted)
    }

    fn attempt(&mut self) -> Attempt {
        self.stats.iterations += 1;

        let Some(idx) = self.selector.select(&self.corpus, &mut self.rng) else {
            return Attempt::Degenerate;
        };
        let Some(seed) = self.corpus.get(idx) else {
            return Attempt::Degenerate;
        };

        let mutator = Mutator::new(&self.ingredients, &self.config.policy);
        let steps = self.rng.gen_range(1..=self.config.max_multi_step);
        let mut candidate = seed.clone();
        for _ in 0..steps {
            match mutator.mutate(&candidate, self.config.mutate_retry_limit, &mut self.rng) {
                Ok(next) => candidate = next,
                Err(e) => {
                    self.stats.degenerate += 1;
                    debug!(seed_index = idx, error = %e, "degenerate seed");
                    return Attempt::Degenerate;
                }
            }
        }

        let digest = canonical_hash(&candidate);
        if self.corpus.contains_hash(&digest) {
            self.stats.duplicates += 1;
            debug!(hash = %digest.short(), "duplicate candidate");
            return Attempt::Duplicate;
        }

        self.stats.oracle_calls += 1;
        match self
            .oracle
            .execute(&self.contract_code, &candidate, &self.signature)
        {
            Outcome::Returned(_) => {
                let harvested = self.ingredients.harvest(&candidate);
                self.corpus.insert_hashed(candidate.clone(), digest);
                self.stats.accepted += 1;
                info!(
                    hash = %digest.short(),
                    steps,
                    harvested,
                    corpus = self.corpus.len(),
                    "accepted {candidate}"
                );
                Attempt::Accepted(candidate)
            }
            Outcome::Timeout => {
                self.stats.timeouts += 1;
                debug!(hash = %digest.short(), "rejected: timeout");
                Attempt::Rejected
            }
            Outcome::Exception(message) => {
                self.stats.exceptions += 1;
                debug!(hash = %digest.short(), %message, "rejected: exception");
                Attempt::Rejected
            }
        }
    }

    /// The seed actually used for this generator's RNG.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn contract_code(&self) -> &str {
        &self.contract_code
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn corpus(&self) -> &SeedCorpus {
        &self.corpus
    }

    pub fn ingredients(&self) -> &IngredientStore {
        &self.ingredients
    }

    pub fn stats(&self) -> &GenerationStats {
        &self.stats
    }

    pub fn selector_name(&self) -> &str {
        self.selector.name()
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn oracle_mut(&mut self) -> &mut O {
        &mut self.oracle
    }

    pub fn into_oracle(self) -> O {
        self.oracle
    }
}
