//! Type-directed mutation.
//!
//! [`Mutator::mutate_once`] applies one kind-specific rule and may return a
//! value equal to its input (a Boolean flipping to itself, an integer delta
//! of zero, an ingredient equal to the seed). [`Mutator::mutate`] keeps
//! applying single steps to the working copy until it differs from the
//! seed, bounded by a retry limit.

pub mod collection;
pub mod gate;
pub mod scalar;
pub mod string;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;
use typemut_ir::types::{Kind, Value};

use crate::ingredient::IngredientStore;

pub use gate::IngredientGate;

/// Upper bound for any ingredient gate probability.
pub const MAX_GATE_PROBABILITY: f64 = 0.95;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MutateError {
    #[error("{kind} seed did not change after {retries} mutation attempts")]
    DegenerateSeed { kind: Kind, retries: usize },
}

/// Ingredient gate probabilities per kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MutationPolicy {
    /// Outer and inner gate for integers (applied twice, independently).
    pub integer_ingredient_prob: f64,
    /// Single gate for floats.
    pub float_ingredient_prob: f64,
    /// Gate for inserting an ingredient into a string.
    pub string_ingredient_prob: f64,
}

impl Default for MutationPolicy {
    fn default() -> Self {
        Self {
            integer_ingredient_prob: 0.5,
            float_ingredient_prob: 0.5,
            string_ingredient_prob: 0.2,
        }
    }
}

impl MutationPolicy {
    /// Returns the name and value of the first probability outside
    /// `[0, MAX_GATE_PROBABILITY]`.
    pub fn out_of_range(&self) -> Option<(&'static str, f64)> {
        [
            ("integer_ingredient_prob", self.integer_ingredient_prob),
            ("float_ingredient_prob", self.float_ingredient_prob),
            ("string_ingredient_prob", self.string_ingredient_prob),
        ]
        .into_iter()
        .find(|(_, p)| !(0.0..=MAX_GATE_PROBABILITY).contains(p))
    }
}

/// Mutation rules bound to an ingredient store and a policy.
pub struct Mutator<'a> {
    ingredients: &'a IngredientStore,
    policy: &'a MutationPolicy,
}

impl<'a> Mutator<'a> {
    pub fn new(ingredients: &'a IngredientStore, policy: &'a MutationPolicy) -> Self {
        Self { ingredients, policy }
    }

    /// Produce a value of the same kind that differs from `seed`.
    ///
    /// The seed is never modified; mutation works on an owned copy.
    pub fn mutate<R: Rng + ?Sized>(
        &self,
        seed: &Value,
        retry_limit: usize,
        rng: &mut R,
    ) -> Result<Value, MutateError> {
        let mut candidate = seed.clone();
        for attempt in 0..retry_limit {
            candidate = self.mutate_once(candidate, rng);
            if candidate != *seed {
                trace!(kind = %seed.kind(), attempt, "mutated");
                return Ok(candidate);
            }
        }
        Err(MutateError::DegenerateSeed {
            kind: seed.kind(),
            retries: retry_limit,
        })
    }

    /// Apply one kind-specific rule. The result may equal the input.
    pub fn mutate_once<R: Rng + ?Sized>(&self, value: Value, rng: &mut R) -> Value {
        match value {
            Value::Integer(v) => self.mutate_integer(v, rng),
            Value::Float(v) => self.mutate_float(v, rng),
            Value::Boolean(_) => Value::Boolean(rng.gen_bool(0.5)),
            Value::String(s) => Value::String(self.mutate_string(s, rng)),
            Value::Sequence(items) => Value::Sequence(self.mutate_list_like(items, rng)),
            Value::Tuple(items) => Value::Tuple(self.mutate_list_like(items, rng)),
            Value::Set(items) => {
                let items = self.mutate_list_like(items.into_iter().collect(), rng);
                Value::set_from(items)
            }
            Value::Mapping(map) => Value::Mapping(self.mutate_mapping(map, rng)),
        }
    }
}
