use rand::Rng;
use typemut_ir::types::{Kind, Value};

use crate::ingredient::IngredientStore;

/// Probabilistic "use an ingredient instead" policy.
///
/// With probability `probability`, and only when the pool for `kind` is
/// non-empty, the gate returns a uniformly random ingredient; otherwise it
/// runs the fallback rule. Gates compose by nesting one inside another's
/// fallback.
#[derive(Debug, Clone, Copy)]
pub struct IngredientGate {
    probability: f64,
}

impl IngredientGate {
    pub fn new(probability: f64) -> Self {
        Self { probability }
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    pub fn apply<R, F>(&self, kind: Kind, store: &IngredientStore, rng: &mut R, fallback: F) -> Value
    where
        R: Rng + ?Sized,
        F: FnOnce(&mut R) -> Value,
    {
        // The coin is flipped before the pool is inspected.
        if rng.gen::<f64>() < self.probability && store.has(kind) {
            if let Some(ingredient) = store.sample(kind, rng) {
                return ingredient.clone();
            }
        }
        fallback(rng)
    }
}
