//! Kind-indexed pool of harvested scalar values.
//!
//! Composite values are decomposed on the way in: only Integer, Float and
//! String leaves are ever stored. Each pool keeps its values in
//! first-observed order so seeded sampling is reproducible.

use std::collections::HashSet;

use rand::Rng;
use typemut_ir::types::{Kind, Value};

/// Distinct values of one scalar kind.
#[derive(Debug, Clone, Default)]
struct Pool {
    items: Vec<Value>,
    seen: HashSet<Value>,
}

impl Pool {
    fn insert(&mut self, value: &Value) -> bool {
        if self.seen.contains(value) {
            return false;
        }
        self.seen.insert(value.clone());
        self.items.push(value.clone());
        true
    }
}

/// Ingredient pools for Integer, Float and String values.
#[derive(Debug, Clone, Default)]
pub struct IngredientStore {
    integers: Pool,
    floats: Pool,
    strings: Pool,
}

impl IngredientStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store harvested from every value in `inputs`.
    pub fn from_inputs<'a>(inputs: impl IntoIterator<Item = &'a Value>) -> Self {
        let mut store = Self::new();
        for input in inputs {
            store.harvest(input);
        }
        store
    }

    fn pool(&self, kind: Kind) -> Option<&Pool> {
        match kind {
            Kind::Integer => Some(&self.integers),
            Kind::Float => Some(&self.floats),
            Kind::String => Some(&self.strings),
            Kind::Boolean | Kind::Sequence | Kind::Tuple | Kind::Set | Kind::Mapping => None,
        }
    }

    fn pool_mut(&mut self, kind: Kind) -> Option<&mut Pool> {
        match kind {
            Kind::Integer => Some(&mut self.integers),
            Kind::Float => Some(&mut self.floats),
            Kind::String => Some(&mut self.strings),
            Kind::Boolean | Kind::Sequence | Kind::Tuple | Kind::Set | Kind::Mapping => None,
        }
    }

    /// Recursively collect every scalar leaf of `value`.
    /// Returns the number of values that were not already pooled.
    pub fn harvest(&mut self, value: &Value) -> usize {
        let mut added = 0;
        value.for_each_leaf(&mut |leaf| {
            if let Some(pool) = self.pool_mut(leaf.kind()) {
                if pool.insert(leaf) {
                    added += 1;
                }
            }
        });
        added
    }

    /// True when `kind` has at least one ingredient.
    pub fn has(&self, kind: Kind) -> bool {
        self.len(kind) > 0
    }

    pub fn len(&self, kind: Kind) -> usize {
        self.pool(kind).map(|p| p.items.len()).unwrap_or(0)
    }

    /// Ingredients across all kinds.
    pub fn total_len(&self) -> usize {
        Kind::SCALARS.iter().map(|&k| self.len(k)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_len() == 0
    }

    /// Ingredients of `kind` in first-observed order. Empty for non-scalar kinds.
    pub fn values(&self, kind: Kind) -> &[Value] {
        self.pool(kind).map(|p| p.items.as_slice()).unwrap_or(&[])
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.pool(value.kind())
            .map(|p| p.seen.contains(value))
            .unwrap_or(false)
    }

    /// Uniformly random ingredient of `kind`.
    ///
    /// Callers check [`IngredientStore::has`] first; an empty or
    /// non-scalar pool yields `None`.
    pub fn sample<R: Rng + ?Sized>(&self, kind: Kind, rng: &mut R) -> Option<&Value> {
        let items = self.values(kind);
        if items.is_empty() {
            return None;
        }
        items.get(rng.gen_range(0..items.len()))
    }
}
