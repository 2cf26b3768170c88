//! Accepted inputs plus a canonical-hash index.
//!
//! The corpus only grows: entries are never removed or reordered, and
//! every value in `pool` has its digest in `index`. Only the initial
//! inputs may repeat; accepted values are unique by digest.

use std::collections::HashSet;

use typemut_ir::canonical::{canonical_hash, Digest};
use typemut_ir::types::Value;

#[derive(Debug, Clone, Default)]
pub struct SeedCorpus {
    pool: Vec<Value>,
    index: HashSet<Digest>,
}

impl SeedCorpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a corpus from initial inputs. Every input is kept, so a seed
    /// repeated in the inputs is selected proportionally more often; the
    /// index holds its digest once.
    pub fn from_inputs(inputs: impl IntoIterator<Item = Value>) -> Self {
        let mut corpus = Self::new();
        for input in inputs {
            corpus.index.insert(canonical_hash(&input));
            corpus.pool.push(input);
        }
        corpus
    }

    /// Insert `value` unless its content is already present.
    /// Returns the digest when the value was added.
    pub fn insert(&mut self, value: Value) -> Option<Digest> {
        let digest = canonical_hash(&value);
        self.insert_hashed(value, digest).then_some(digest)
    }

    /// Insert with a digest the caller already computed for `value`.
    pub fn insert_hashed(&mut self, value: Value, digest: Digest) -> bool {
        if !self.index.insert(digest) {
            return false;
        }
        self.pool.push(value);
        true
    }

    pub fn contains_hash(&self, digest: &Digest) -> bool {
        self.index.contains(digest)
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.contains_hash(&canonical_hash(value))
    }

    pub fn get(&self, idx: usize) -> Option<&Value> {
        self.pool.get(idx)
    }

    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    /// Entries in acceptance order.
    pub fn values(&self) -> &[Value] {
        &self.pool
    }
}
