use rand::{Rng, RngCore};

use crate::corpus::SeedCorpus;

/// Chooses which corpus entry the next candidate is derived from.
pub trait SeedSelector {
    /// Index into `corpus`, or `None` when the corpus is empty.
    fn select(&mut self, corpus: &SeedCorpus, rng: &mut dyn RngCore) -> Option<usize>;

    /// Name of this selector (for tracing).
    fn name(&self) -> &str;
}

/// Uniform choice over the whole corpus.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformSelector;

impl SeedSelector for UniformSelector {
    fn select(&mut self, corpus: &SeedCorpus, rng: &mut dyn RngCore) -> Option<usize> {
        if corpus.is_empty() {
            return None;
        }
        Some(rng.gen_range(0..corpus.len()))
    }

    fn name(&self) -> &str {
        "uniform"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::generator_rng;
    use typemut_ir::types::Value;

    #[test]
    fn test_empty_corpus_selects_nothing() {
        let mut rng = generator_rng(0);
        assert_eq!(UniformSelector.select(&SeedCorpus::new(), &mut rng), None);
    }

    #[test]
    fn test_uniform_reaches_every_entry() {
        let corpus = SeedCorpus::from_inputs((0..4).map(Value::Integer));
        let mut rng = generator_rng(1);
        let mut hits = [0usize; 4];
        for _ in 0..400 {
            let idx = UniformSelector.select(&corpus, &mut rng).unwrap();
            hits[idx] += 1;
        }
        assert!(hits.iter().all(|&h| h > 50), "hits = {hits:?}");
    }
}
