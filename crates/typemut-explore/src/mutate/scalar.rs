use rand::Rng;
use typemut_ir::types::{Kind, Value};

use super::{IngredientGate, Mutator};

impl Mutator<'_> {
    /// Two independent ingredient gates around a {-1, 0, +1} step.
    pub(crate) fn mutate_integer<R: Rng + ?Sized>(&self, seed: i64, rng: &mut R) -> Value {
        let gate = IngredientGate::new(self.policy.integer_ingredient_prob);
        gate.apply(Kind::Integer, self.ingredients, rng, |rng| {
            gate.apply(Kind::Integer, self.ingredients, rng, |rng| {
                Value::Integer(seed.wrapping_add(rng.gen_range(-1..=1)))
            })
        })
    }

    /// Ingredient gate around an additive offset in [-1, 1] or a scale
    /// factor in [0.5, 1.5], chosen with equal odds.
    pub(crate) fn mutate_float<R: Rng + ?Sized>(&self, seed: f64, rng: &mut R) -> Value {
        let gate = IngredientGate::new(self.policy.float_ingredient_prob);
        gate.apply(Kind::Float, self.ingredients, rng, |rng| {
            if rng.gen_bool(0.5) {
                Value::Float(seed + rng.gen_range(-1.0..=1.0))
            } else {
                Value::Float(seed * rng.gen_range(0.5..=1.5))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::ingredient::IngredientStore;
    use crate::mutate::MutationPolicy;
    use crate::rng::generator_rng;

    #[test]
    fn test_integer_without_ingredients_steps_by_one() {
        let store = IngredientStore::new();
        let policy = MutationPolicy::default();
        let mutator = Mutator::new(&store, &policy);
        let mut rng = generator_rng(1);
        for _ in 0..200 {
            let Value::Integer(v) = mutator.mutate_integer(100, &mut rng) else {
                panic!("kind changed");
            };
            assert!((99..=101).contains(&v));
        }
    }

    #[test]
    fn test_integer_wraps_at_bounds() {
        let store = IngredientStore::new();
        let policy = MutationPolicy::default();
        let mutator = Mutator::new(&store, &policy);
        let mut rng = generator_rng(2);
        let allowed = [
            Value::Integer(i64::MAX - 1),
            Value::Integer(i64::MAX),
            Value::Integer(i64::MIN),
        ];
        for _ in 0..200 {
            let v = mutator.mutate_integer(i64::MAX, &mut rng);
            assert!(allowed.contains(&v), "unexpected {v}");
        }
    }

    #[test]
    fn test_integer_two_stage_gate_frequency() {
        // Pool {5, 10}, seed 5. Per step: 10 with 0.5*0.5 + 0.25*0.5 = 0.375.
        let store = IngredientStore::from_inputs([&Value::Integer(5), &Value::Integer(10)]);
        let policy = MutationPolicy::default();
        let mutator = Mutator::new(&store, &policy);
        let mut rng = generator_rng(21);
        let mut counts: HashMap<i64, usize> = HashMap::new();
        for _ in 0..4000 {
            if let Value::Integer(v) = mutator.mutate_integer(5, &mut rng) {
                *counts.entry(v).or_default() += 1;
            }
        }
        assert!(counts.keys().all(|v| [4, 5, 6, 10].contains(v)));
        let tens = counts.get(&10).copied().unwrap_or(0);
        assert!((1350..1650).contains(&tens), "tens = {tens}");
    }

    #[test]
    fn test_float_without_ingredients_stays_in_envelope() {
        let store = IngredientStore::new();
        let policy = MutationPolicy::default();
        let mutator = Mutator::new(&store, &policy);
        let mut rng = generator_rng(4);
        for _ in 0..500 {
            let Value::Float(v) = mutator.mutate_float(10.0, &mut rng) else {
                panic!("kind changed");
            };
            // Either 10 + [-1, 1] or 10 * [0.5, 1.5].
            assert!((9.0..=11.0).contains(&v) || (5.0..=15.0).contains(&v));
        }
    }

    #[test]
    fn test_float_uses_float_ingredients_only() {
        let store = IngredientStore::from_inputs([&Value::Float(-123.0), &Value::Integer(7)]);
        let policy = MutationPolicy::default();
        let mutator = Mutator::new(&store, &policy);
        let mut rng = generator_rng(8);
        let mut hit = false;
        for _ in 0..200 {
            match mutator.mutate_float(0.0, &mut rng) {
                Value::Float(v) if v == -123.0 => hit = true,
                Value::Float(v) => assert!((-1.0..=1.0).contains(&v)),
                other => panic!("unexpected {other}"),
            }
        }
        assert!(hit);
    }
}
