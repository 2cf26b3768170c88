use rand::seq::SliceRandom;
use rand::Rng;
use typemut_ir::types::{Kind, Value};

use super::Mutator;

const ASCII_LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

impl Mutator<'_> {
    /// String rule. Positions are char indices, never byte offsets.
    pub(crate) fn mutate_string<R: Rng + ?Sized>(&self, seed: String, rng: &mut R) -> String {
        let pool_ready = self.ingredients.has(Kind::String);
        let mut chars: Vec<char> = seed.chars().collect();

        if rng.gen::<f64>() < self.policy.string_ingredient_prob && pool_ready {
            return self.insert_ingredient(chars, rng);
        }

        // An empty string has nothing to edit and always grows by one letter.
        let choice = if chars.is_empty() { 3 } else { rng.gen_range(0..=2) };
        match choice {
            0 if pool_ready => self.insert_ingredient(chars, rng),
            1 => {
                let start = rng.gen_range(0..chars.len());
                let end = rng.gen_range(start + 1..=chars.len());
                let middle: String = if rng.gen_bool(0.5) {
                    String::new()
                } else {
                    let sub: String = chars[start..end].iter().collect();
                    self.mutate_string(sub, rng)
                };
                chars.splice(start..end, middle.chars());
                chars.into_iter().collect()
            }
            2 => {
                let at = rng.gen_range(0..chars.len());
                let repeated = chars[rng.gen_range(0..chars.len())];
                chars.insert(at, repeated);
                chars.into_iter().collect()
            }
            _ => {
                let letter = ASCII_LETTERS.choose(rng).copied().unwrap_or(b'a');
                chars.push(char::from(letter));
                chars.into_iter().collect()
            }
        }
    }

    fn insert_ingredient<R: Rng + ?Sized>(&self, mut chars: Vec<char>, rng: &mut R) -> String {
        let at = rng.gen_range(0..=chars.len());
        if let Some(Value::String(ingredient)) = self.ingredients.sample(Kind::String, rng) {
            chars.splice(at..at, ingredient.chars());
        }
        chars.into_iter().collect()
    }
}
