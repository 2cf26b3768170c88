//! Canonical content hashing for corpus deduplication.
//!
//! The digest depends only on a value's content: sequences, tuples and
//! mappings hash in element order, sets hash in their sorted order so
//! insertion order never matters. Each node is prefixed with a kind tag
//! and each container with its length, so `[1, 2]` and `(1, 2)` differ and
//! nesting boundaries are unambiguous.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};

use crate::types::Value;

/// SHA-256 digest of a value's canonical encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Digest(pub [u8; 32]);

impl Digest {
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// First eight hex characters, for log lines.
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

const TAG_INTEGER: u8 = 0x01;
const TAG_FLOAT: u8 = 0x02;
const TAG_BOOLEAN: u8 = 0x03;
const TAG_STRING: u8 = 0x04;
const TAG_SEQUENCE: u8 = 0x05;
const TAG_TUPLE: u8 = 0x06;
const TAG_SET: u8 = 0x07;
const TAG_MAPPING: u8 = 0x08;

/// Compute the canonical hash of `value`.
pub fn canonical_hash(value: &Value) -> Digest {
    let mut hasher = Sha256::new();
    encode(value, &mut hasher);
    Digest(hasher.finalize().into())
}

fn encode_len(len: usize, hasher: &mut Sha256) {
    hasher.update((len as u64).to_le_bytes());
}

fn encode(value: &Value, hasher: &mut Sha256) {
    match value {
        Value::Integer(v) => {
            hasher.update([TAG_INTEGER]);
            hasher.update(v.to_le_bytes());
        }
        Value::Float(v) => {
            hasher.update([TAG_FLOAT]);
            hasher.update(v.to_bits().to_le_bytes());
        }
        Value::Boolean(v) => {
            hasher.update([TAG_BOOLEAN, u8::from(*v)]);
        }
        Value::String(s) => {
            hasher.update([TAG_STRING]);
            encode_len(s.len(), hasher);
            hasher.update(s.as_bytes());
        }
        Value::Sequence(items) => {
            hasher.update([TAG_SEQUENCE]);
            encode_len(items.len(), hasher);
            items.iter().for_each(|item| encode(item, hasher));
        }
        Value::Tuple(items) => {
            hasher.update([TAG_TUPLE]);
            encode_len(items.len(), hasher);
            items.iter().for_each(|item| encode(item, hasher));
        }
        Value::Set(items) => {
            // BTreeSet iterates in sorted order regardless of insertion order.
            hasher.update([TAG_SET]);
            encode_len(items.len(), hasher);
            items.iter().for_each(|item| encode(item, hasher));
        }
        Value::Mapping(map) => {
            hasher.update([TAG_MAPPING]);
            encode_len(map.len(), hasher);
            for (k, v) in map.iter() {
                encode(k, hasher);
                encode(v, hasher);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_deterministic() {
        let v = Value::from(vec![1i64, 2, 3]);
        assert_eq!(canonical_hash(&v), canonical_hash(&v.clone()));
    }

    #[test]
    fn test_digest_hex_roundtrip_length() {
        let d = canonical_hash(&Value::Integer(7));
        assert_eq!(d.to_hex().len(), 64);
        assert_eq!(d.short().len(), 8);
        assert!(d.to_hex().starts_with(&d.short()));
    }

    #[test]
    fn test_nesting_boundaries_differ() {
        // [[1], 2] vs [[1, 2]]
        let a = Value::Sequence(vec![Value::from(vec![1i64]), Value::Integer(2)]);
        let b = Value::Sequence(vec![Value::from(vec![1i64, 2])]);
        assert_ne!(canonical_hash(&a), canonical_hash(&b));
    }
}
