pub mod canonical;
pub mod json;
pub mod types;

pub use canonical::{canonical_hash, Digest};
pub use json::ValueError;
pub use types::{Kind, Mapping, Value};
