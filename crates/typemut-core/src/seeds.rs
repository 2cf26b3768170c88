//! Seed files: the target's signature and code plus the initial inputs.

use std::path::Path;

use serde::{Deserialize, Serialize};
use typemut_ir::json::ValueError;
use typemut_ir::types::Value;

/// Encoding of the `inputs` array.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedFormat {
    /// Ordinary JSON; arrays become sequences, objects become mappings.
    #[default]
    Plain,
    /// `{"kind": ..., "value": ...}` documents; needed for tuples, sets and
    /// mappings with non-string keys.
    Tagged,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedFile {
    pub signature: String,
    #[serde(default)]
    pub contract_code: String,
    pub inputs: Vec<serde_json::Value>,
    #[serde(default)]
    pub format: SeedFormat,
}

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed seed file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("seed input #{index}: {source}")]
    Input {
        index: usize,
        #[source]
        source: ValueError,
    },
}

impl SeedFile {
    pub fn parse(json: &str) -> Result<Self, SeedError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, SeedError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Decode every input according to `format`.
    pub fn values(&self) -> Result<Vec<Value>, SeedError> {
        self.inputs
            .iter()
            .enumerate()
            .map(|(index, json)| {
                let decoded = match self.format {
                    SeedFormat::Plain => Value::from_json(json),
                    SeedFormat::Tagged => Value::from_tagged_json(json),
                };
                decoded.map_err(|source| SeedError::Input { index, source })
            })
            .collect()
    }
}
