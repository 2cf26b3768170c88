/// Campaign configuration: generator settings, oracle command and output.
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use typemut_explore::config::GeneratorConfig;
use typemut_sandbox::config::ProcessOracleConfig;

/// Everything a campaign needs besides the seed file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CampaignConfig {
    pub generator: GeneratorConfig,
    pub oracle: ProcessOracleConfig,
    /// Number of new values to generate (default: 10).
    pub count: usize,
    /// JSON-lines destination. None = the caller decides (the CLI uses stdout).
    pub output: Option<PathBuf>,
    /// Write values in the tagged form instead of plain JSON.
    pub tagged_output: bool,
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self {
            generator: GeneratorConfig::default(),
            oracle: ProcessOracleConfig::default(),
            count: 10,
            output: None,
            tagged_output: false,
        }
    }
}

impl CampaignConfig {
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn load(path: &Path) -> Result<Self, crate::campaign::CampaignError> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::parse(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(CampaignConfig::parse("{}").unwrap(), CampaignConfig::default());
    }

    #[test]
    fn test_nested_sections() {
        let config = CampaignConfig::parse(
            r#"{
                "count": 3,
                "generator": { "seed": 9, "max_attempts": 50 },
                "oracle": { "program": "python3", "args": ["run.py"], "timeout_ms": 250 }
            }"#,
        )
        .unwrap();
        assert_eq!(config.count, 3);
        assert_eq!(config.generator.seed, Some(9));
        assert_eq!(config.generator.max_attempts, Some(50));
        assert_eq!(config.generator.max_multi_step, 5);
        assert_eq!(config.oracle.program, "python3");
        assert_eq!(config.oracle.timeout_ms, 250);
    }
}
