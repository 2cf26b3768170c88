use std::fs;

use typemut_core::{
    run_campaign, run_campaign_with, CampaignConfig, CampaignError, SeedFile, StopReason,
};
use typemut_explore::config::GeneratorConfig;
use typemut_explore::oracle::Outcome;
use typemut_ir::types::Value;
use typemut_sandbox::config::ProcessOracleConfig;

const SUM_SEEDS: &str = r#"{
    "signature": "def total(xs: list[int]) -> int",
    "contract_code": "def total(xs): return sum(xs)",
    "inputs": [[1, 2, 3]]
}"#;

fn seeded_config(count: usize) -> CampaignConfig {
    CampaignConfig {
        generator: GeneratorConfig::seeded(17),
        count,
        ..CampaignConfig::default()
    }
}

#[test]
fn test_seed_file_round_trip_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("seeds.json");
    fs::write(&path, SUM_SEEDS).unwrap();

    let seeds = SeedFile::load(&path).unwrap();
    assert_eq!(seeds.values().unwrap(), vec![Value::from(vec![1i64, 2, 3])]);
}

#[test]
fn test_config_file_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("campaign.json");
    fs::write(&path, r#"{ "count": 7, "tagged_output": true }"#).unwrap();

    let config = CampaignConfig::load(&path).unwrap();
    assert_eq!(config.count, 7);
    assert!(config.tagged_output);

    fs::write(&path, "{ not json").unwrap();
    assert!(matches!(CampaignConfig::load(&path), Err(CampaignError::Config(_))));
}

#[test]
fn test_campaign_writes_json_lines() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.jsonl");
    let config = CampaignConfig {
        output: Some(out.clone()),
        ..seeded_config(6)
    };
    let seeds = SeedFile::parse(SUM_SEEDS).unwrap();
    let oracle = |_: &str, _: &Value, _: &str| Outcome::Returned(serde_json::Value::Null);

    let report = run_campaign_with(&seeds, &config, oracle).unwrap();
    assert_eq!(report.stop_reason, StopReason::Complete);

    let text = fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 6);
    for (line, value) in lines.iter().zip(&report.generated) {
        let parsed = typemut_ir::json::parse_plain(line).unwrap();
        assert_eq!(&parsed, value);
    }
}

#[test]
fn test_rejecting_oracle_degrades_gracefully() {
    let seeds = SeedFile::parse(SUM_SEEDS).unwrap();
    let config = CampaignConfig {
        generator: GeneratorConfig {
            max_attempts: Some(30),
            ..GeneratorConfig::seeded(1)
        },
        count: 5,
        ..CampaignConfig::default()
    };
    let oracle = |_: &str, _: &Value, _: &str| Outcome::Exception("nope".to_string());

    let report = run_campaign_with(&seeds, &config, oracle).unwrap();
    assert_eq!(report.stop_reason, StopReason::DegenerateSeed);
    assert!(report.generated.is_empty());
    assert!(report.stats.exceptions > 0);
}

#[test]
fn test_bad_seed_input_is_error() {
    let seeds = SeedFile::parse(r#"{ "signature": "f(x)", "inputs": [null] }"#).unwrap();
    let oracle = |_: &str, _: &Value, _: &str| Outcome::Timeout;
    let err = run_campaign_with(&seeds, &seeded_config(1), oracle).unwrap_err();
    assert!(matches!(err, CampaignError::Seeds(_)), "{err}");
}

#[test]
fn test_missing_program_is_error() {
    let seeds = SeedFile::parse(SUM_SEEDS).unwrap();
    let err = run_campaign(&seeds, &seeded_config(1)).unwrap_err();
    assert!(matches!(err, CampaignError::Oracle(_)), "{err}");
}

#[cfg(unix)]
#[test]
fn test_campaign_against_shell_target() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.jsonl");
    let config = CampaignConfig {
        oracle: ProcessOracleConfig::command("sh", ["-c", "cat > /dev/null; echo 0"]),
        output: Some(out.clone()),
        tagged_output: true,
        ..seeded_config(3)
    };
    let seeds = SeedFile::parse(SUM_SEEDS).unwrap();

    let report = run_campaign(&seeds, &config).unwrap();
    assert_eq!(report.generated.len(), 3);
    assert_eq!(report.stats.oracle_calls, 3 + report.stats.exceptions + report.stats.timeouts);

    let text = fs::read_to_string(&out).unwrap();
    for line in text.lines() {
        let value = typemut_ir::json::parse_tagged(line).unwrap();
        assert!(matches!(value, Value::Sequence(_)));
    }
}
