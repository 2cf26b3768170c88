use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use serde::Serialize;
use tracing::{info, warn};
use typemut_explore::generate::{GenerateError, GenerationStats, TypedMutGen};
use typemut_explore::oracle::Oracle;
use typemut_ir::types::Value;
use typemut_sandbox::process::{OracleError, ProcessOracle};

use crate::config::CampaignConfig;
use crate::limits::StopReason;
use crate::seeds::{SeedError, SeedFile};

#[derive(Debug, thiserror::Error)]
pub enum CampaignError {
    #[error("seed error: {0}")]
    Seeds(#[from] SeedError),

    #[error("generation error: {0}")]
    Generate(#[from] GenerateError),

    #[error("oracle setup error: {0}")]
    Oracle(#[from] OracleError),

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of one campaign. Partial when `stop_reason` is not `Complete`.
#[derive(Debug, Clone, Serialize)]
pub struct CampaignReport {
    /// RNG seed used; pass it back through the config to replay the run.
    pub seed: u64,
    pub generated: Vec<Value>,
    pub stats: GenerationStats,
    pub stop_reason: StopReason,
    pub elapsed_secs: f64,
}

impl CampaignReport {
    /// One JSON document per generated value, newline-terminated.
    pub fn write_json_lines<W: Write>(&self, mut out: W, tagged: bool) -> Result<(), CampaignError> {
        for value in &self.generated {
            let json = if tagged {
                value.to_tagged_json()
            } else {
                value.to_json()
            };
            serde_json::to_writer(&mut out, &json)?;
            out.write_all(b"\n")?;
        }
        out.flush()?;
        Ok(())
    }

    pub fn write_json_lines_to(&self, path: &Path, tagged: bool) -> Result<(), CampaignError> {
        let file = File::create(path)?;
        self.write_json_lines(BufWriter::new(file), tagged)
    }
}

/// Run a campaign against the configured target program.
pub fn run_campaign(seeds: &SeedFile, config: &CampaignConfig) -> Result<CampaignReport, CampaignError> {
    let oracle = ProcessOracle::new(&config.oracle)?;
    run_campaign_with(seeds, config, oracle)
}

/// Run a campaign with a caller-supplied oracle.
///
/// Writes the generated values to `config.output` when set. A degenerate
/// corpus yields a report with `StopReason::DegenerateSeed` holding
/// whatever was accepted before the budget ran out.
pub fn run_campaign_with<O: Oracle>(
    seeds: &SeedFile,
    config: &CampaignConfig,
    oracle: O,
) -> Result<CampaignReport, CampaignError> {
    let inputs = seeds.values()?;
    let started = Instant::now();
    let mut gen = TypedMutGen::new(
        inputs,
        seeds.signature.as_str(),
        seeds.contract_code.as_str(),
        oracle,
        config.generator.clone(),
    )?;

    let (generated, stop_reason) = match gen.generate(config.count) {
        Ok(values) => (values, StopReason::Complete),
        Err(GenerateError::DegenerateSeed { attempts, accepted }) => {
            warn!(
                attempts,
                accepted = accepted.len(),
                requested = config.count,
                "corpus stopped producing novel values"
            );
            (accepted, StopReason::DegenerateSeed)
        }
        Err(e) => return Err(e.into()),
    };

    let report = CampaignReport {
        seed: gen.seed(),
        generated,
        stats: gen.stats().clone(),
        stop_reason,
        elapsed_secs: started.elapsed().as_secs_f64(),
    };

    if let Some(path) = &config.output {
        report.write_json_lines_to(path, config.tagged_output)?;
    }

    info!(
        seed = report.seed,
        generated = report.generated.len(),
        oracle_calls = report.stats.oracle_calls,
        duplicates = report.stats.duplicates,
        stop_reason = %report.stop_reason,
        elapsed_secs = report.elapsed_secs,
        "campaign finished"
    );
    Ok(report)
}
