use std::io::{self, BufWriter};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::FmtSubscriber;
use typemut_core::{run_campaign, CampaignConfig, SeedFile};

/// Expand a seed corpus of function inputs by type-aware mutation.
///
/// Each candidate is written as JSON to the stdin of `<program> [args...]`;
/// a zero exit status within the timeout accepts it. Accepted values are
/// printed as JSON lines.
#[derive(Parser, Debug)]
#[command(name = "typemut", version, about)]
struct Args {
    /// Seed file: {"signature", "contract_code", "inputs", "format"}
    #[arg(long)]
    seeds: PathBuf,

    /// Number of new values to generate (overrides the config file)
    #[arg(long)]
    count: Option<usize>,

    /// Campaign config JSON
    #[arg(long)]
    config: Option<PathBuf>,

    /// RNG seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Per-candidate wall-clock budget in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Write JSON lines here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Emit values in the tagged {"kind", "value"} form
    #[arg(long, default_value_t = false)]
    tagged: bool,

    /// Target program and its arguments
    #[arg(last = true)]
    command: Vec<String>,
}

impl Args {
    fn campaign_config(&self) -> Result<CampaignConfig> {
        let mut config = match &self.config {
            Some(path) => CampaignConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => CampaignConfig::default(),
        };
        if let Some((program, args)) = self.command.split_first() {
            config.oracle.program = program.clone();
            config.oracle.args = args.to_vec();
        }
        if let Some(count) = self.count {
            config.count = count;
        }
        if let Some(seed) = self.seed {
            config.generator.seed = Some(seed);
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.oracle.timeout_ms = timeout_ms;
        }
        if let Some(output) = &self.output {
            config.output = Some(output.clone());
        }
        config.tagged_output |= self.tagged;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();
    let config = args.campaign_config()?;
    if config.oracle.program.is_empty() {
        bail!("no target program: pass it after `--` or set oracle.program in the config");
    }

    let seeds = SeedFile::load(&args.seeds)
        .with_context(|| format!("loading seeds {}", args.seeds.display()))?;
    let report = run_campaign(&seeds, &config)?;

    if config.output.is_none() {
        report.write_json_lines(BufWriter::new(io::stdout().lock()), config.tagged_output)?;
    }

    let summary = serde_json::json!({
        "seed": report.seed,
        "generated": report.generated.len(),
        "stop_reason": report.stop_reason,
        "stats": report.stats,
        "elapsed_secs": report.elapsed_secs,
    });
    eprintln!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
