pub mod config;
pub mod process;

pub use config::ProcessOracleConfig;
pub use process::{OracleError, ProcessOracle, RunOutcome};
