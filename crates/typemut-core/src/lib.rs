pub mod campaign;
pub mod config;
pub mod limits;
pub mod seeds;

pub use campaign::{run_campaign, run_campaign_with, CampaignError, CampaignReport};
pub use config::CampaignConfig;
pub use limits::StopReason;
pub use seeds::{SeedFile, SeedFormat};
