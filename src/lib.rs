pub mod config;
pub mod doodle;
pub mod ledger;
pub mod linkedin;
pub mod models;
pub mod orchestrator;
pub mod rotation;

pub use config::Config;
pub use doodle::DoodleClient;
pub use ledger::{JsonLedger, Ledger, SheetsLedger};
pub use linkedin::{refresh_access_token, LinkedInClient};
pub use models::*;
pub use orchestrator::Orchestrator;
pub use rotation::{last_posted_style, next_style, select, NoCandidate};
