pub mod json;
pub mod sheets;

pub use json::JsonLedger;
pub use sheets::SheetsLedger;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{JokeRecord, PostReceipt};

/// Trait for joke ledger backends
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Load all records in ledger order
    async fn load_records(&self) -> Result<Vec<JokeRecord>>;

    /// Mark the record at the given 1-based position as posted, writing the
    /// posted flag, date and post id. Must touch nothing else.
    async fn mark_posted(&self, position: usize, receipt: &PostReceipt) -> Result<()>;
}
