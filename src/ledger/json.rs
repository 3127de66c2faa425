use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, info};

use super::Ledger;
use crate::models::{JokeRecord, PostReceipt};

/// JSON file-based ledger for local curation and dry runs
pub struct JsonLedger {
    path: PathBuf,
}

impl JsonLedger {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        info!(path = %path.display(), "Using JSON file ledger");
        Self { path }
    }

    fn read_all(&self) -> Result<Vec<JokeRecord>> {
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read ledger file: {}", self.path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse ledger file: {}", self.path.display()))
    }

    fn write_all(&self, records: &[JokeRecord]) -> Result<()> {
        let content = serde_json::to_string_pretty(records)?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write ledger file: {}", self.path.display()))
    }
}

#[async_trait]
impl Ledger for JsonLedger {
    async fn load_records(&self) -> Result<Vec<JokeRecord>> {
        let records = self.read_all()?;
        debug!(count = records.len(), "Loaded ledger records");
        Ok(records)
    }

    async fn mark_posted(&self, position: usize, receipt: &PostReceipt) -> Result<()> {
        let mut records = self.read_all()?;

        let record = position
            .checked_sub(1)
            .and_then(|i| records.get_mut(i))
            .with_context(|| format!("Ledger position {} out of range", position))?;

        record.posted = true;
        record.posted_date = Some(receipt.posted_on);
        record.post_id = Some(receipt.post_id.clone());

        self.write_all(&records)?;

        debug!(position, post_id = %receipt.post_id, "Marked record as posted");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn seed(path: &Path, records: &[JokeRecord]) {
        fs::write(path, serde_json::to_string_pretty(records).unwrap()).unwrap();
    }

    fn sample() -> Vec<JokeRecord> {
        vec![
            JokeRecord::new("Why did the KPI cross the road?", "Corporate Wit"),
            JokeRecord::new("There are 10 kinds of people", "Playful Nerd"),
            JokeRecord::new("Hi hungry, I'm dad", "Dad-Joke"),
        ]
    }

    #[tokio::test]
    async fn test_load_records() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        seed(&path, &sample());

        let ledger = JsonLedger::new(&path);
        let records = ledger.load_records().await.unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[1].style, "Playful Nerd");
        assert!(!records[1].posted);
    }

    #[tokio::test]
    async fn test_mark_posted_touches_only_one_record() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        seed(&path, &sample());

        let ledger = JsonLedger::new(&path);
        let receipt = PostReceipt {
            post_id: "urn:li:share:42".to_string(),
            posted_on: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        };
        ledger.mark_posted(2, &receipt).await.unwrap();

        let records = ledger.load_records().await.unwrap();
        assert!(records[1].posted);
        assert_eq!(records[1].post_id.as_deref(), Some("urn:li:share:42"));
        assert_eq!(records[1].posted_date, Some(receipt.posted_on));

        // Neighbours untouched, text untouched
        assert_eq!(records[0], sample()[0]);
        assert_eq!(records[2], sample()[2]);
        assert_eq!(records[1].joke, sample()[1].joke);
    }

    #[tokio::test]
    async fn test_mark_posted_out_of_range() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        seed(&path, &sample());

        let ledger = JsonLedger::new(&path);
        let receipt = PostReceipt {
            post_id: "x".to_string(),
            posted_on: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        };

        assert!(ledger.mark_posted(0, &receipt).await.is_err());
        assert!(ledger.mark_posted(4, &receipt).await.is_err());
    }
}
