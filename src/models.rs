use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single row of the joke ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JokeRecord {
    pub joke: String,
    pub style: String,
    #[serde(default)]
    pub posted: bool,
    #[serde(default)]
    pub posted_date: Option<NaiveDate>,
    #[serde(default)]
    pub post_id: Option<String>,
}

impl JokeRecord {
    pub fn new(joke: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            joke: joke.into(),
            style: style.into(),
            posted: false,
            posted_date: None,
            post_id: None,
        }
    }
}

/// The candidate chosen by the rotation selector
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub style: String,
    /// 1-based position in the ledger, used for the targeted write-back
    pub position: usize,
    pub record: JokeRecord,
}

/// Write-back payload for a successfully published joke
#[derive(Debug, Clone, PartialEq)]
pub struct PostReceipt {
    pub post_id: String,
    pub posted_on: NaiveDate,
}

/// Result of a single pipeline invocation
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// A joke was published and the ledger updated
    Posted {
        style: String,
        position: usize,
        post_id: String,
    },
    /// Dry run: the candidate was selected but nothing was sent
    WouldPost { style: String, position: usize },
    /// No unposted joke exists for the style that is due
    NothingToDo { style: String },
}
