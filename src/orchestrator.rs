use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{error, info, warn};

use crate::doodle::DoodleClient;
use crate::ledger::Ledger;
use crate::linkedin::LinkedInClient;
use crate::models::{PostReceipt, RunOutcome};
use crate::rotation::select;

/// Drives one invocation of the posting pipeline:
/// load ledger → select → (optional) doodle → publish → write back.
pub struct Orchestrator<L: Ledger> {
    ledger: L,
    linkedin: LinkedInClient,
    doodle: Option<DoodleClient>,
    styles: Vec<String>,
}

impl<L: Ledger> Orchestrator<L> {
    pub fn new(
        ledger: L,
        linkedin: LinkedInClient,
        doodle: Option<DoodleClient>,
        styles: Vec<String>,
    ) -> Self {
        Self {
            ledger,
            linkedin,
            doodle,
            styles,
        }
    }

    /// Run the pipeline once. At most one record is posted per run; a run
    /// with nothing to post is a normal outcome, not an error.
    pub async fn run(&self, dry_run: bool) -> Result<RunOutcome> {
        info!("Starting posting pipeline");

        let records = self.ledger.load_records().await?;
        info!(count = records.len(), "Loaded joke ledger");

        let selection = match select(&records, &self.styles) {
            Ok(selection) => selection,
            Err(no_candidate) => {
                info!(style = %no_candidate.style, "No unposted joke for the style that is due");
                return Ok(RunOutcome::NothingToDo {
                    style: no_candidate.style,
                });
            }
        };

        info!(
            style = %selection.style,
            position = selection.position,
            "Selected next joke"
        );

        if dry_run {
            info!(joke = %selection.record.joke, "Dry run, not posting");
            return Ok(RunOutcome::WouldPost {
                style: selection.style,
                position: selection.position,
            });
        }

        // Image generation is best-effort; never blocks the post
        let image = match &self.doodle {
            Some(doodle) => match doodle.generate(&selection.record.joke).await {
                Ok(bytes) => Some(bytes),
                Err(e) => {
                    warn!(error = %e, "Doodle generation failed, posting text-only");
                    None
                }
            },
            None => None,
        };

        let post_id = self
            .linkedin
            .publish(&selection.record.joke, image.as_deref())
            .await?;

        let receipt = PostReceipt {
            post_id: post_id.clone(),
            posted_on: Utc::now().date_naive(),
        };

        if let Err(e) = self.ledger.mark_posted(selection.position, &receipt).await {
            // The post is already live; an un-updated ledger means this row
            // can be picked again on the next run.
            error!(
                post_id = %receipt.post_id,
                position = selection.position,
                error = %e,
                "Ledger write-back failed after a successful publish; \
                 duplicate post possible on the next run"
            );
            return Err(e).context("Ledger write-back failed after publish");
        }

        info!(
            style = %selection.style,
            post_id = %receipt.post_id,
            "Joke posted and ledger updated"
        );

        Ok(RunOutcome::Posted {
            style: selection.style,
            position: selection.position,
            post_id,
        })
    }

    /// Direct access to the ledger
    pub fn ledger(&self) -> &L {
        &self.ledger
    }
}
