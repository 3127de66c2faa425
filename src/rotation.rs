use thiserror::Error;
use tracing::debug;

use crate::models::{JokeRecord, Selection};

/// No unposted joke exists for the style that is due.
///
/// This is a normal "nothing to do" outcome, not a failure; callers are
/// expected to match on it and exit cleanly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no unposted joke in style \"{style}\"")]
pub struct NoCandidate {
    pub style: String,
}

/// Style of the most recently posted record, scanning from the end of the
/// ledger. `None` if nothing has ever been posted.
pub fn last_posted_style(records: &[JokeRecord]) -> Option<&str> {
    records
        .iter()
        .rev()
        .find(|r| r.posted)
        .map(|r| r.style.as_str())
}

/// The style that is due next in the cycle.
///
/// A last style that is not a member of the cycle (stale ledger or a
/// reconfigured cycle) is treated the same as no prior style: rotation
/// restarts at the front of the cycle. Returns `None` only for an empty
/// cycle.
pub fn next_style<'a>(cycle: &'a [String], last: Option<&str>) -> Option<&'a str> {
    let idx = match last.and_then(|s| cycle.iter().position(|c| c == s)) {
        Some(i) => (i + 1) % cycle.len(),
        None => 0,
    };
    cycle.get(idx).map(|s| s.as_str())
}

/// Pick the next joke to post: the first unposted record of the style that
/// is due, together with its 1-based ledger position.
pub fn select(records: &[JokeRecord], cycle: &[String]) -> Result<Selection, NoCandidate> {
    let last = last_posted_style(records);
    let style = match next_style(cycle, last) {
        Some(s) => s.to_string(),
        None => {
            return Err(NoCandidate {
                style: String::new(),
            })
        }
    };

    debug!(last = ?last, next = %style, "Computed rotation");

    records
        .iter()
        .enumerate()
        .find(|(_, r)| !r.posted && r.style == style)
        .map(|(i, r)| Selection {
            style: style.clone(),
            position: i + 1,
            record: r.clone(),
        })
        .ok_or(NoCandidate { style })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cycle() -> Vec<String> {
        vec![
            "Corporate Wit".to_string(),
            "Playful Nerd".to_string(),
            "Dad-Joke".to_string(),
        ]
    }

    fn posted(style: &str) -> JokeRecord {
        JokeRecord {
            posted: true,
            ..JokeRecord::new("old joke", style)
        }
    }

    #[test]
    fn test_fresh_ledger_starts_at_first_style() {
        let records = vec![
            JokeRecord::new("j1", "Playful Nerd"),
            JokeRecord::new("j2", "Corporate Wit"),
        ];

        let sel = select(&records, &cycle()).unwrap();
        assert_eq!(sel.style, "Corporate Wit");
        assert_eq!(sel.position, 2);
        assert_eq!(sel.record.joke, "j2");
    }

    #[test]
    fn test_rotation_advances_past_last_posted_style() {
        let records = vec![posted("Corporate Wit"), JokeRecord::new("j", "Playful Nerd")];

        let sel = select(&records, &cycle()).unwrap();
        assert_eq!(sel.style, "Playful Nerd");
        assert_eq!(sel.position, 2);
    }

    #[test]
    fn test_rotation_wraps_around_the_cycle() {
        let records = vec![posted("Dad-Joke"), JokeRecord::new("j", "Corporate Wit")];

        let sel = select(&records, &cycle()).unwrap();
        assert_eq!(sel.style, "Corporate Wit");
    }

    #[test]
    fn test_most_recent_posted_record_wins() {
        // Ledger order decides recency, scanning from the end
        let records = vec![
            posted("Dad-Joke"),
            posted("Corporate Wit"),
            JokeRecord::new("j", "Playful Nerd"),
        ];

        let sel = select(&records, &cycle()).unwrap();
        assert_eq!(sel.style, "Playful Nerd");
    }

    #[test]
    fn test_posted_records_are_never_reselected() {
        let records = vec![
            posted("Playful Nerd"),
            posted("Corporate Wit"),
            JokeRecord::new("j", "Playful Nerd"),
        ];

        let sel = select(&records, &cycle()).unwrap();
        assert_eq!(sel.style, "Playful Nerd");
        assert_eq!(sel.position, 3);
    }

    #[test]
    fn test_no_candidate_when_due_style_is_exhausted() {
        let records = vec![posted("Corporate Wit"), JokeRecord::new("j", "Dad-Joke")];

        let err = select(&records, &cycle()).unwrap_err();
        assert_eq!(err.style, "Playful Nerd");
    }

    #[test]
    fn test_empty_ledger_is_no_candidate_for_first_style() {
        let err = select(&[], &cycle()).unwrap_err();
        assert_eq!(err.style, "Corporate Wit");
    }

    #[test]
    fn test_unknown_last_style_restarts_the_cycle() {
        // Cycle was reconfigured after this record was posted
        let records = vec![posted("Knock-Knock"), JokeRecord::new("j", "Corporate Wit")];

        let sel = select(&records, &cycle()).unwrap();
        assert_eq!(sel.style, "Corporate Wit");
    }

    #[test]
    fn test_empty_cycle_is_no_candidate() {
        let records = vec![JokeRecord::new("j", "Corporate Wit")];
        assert!(select(&records, &[]).is_err());
    }

    #[test]
    fn test_next_style_helpers() {
        let c = cycle();
        assert_eq!(next_style(&c, None), Some("Corporate Wit"));
        assert_eq!(next_style(&c, Some("Corporate Wit")), Some("Playful Nerd"));
        assert_eq!(next_style(&c, Some("Dad-Joke")), Some("Corporate Wit"));
        assert_eq!(next_style(&c, Some("Knock-Knock")), Some("Corporate Wit"));
        assert_eq!(next_style(&[], None), None);
    }

    #[test]
    fn test_last_posted_style_scans_from_the_end() {
        let records = vec![posted("Corporate Wit"), posted("Dad-Joke")];
        assert_eq!(last_posted_style(&records), Some("Dad-Joke"));
        assert_eq!(last_posted_style(&[]), None);
    }
}
