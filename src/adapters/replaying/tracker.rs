//! Replaying adapter for the `IssueTracker` port.

use std::sync::Mutex;

use super::replay_result;
use crate::cassette::CassetteReplayer;
use crate::ports::{IssueTracker, PortError, TrackerIssue};

/// Answers tracker lookups from a cassette.
pub struct ReplayingIssueTracker {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingIssueTracker {
    /// Serves lookups from `replayer`.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl IssueTracker for ReplayingIssueTracker {
    fn fetch_issue(&self, _site: &str, _key: &str) -> Result<Option<TrackerIssue>, PortError> {
        replay_result(&self.replayer, "tracker", "fetch_issue")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::{Cassette, Interaction};
    use chrono::Utc;
    use serde_json::json;

    fn tracker(outputs: Vec<serde_json::Value>) -> ReplayingIssueTracker {
        let interactions = outputs
            .into_iter()
            .zip(0..)
            .map(|(output, seq)| Interaction {
                seq,
                port: "tracker".into(),
                method: "fetch_issue".into(),
                input: json!({}),
                output,
            })
            .collect();
        let cassette = Cassette { name: "t".into(), recorded_at: Utc::now(), interactions };
        ReplayingIssueTracker::new(CassetteReplayer::new(&cassette))
    }

    #[test]
    fn replays_found_missing_and_failed() {
        let tracker = tracker(vec![
            json!({"Ok": {"key": "NEW-4", "summary": "Moved"}}),
            json!({"Ok": null}),
            json!({"Err": "timed out"}),
        ]);

        let found = tracker.fetch_issue("main", "OLD-4").unwrap().unwrap();
        assert_eq!(found.key, "NEW-4");
        assert_eq!(found.summary.as_deref(), Some("Moved"));
        assert!(tracker.fetch_issue("main", "GONE-1").unwrap().is_none());
        assert_eq!(tracker.fetch_issue("main", "OPS-1").unwrap_err().to_string(), "timed out");
    }

    #[test]
    fn exhausted_cassette_is_a_port_error() {
        let tracker = tracker(vec![]);
        let err = tracker.fetch_issue("main", "OPS-1").unwrap_err();
        assert!(err.to_string().contains("tracker::fetch_issue"));
    }

    #[test]
    fn malformed_output_is_a_port_error() {
        let tracker = tracker(vec![json!({"text": "?"})]);
        assert!(tracker.fetch_issue("main", "OPS-1").is_err());
    }
}
