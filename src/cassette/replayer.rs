//! Serves recorded outputs back in call order.

use std::collections::{BTreeMap, VecDeque};

use thiserror::Error;

use super::format::{Cassette, Interaction};

/// The cassette cannot answer a call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReplayError {
    /// Nothing was ever recorded for this port and method.
    #[error("cassette has no interactions for {port}::{method} (recorded: {recorded})")]
    NotRecorded {
        /// Port name.
        port: String,
        /// Method name.
        method: String,
        /// Comma-separated `port::method` pairs that were recorded.
        recorded: String,
    },
    /// Every recorded interaction for this port and method was used.
    #[error("cassette exhausted for {port}::{method} after {count} interactions")]
    Exhausted {
        /// Port name.
        port: String,
        /// Method name.
        method: String,
        /// How many were recorded.
        count: usize,
    },
}

/// Per `port::method` queues over one cassette.
///
/// Calls on different ports may interleave differently than they were
/// recorded; only the order within a `port::method` pair matters.
#[derive(Debug, Default)]
pub struct CassetteReplayer {
    queues: BTreeMap<(String, String), VecDeque<Interaction>>,
    served: BTreeMap<(String, String), usize>,
}

impl CassetteReplayer {
    /// Indexes the interactions of `cassette`.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut queues: BTreeMap<(String, String), VecDeque<Interaction>> = BTreeMap::new();
        for interaction in &cassette.interactions {
            queues
                .entry((interaction.port.clone(), interaction.method.clone()))
                .or_default()
                .push_back(interaction.clone());
        }
        Self { queues, served: BTreeMap::new() }
    }

    /// Takes the next recorded output for `port::method`.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError`] if the pair was never recorded or is used up.
    pub fn next_output(
        &mut self,
        port: &str,
        method: &str,
    ) -> Result<serde_json::Value, ReplayError> {
        let key = (port.to_string(), method.to_string());
        let Some(queue) = self.queues.get_mut(&key) else {
            let recorded = self
                .queues
                .keys()
                .map(|(p, m)| format!("{p}::{m}"))
                .collect::<Vec<_>>()
                .join(", ");
            return Err(ReplayError::NotRecorded {
                port: port.to_string(),
                method: method.to_string(),
                recorded,
            });
        };

        let served = self.served.entry(key).or_insert(0);
        let interaction = queue.pop_front().ok_or_else(|| ReplayError::Exhausted {
            port: port.to_string(),
            method: method.to_string(),
            count: *served,
        })?;
        *served += 1;
        Ok(interaction.output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn interaction(seq: u64, port: &str, method: &str, output: serde_json::Value) -> Interaction {
        Interaction { seq, port: port.into(), method: method.into(), input: json!({}), output }
    }

    fn cassette(interactions: Vec<Interaction>) -> Cassette {
        Cassette { name: "test".into(), recorded_at: Utc::now(), interactions }
    }

    #[test]
    fn serves_each_pair_in_order() {
        let mut replayer = CassetteReplayer::new(&cassette(vec![
            interaction(0, "tracker", "fetch_issue", json!({"Ok": {"key": "A-1"}})),
            interaction(1, "git", "commit_message", json!({"Ok": "msg"})),
            interaction(2, "tracker", "fetch_issue", json!({"Ok": null})),
        ]));

        assert_eq!(replayer.next_output("git", "commit_message").unwrap(), json!({"Ok": "msg"}));
        assert_eq!(
            replayer.next_output("tracker", "fetch_issue").unwrap(),
            json!({"Ok": {"key": "A-1"}})
        );
        assert_eq!(replayer.next_output("tracker", "fetch_issue").unwrap(), json!({"Ok": null}));
        assert!(replayer.next_output("tracker", "fetch_issue").is_err());
    }

    #[test]
    fn exhausted_pair_is_an_error() {
        let mut replayer =
            CassetteReplayer::new(&cassette(vec![interaction(0, "git", "log", json!({"Ok": []}))]));
        replayer.next_output("git", "log").unwrap();
        let err = replayer.next_output("git", "log").unwrap_err();
        assert_eq!(
            err,
            ReplayError::Exhausted { port: "git".into(), method: "log".into(), count: 1 }
        );
    }

    #[test]
    fn unrecorded_pair_lists_what_exists() {
        let mut replayer =
            CassetteReplayer::new(&cassette(vec![interaction(0, "git", "log", json!({"Ok": []}))]));
        let err = replayer.next_output("tracker", "fetch_issue").unwrap_err();
        assert!(err.to_string().contains("recorded: git::log"));
    }
}
