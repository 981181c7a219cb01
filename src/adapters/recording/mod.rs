//! Recording adapters that capture interactions to a cassette.

pub mod git;
pub mod tracker;

pub use git::RecordingGitRepo;
pub use tracker::RecordingIssueTracker;

use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use serde_json::json;

use crate::cassette::CassetteRecorder;

/// Records a port call's result.
///
/// `Ok(v)` is stored as `{"Ok": v}` and `Err(e)` as `{"Err": e.to_string()}`;
/// `replaying::replay_result` reads the same shape back.
pub(crate) fn record_result<I, T, E>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    result: &Result<T, E>,
) where
    I: Serialize,
    T: Serialize,
    E: std::fmt::Display,
{
    let output = match result {
        Ok(value) => serde_json::to_value(value).map(|v| json!({ "Ok": v })),
        Err(e) => Ok(json!({ "Err": e.to_string() })),
    };
    let (input, output) = match (serde_json::to_value(input), output) {
        (Ok(input), Ok(output)) => (input, output),
        (Err(e), _) | (_, Err(e)) => {
            tracing::warn!(port, method, error = %e, "interaction not recorded");
            return;
        }
    };

    let mut guard = recorder.lock().unwrap_or_else(PoisonError::into_inner);
    guard.record(port, method, input, output);
}
