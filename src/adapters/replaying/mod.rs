//! Replaying adapters that serve recorded interactions.

pub mod git;
pub mod tracker;

pub use git::ReplayingGitRepo;
pub use tracker::ReplayingIssueTracker;

use std::sync::{Mutex, PoisonError};

use serde::de::DeserializeOwned;

use crate::cassette::CassetteReplayer;
use crate::ports::PortError;

/// Reads the next recorded result for `port::method`.
///
/// Inverse of `recording::record_result`: `{"Ok": v}` becomes `Ok(v)`,
/// `{"Err": msg}` becomes an error carrying `msg`.
pub(crate) fn replay_result<T: DeserializeOwned>(
    replayer: &Mutex<CassetteReplayer>,
    port: &str,
    method: &str,
) -> Result<T, PortError> {
    let output = replayer.lock().unwrap_or_else(PoisonError::into_inner).next_output(port, method)?;

    if let Some(err) = output.get("Err") {
        let msg = err.as_str().map_or_else(|| err.to_string(), str::to_string);
        return Err(msg.into());
    }
    let value = output
        .get("Ok")
        .cloned()
        .ok_or_else(|| format!("{port}::{method}: recorded output has neither Ok nor Err"))?;
    serde_json::from_value(value)
        .map_err(|e| format!("{port}::{method}: failed to deserialize recorded output: {e}").into())
}
