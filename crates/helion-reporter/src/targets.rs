use std::{io::ErrorKind, path::Path};

use serde_json::Value;
use tracing::{debug, warn};

pub(crate) const DEFAULT_TARGETS_PATH: &str = "samples/targets.json";

/// Reads the candidate addresses to check for bytecode.
///
/// Any problem with the file degrades to an empty list. A missing file and a
/// malformed one are only told apart in the logs.
pub(crate) async fn load_targets(path: &Path) -> Vec<String> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "No targets file");
            return Vec::new();
        }
        Err(err) => {
            warn!(path = %path.display(), %err, "Failed to read targets file");
            return Vec::new();
        }
    };

    parse_targets(&raw).unwrap_or_else(|err| {
        warn!(path = %path.display(), %err, "Ignoring malformed targets file");
        Vec::new()
    })
}

fn parse_targets(raw: &str) -> serde_json::Result<Vec<String>> {
    let mut document: Value = serde_json::from_str(raw)?;

    let Some(Value::Array(entries)) = document.get_mut("targets").map(Value::take) else {
        debug!("Targets field is not an array");
        return Ok(Vec::new());
    };

    Ok(entries
        .into_iter()
        .map(|entry| match entry {
            Value::String(s) => s,
            other => other.to_string(),
        })
        .collect())
}
