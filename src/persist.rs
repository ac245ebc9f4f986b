//! Writing fetched mail to disk
//!
//! Files are pretty-printed UTF-8 JSON arrays. Non-ASCII text is written
//! verbatim rather than escaped.

use crate::error::Result;
use crate::message::Message;
use chrono::{DateTime, Local, TimeZone};
use std::path::{Path, PathBuf};
use tracing::info;

/// File name for a save made at `now`, with second resolution.
#[must_use]
pub fn default_filename<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("emails_{}.json", now.format("%Y%m%d_%H%M%S"))
}

/// Serialize `messages` to `path`, or to a timestamped file in the
/// current directory when no path is given.
///
/// Existing files are overwritten. Returns the path written.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub async fn persist(messages: &[Message], path: Option<&Path>) -> Result<PathBuf> {
    let path = path.map_or_else(
        || PathBuf::from(default_filename(&Local::now())),
        Path::to_path_buf,
    );

    let json = serde_json::to_string_pretty(messages)?;
    tokio::fs::write(&path, json).await?;

    info!("Saved {} message(s) to {}", messages.len(), path.display());
    Ok(path)
}

/// Read back a file written by [`persist`].
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a JSON array
/// of messages.
pub async fn load(path: &Path) -> Result<Vec<Message>> {
    let bytes = tokio::fs::read(path).await?;
    Ok(serde_json::from_slice(&bytes)?)
}
