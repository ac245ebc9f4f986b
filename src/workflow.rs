//! End-to-end fetch of the latest matching message
//!
//! Authenticates, queries the configured mailbox, optionally narrows the
//! result by subject on the client, and keeps only the most recent
//! match.

use crate::client::{CloudMailClient, Session};
use crate::config::AppConfig;
use crate::error::{Error, LOCAL_FAILURE_CODE, Result};
use crate::message::Message;
use crate::persist::persist;
use crate::query::{MAX_PAGE_SIZE, QueryFilter, SortOrder};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Page size used when the server applies the subject filter itself.
pub const SERVER_FILTER_PAGE_SIZE: u32 = 10;

/// What to do with the latest match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Save<'a> {
    #[default]
    No,
    /// Save to a timestamped file in the current directory.
    Timestamped,
    To(&'a Path),
}

/// Result of a workflow run.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A match was found and written to `path`.
    Saved { message: Message, path: PathBuf },
    /// A match was found and not saved.
    Found { message: Message },
    /// The query succeeded but nothing matched.
    Empty,
    /// The service rejected the query or could not be reached. `code`
    /// is the embedded code, or `-1` for a transport failure.
    QueryFailed { code: i64, message: String },
}

/// Build the server-side filter for `config`.
///
/// When local filtering is on and a subject is configured, the subject
/// is left out of the request and a full page is fetched so it can be
/// matched client-side.
#[must_use]
pub fn build_filter(config: &AppConfig) -> QueryFilter {
    let mut filter = QueryFilter::new(config.recipient()).sort_order(SortOrder::Desc);
    filter.sender_email.clone_from(&config.send_email);

    if filters_locally(config) {
        filter.page_size(MAX_PAGE_SIZE)
    } else {
        filter.subject = config.subject.clone();
        filter.page_size(SERVER_FILTER_PAGE_SIZE)
    }
}

const fn filters_locally(config: &AppConfig) -> bool {
    config.local_filter && config.subject.is_some()
}

/// Run the workflow once.
///
/// # Errors
///
/// Authentication and persistence failures are returned as errors. A
/// query that fails, whether rejected or unreachable, is reported as
/// [`Outcome::QueryFailed`].
pub async fn run(client: &CloudMailClient, config: &AppConfig, save: Save<'_>) -> Result<Outcome> {
    let session = client.acquire(&config.credentials).await?;
    run_with_session(client, &session, config, save).await
}

/// Run the query stages of the workflow with an already acquired
/// session.
///
/// # Errors
///
/// See [`run`]. An empty session yields [`Error::Unauthenticated`].
pub async fn run_with_session(
    client: &CloudMailClient,
    session: &Session,
    config: &AppConfig,
    save: Save<'_>,
) -> Result<Outcome> {
    let filter = build_filter(config);
    let page = match client.fetch(session, &filter).await {
        Ok(page) => page,
        Err(Error::Query { code, message }) => {
            return Ok(Outcome::QueryFailed { code, message });
        }
        Err(Error::Transport(message)) => {
            warn!("Mail query failed: {}", message);
            return Ok(Outcome::QueryFailed {
                code: LOCAL_FAILURE_CODE,
                message,
            });
        }
        Err(e) => return Err(e),
    };

    let page = match config.subject.as_deref() {
        Some(subject) if filters_locally(config) => page.filter_subject(subject),
        _ => page,
    };

    let Some(message) = page.into_latest() else {
        info!("No messages matched for {}", config.recipient());
        return Ok(Outcome::Empty);
    };

    let path = match save {
        Save::No => return Ok(Outcome::Found { message }),
        Save::Timestamped => None,
        Save::To(path) => Some(path),
    };

    let written = persist(std::slice::from_ref(&message), path).await?;
    Ok(Outcome::Saved {
        message,
        path: written,
    })
}
