//! Cloud Mail API client library
//!
//! A small client for the public HTTP API of a self-hosted Cloud Mail
//! service. It exchanges account credentials for a bearer token,
//! queries the mail list with optional server-side filters, and can
//! write the latest match to disk.
//!
//! ```no_run
//! use cloudmail_client::{AppConfig, CloudMailClient, QueryFilter};
//!
//! # async fn example() -> cloudmail_client::Result<()> {
//! let config = AppConfig::from_env()?;
//! let client = CloudMailClient::from_config(&config)?;
//! let session = client.acquire(&config.credentials).await?;
//!
//! let filter = QueryFilter::new(config.recipient()).sender_email("account@nvidia.com");
//! let page = client.fetch(&session, &filter).await?;
//! if let Some(latest) = page.filter_subject("verify").latest() {
//!     println!("{}", latest.subject);
//! }
//! # Ok(())
//! # }
//! ```

mod api;
mod client;
mod config;
mod error;
mod message;
mod persist;
mod query;
pub mod workflow;

pub use client::{CloudMailClient, Session};
pub use config::{AppConfig, Credentials, DEFAULT_BASE_URL, mask_secret};
pub use error::{Error, LOCAL_FAILURE_CODE, Result};
pub use message::Message;
pub use persist::{default_filename, load, persist};
pub use query::{MAX_PAGE_SIZE, MailPage, MailType, QueryFilter, SortOrder};
pub use workflow::{Outcome, Save};
