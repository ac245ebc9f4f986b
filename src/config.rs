//! Configuration loaded once at startup
//!
//! Replaces hard-coded account constants with an explicit
//! [`AppConfig`] that is built from the environment and passed by
//! reference into the client and the workflow.

use crate::error::{Error, Result};
use std::env;
use std::fmt;
use std::time::Duration;

/// Base URL used when `CLOUDMAIL_BASE_URL` is unset.
pub const DEFAULT_BASE_URL: &str = "https://mail.faiz.us.kg";

/// Account credentials for the token-issuance endpoint.
///
/// `signing_secret` is the meta-credential presented to the token
/// endpoint itself; it is distinct from the token it issues.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    pub signing_secret: String,
}

impl Credentials {
    #[must_use]
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        signing_secret: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            signing_secret: signing_secret.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &mask_secret(&self.password, 4))
            .field("signing_secret", &mask_secret(&self.signing_secret, 8))
            .finish()
    }
}

/// Full application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub base_url: String,
    pub credentials: Credentials,
    /// Recipient to query; falls back to the login email when `None`.
    pub to_email: Option<String>,
    pub send_email: Option<String>,
    pub subject: Option<String>,
    /// Filter subjects client-side instead of asking the server to.
    pub local_filter: bool,
    pub timeout: Option<Duration>,
}

impl AppConfig {
    /// Build a configuration with only the required fields set.
    #[must_use]
    pub fn new(base_url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            base_url: normalize_base_url(&base_url.into()),
            credentials,
            to_email: None,
            send_email: None,
            subject: None,
            local_filter: true,
            timeout: None,
        }
    }

    /// Load configuration from environment variables
    ///
    /// Reads from `.env` file if present. Required variables:
    /// - `CLOUDMAIL_EMAIL`
    /// - `CLOUDMAIL_PASSWORD`
    /// - `CLOUDMAIL_JWT_SECRET`
    ///
    /// Optional (with defaults):
    /// - `CLOUDMAIL_BASE_URL` (default: [`DEFAULT_BASE_URL`])
    /// - `CLOUDMAIL_TO_EMAIL` (default: the login email)
    /// - `CLOUDMAIL_SEND_EMAIL` (default: no sender filter)
    /// - `CLOUDMAIL_SUBJECT` (default: no subject filter)
    /// - `CLOUDMAIL_LOCAL_FILTER` (default: `true`)
    /// - `CLOUDMAIL_TIMEOUT_SECS` (default: HTTP client default)
    ///
    /// Empty values count as unset.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &str| get(key).ok_or_else(|| Error::Config(format!("{key} not set")));

        let credentials = Credentials {
            email: require("CLOUDMAIL_EMAIL")?,
            password: require("CLOUDMAIL_PASSWORD")?,
            signing_secret: require("CLOUDMAIL_JWT_SECRET")?,
        };

        let base_url = get("CLOUDMAIL_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let local_filter = match get("CLOUDMAIL_LOCAL_FILTER") {
            Some(raw) => parse_bool(&raw)
                .ok_or_else(|| Error::Config(format!("Invalid CLOUDMAIL_LOCAL_FILTER: {raw}")))?,
            None => true,
        };

        let timeout = get("CLOUDMAIL_TIMEOUT_SECS")
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .map(Duration::from_secs)
                    .map_err(|e| Error::Config(format!("Invalid CLOUDMAIL_TIMEOUT_SECS: {e}")))
            })
            .transpose()?;

        Ok(Self {
            base_url: normalize_base_url(&base_url),
            credentials,
            to_email: get("CLOUDMAIL_TO_EMAIL"),
            send_email: get("CLOUDMAIL_SEND_EMAIL"),
            subject: get("CLOUDMAIL_SUBJECT"),
            local_filter,
            timeout,
        })
    }

    /// The mailbox to query: the configured recipient, or the login
    /// email when none is configured.
    #[must_use]
    pub fn recipient(&self) -> &str {
        self.to_email
            .as_deref()
            .unwrap_or(&self.credentials.email)
    }
}

/// Render a secret as its first `keep` characters followed by `*` for
/// the remainder.
#[must_use]
pub fn mask_secret(secret: &str, keep: usize) -> String {
    let total = secret.chars().count();
    let visible: String = secret.chars().take(keep).collect();
    format!("{visible}{}", "*".repeat(total.saturating_sub(keep)))
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
