//! Cloud Mail HTTP client

use crate::api::{Envelope, MAIL_LIST_PATH, MailData, TOKEN_PATH, TokenData};
use crate::config::{AppConfig, Credentials};
use crate::error::{Error, Result};
use crate::query::{MailPage, QueryFilter};
use reqwest::header::AUTHORIZATION;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, warn};

/// A bearer token obtained from the token-issuance endpoint.
///
/// Starts empty and is populated by [`CloudMailClient::acquire`]. There
/// is no refresh; the token lives as long as the process.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
}

impl Session {
    /// Wrap an already issued token.
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    /// The token, if one has been issued and is non-empty.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

#[derive(Serialize)]
struct TokenRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Client for the Cloud Mail public API
///
/// Issues one request at a time; every call is awaited to completion
/// before the next is made.
pub struct CloudMailClient {
    base_url: String,
    http: reqwest::Client,
}

impl CloudMailClient {
    /// Create a client for `base_url` with default HTTP settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialised.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::build(base_url.into(), None)
    }

    /// Create a client from the application configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialised.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::build(config.base_url.clone(), config.timeout)
    }

    fn build(base_url: String, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| Error::Transport(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Exchange credentials for a bearer token
    ///
    /// The signing secret is sent as the `Authorization` header of the
    /// token request. Success is decided by the embedded status code in
    /// the response body, not the HTTP status.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the email or password is empty,
    /// [`Error::Transport`] if the request fails or the body cannot be
    /// decoded, and [`Error::Authentication`] if the service reports a
    /// non-success code or omits the token.
    pub async fn acquire(&self, credentials: &Credentials) -> Result<Session> {
        if credentials.email.is_empty() || credentials.password.is_empty() {
            return Err(Error::Config("email and password must not be empty".into()));
        }

        let url = self.url(TOKEN_PATH);
        debug!("Requesting token for {} from {}", credentials.email, url);

        let body = TokenRequest {
            email: &credentials.email,
            password: &credentials.password,
        };
        let response = self
            .http
            .post(&url)
            .header(AUTHORIZATION, &credentials.signing_secret)
            .json(&body)
            .send()
            .await?;

        let envelope = decode(response).await?;
        if !envelope.is_success() {
            let message = envelope.message_or_default();
            warn!("Token request rejected ({}): {}", envelope.code, message);
            return Err(Error::Authentication {
                code: envelope.code,
                message,
            });
        }

        let code = envelope.code;
        let token = envelope
            .into_data::<TokenData>()?
            .and_then(|d| d.token)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::Authentication {
                code,
                message: "token missing from response".into(),
            })?;

        info!("Token acquired");
        Ok(Session::with_token(token))
    }

    /// Fetch one page of mail matching `filter`
    ///
    /// Fails fast with [`Error::Unauthenticated`] when `session` holds
    /// no token; no request is sent in that case.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] on network failure, a non-2xx HTTP
    /// status, or an undecodable body, and [`Error::Query`] if the
    /// service reports a non-success code.
    pub async fn fetch(&self, session: &Session, filter: &QueryFilter) -> Result<MailPage> {
        let token = session.token().ok_or(Error::Unauthenticated)?;

        let url = self.url(MAIL_LIST_PATH);
        let request = filter.to_request();
        debug!(
            "Querying {} for {} (page {}, size {}, sort {})",
            url,
            filter.recipient,
            filter.page,
            filter.effective_page_size(),
            filter.sort_order
        );

        let response = self
            .http
            .post(&url)
            .header(AUTHORIZATION, token)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        let envelope = decode(response).await?;
        if !envelope.is_success() {
            let message = envelope.message_or_default();
            warn!("Mail query rejected ({}): {}", envelope.code, message);
            return Err(Error::Query {
                code: envelope.code,
                message,
            });
        }

        let code = envelope.code;
        let messages = envelope
            .into_data::<MailData>()?
            .map(MailData::into_messages)
            .unwrap_or_default();

        info!("Fetched {} messages for {}", messages.len(), filter.recipient);
        Ok(MailPage::new(code, messages))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

async fn decode(response: reqwest::Response) -> Result<Envelope> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes)
        .map_err(|e| Error::Transport(format!("Invalid response body: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_session_is_not_authenticated() {
        let session = Session::default();
        assert!(!session.is_authenticated());
        assert!(session.token().is_none());
    }

    #[test]
    fn empty_token_is_not_authenticated() {
        let session = Session::with_token("");
        assert!(!session.is_authenticated());
    }

    #[test]
    fn debug_hides_token() {
        let session = Session::with_token("very-secret-token");
        assert!(!format!("{session:?}").contains("very-secret-token"));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = CloudMailClient::new("http://localhost:8080/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(client.url(TOKEN_PATH), "http://localhost:8080/api/public/genToken");
    }
}
