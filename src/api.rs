//! Wire types for the public API
//!
//! Every response is wrapped in an envelope carrying an embedded status
//! code that is independent of the HTTP status.

use crate::error::{Error, Result};
use crate::message::Message;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Embedded status code signalling success.
pub const SUCCESS_CODE: i64 = 200;

pub const TOKEN_PATH: &str = "/api/public/genToken";
pub const MAIL_LIST_PATH: &str = "/api/public/emailList";

/// Response envelope shared by all endpoints.
///
/// `data` stays raw until the embedded code has been checked, so a
/// failure response never loses its message to a payload that does not
/// match the success shape.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    pub code: i64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Value,
}

impl Envelope {
    pub const fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    /// The server-supplied message, or a placeholder naming the code.
    pub fn message_or_default(&self) -> String {
        self.message
            .clone()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("request failed with code {}", self.code))
    }

    /// Decode the payload of a successful response. A null or missing
    /// `data` yields `None`.
    pub fn into_data<T: DeserializeOwned>(self) -> Result<Option<T>> {
        if self.data.is_null() {
            return Ok(None);
        }
        serde_json::from_value(self.data)
            .map(Some)
            .map_err(|e| Error::Transport(format!("Invalid response data: {e}")))
    }
}

/// Payload of a successful token request.
#[derive(Debug, Deserialize)]
pub struct TokenData {
    #[serde(default)]
    pub token: Option<String>,
}

/// The `data` field of a mail-list response.
///
/// The service returns either a bare array or an object wrapping the
/// array under `list`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum MailData {
    Bare(Vec<Message>),
    Wrapped {
        #[serde(default)]
        list: Vec<Message>,
    },
}

impl MailData {
    pub fn into_messages(self) -> Vec<Message> {
        match self {
            Self::Bare(messages) | Self::Wrapped { list: messages } => messages,
        }
    }
}
