//! Mail-list query types
//!
//! [`QueryFilter`] describes one page of a server-side search;
//! [`MailPage`] holds the flattened result and the client-side
//! refinements applied after it arrives.

use crate::message::Message;
use serde::Serialize;
use std::fmt;

/// Largest page the service accepts.
pub const MAX_PAGE_SIZE: u32 = 20;

/// Ordering by receipt time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mailbox side to search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MailType {
    #[default]
    Received,
    Sent,
}

impl MailType {
    /// Numeric code used on the wire.
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::Received => 0,
            Self::Sent => 1,
        }
    }
}

/// Server-side search parameters for one mail-list request.
///
/// Optional filters are only transmitted when set; `None` means "no
/// filter" while `Some("")` is sent verbatim.
///
/// # Examples
///
/// ```
/// use cloudmail_client::{QueryFilter, SortOrder};
///
/// let filter = QueryFilter::new("me@example.com")
///     .sender_email("account@nvidia.com")
///     .page_size(50);
/// assert_eq!(filter.recipient, "me@example.com");
/// assert_eq!(filter.effective_page_size(), 20);
/// assert_eq!(filter.sort_order, SortOrder::Desc);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryFilter {
    pub recipient: String,
    pub sender_name: Option<String>,
    pub sender_email: Option<String>,
    pub subject: Option<String>,
    pub body_contains: Option<String>,
    pub sort_order: SortOrder,
    pub result_type: i64,
    pub page: u32,
    pub page_size: u32,
}

impl QueryFilter {
    #[must_use]
    pub fn new(recipient: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
            sender_name: None,
            sender_email: None,
            subject: None,
            body_contains: None,
            sort_order: SortOrder::Desc,
            result_type: MailType::Received.code(),
            page: 1,
            page_size: MAX_PAGE_SIZE,
        }
    }

    #[must_use]
    pub fn sender_name(mut self, name: impl Into<String>) -> Self {
        self.sender_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn sender_email(mut self, email: impl Into<String>) -> Self {
        self.sender_email = Some(email.into());
        self
    }

    #[must_use]
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    #[must_use]
    pub fn body_contains(mut self, text: impl Into<String>) -> Self {
        self.body_contains = Some(text.into());
        self
    }

    #[must_use]
    pub const fn sort_order(mut self, order: SortOrder) -> Self {
        self.sort_order = order;
        self
    }

    #[must_use]
    pub const fn mail_type(mut self, kind: MailType) -> Self {
        self.result_type = kind.code();
        self
    }

    /// Page number, starting at 1. Zero is raised to 1.
    #[must_use]
    pub fn page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    /// Requested page size. Values above [`MAX_PAGE_SIZE`] are clamped
    /// when the request is built.
    #[must_use]
    pub const fn page_size(mut self, size: u32) -> Self {
        self.page_size = size;
        self
    }

    /// The page size actually transmitted.
    #[must_use]
    pub fn effective_page_size(&self) -> u32 {
        self.page_size.min(MAX_PAGE_SIZE)
    }

    pub(crate) fn to_request(&self) -> MailListRequest<'_> {
        MailListRequest {
            to_email: &self.recipient,
            time_sort: self.sort_order,
            kind: self.result_type,
            num: self.page.max(1),
            size: self.effective_page_size(),
            send_name: self.sender_name.as_deref(),
            send_email: self.sender_email.as_deref(),
            subject: self.subject.as_deref(),
            content: self.body_contains.as_deref(),
        }
    }
}

/// JSON body of a mail-list request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MailListRequest<'a> {
    to_email: &'a str,
    time_sort: SortOrder,
    #[serde(rename = "type")]
    kind: i64,
    num: u32,
    size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    send_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    send_email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    subject: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<&'a str>,
}

/// One page of mail-list results.
#[derive(Debug, Clone, PartialEq)]
pub struct MailPage {
    /// Embedded status code reported by the service.
    pub status_code: i64,
    /// Messages in the order the service returned them.
    pub messages: Vec<Message>,
}

impl MailPage {
    #[must_use]
    pub const fn new(status_code: i64, messages: Vec<Message>) -> Self {
        Self {
            status_code,
            messages,
        }
    }

    /// Keep only messages whose subject contains `target`,
    /// case-insensitively, preserving order.
    #[must_use]
    pub fn filter_subject(mut self, target: &str) -> Self {
        self.messages.retain(|m| m.subject_contains(target));
        self
    }

    /// The first message under the requested sort order.
    #[must_use]
    pub fn latest(&self) -> Option<&Message> {
        self.messages.first()
    }

    #[must_use]
    pub fn into_latest(self) -> Option<Message> {
        self.messages.into_iter().next()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }
}
