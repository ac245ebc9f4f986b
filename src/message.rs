//! Mail records returned by the mail-list endpoint
//!
//! The remote service owns the schema. A message is decoded from the raw
//! JSON object: known fields are copied into typed slots only when they
//! hold strings, and everything else (including known fields of an
//! unexpected type) is carried through untouched in [`Message::extra`],
//! so one odd record never fails a whole page and a message can be
//! written back out without losing data.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Timestamp layout used by `createTime`.
const CREATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const EMAIL_ID: &str = "emailId";
const SEND_EMAIL: &str = "sendEmail";
const SEND_NAME: &str = "sendName";
const SUBJECT: &str = "subject";
const TO_EMAIL: &str = "toEmail";
const TO_NAME: &str = "toName";
const CREATE_TIME: &str = "createTime";
const CONTENT: &str = "content";
const TEXT: &str = "text";

/// A single mail record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Message {
    pub email_id: Option<Value>,
    pub send_email: Option<String>,
    pub send_name: Option<String>,
    /// Empty when the record has no string subject.
    pub subject: String,
    pub to_email: Option<String>,
    pub to_name: Option<String>,
    pub create_time: Option<String>,
    /// HTML body.
    pub content: Option<String>,
    /// Plain-text body.
    pub text: Option<String>,
    /// Server-defined fields the client does not interpret.
    pub extra: Map<String, Value>,
}

impl From<Map<String, Value>> for Message {
    fn from(mut map: Map<String, Value>) -> Self {
        let email_id = match map.get(EMAIL_ID) {
            Some(Value::Null) | None => None,
            Some(_) => map.remove(EMAIL_ID),
        };

        Self {
            email_id,
            send_email: take_string(&mut map, SEND_EMAIL),
            send_name: take_string(&mut map, SEND_NAME),
            subject: take_string(&mut map, SUBJECT).unwrap_or_default(),
            to_email: take_string(&mut map, TO_EMAIL),
            to_name: take_string(&mut map, TO_NAME),
            create_time: take_string(&mut map, CREATE_TIME),
            content: take_string(&mut map, CONTENT),
            text: take_string(&mut map, TEXT),
            extra: map,
        }
    }
}

impl From<Message> for Map<String, Value> {
    fn from(msg: Message) -> Self {
        let mut map = msg.extra;
        put(&mut map, EMAIL_ID, msg.email_id);
        put(&mut map, SEND_EMAIL, msg.send_email.map(Value::String));
        put(&mut map, SEND_NAME, msg.send_name.map(Value::String));
        // A raw non-string subject kept in `extra` wins over the empty default.
        if !msg.subject.is_empty() || !map.contains_key(SUBJECT) {
            map.insert(SUBJECT.to_string(), Value::String(msg.subject));
        }
        put(&mut map, TO_EMAIL, msg.to_email.map(Value::String));
        put(&mut map, TO_NAME, msg.to_name.map(Value::String));
        put(&mut map, CREATE_TIME, msg.create_time.map(Value::String));
        put(&mut map, CONTENT, msg.content.map(Value::String));
        put(&mut map, TEXT, msg.text.map(Value::String));
        map
    }
}

/// Remove `key` from `map` if it holds a string.
fn take_string(map: &mut Map<String, Value>, key: &str) -> Option<String> {
    if !matches!(map.get(key), Some(Value::String(_))) {
        return None;
    }
    match map.remove(key) {
        Some(Value::String(s)) => Some(s),
        _ => None,
    }
}

fn put(map: &mut Map<String, Value>, key: &str, value: Option<Value>) {
    if let Some(value) = value {
        map.insert(key.to_string(), value);
    }
}

impl Message {
    /// Sender for display: `Name <address>` when both are known.
    #[must_use]
    pub fn sender(&self) -> String {
        match (self.send_name.as_deref(), self.send_email.as_deref()) {
            (Some(name), Some(addr)) if !name.is_empty() => format!("{name} <{addr}>"),
            (_, Some(addr)) => addr.to_string(),
            (Some(name), None) => name.to_string(),
            (None, None) => String::new(),
        }
    }

    /// Best available body, preferring plain text over HTML.
    #[must_use]
    pub fn body(&self) -> &str {
        self.text
            .as_deref()
            .filter(|t| !t.is_empty())
            .or(self.content.as_deref())
            .unwrap_or_default()
    }

    /// Parse `createTime` into a timestamp.
    ///
    /// Accepts the service's `YYYY-MM-DD HH:MM:SS` layout and RFC 3339.
    /// Returns `None` when the field is missing or unparseable.
    #[must_use]
    pub fn received_at(&self) -> Option<NaiveDateTime> {
        let raw = self.create_time.as_deref()?.trim();
        NaiveDateTime::parse_from_str(raw, CREATE_TIME_FORMAT)
            .ok()
            .or_else(|| {
                DateTime::parse_from_rfc3339(raw)
                    .ok()
                    .map(|dt| dt.naive_utc())
            })
    }

    /// Case-insensitive substring match against the subject.
    #[must_use]
    pub fn subject_contains(&self, needle: &str) -> bool {
        self.subject
            .to_lowercase()
            .contains(&needle.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_known_and_unknown_fields() {
        let msg: Message = serde_json::from_value(json!({
            "emailId": 17,
            "sendEmail": "account@nvidia.com",
            "sendName": "NVIDIA",
            "subject": "Verify",
            "toEmail": "me@example.com",
            "createTime": "2025-03-04 05:06:07",
            "text": "code 123456",
            "accountId": 3,
            "isDel": 0
        }))
        .unwrap();

        assert_eq!(msg.email_id, Some(json!(17)));
        assert_eq!(msg.subject, "Verify");
        assert_eq!(msg.extra.get("accountId"), Some(&json!(3)));
        assert_eq!(msg.extra.get("isDel"), Some(&json!(0)));
    }

    #[test]
    fn missing_subject_defaults_to_empty() {
        let msg: Message = serde_json::from_value(json!({"emailId": 1})).unwrap();
        assert_eq!(msg.subject, "");
        assert!(!msg.subject_contains("x"));
    }

    #[test]
    fn unknown_fields_survive_reserialization() {
        let original = json!({
            "subject": "A",
            "attList": [{"filename": "a.pdf"}],
            "status": 0
        });
        let msg: Message = serde_json::from_value(original.clone()).unwrap();
        assert_eq!(serde_json::to_value(&msg).unwrap(), original);
    }

    #[test]
    fn null_subject_decodes_as_empty_and_is_kept_raw() {
        let raw = json!({"emailId": 1, "subject": null});
        let msg: Message = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(msg.subject, "");
        assert_eq!(msg.extra.get("subject"), Some(&Value::Null));
        assert_eq!(serde_json::to_value(&msg).unwrap(), raw);
    }

    #[test]
    fn non_string_known_fields_stay_in_extra() {
        let raw = json!({
            "subject": "Verify",
            "createTime": 1_735_689_600,
            "sendEmail": ["a@example.com"],
            "text": {"plain": "hi"}
        });
        let msg: Message = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(msg.subject, "Verify");
        assert!(msg.create_time.is_none());
        assert!(msg.received_at().is_none());
        assert!(msg.send_email.is_none());
        assert_eq!(msg.body(), "");
        assert_eq!(msg.extra.get("createTime"), Some(&json!(1_735_689_600)));
        assert_eq!(serde_json::to_value(&msg).unwrap(), raw);
    }

    #[test]
    fn null_email_id_is_none() {
        let msg: Message = serde_json::from_value(json!({"emailId": null})).unwrap();
        assert!(msg.email_id.is_none());
    }

    #[test]
    fn sender_formatting() {
        let mut msg = Message {
            send_email: Some("a@example.com".into()),
            ..Message::default()
        };
        assert_eq!(msg.sender(), "a@example.com");

        msg.send_name = Some("Alice".into());
        assert_eq!(msg.sender(), "Alice <a@example.com>");

        msg.send_name = Some(String::new());
        assert_eq!(msg.sender(), "a@example.com");
    }

    #[test]
    fn body_prefers_text() {
        let msg = Message {
            text: Some("plain".into()),
            content: Some("<p>html</p>".into()),
            ..Message::default()
        };
        assert_eq!(msg.body(), "plain");

        let html_only = Message {
            text: Some(String::new()),
            content: Some("<p>html</p>".into()),
            ..Message::default()
        };
        assert_eq!(html_only.body(), "<p>html</p>");
        assert_eq!(Message::default().body(), "");
    }

    #[test]
    fn received_at_parses_service_format() {
        let msg = Message {
            create_time: Some("2025-03-04 05:06:07".into()),
            ..Message::default()
        };
        let ts = msg.received_at().unwrap();
        assert_eq!(ts.format("%Y-%m-%dT%H:%M:%S").to_string(), "2025-03-04T05:06:07");
    }

    #[test]
    fn received_at_parses_rfc3339() {
        let msg = Message {
            create_time: Some("2025-03-04T05:06:07Z".into()),
            ..Message::default()
        };
        assert!(msg.received_at().is_some());

        let bad = Message {
            create_time: Some("yesterday".into()),
            ..Message::default()
        };
        assert!(bad.received_at().is_none());
    }

    #[test]
    fn subject_match_ignores_case() {
        let msg = Message {
            subject: "VERIFY your email now".into(),
            ..Message::default()
        };
        assert!(msg.subject_contains("verify your email"));
        assert!(!msg.subject_contains("unrelated"));
    }
}
