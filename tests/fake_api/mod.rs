//! Fake Cloud Mail API for integration testing
//!
//! Wraps a [`mockito`] server with helpers that speak the service's
//! envelope format:
//!
//! ```text
//!   POST /api/public/genToken   Authorization: <jwt secret>
//!     -> {"code": 200, "message": "success", "data": {"token": "..."}}
//!
//!   POST /api/public/emailList  Authorization: <token>
//!     -> {"code": 200, "message": "success", "data": [ ...messages ]}
//! ```
//!
//! Every helper returns the created [`Mock`] so tests can assert how
//! many times an endpoint was hit.

#![allow(dead_code)]

use mockito::{Matcher, Mock, ServerGuard};
use serde_json::{Value, json};

pub const TOKEN_PATH: &str = "/api/public/genToken";
pub const MAIL_LIST_PATH: &str = "/api/public/emailList";

pub const EMAIL: &str = "me@example.com";
pub const PASSWORD: &str = "hunter22";
pub const JWT_SECRET: &str = "s3cr3t-signing-key";
pub const TOKEN: &str = "issued-token-123";

pub struct FakeApi {
    server: ServerGuard,
}

impl FakeApi {
    pub async fn start() -> Self {
        Self {
            server: mockito::Server::new_async().await,
        }
    }

    pub fn url(&self) -> String {
        self.server.url()
    }

    /// Token endpoint that accepts the test credentials.
    pub async fn token_ok(&mut self, token: &str) -> Mock {
        self.server
            .mock("POST", TOKEN_PATH)
            .match_header("authorization", JWT_SECRET)
            .match_body(Matcher::Json(json!({
                "email": EMAIL,
                "password": PASSWORD,
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(success(json!({ "token": token })).to_string())
            .create_async()
            .await
    }

    /// Token endpoint that reports an embedded failure.
    ///
    /// The HTTP status is still 200, as the real service does.
    pub async fn token_rejected(&mut self, code: i64, message: &str) -> Mock {
        self.reply(TOKEN_PATH, json!({ "code": code, "message": message }))
            .await
    }

    /// Token endpoint that reports an embedded failure alongside a
    /// `data` payload that does not look like a token.
    pub async fn token_rejected_with_data(&mut self, code: i64, message: &str, data: Value) -> Mock {
        self.reply(
            TOKEN_PATH,
            json!({ "code": code, "message": message, "data": data }),
        )
        .await
    }

    /// Token endpoint that must never be called.
    pub async fn token_unreachable(&mut self) -> Mock {
        self.server
            .mock("POST", TOKEN_PATH)
            .expect(0)
            .create_async()
            .await
    }

    /// Mail-list endpoint returning `data` verbatim for any request
    /// carrying the test token.
    pub async fn mail_list(&mut self, data: Value) -> Mock {
        self.mail_list_matching(Matcher::Any, data).await
    }

    /// Mail-list endpoint that only answers requests whose body matches
    /// `body`.
    pub async fn mail_list_matching(&mut self, body: Matcher, data: Value) -> Mock {
        self.server
            .mock("POST", MAIL_LIST_PATH)
            .match_header("authorization", TOKEN)
            .match_body(body)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(success(data).to_string())
            .create_async()
            .await
    }

    /// Mail-list endpoint that must never be called.
    pub async fn mail_list_unreachable(&mut self) -> Mock {
        self.server
            .mock("POST", MAIL_LIST_PATH)
            .expect(0)
            .create_async()
            .await
    }

    /// Mail-list endpoint that reports an embedded failure.
    pub async fn mail_list_rejected(&mut self, code: i64, message: &str) -> Mock {
        self.reply(MAIL_LIST_PATH, json!({ "code": code, "message": message }))
            .await
    }

    /// Mail-list endpoint that reports an embedded failure alongside a
    /// `data` payload that is not a mail list.
    pub async fn mail_list_rejected_with_data(
        &mut self,
        code: i64,
        message: &str,
        data: Value,
    ) -> Mock {
        self.reply(
            MAIL_LIST_PATH,
            json!({ "code": code, "message": message, "data": data }),
        )
        .await
    }

    /// Mail-list endpoint answering with a transport-level error.
    pub async fn mail_list_http_error(&mut self, status: usize) -> Mock {
        self.server
            .mock("POST", MAIL_LIST_PATH)
            .with_status(status)
            .with_body("upstream unavailable")
            .create_async()
            .await
    }

    /// Answer any POST to `path` with `body` and HTTP 200.
    async fn reply(&mut self, path: &str, body: Value) -> Mock {
        self.server
            .mock("POST", path)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await
    }
}

/// Wrap `data` in a success envelope.
pub fn success(data: Value) -> Value {
    json!({ "code": 200, "message": "success", "data": data })
}

/// A mail record as the service returns it.
pub fn message(id: u64, sender: &str, subject: &str, created: &str) -> Value {
    json!({
        "emailId": id,
        "sendEmail": sender,
        "sendName": "Sender",
        "subject": subject,
        "toEmail": EMAIL,
        "createTime": created,
        "text": format!("Body of {subject}"),
        "content": format!("<p>Body of {subject}</p>"),
        "accountId": 1,
    })
}
