//! Gateway transport
//!
//! [`Http`] is the seam the client talks through; [`HttpClient`] is the
//! `reqwest` implementation used outside of tests.

pub mod client;

pub use client::HttpClient;

use crate::error::GopayResult;
use async_trait::async_trait;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// Request body as the gateway expects it
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Empty,
    Json(Value),
    Form(Vec<(String, String)>),
}

/// Credentials attached to a request
#[derive(Clone, PartialEq)]
pub enum Credentials {
    None,
    Bearer(String),
    Basic { username: String, password: String },
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::None => f.write_str("None"),
            Credentials::Bearer(_) => f.write_str("Bearer(***)"),
            Credentials::Basic { username, .. } => write!(f, "Basic({}:***)", username),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    /// Path relative to the gateway base URL, starting with `/`
    pub path: String,
    pub body: Body,
    pub credentials: Credentials,
}

impl Request {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: Body::Empty,
            credentials: Credentials::None,
        }
    }

    pub fn post(path: impl Into<String>, body: Body) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            body,
            credentials: Credentials::None,
        }
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    /// Body parsed as JSON, `None` when empty or not JSON
    pub data: Option<Value>,
    /// Body as received
    pub body: Vec<u8>,
}

impl Response {
    /// Deserialize the body into `T`
    pub fn json<T>(self) -> GopayResult<T>
    where
        T: for<'de> serde::Deserialize<'de>,
    {
        let data = self.data.unwrap_or(Value::Null);
        Ok(serde_json::from_value(data)?)
    }
}

/// Sends requests to the gateway
///
/// Implementations translate non-2xx statuses and gateway `errors` payloads
/// into [`crate::error::GopayError`]; a returned `Response` is always a success.
#[async_trait]
pub trait Http: Send + Sync {
    async fn send(&self, request: Request) -> GopayResult<Response>;
}
