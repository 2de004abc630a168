//! Authority Transport
//!
//! The authority exposes two channels: a command channel (POST `/dispatch`
//! with `{"cmd": ..., ...payload}`) and a path-addressed query channel (plain
//! GET returning JSON). [`GraphAuthority`] abstracts both so services can be
//! driven by an in-memory double in tests.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::time::Duration;
use thiserror::Error;

/// Default authority address (local single-user deployment).
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Transport- and protocol-level failures of the authority boundary.
#[derive(Error, Debug)]
pub enum RemoteError {
    /// Network / connection / decode failure below the protocol level.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Authority answered with a non-success HTTP status.
    #[error("Authority returned HTTP {status} for {context}")]
    Status { status: u16, context: String },

    /// Authority processed the command and reported failure.
    #[error("Command '{command}' rejected: {message}")]
    Rejected { command: String, message: String },

    /// Reply arrived but is missing fields the client depends on.
    #[error("Malformed reply for '{command}': {context}")]
    Malformed { command: String, context: String },
}

impl RemoteError {
    pub fn rejected(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rejected {
            command: command.into(),
            message: message.into(),
        }
    }

    pub fn malformed(command: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Malformed {
            command: command.into(),
            context: context.into(),
        }
    }
}

/// Connection settings for [`HttpAuthority`].
#[derive(Debug, Clone)]
pub struct AuthorityConfig {
    pub base_url: String,
    pub request_timeout: Duration,
}

impl Default for AuthorityConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Transport to the remote graph authority.
///
/// `dispatch` carries mutations and engine control; `fetch` carries
/// snapshot/startup/log queries. Implementations return raw JSON - reply
/// normalization happens in [`crate::remote::CommandOutcome`].
#[async_trait]
pub trait GraphAuthority: Send + Sync {
    /// Send a command with a JSON-serializable payload over the command
    /// channel and return the raw reply.
    async fn dispatch(&self, cmd: &str, payload: Value) -> Result<Value, RemoteError>;

    /// GET a path on the query channel and return the raw JSON body.
    async fn fetch(&self, path: &str) -> Result<Value, RemoteError>;
}

/// HTTP implementation of [`GraphAuthority`] over reqwest.
pub struct HttpAuthority {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAuthority {
    pub fn new(config: AuthorityConfig) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl GraphAuthority for HttpAuthority {
    async fn dispatch(&self, cmd: &str, payload: Value) -> Result<Value, RemoteError> {
        // The wire format flattens the payload next to the command name.
        let mut body = match payload {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                let mut map = Map::new();
                map.insert("payload".to_string(), other);
                map
            }
        };
        body.insert("cmd".to_string(), Value::String(cmd.to_string()));

        let response = self
            .client
            .post(self.url("/dispatch"))
            .json(&Value::Object(body))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status {
                status: status.as_u16(),
                context: format!("command '{cmd}'"),
            });
        }

        Ok(response.json().await?)
    }

    async fn fetch(&self, path: &str) -> Result<Value, RemoteError> {
        let response = self.client.get(self.url(path)).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status {
                status: status.as_u16(),
                context: format!("query '{path}'"),
            });
        }

        Ok(response.json().await?)
    }
}
