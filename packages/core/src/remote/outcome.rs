//! Reply Normalization
//!
//! Authority replies have drifted across iterations: success is signalled as
//! `status: "ok"`, `status: "success"`, or by a bare payload with no
//! discriminator at all; result data sits either at the top level or nested
//! under `result`. [`CommandOutcome`] collapses all of that into one
//! discriminated type immediately after the call returns, so the rest of the
//! system never pattern-matches on raw replies.

use serde_json::Value;

use crate::remote::authority::RemoteError;

/// Normalized result of one authority command.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// Command accepted; carries the full reply payload.
    Accepted(Value),
    /// Command processed and explicitly refused by the authority.
    Rejected { message: String },
}

impl CommandOutcome {
    /// Classify a raw reply.
    ///
    /// Unknown `status` strings are treated as rejections: guessing success
    /// on an unrecognized discriminator would desynchronize the store.
    pub fn from_reply(reply: Value) -> Self {
        match reply.get("status").and_then(Value::as_str) {
            None | Some("ok") | Some("success") => Self::Accepted(reply),
            Some("error") => {
                let message = reply
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("authority reported an error without a message")
                    .to_string();
                Self::Rejected { message }
            }
            Some(other) => Self::Rejected {
                message: format!("unrecognized reply status '{other}'"),
            },
        }
    }

    /// Convert into a `Result`, attributing rejections to `command`.
    pub fn into_result(self, command: &str) -> Result<Value, RemoteError> {
        match self {
            Self::Accepted(value) => Ok(value),
            Self::Rejected { message } => Err(RemoteError::rejected(command, message)),
        }
    }
}

/// Locate a named field in a reply, looking at the top level first and under
/// `result` second (both shapes exist in the wild).
pub fn reply_field<'a>(reply: &'a Value, field: &str) -> Option<&'a Value> {
    reply
        .get(field)
        .or_else(|| reply.get("result").and_then(|r| r.get(field)))
}
