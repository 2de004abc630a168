//! Shared test doubles for the synchronization services.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;

use crate::remote::{GraphAuthority, RemoteError};

/// Scripted behavior for one dispatched command or fetched path.
#[derive(Debug, Clone)]
pub enum Script {
    /// Reply with this raw JSON value.
    Reply(Value),
    /// Fail at the transport level (maps to `RemoteError::Status`).
    Unreachable,
}

/// In-memory [`GraphAuthority`] double.
///
/// Commands and queries not scripted explicitly answer `{"status": "ok"}` /
/// `null`, so tests only script what they assert on. Every dispatch is
/// recorded for payload assertions.
#[derive(Default)]
pub struct FakeAuthority {
    scripts: Mutex<HashMap<String, Vec<Script>>>,
    pub dispatched: Mutex<Vec<(String, Value)>>,
    pub fetched: Mutex<Vec<String>>,
}

impl FakeAuthority {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a scripted behavior for a command name or query path.
    /// Queued entries are consumed front-first; the queue empty means the
    /// default reply.
    pub fn script(&self, key: &str, script: Script) {
        self.scripts
            .lock()
            .unwrap()
            .entry(key.to_string())
            .or_default()
            .push(script);
    }

    /// Convenience: script an authority-side rejection.
    pub fn reject(&self, key: &str, message: &str) {
        self.script(
            key,
            Script::Reply(json!({"status": "error", "message": message})),
        );
    }

    fn next_script(&self, key: &str) -> Option<Script> {
        let mut scripts = self.scripts.lock().unwrap();
        let queue = scripts.get_mut(key)?;
        if queue.is_empty() {
            None
        } else {
            Some(queue.remove(0))
        }
    }

    /// Command names dispatched so far, in order.
    pub fn dispatched_commands(&self) -> Vec<String> {
        self.dispatched
            .lock()
            .unwrap()
            .iter()
            .map(|(cmd, _)| cmd.clone())
            .collect()
    }
}

#[async_trait]
impl GraphAuthority for FakeAuthority {
    async fn dispatch(&self, cmd: &str, payload: Value) -> Result<Value, RemoteError> {
        self.dispatched
            .lock()
            .unwrap()
            .push((cmd.to_string(), payload));
        match self.next_script(cmd) {
            Some(Script::Reply(value)) => Ok(value),
            Some(Script::Unreachable) => Err(RemoteError::Status {
                status: 503,
                context: format!("command '{cmd}'"),
            }),
            None => Ok(json!({"status": "ok"})),
        }
    }

    async fn fetch(&self, path: &str) -> Result<Value, RemoteError> {
        self.fetched.lock().unwrap().push(path.to_string());
        match self.next_script(path) {
            Some(Script::Reply(value)) => Ok(value),
            Some(Script::Unreachable) => Err(RemoteError::Status {
                status: 503,
                context: format!("query '{path}'"),
            }),
            None => Ok(Value::Null),
        }
    }
}
