//! Line protocol spoken by the bridge script
//!
//! Each answer is a single stdout line: the marker followed by a JSON envelope.
//! Lines without the marker come from the Node packages themselves and are not
//! part of the protocol.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::error::{Error, Result};

pub const MARKER: &str = "__CUBEJS_CLI__";

/// A request to the long-running `driver` mode
#[derive(Debug, Serialize)]
pub struct Request<'a> {
    pub id: u64,
    pub method: &'a str,
}

impl Request<'_> {
    pub fn to_line(&self) -> Result<String> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }
}

/// An answer from the bridge
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
}

impl Envelope {
    /// The result value, or the error text reported by Node
    pub fn into_result(self) -> std::result::Result<Value, String> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.result.unwrap_or(Value::Null)),
        }
    }
}

/// Parse one stdout line; `None` for lines that carry no envelope
pub fn parse_line(line: &str) -> Option<Result<Envelope>> {
    let payload = line.trim_end_matches(['\r', '\n']).strip_prefix(MARKER)?;
    Some(serde_json::from_str(payload).map_err(|e| {
        Error::bridge(format!("malformed answer from the Node bridge: {e}"))
    }))
}

/// The last envelope in a one-shot invocation's stdout
pub fn find_envelope(stdout: &str) -> Option<Result<Envelope>> {
    stdout.lines().rev().find_map(parse_line)
}
