//! Result of a single cycle and its classification.

use std::fmt::{self, Display, Formatter};

use serde_json::Value;

use crate::prelude::*;
use crate::transport::{Reply, TransportError};

const UNKNOWN_ERROR: &str = "Unknown error";

/// What happened to a cycle. Every variant but `Sent` is a failure.
#[derive(Debug)]
pub enum Outcome {
    Sent { value: f64, unit: String, at: DateTime<Local> },

    /// Timeout or connection failure, expected to go away by itself.
    Transient(Transient),

    /// The endpoint has answered but refused the value.
    Rejected(Rejection),

    Unexpected(anyhow::Error),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transient {
    Timeout,
    Connection,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    /// `200 OK` with a falsy `success`.
    Application(String),

    /// Any status other than `200 OK`.
    Status { code: u16, body: String },
}

impl Outcome {
    /// Classifies the endpoint reply for the sent `value`.
    pub fn from_reply(reply: Reply, value: f64, unit: &str) -> Self {
        if reply.status != 200 {
            return Outcome::Rejected(Rejection::Status {
                code: reply.status,
                body: reply.body,
            });
        }
        let response = match serde_json::from_str::<Value>(&reply.body) {
            Ok(Value::Object(response)) => response,
            Ok(_) => return Outcome::Unexpected(anyhow!("Response is not an object: {}", reply.body)),
            Err(error) => {
                let context = format!("Invalid response: {}", reply.body);
                return Outcome::Unexpected(anyhow::Error::new(error).context(context));
            }
        };
        if response.get("success").map_or(false, is_truthy) {
            Outcome::Sent {
                value,
                unit: unit.into(),
                at: Local::now(),
            }
        } else {
            let message = match response.get("error") {
                Some(Value::String(message)) => message.clone(),
                Some(Value::Null) | None => UNKNOWN_ERROR.into(),
                Some(error) => error.to_string(),
            };
            Outcome::Rejected(Rejection::Application(message))
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Sent { .. })
    }

    /// Logs the outcome at the level matching its severity.
    pub fn log(&self) {
        match self {
            Outcome::Sent { .. } => info!("{}", self),
            Outcome::Transient(_) => warn!("{}", self),
            Outcome::Rejected(_) | Outcome::Unexpected(_) => error!("{}", self),
        }
    }
}

impl From<TransportError> for Outcome {
    fn from(error: TransportError) -> Self {
        match error {
            TransportError::Timeout => Outcome::Transient(Transient::Timeout),
            TransportError::Connection(reason) => {
                debug!("Connection has failed: {}", reason);
                Outcome::Transient(Transient::Connection)
            }
            TransportError::Other(error) => Outcome::Unexpected(error),
        }
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Sent { value, unit, at } => {
                write!(f, "{} | Sent: {} {}", at.format("%Y-%m-%d %H:%M:%S"), value, unit)
            }
            Outcome::Transient(Transient::Timeout) => f.write_str("Timeout, reconnecting on the next cycle…"),
            Outcome::Transient(Transient::Connection) => {
                f.write_str("No connection, reconnecting on the next cycle…")
            }
            Outcome::Rejected(Rejection::Application(message)) => write!(f, "Error: {}", message),
            Outcome::Rejected(Rejection::Status { code, body }) => write!(f, "HTTP error {}: {}", code, body),
            Outcome::Unexpected(error) => write!(f, "Error: {:#}", error),
        }
    }
}

/// JSON falsiness: `null`, `false`, `0`, `""`, `[]` and `{}` are falsy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(value) => *value,
        Value::Number(number) => number.as_f64().map_or(true, |number| number != 0.0),
        Value::String(string) => !string.is_empty(),
        Value::Array(array) => !array.is_empty(),
        Value::Object(object) => !object.is_empty(),
    }
}
