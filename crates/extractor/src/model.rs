use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Severity token of a gateway log entry.
///
/// The upstream format pads every token to five columns, so `INFO ` and
/// `WARN ` carry a trailing space on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Error,
    Info,
    Trace,
    Debug,
    Warn,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Error => "error",
            Level::Info => "info",
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Warn => "warn",
        }
    }

    /// Parse the (possibly padded) token captured by the entry grammar.
    pub fn from_token(token: &str) -> Option<Level> {
        match token.trim_end() {
            "ERROR" => Some(Level::Error),
            "INFO" => Some(Level::Info),
            "TRACE" => Some(Level::Trace),
            "DEBUG" => Some(Level::Debug),
            "WARN" => Some(Level::Warn),
            _ => None,
        }
    }
}

/// A line matching the canonical gateway log grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: Level,

    /// Lowercase source tag (`websocket`, `z2m::stream`, ...).
    pub source: String,

    /// Everything after the `> ` separator.
    pub message: String,
}

/// A log entry message announcing an upcoming payload dump.
///
/// The first bracketed group is the name of the gateway connection the
/// diagnostic came from; the second is the topic the unparsed message
/// arrived on. The payload itself follows on later lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub server: String,
    pub topic: String,
}

/// One reconstructed payload record.
///
/// Serializes as `{"topic": ..., "payload": ...}`, one object per sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample {
    pub topic: String,
    pub payload: Value,
}

/// Diagnostic for a capture that closed on text that is not valid JSON.
///
/// The stream continues after a rejection; only this capture is lost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedCapture {
    pub topic: String,

    /// The buffered capture text, verbatim.
    pub raw: String,

    /// JSON parser error text.
    pub reason: String,
}
