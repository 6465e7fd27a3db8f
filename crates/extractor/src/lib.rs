//! Streaming reconstruction of failed-to-parse device-bus payloads from
//! gateway log streams.
//!
//! The gateway logs a "failed to parse (non-critical)" diagnostic when a
//! bus message does not deserialize, then dumps the offending payload over
//! the following lines. This crate scans a stream of log lines, reassembles
//! each dump into a single JSON value, and yields it tagged with the topic
//! it arrived on. Line acquisition and record storage stay with the caller.

// Core infrastructure
pub mod config;
pub mod error;
pub mod model;

// Extraction pipeline
pub mod grammar;
pub mod machine;
pub mod metrics;

// Re-export commonly used types
pub use config::ExtractorConfig;
pub use error::{ConfigError, ExtractError, ExtractResult};
pub use grammar::{Grammar, LineShape};
pub use machine::{Extractor, Samples, Step};
pub use metrics::MetricsSnapshot;
pub use model::{Level, LogEntry, Marker, RejectedCapture, Sample};

// Constants
pub const DEFAULT_BUS_LABEL: &str = "z2m";
pub const DEFAULT_BANNER_WIDTH: usize = 67;
