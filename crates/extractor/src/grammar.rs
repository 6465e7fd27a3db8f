//! Line classification for gateway log streams.
//!
//! Every line maps to exactly one shape. Cheap exact comparisons run
//! first (blank, object braces, banner); the entry grammar runs last.

use regex::Regex;

use crate::config::ExtractorConfig;
use crate::model::{Level, LogEntry, Marker};

/// Canonical entry grammar: date-like prefix, padded severity token,
/// lowercase source tag, `> ` separator, message.
const ENTRY_PATTERN: &str =
    r"^\s*[0-9]{4}-[0-9]{2}-[0-9]{2}.+(ERROR|INFO |TRACE|DEBUG|WARN )\s+([a-z0-9_:-]+)\s+> (.+)$";

/// Classification of a single input line.
///
/// Shapes other than `Entry` and `Banner` have positional meaning only:
/// inside a capture they are plain payload text, and an `ObjectClose`
/// outside an object block is inert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineShape {
    /// Empty after trailing-whitespace trim.
    Blank,
    /// A line that is exactly `{`, opening an opaque debug dump.
    ObjectOpen,
    /// A line that is exactly `}`, closing an opaque debug dump.
    ObjectClose,
    /// The fixed-width section separator.
    Banner,
    /// A line matching the canonical entry grammar.
    Entry(LogEntry),
    /// Free-form text.
    Other,
}

/// Compiled recognizers for one stream configuration.
///
/// The marker pattern embeds the configured bus label, so a `Grammar` is
/// built per configuration rather than shared as a static.
pub struct Grammar {
    entry_pattern: Regex,
    marker_pattern: Regex,
    banner: String,
}

impl Grammar {
    pub fn new(config: &ExtractorConfig) -> Result<Self, regex::Error> {
        let marker = format!(
            r"^\[(.+)\] Failed to parse \(non-critical\) {} bridge message on \[(.+)\]:$",
            regex::escape(&config.bus_label),
        );
        Ok(Self {
            entry_pattern: Regex::new(ENTRY_PATTERN)?,
            marker_pattern: Regex::new(&marker)?,
            banner: config.banner_line(),
        })
    }

    /// Classify one line.
    ///
    /// The caller strips trailing whitespace first. Leading whitespace is
    /// significant: banners are indented, object braces are not.
    pub fn classify(&self, line: &str) -> LineShape {
        if line.is_empty() {
            return LineShape::Blank;
        }
        if line == "{" {
            return LineShape::ObjectOpen;
        }
        if line == "}" {
            return LineShape::ObjectClose;
        }
        if line == self.banner {
            return LineShape::Banner;
        }
        match self.entry(line) {
            Some(entry) => LineShape::Entry(entry),
            None => LineShape::Other,
        }
    }

    /// Parse a line against the entry grammar alone.
    pub fn entry(&self, line: &str) -> Option<LogEntry> {
        let caps = self.entry_pattern.captures(line)?;
        let level = Level::from_token(&caps[1])?;
        Some(LogEntry {
            level,
            source: caps[2].to_string(),
            message: caps[3].to_string(),
        })
    }

    /// Match an entry message against the parse-failure marker grammar.
    pub fn marker(&self, message: &str) -> Option<Marker> {
        let caps = self.marker_pattern.captures(message)?;
        Some(Marker {
            server: caps[1].to_string(),
            topic: caps[2].to_string(),
        })
    }
}
