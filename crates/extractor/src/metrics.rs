use serde::Serialize;

/// Counters owned by one machine instance.
///
/// A machine is driven from a single thread (`feed` takes `&mut self`),
/// so plain integers are enough; readers take a [`MetricsSnapshot`].
#[derive(Debug, Default, Clone)]
pub struct ExtractorMetrics {
    lines_seen: u64,
    blank_lines: u64,
    entries_matched: u64,
    markers_seen: u64,
    object_blocks_skipped: u64,
    banner_sections_skipped: u64,
    samples_emitted: u64,
    captures_rejected: u64,
    captures_discarded: u64,
}

impl ExtractorMetrics {
    #[inline]
    pub(crate) fn record_line(&mut self) {
        self.lines_seen += 1;
    }

    #[inline]
    pub(crate) fn record_blank(&mut self) {
        self.blank_lines += 1;
    }

    /// Record a line classified as a well-formed entry, in any state.
    #[inline]
    pub(crate) fn record_entry(&mut self) {
        self.entries_matched += 1;
    }

    #[inline]
    pub(crate) fn record_marker(&mut self) {
        self.markers_seen += 1;
    }

    #[inline]
    pub(crate) fn record_object_block(&mut self) {
        self.object_blocks_skipped += 1;
    }

    #[inline]
    pub(crate) fn record_banner_section(&mut self) {
        self.banner_sections_skipped += 1;
    }

    #[inline]
    pub(crate) fn record_emitted(&mut self) {
        self.samples_emitted += 1;
    }

    #[inline]
    pub(crate) fn record_rejected(&mut self) {
        self.captures_rejected += 1;
    }

    /// Record a capture dropped at end of stream.
    #[inline]
    pub(crate) fn record_discarded(&mut self) {
        self.captures_discarded += 1;
    }

    /// Create a snapshot of current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let closed =
            self.samples_emitted + self.captures_rejected + self.captures_discarded;

        MetricsSnapshot {
            lines_seen: self.lines_seen,
            blank_lines: self.blank_lines,
            entries_matched: self.entries_matched,
            markers_seen: self.markers_seen,
            object_blocks_skipped: self.object_blocks_skipped,
            banner_sections_skipped: self.banner_sections_skipped,
            samples_emitted: self.samples_emitted,
            captures_rejected: self.captures_rejected,
            captures_discarded: self.captures_discarded,
            capture_success_rate: if closed > 0 {
                self.samples_emitted as f64 / closed as f64
            } else {
                1.0
            },
        }
    }
}

/// A read-only snapshot of extraction counters.
///
/// Cheap to clone and serializable, for logging or end-of-run reports.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub lines_seen: u64,
    pub blank_lines: u64,
    pub entries_matched: u64,
    pub markers_seen: u64,
    pub object_blocks_skipped: u64,
    pub banner_sections_skipped: u64,
    pub samples_emitted: u64,
    pub captures_rejected: u64,
    pub captures_discarded: u64,
    pub capture_success_rate: f64,
}
