//! The capture state machine.
//!
//! One [`Extractor`] instance owns the state for one log stream. Feeding a
//! line advances the machine and yields at most one output: a
//! reconstructed sample, or a diagnostic for a capture whose buffered
//! text did not parse.
//!
//! At most one capture is open at a time. The upstream protocol is
//! strictly sequential; interleaved markers for different topics are not
//! merged, the earlier capture is closed by the later marker line.

use serde_json::Value;

use crate::config::ExtractorConfig;
use crate::error::ExtractResult;
use crate::grammar::{Grammar, LineShape};
use crate::metrics::{ExtractorMetrics, MetricsSnapshot};
use crate::model::{Marker, RejectedCapture, Sample};

/// Machine state. States that carry a capture own its data, so an open
/// capture cannot be observed without its marker and buffer.
#[derive(Debug)]
enum State {
    /// Scanning for markers and section boundaries.
    Idle,
    /// Inside a `{` ... `}` debug dump; content is opaque.
    SkippingObjectBlock,
    /// Inside a banner-framed section; content is opaque.
    SkippingBanner,
    /// A marker was seen; the next line starts the payload.
    AwaitingCaptureStart { marker: Marker },
    /// Accumulating payload text until a boundary line closes it.
    Capturing { marker: Marker, buf: String },
}

/// Outcome of feeding one line.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Line consumed; nothing to report.
    Consumed,
    /// A capture closed cleanly.
    Emitted(Sample),
    /// A capture closed, but its buffered text was not valid JSON.
    Rejected(RejectedCapture),
}

/// Streaming extractor for failed-to-parse payload dumps.
///
/// Construct one per stream; instances share nothing. The machine never
/// fails mid-stream: every line is consumed, and the worst outcome for a
/// line is a [`Step::Rejected`] diagnostic.
pub struct Extractor {
    grammar: Grammar,
    state: State,
    metrics: ExtractorMetrics,
}

impl Extractor {
    pub fn new(config: &ExtractorConfig) -> ExtractResult<Self> {
        config.validate()?;
        Ok(Self {
            grammar: Grammar::new(config)?,
            state: State::Idle,
            metrics: ExtractorMetrics::default(),
        })
    }

    /// Advance the machine by one line.
    ///
    /// Trailing whitespace is stripped before classification. Blank lines
    /// are dropped without touching the state.
    pub fn feed(&mut self, line: &str) -> Step {
        let line = line.trim_end();
        self.metrics.record_line();
        if line.is_empty() {
            self.metrics.record_blank();
            return Step::Consumed;
        }
        let shape = self.grammar.classify(line);
        if matches!(shape, LineShape::Entry(_)) {
            self.metrics.record_entry();
        }
        self.dispatch(line, shape)
    }

    fn dispatch(&mut self, line: &str, shape: LineShape) -> Step {
        match std::mem::replace(&mut self.state, State::Idle) {
            State::Idle => {
                self.state = self.idle_transition(shape);
                Step::Consumed
            }
            State::SkippingObjectBlock => {
                self.state = if shape == LineShape::ObjectClose {
                    tracing::trace!("object block closed");
                    State::Idle
                } else {
                    State::SkippingObjectBlock
                };
                Step::Consumed
            }
            State::SkippingBanner => {
                self.state = if shape == LineShape::Banner {
                    tracing::trace!("banner section closed");
                    State::Idle
                } else {
                    State::SkippingBanner
                };
                Step::Consumed
            }
            State::AwaitingCaptureStart { marker } => {
                // The payload normally arrives as the message of a
                // well-formed entry. Anything else becomes the initial
                // buffer verbatim, so a protocol violation surfaces as a
                // rejected capture instead of being silently dropped.
                let buf = match shape {
                    LineShape::Entry(entry) => entry.message,
                    _ => line.to_string(),
                };
                self.state = State::Capturing { marker, buf };
                Step::Consumed
            }
            State::Capturing { marker, mut buf } => match shape {
                LineShape::Entry(_) | LineShape::Banner => {
                    let step = self.close_capture(marker, buf);
                    // The boundary line is not part of the capture; it is
                    // re-examined as a fresh event.
                    self.state = self.idle_transition(shape);
                    step
                }
                _ => {
                    buf.push_str(line);
                    self.state = State::Capturing { marker, buf };
                    Step::Consumed
                }
            },
        }
    }

    /// Transition out of `Idle` for a classified line.
    ///
    /// Also applied to the line that closed a capture, which makes a
    /// back-to-back marker open the next capture and a closing banner
    /// enter the banner skip.
    fn idle_transition(&mut self, shape: LineShape) -> State {
        match shape {
            LineShape::ObjectOpen => {
                tracing::trace!("skipping object block");
                self.metrics.record_object_block();
                State::SkippingObjectBlock
            }
            LineShape::Banner => {
                tracing::trace!("skipping banner section");
                self.metrics.record_banner_section();
                State::SkippingBanner
            }
            LineShape::Entry(entry) => match self.grammar.marker(&entry.message) {
                Some(marker) => {
                    tracing::debug!(
                        server = %marker.server,
                        topic = %marker.topic,
                        "parse-failure marker seen"
                    );
                    self.metrics.record_marker();
                    State::AwaitingCaptureStart { marker }
                }
                None => State::Idle,
            },
            // A stray `}` and free-form text are inert outside a capture.
            LineShape::ObjectClose | LineShape::Other | LineShape::Blank => State::Idle,
        }
    }

    fn close_capture(&mut self, marker: Marker, buf: String) -> Step {
        match serde_json::from_str::<Value>(&buf) {
            Ok(payload) => {
                tracing::debug!(
                    server = %marker.server,
                    topic = %marker.topic,
                    bytes = buf.len(),
                    "sample reconstructed"
                );
                self.metrics.record_emitted();
                Step::Emitted(Sample {
                    topic: marker.topic,
                    payload,
                })
            }
            Err(err) => {
                tracing::warn!(
                    server = %marker.server,
                    topic = %marker.topic,
                    error = %err,
                    raw = %buf,
                    "rejecting capture: buffered text is not valid JSON"
                );
                self.metrics.record_rejected();
                Step::Rejected(RejectedCapture {
                    topic: marker.topic,
                    raw: buf,
                    reason: err.to_string(),
                })
            }
        }
    }

    /// Signal end of stream.
    ///
    /// An open capture is dropped without emitting a partial sample; half
    /// a payload is not a payload.
    pub fn finish(&mut self) {
        match std::mem::replace(&mut self.state, State::Idle) {
            State::AwaitingCaptureStart { marker } => {
                self.metrics.record_discarded();
                tracing::debug!(
                    topic = %marker.topic,
                    "stream ended before capture started"
                );
            }
            State::Capturing { marker, buf } => {
                self.metrics.record_discarded();
                tracing::debug!(
                    topic = %marker.topic,
                    buffered = buf.len(),
                    "stream ended with capture open; dropping partial payload"
                );
            }
            other => self.state = other,
        }
    }

    /// Returns true if a marker has been seen whose capture has not yet
    /// closed.
    pub fn has_open_capture(&self) -> bool {
        matches!(
            self.state,
            State::AwaitingCaptureStart { .. } | State::Capturing { .. }
        )
    }

    /// Counters for the stream consumed so far.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Wrap this machine and a line source into a lazy sample iterator.
    ///
    /// Rejected captures are logged and skipped; an open capture is
    /// discarded when the source is exhausted.
    pub fn into_samples<I>(self, lines: I) -> Samples<I::IntoIter>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        Samples {
            machine: self,
            lines: lines.into_iter(),
            done: false,
        }
    }
}

/// Lazy iterator of samples over a line source.
pub struct Samples<I> {
    machine: Extractor,
    lines: I,
    done: bool,
}

impl<I> Samples<I> {
    /// Counters for the stream consumed so far.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.machine.metrics()
    }
}

impl<I> Iterator for Samples<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    type Item = Sample;

    fn next(&mut self) -> Option<Sample> {
        while !self.done {
            match self.lines.next() {
                Some(line) => {
                    if let Step::Emitted(sample) = self.machine.feed(line.as_ref()) {
                        return Some(sample);
                    }
                }
                None => {
                    self.machine.finish();
                    self.done = true;
                }
            }
        }
        None
    }
}
