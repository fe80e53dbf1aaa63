//! Structured engine events.
//!
//! The orchestrator reports progress and degradations through a single
//! side-channel of [`EngineEvent`] values; engine correctness never depends
//! on a sink succeeding.

use serde::Serialize;
use tracing::{debug, warn};

/// Structured event emitted by the orchestrator during analysis.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EngineEvent {
    /// An analysis call began
    AnalysisStarted {
        /// Source length in characters
        source_chars: usize,
        /// Registered detectors eligible to run
        detectors: usize,
    },

    /// A detector finished
    DetectorCompleted {
        /// Detector identifier
        detector: String,
        /// Raw findings produced
        findings: usize,
    },

    /// A detector returned an error; its findings were discarded
    DetectorFailed {
        /// Detector identifier
        detector: String,
        /// Error description
        message: String,
    },

    /// A second detector with the same id was ignored
    DuplicateDetector {
        /// Detector identifier
        detector: String,
    },

    /// A finding was dropped before inclusion in the result
    FindingDropped {
        /// Offending range start
        start: usize,
        /// Offending range end
        end: usize,
        /// Why it was dropped
        reason: String,
    },

    /// A lexical finding was enriched with a provider suggestion
    AugmentationApplied {
        /// Token that was augmented
        original: String,
    },

    /// An analysis call finished
    AnalysisCompleted {
        /// Final finding count
        findings: usize,
        /// Wall-clock duration in milliseconds
        duration_ms: u64,
    },
}

/// Observer receiving engine events.
pub trait EventSink: Send + Sync {
    /// Receive one event. Must not panic; failures are the sink's problem.
    fn emit(&self, event: &EngineEvent);
}

/// Default sink forwarding events to `tracing`.
#[derive(Debug, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: &EngineEvent) {
        match event {
            EngineEvent::DetectorFailed { detector, message } => {
                warn!(detector = %detector, message = %message, "detector failed");
            }
            EngineEvent::FindingDropped { start, end, reason } => {
                warn!(start = *start, end = *end, reason = %reason, "finding dropped");
            }
            EngineEvent::DuplicateDetector { detector } => {
                warn!(detector = %detector, "duplicate detector registration ignored");
            }
            other => debug!(event = ?other, "engine event"),
        }
    }
}
