//! The pluggable detector trait.

use crate::core::config::AnalyzerOptions;
use crate::core::errors::Result;
use crate::core::findings::{Finding, SourceTag};

/// A pluggable component producing findings from source text.
///
/// Detectors must be side-effect-free with respect to shared mutable state:
/// the orchestrator may run them in parallel within one analysis call, each
/// writing into its own buffer. Detectors must not depend on each other's
/// output.
pub trait Detector: Send + Sync {
    /// Stable identifier used for registration and deduplicated logging.
    fn id(&self) -> &str;

    /// Which finding family this detector emits.
    fn source_tag(&self) -> SourceTag;

    /// Whether this detector should run under the given options.
    fn is_enabled(&self, options: &AnalyzerOptions) -> bool;

    /// Receive updated options on reconfiguration.
    ///
    /// Most detectors read options per call and need no stored state; the
    /// default is a no-op.
    fn configure(&mut self, _options: &AnalyzerOptions) {}

    /// Analyze one source snapshot and return raw findings.
    ///
    /// Offsets in returned findings are character offsets into `source`.
    /// Recoverable failures (unsupported language, parse errors) must be
    /// handled inside the detector and yield an empty set; an `Err` here is
    /// logged by the orchestrator and contributes no findings.
    fn analyze(&self, source: &str, options: &AnalyzerOptions) -> Result<Vec<Finding>>;
}
