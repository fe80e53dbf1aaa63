//! Analysis orchestration: detector registry, augmentation, deduplication,
//! and safe fix application.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use chrono::Utc;
use futures::stream::{self, StreamExt};
use rayon::prelude::*;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::core::config::AnalyzerOptions;
use crate::core::errors::{Result, RunelintError};
use crate::core::findings::{AnalysisResult, Finding, Severity, SourceTag};
use crate::core::text::splice_edits;
use crate::detectors::common::Detector;
use crate::engine::events::{EngineEvent, EventSink, TracingSink};
use crate::semantic::provider::{context_window, SemanticAugmenter};

/// Composition root: holds the detector registry, active options, and the
/// optional semantic augmenter, and exposes the engine's public operations.
pub struct AnalysisOrchestrator {
    detectors: Vec<Box<dyn Detector>>,
    options: ArcSwap<AnalyzerOptions>,
    augmenter: Option<Arc<dyn SemanticAugmenter>>,
    sinks: Vec<Arc<dyn EventSink>>,
}

impl AnalysisOrchestrator {
    /// Create an orchestrator with the given options and a default
    /// tracing-backed event sink.
    pub fn new(options: AnalyzerOptions) -> Self {
        Self {
            detectors: Vec::new(),
            options: ArcSwap::from_pointee(options),
            augmenter: None,
            sinks: vec![Arc::new(TracingSink)],
        }
    }

    /// Add a named detector to the registry.
    ///
    /// Duplicate ids are logged and ignored; registration is idempotent by
    /// design, never a fatal error.
    pub fn register(&mut self, detector: Box<dyn Detector>) {
        if self.detectors.iter().any(|d| d.id() == detector.id()) {
            self.emit(&EngineEvent::DuplicateDetector {
                detector: detector.id().to_string(),
            });
            return;
        }
        debug!(detector = detector.id(), "registered detector");
        self.detectors.push(detector);
    }

    /// Atomically replace the active options and propagate them to every
    /// registered detector.
    pub fn configure(&mut self, options: AnalyzerOptions) -> Result<()> {
        options.validate()?;
        for detector in &mut self.detectors {
            detector.configure(&options);
        }
        self.options.store(Arc::new(options));
        Ok(())
    }

    /// Attach the semantic augmentation capability.
    pub fn attach_augmenter(&mut self, augmenter: Arc<dyn SemanticAugmenter>) {
        self.augmenter = Some(augmenter);
    }

    /// Add an observer for structured engine events.
    pub fn add_event_sink(&mut self, sink: Arc<dyn EventSink>) {
        self.sinks.push(sink);
    }

    /// Snapshot of the active options.
    pub fn options(&self) -> Arc<AnalyzerOptions> {
        self.options.load_full()
    }

    /// Ids of the registered detectors, in registration order.
    pub fn detector_ids(&self) -> Vec<&str> {
        self.detectors.iter().map(|d| d.id()).collect()
    }

    fn emit(&self, event: &EngineEvent) {
        for sink in &self.sinks {
            sink.emit(event);
        }
    }

    /// Run the full analysis pipeline against one source snapshot.
    pub async fn analyze(&self, source: &str) -> Result<AnalysisResult> {
        self.analyze_with_cancellation(source, CancellationToken::new())
            .await
    }

    /// Run the full analysis pipeline, observing a cancellation token.
    ///
    /// A cancelled call returns [`RunelintError::Cancelled`] promptly and
    /// never a partial result.
    pub async fn analyze_with_cancellation(
        &self,
        source: &str,
        cancel: CancellationToken,
    ) -> Result<AnalysisResult> {
        let started = Instant::now();
        let options = self.options.load_full();
        let source_chars = source.chars().count();

        let enabled: Vec<&Box<dyn Detector>> = self
            .detectors
            .iter()
            .filter(|d| d.is_enabled(&options))
            .collect();

        self.emit(&EngineEvent::AnalysisStarted {
            source_chars,
            detectors: enabled.len(),
        });

        if cancel.is_cancelled() {
            return Err(RunelintError::Cancelled);
        }

        // Detector fan-out: each detector fills its own buffer, merged after
        // the join. Detectors are side-effect-free, so parallel execution is
        // safe.
        let buffers: Vec<(String, Result<Vec<Finding>>)> = enabled
            .par_iter()
            .map(|detector| {
                (
                    detector.id().to_string(),
                    detector.analyze(source, &options),
                )
            })
            .collect();

        let mut findings = Vec::new();
        for (detector, buffer) in buffers {
            match buffer {
                Ok(batch) => {
                    self.emit(&EngineEvent::DetectorCompleted {
                        detector,
                        findings: batch.len(),
                    });
                    findings.extend(batch);
                }
                Err(err) => {
                    // Detector-level failures degrade to fewer findings.
                    self.emit(&EngineEvent::DetectorFailed {
                        detector,
                        message: err.to_string(),
                    });
                }
            }
        }

        if cancel.is_cancelled() {
            return Err(RunelintError::Cancelled);
        }

        findings = self.apply_ignore_patterns(findings, &options)?;

        if options.semantic.enabled {
            if let Some(augmenter) = &self.augmenter {
                tokio::select! {
                    _ = cancel.cancelled() => return Err(RunelintError::Cancelled),
                    augmented = self.augment(source, findings, &options, Arc::clone(augmenter)) => {
                        findings = augmented;
                    }
                }
            }
        }

        if cancel.is_cancelled() {
            return Err(RunelintError::Cancelled);
        }

        let findings = self.validate_ranges(findings, source_chars);
        let mut findings = dedup_findings(findings);
        findings.sort_by(|a, b| {
            (a.start, a.end, &a.original).cmp(&(b.start, b.end, &b.original))
        });

        let duration_ms = started.elapsed().as_millis() as u64;
        self.emit(&EngineEvent::AnalysisCompleted {
            findings: findings.len(),
            duration_ms,
        });
        info!(
            findings = findings.len(),
            duration_ms,
            detectors = enabled.len(),
            "analysis completed"
        );

        Ok(AnalysisResult {
            findings,
            duration_ms,
            timestamp: Utc::now(),
            engine_version: crate::VERSION.to_string(),
            detectors_run: enabled.len(),
        })
    }

    /// Drop findings whose token matches an ignore pattern.
    fn apply_ignore_patterns(
        &self,
        findings: Vec<Finding>,
        options: &AnalyzerOptions,
    ) -> Result<Vec<Finding>> {
        if options.ignore_patterns.is_empty() {
            return Ok(findings);
        }
        let matcher = options.compile_ignore_patterns()?;
        Ok(findings
            .into_iter()
            .filter(|finding| {
                let ignored = matcher.is_match(&finding.original);
                if ignored {
                    debug!(original = %finding.original, "finding matches ignore pattern");
                }
                !ignored
            })
            .collect())
    }

    /// Enrich a bounded subset of lexical findings with provider suggestions.
    async fn augment(
        &self,
        source: &str,
        mut findings: Vec<Finding>,
        options: &AnalyzerOptions,
        augmenter: Arc<dyn SemanticAugmenter>,
    ) -> Vec<Finding> {
        // Bounded subset: the first K lexical findings in start order.
        let mut candidates: Vec<usize> = findings
            .iter()
            .enumerate()
            .filter(|(_, f)| f.source_tag == SourceTag::Lexical)
            .map(|(i, _)| i)
            .collect();
        candidates.sort_by_key(|&i| (findings[i].start, findings[i].end));
        candidates.truncate(options.semantic.max_augmentations);

        let timeout = Duration::from_millis(options.semantic.request_timeout_ms);
        let radius = options.semantic.context_radius;

        let suggestions: Vec<(usize, Option<String>)> = stream::iter(candidates)
            .map(|idx| {
                let augmenter = Arc::clone(&augmenter);
                let token = findings[idx].original.clone();
                let (window, _) = context_window(source, findings[idx].start, radius);
                async move {
                    // Timeout here covers a misbehaving augmenter; no retry
                    // within this analysis call.
                    let suggestion =
                        match tokio::time::timeout(timeout, augmenter.suggest(&token, &window))
                            .await
                        {
                            Ok(suggestion) => suggestion,
                            Err(_) => {
                                warn!(token = %token, "augmentation timed out");
                                None
                            }
                        };
                    (idx, suggestion)
                }
            })
            .buffer_unordered(options.semantic.max_concurrent_requests)
            .collect()
            .await;

        for (idx, suggestion) in suggestions {
            let Some(suggestion) = suggestion else {
                continue;
            };
            let finding = &mut findings[idx];
            // Only a genuinely different replacement counts.
            if suggestion.eq_ignore_ascii_case(&finding.original) {
                continue;
            }
            finding.suggestion = Some(suggestion);
            finding.source_tag = SourceTag::Hybrid;
            if finding.severity == Severity::Info {
                finding.severity = finding.severity.elevated();
            }
            self.emit(&EngineEvent::AugmentationApplied {
                original: finding.original.clone(),
            });
        }

        findings
    }

    /// Drop findings whose offsets fall outside the snapshot. Dropping (not
    /// clipping) avoids silently relocating a finding to a wrong position.
    fn validate_ranges(&self, findings: Vec<Finding>, source_chars: usize) -> Vec<Finding> {
        findings
            .into_iter()
            .filter(|finding| {
                if finding.is_in_range(source_chars) {
                    true
                } else {
                    self.emit(&EngineEvent::FindingDropped {
                        start: finding.start,
                        end: finding.end,
                        reason: RunelintError::invalid_range(
                            finding.start,
                            finding.end,
                            source_chars,
                        )
                        .to_string(),
                    });
                    false
                }
            })
            .collect()
    }

    /// Rewrite `source`, applying accepted suggestions back-to-front.
    ///
    /// Only findings with a suggestion, a valid range, and a severity at or
    /// below the configured auto-fix threshold are applied. Edits are sorted
    /// by descending start so earlier edits never invalidate later offsets;
    /// intersecting ranges silently overwrite already-edited regions, per the
    /// documented policy.
    pub fn apply_fixes(&self, source: &str, findings: &[Finding]) -> String {
        let options = self.options.load_full();
        let source_chars = source.chars().count();

        let mut accepted: Vec<&Finding> = findings
            .iter()
            .filter(|f| f.suggestion.is_some())
            .filter(|f| f.severity.rank() <= options.auto_fix_threshold.rank())
            .filter(|f| f.is_in_range(source_chars))
            .collect();
        accepted.sort_by(|a, b| (b.start, b.end).cmp(&(a.start, a.end)));

        let edits: Vec<(usize, usize, &str)> = accepted
            .iter()
            .map(|f| {
                (
                    f.start,
                    f.end,
                    f.suggestion.as_deref().unwrap_or_default(),
                )
            })
            .collect();
        splice_edits(source, &edits)
    }
}

/// Merge findings sharing a `(start, end, original)` key.
///
/// A finding with a suggestion beats one without; ties go to the detector
/// family with the higher priority (structural > semantic > lexical).
fn dedup_findings(findings: Vec<Finding>) -> Vec<Finding> {
    let mut merged: HashMap<(usize, usize, String), Finding> = HashMap::new();
    for finding in findings {
        let key = (finding.start, finding.end, finding.original.clone());
        match merged.get(&key) {
            Some(existing) if !replaces(existing, &finding) => {}
            _ => {
                merged.insert(key, finding);
            }
        }
    }
    merged.into_values().collect()
}

/// Whether `candidate` should replace `existing` under the dedup protocol.
fn replaces(existing: &Finding, candidate: &Finding) -> bool {
    match (existing.suggestion.is_some(), candidate.suggestion.is_some()) {
        (false, true) => true,
        (true, false) => false,
        _ => candidate.source_tag.priority() > existing.source_tag.priority(),
    }
}
