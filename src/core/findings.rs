//! Finding data model and analysis results.
//!
//! A [`Finding`] is one detected issue with half-open character offsets into
//! the exact source snapshot that produced it. Offsets are never meaningful
//! against a mutated source; consumers must re-run analysis after edits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Severity of a finding, ordered from least to most severe.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational, cosmetic issue
    Info,
    /// Likely issue worth reviewing
    #[default]
    Warning,
    /// Definite issue
    Error,
    /// Issue that breaks the code outright
    Critical,
}

impl Severity {
    /// Numeric rank used for threshold comparisons (0 = info, 3 = critical).
    pub fn rank(self) -> u8 {
        match self {
            Severity::Info => 0,
            Severity::Warning => 1,
            Severity::Error => 2,
            Severity::Critical => 3,
        }
    }

    /// One step more severe, saturating at critical.
    pub fn elevated(self) -> Self {
        match self {
            Severity::Info => Severity::Warning,
            Severity::Warning => Severity::Error,
            Severity::Error | Severity::Critical => Severity::Critical,
        }
    }
}

/// Which detector family produced a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceTag {
    /// Exact-match scan against a known-bad token corpus
    Lexical,
    /// Syntax-tree naming-convention analysis
    Structural,
    /// External contextual-analysis provider
    Semantic,
    /// Lexical finding enriched by semantic augmentation
    Hybrid,
}

impl SourceTag {
    /// Tie-break priority used during deduplication.
    ///
    /// Structural findings carry exact declarator spans and beat provider
    /// output; lexical findings are the weakest evidence.
    pub fn priority(self) -> u8 {
        match self {
            SourceTag::Structural => 3,
            SourceTag::Semantic | SourceTag::Hybrid => 2,
            SourceTag::Lexical => 1,
        }
    }
}

/// A single detected issue with source offsets, severity, and optional suggestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    /// Opaque unique identifier
    pub id: String,

    /// Exact substring of the source that triggered the finding
    pub original: String,

    /// Optional replacement text
    pub suggestion: Option<String>,

    /// Start offset, half-open, in characters
    pub start: usize,

    /// End offset, half-open, in characters
    pub end: usize,

    /// Severity classification
    pub severity: Severity,

    /// Which detector produced this finding
    pub source_tag: SourceTag,

    /// Surrounding-text snippet for display only, never used for offsets
    pub context: Option<String>,

    /// Identifier of the specific rule that fired
    pub rule_id: Option<String>,
}

impl Finding {
    /// Create a new finding over `[start, end)` with a fresh id.
    pub fn new(
        original: impl Into<String>,
        start: usize,
        end: usize,
        severity: Severity,
        source_tag: SourceTag,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            original: original.into(),
            suggestion: None,
            start,
            end,
            severity,
            source_tag,
            context: None,
            rule_id: None,
        }
    }

    /// Attach a replacement suggestion.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Attach a display-only context snippet.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Attach the identifier of the rule that fired.
    pub fn with_rule_id(mut self, rule_id: impl Into<String>) -> Self {
        self.rule_id = Some(rule_id.into());
        self
    }

    /// Whether the offsets are valid for a source of `len` characters.
    pub fn is_in_range(&self, len: usize) -> bool {
        self.start <= self.end && self.end <= len
    }

    /// Deduplication key: findings sharing `(start, end, original)` describe
    /// the same source location across detectors.
    pub fn dedup_key(&self) -> (usize, usize, &str) {
        (self.start, self.end, self.original.as_str())
    }
}

/// Finalized, deduplicated analysis output plus run metadata.
///
/// Created fresh per [`analyze`](crate::engine::orchestrator::AnalysisOrchestrator::analyze)
/// call; never mutated after return.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Deduplicated findings, sorted by `(start, end)`
    pub findings: Vec<Finding>,

    /// Wall-clock duration of the analysis call in milliseconds
    pub duration_ms: u64,

    /// When the analysis completed
    pub timestamp: DateTime<Utc>,

    /// Engine version that produced this result
    pub engine_version: String,

    /// Number of detectors that ran
    pub detectors_run: usize,
}

impl AnalysisResult {
    /// Create an empty result with current metadata.
    pub fn empty() -> Self {
        Self {
            findings: Vec::new(),
            duration_ms: 0,
            timestamp: Utc::now(),
            engine_version: crate::VERSION.to_string(),
            detectors_run: 0,
        }
    }

    /// Findings at or above the given severity.
    pub fn findings_at_least(&self, severity: Severity) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(move |f| f.severity.rank() >= severity.rank())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_rank_ordering() {
        assert!(Severity::Info.rank() < Severity::Warning.rank());
        assert!(Severity::Warning.rank() < Severity::Error.rank());
        assert!(Severity::Error.rank() < Severity::Critical.rank());
    }

    #[test]
    fn test_severity_elevation_saturates() {
        assert_eq!(Severity::Info.elevated(), Severity::Warning);
        assert_eq!(Severity::Critical.elevated(), Severity::Critical);
    }

    #[test]
    fn test_source_tag_priority() {
        assert!(SourceTag::Structural.priority() > SourceTag::Semantic.priority());
        assert!(SourceTag::Semantic.priority() > SourceTag::Lexical.priority());
        assert_eq!(
            SourceTag::Hybrid.priority(),
            SourceTag::Semantic.priority()
        );
    }

    #[test]
    fn test_finding_builder() {
        let finding = Finding::new("funtion", 0, 7, Severity::Warning, SourceTag::Lexical)
            .with_suggestion("function")
            .with_rule_id("lexical/known-typo")
            .with_context("funtion main()");

        assert_eq!(finding.original, "funtion");
        assert_eq!(finding.suggestion.as_deref(), Some("function"));
        assert_eq!(finding.rule_id.as_deref(), Some("lexical/known-typo"));
        assert!(!finding.id.is_empty());
    }

    #[test]
    fn test_finding_range_validation() {
        let finding = Finding::new("x", 3, 4, Severity::Info, SourceTag::Structural);
        assert!(finding.is_in_range(4));
        assert!(finding.is_in_range(10));
        assert!(!finding.is_in_range(3));

        let inverted = Finding {
            start: 5,
            end: 2,
            ..Finding::new("x", 0, 0, Severity::Info, SourceTag::Structural)
        };
        assert!(!inverted.is_in_range(10));
    }

    #[test]
    fn test_dedup_key_ignores_identity_fields() {
        let a = Finding::new("tok", 1, 4, Severity::Warning, SourceTag::Lexical);
        let b = Finding::new("tok", 1, 4, Severity::Error, SourceTag::Structural);
        assert_eq!(a.dedup_key(), b.dedup_key());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_severity_serde_lowercase() {
        let json = serde_json::to_string(&Severity::Critical).unwrap();
        assert_eq!(json, "\"critical\"");
        let tag = serde_json::to_string(&SourceTag::Hybrid).unwrap();
        assert_eq!(tag, "\"hybrid\"");
    }

    #[test]
    fn test_result_findings_at_least() {
        let mut result = AnalysisResult::empty();
        result.findings = vec![
            Finding::new("a", 0, 1, Severity::Info, SourceTag::Lexical),
            Finding::new("b", 1, 2, Severity::Error, SourceTag::Structural),
        ];
        let severe: Vec<_> = result.findings_at_least(Severity::Warning).collect();
        assert_eq!(severe.len(), 1);
        assert_eq!(severe[0].original, "b");
    }
}
