//! Analyzer configuration.
//!
//! [`AnalyzerOptions`] is a plain value passed into every analysis call and
//! swapped atomically on reconfiguration; it has no hidden mutable state.

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};

use crate::core::errors::{Result, RunelintError};
use crate::core::findings::Severity;

/// Configuration value governing one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerOptions {
    /// Language tag for structural analysis (e.g. "javascript", "python")
    pub language: String,

    /// Enable the lexical known-typo scanner
    pub lexical_enabled: bool,

    /// Enable the structural naming analyzer
    pub structural_enabled: bool,

    /// Glob patterns for tokens to ignore (matched against `Finding::original`)
    pub ignore_patterns: Vec<String>,

    /// Findings at or below this severity are eligible for auto-fix
    pub auto_fix_threshold: Severity,

    /// Naming-convention configuration for the structural analyzer
    pub naming: NamingConfig,

    /// Semantic augmentation configuration
    pub semantic: SemanticConfig,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            language: "javascript".to_string(),
            lexical_enabled: true,
            structural_enabled: true,
            ignore_patterns: Vec::new(),
            auto_fix_threshold: Severity::Warning,
            naming: NamingConfig::default(),
            semantic: SemanticConfig::default(),
        }
    }
}

impl AnalyzerOptions {
    /// Validate the configuration, returning the first structural problem.
    pub fn validate(&self) -> Result<()> {
        if self.language.trim().is_empty() {
            return Err(RunelintError::config_field(
                "Language tag must not be empty",
                "language",
            ));
        }
        if self.semantic.max_augmentations == 0 && self.semantic.enabled {
            return Err(RunelintError::config_field(
                "max_augmentations must be at least 1 when semantic augmentation is enabled",
                "semantic.max_augmentations",
            ));
        }
        if self.semantic.max_concurrent_requests == 0 {
            return Err(RunelintError::config_field(
                "max_concurrent_requests must be at least 1",
                "semantic.max_concurrent_requests",
            ));
        }
        // Compile eagerly so malformed globs surface from configure, not analyze.
        self.compile_ignore_patterns()?;
        Ok(())
    }

    /// Compile the ignore patterns into a matcher.
    pub fn compile_ignore_patterns(&self) -> Result<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.ignore_patterns {
            builder.add(Glob::new(pattern)?);
        }
        Ok(builder.build()?)
    }

    /// Set the language tag.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set the auto-fix severity threshold.
    pub fn with_auto_fix_threshold(mut self, threshold: Severity) -> Self {
        self.auto_fix_threshold = threshold;
        self
    }
}

/// Naming-convention checks evaluated by the structural analyzer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Check variable declarator names
    pub check_variable_naming: bool,

    /// Check function and method names
    pub check_function_naming: bool,

    /// Check type names (classes, structs, interfaces, enums)
    pub check_type_naming: bool,

    /// Expect camelCase for variables and functions regardless of the
    /// language's native style
    pub enforce_camel_case: bool,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            check_variable_naming: true,
            check_function_naming: true,
            check_type_naming: true,
            enforce_camel_case: false,
        }
    }
}

/// Semantic augmentation limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SemanticConfig {
    /// Enable semantic augmentation of lexical findings
    pub enabled: bool,

    /// Cap on how many findings are augmented per analysis call
    pub max_augmentations: usize,

    /// Concurrency budget for in-flight provider requests
    pub max_concurrent_requests: usize,

    /// Per-request timeout in milliseconds
    pub request_timeout_ms: u64,

    /// Characters of context included on each side of an augmented token
    pub context_radius: usize,
}

impl Default for SemanticConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_augmentations: 5,
            max_concurrent_requests: 3,
            request_timeout_ms: 2_000,
            context_radius: 200,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_validate() {
        let options = AnalyzerOptions::default();
        assert!(options.validate().is_ok());
        assert!(options.lexical_enabled);
        assert!(options.structural_enabled);
        assert_eq!(options.auto_fix_threshold, Severity::Warning);
    }

    #[test]
    fn test_empty_language_rejected() {
        let options = AnalyzerOptions::default().with_language("  ");
        let err = options.validate().unwrap_err();
        assert!(matches!(err, RunelintError::Config { .. }));
    }

    #[test]
    fn test_zero_augmentation_cap_rejected_when_enabled() {
        let mut options = AnalyzerOptions::default();
        options.semantic.enabled = true;
        options.semantic.max_augmentations = 0;
        assert!(options.validate().is_err());

        options.semantic.enabled = false;
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_malformed_glob_rejected() {
        let mut options = AnalyzerOptions::default();
        options.ignore_patterns = vec!["[unterminated".to_string()];
        let err = options.validate().unwrap_err();
        assert!(matches!(err, RunelintError::Config { .. }));
    }

    #[test]
    fn test_ignore_pattern_matching() {
        let mut options = AnalyzerOptions::default();
        options.ignore_patterns = vec!["test_*".to_string()];
        let set = options.compile_ignore_patterns().unwrap();
        assert!(set.is_match("test_helper"));
        assert!(!set.is_match("helper"));
    }

    #[test]
    fn test_serde_round_trip_with_defaults() {
        let json = r#"{"language": "python"}"#;
        let options: AnalyzerOptions = serde_json::from_str(json).unwrap();
        assert_eq!(options.language, "python");
        assert_eq!(options.semantic.max_augmentations, 5);
        assert!(options.naming.check_type_naming);
    }
}
