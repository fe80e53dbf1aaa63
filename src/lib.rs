//! # Runelint: Pluggable Code-Quality Analysis Engine
//!
//! A Rust library for detecting lexical typos, naming-convention violations,
//! and context-dependent issues in source text. Runelint proposes ranked
//! corrections, reconciles overlapping findings from multiple independent
//! detectors, and safely rewrites source text to apply accepted corrections.
//!
//! - **Lexical scanning**: Aho-Corasick matching against a corpus of known-bad tokens
//! - **Structural analysis**: naming-convention checks over tree-sitter syntax trees
//! - **Semantic augmentation**: best-effort enrichment via an external provider
//! - **Fuzzy suggestion**: edit-distance ranked corrections from named dictionaries
//! - **Safe fix application**: back-to-front multi-edit rewriting
//!
//! ## Architecture
//!
//! ```text
//! source text ──► detectors (parallel) ──► raw findings
//!                                              │
//!                        bounded semantic augmentation (optional)
//!                                              │
//!                        validate ► dedup ► rank ► AnalysisResult
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use runelint::{AnalysisOrchestrator, AnalyzerOptions, LexicalScanner};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut orchestrator = AnalysisOrchestrator::new(AnalyzerOptions::default());
//!     orchestrator.register(Box::new(LexicalScanner::with_default_corpus()?));
//!
//!     let result = orchestrator.analyze("funtion main() {}").await?;
//!     println!("{} findings", result.findings.len());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(unsafe_code)]
#![allow(clippy::module_name_repetitions)]

// Core data model and shared utilities
pub mod core {
    //! Core data model, configuration, and error types.

    pub mod config;
    pub mod errors;
    pub mod findings;
    pub mod text;
}

// Dictionary storage and fuzzy suggestion
pub mod dictionary {
    //! Named dictionaries with merged lookup and edit-distance suggestion.

    pub mod store;
}

// Pluggable detectors
pub mod detectors {
    //! Pluggable finding detectors.

    pub mod casing;
    pub mod common;
    pub mod lexical;
    pub mod structural;
}

// Language parsing capability
pub mod lang {
    //! Syntax-tree parsing capability and language registry.

    pub mod registry;
}

// Semantic augmentation capability
pub mod semantic {
    //! Best-effort semantic augmentation via external providers.

    pub mod http;
    pub mod provider;
}

// Orchestration and fix application
pub mod engine {
    //! Analysis orchestration, deduplication, and fix application.

    pub mod events;
    pub mod orchestrator;
}

// Persistence seams
pub mod io {
    //! Persistence seams for dictionary storage.

    pub mod persistence;
}

// Re-export primary types for convenience
pub use crate::core::config::{AnalyzerOptions, NamingConfig, SemanticConfig};
pub use crate::core::errors::{Result, ResultExt, RunelintError};
pub use crate::core::findings::{AnalysisResult, Finding, Severity, SourceTag};
pub use crate::detectors::common::Detector;
pub use crate::detectors::lexical::LexicalScanner;
pub use crate::detectors::structural::StructuralAnalyzer;
pub use crate::dictionary::store::{DictionaryEntry, DictionaryStore};
pub use crate::engine::events::{EngineEvent, EventSink, TracingSink};
pub use crate::engine::orchestrator::AnalysisOrchestrator;
pub use crate::io::persistence::{DictionaryStorage, JsonDictionaryStorage};
pub use crate::lang::registry::{SyntaxTreeProvider, TreeSitterProvider};
pub use crate::semantic::http::{HttpProviderConfig, HttpSemanticProvider};
pub use crate::semantic::provider::SemanticAugmenter;

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
