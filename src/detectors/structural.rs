//! Structural naming-convention analyzer.
//!
//! Consumes an externally supplied syntax tree, traverses declaration nodes,
//! and evaluates casing predicates. Unsupported languages and parse failures
//! degrade to an empty result; they never cross the detector boundary.

use std::sync::Arc;

use tracing::debug;
use tree_sitter::Node;

use crate::core::config::{AnalyzerOptions, NamingConfig};
use crate::core::errors::Result;
use crate::core::findings::{Finding, Severity, SourceTag};
use crate::core::text::{context_snippet, CharIndex};
use crate::detectors::casing::{is_screaming_snake_case, CaseStyle};
use crate::detectors::common::Detector;
use crate::lang::registry::{language_info, DeclKind, LanguageInfo, SyntaxTreeProvider};

/// Naming-convention detector over tree-sitter syntax trees.
pub struct StructuralAnalyzer {
    provider: Arc<dyn SyntaxTreeProvider>,
}

impl StructuralAnalyzer {
    /// Create an analyzer backed by the given parsing capability.
    pub fn new(provider: Arc<dyn SyntaxTreeProvider>) -> Self {
        Self { provider }
    }

    /// Expected style for a declaration kind under the active configuration,
    /// or `None` when the corresponding check is disabled.
    fn expected_style(
        kind: DeclKind,
        info: &LanguageInfo,
        naming: &NamingConfig,
    ) -> Option<CaseStyle> {
        match kind {
            DeclKind::Type => naming.check_type_naming.then_some(CaseStyle::Pascal),
            DeclKind::Function if !naming.check_function_naming => None,
            DeclKind::Variable if !naming.check_variable_naming => None,
            DeclKind::Function | DeclKind::Variable => {
                if naming.enforce_camel_case {
                    Some(CaseStyle::Camel)
                } else if info.native_snake_case {
                    Some(CaseStyle::Snake)
                } else {
                    Some(CaseStyle::Camel)
                }
            }
        }
    }

    /// Walk the tree collecting declarator identifiers that violate the
    /// active convention.
    fn check_node(
        node: Node<'_>,
        source: &str,
        index: &CharIndex,
        info: &LanguageInfo,
        naming: &NamingConfig,
        findings: &mut Vec<Finding>,
    ) {
        for decl in info.declarations {
            if node.kind() != decl.node_kind {
                continue;
            }
            let Some(field) = node.child_by_field_name(decl.name_field) else {
                continue;
            };
            let Some(name_node) = identifier_node(field) else {
                continue;
            };
            let Ok(name) = name_node.utf8_text(source.as_bytes()) else {
                continue;
            };
            if name.is_empty() || name.starts_with('_') || is_screaming_snake_case(name) {
                continue;
            }
            let Some(style) = Self::expected_style(decl.decl_kind, info, naming) else {
                continue;
            };
            if style.matches(name) {
                continue;
            }
            let converted = style.convert(name);
            if converted == name || converted.is_empty() {
                continue;
            }

            // Span exactly the declarator name, not the whole statement.
            let start = index.char_at_byte(name_node.start_byte());
            let end = index.char_at_byte(name_node.end_byte());
            findings.push(
                Finding::new(name, start, end, Severity::Warning, SourceTag::Structural)
                    .with_suggestion(converted)
                    .with_rule_id(format!("naming/{}", style.rule_name()))
                    .with_context(context_snippet(source, start, end, 20)),
            );
        }

        for i in 0..node.child_count() {
            if let Some(child) = node.child(i) {
                Self::check_node(child, source, index, info, naming, findings);
            }
        }
    }
}

/// Resolve a name field down to a concrete identifier node.
///
/// Some grammars put a pattern or expression in the name field (Rust `let`,
/// Python assignment targets); only a bare identifier is checkable.
fn identifier_node(node: Node<'_>) -> Option<Node<'_>> {
    match node.kind() {
        "identifier" | "type_identifier" | "property_identifier" | "field_identifier" => {
            Some(node)
        }
        _ => None,
    }
}

impl Detector for StructuralAnalyzer {
    fn id(&self) -> &str {
        "structural"
    }

    fn source_tag(&self) -> SourceTag {
        SourceTag::Structural
    }

    fn is_enabled(&self, options: &AnalyzerOptions) -> bool {
        options.structural_enabled
    }

    fn analyze(&self, source: &str, options: &AnalyzerOptions) -> Result<Vec<Finding>> {
        let Some(info) = language_info(&options.language) else {
            debug!(language = %options.language, "unknown language, skipping structural analysis");
            return Ok(Vec::new());
        };

        let tree = match self.provider.parse(source, &options.language) {
            Ok(tree) => tree,
            Err(err) => {
                debug!(language = %options.language, error = %err, "parse failed, skipping structural analysis");
                return Ok(Vec::new());
            }
        };

        let index = CharIndex::new(source);
        let mut findings = Vec::new();
        Self::check_node(
            tree.root_node(),
            source,
            &index,
            info,
            &options.naming,
            &mut findings,
        );
        Ok(findings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::registry::TreeSitterProvider;

    fn analyzer() -> StructuralAnalyzer {
        StructuralAnalyzer::new(Arc::new(TreeSitterProvider::new()))
    }

    fn options(language: &str) -> AnalyzerOptions {
        AnalyzerOptions::default().with_language(language)
    }

    #[test]
    fn test_snake_case_variable_flagged_under_camel_case() {
        let mut opts = options("javascript");
        opts.naming.enforce_camel_case = true;

        let findings = analyzer()
            .analyze("const my_var = 1;", &opts)
            .unwrap();
        assert_eq!(findings.len(), 1);

        let finding = &findings[0];
        assert_eq!(finding.original, "my_var");
        assert_eq!(finding.suggestion.as_deref(), Some("myVar"));
        assert_eq!(finding.source_tag, SourceTag::Structural);
        assert_eq!(finding.rule_id.as_deref(), Some("naming/camel-case"));
    }

    #[test]
    fn test_span_covers_exactly_the_declarator() {
        let mut opts = options("javascript");
        opts.naming.enforce_camel_case = true;

        let source = "const my_var = 1;";
        let findings = analyzer().analyze(source, &opts).unwrap();
        let finding = &findings[0];
        let span: String = source
            .chars()
            .skip(finding.start)
            .take(finding.end - finding.start)
            .collect();
        assert_eq!(span, "my_var");
    }

    #[test]
    fn test_javascript_function_and_class_conventions() {
        let source = "function do_work() {}\nclass my_widget {}\n";
        let findings = analyzer().analyze(source, &options("javascript")).unwrap();

        let function = findings.iter().find(|f| f.original == "do_work").unwrap();
        assert_eq!(function.suggestion.as_deref(), Some("doWork"));

        let class = findings.iter().find(|f| f.original == "my_widget").unwrap();
        assert_eq!(class.suggestion.as_deref(), Some("MyWidget"));
        assert_eq!(class.rule_id.as_deref(), Some("naming/pascal-case"));
    }

    #[test]
    fn test_python_native_snake_case_not_flagged() {
        let source = "def fetch_rows():\n    pass\n";
        let findings = analyzer().analyze(source, &options("python")).unwrap();
        assert!(findings.is_empty());
    }

    #[test]
    fn test_python_camel_function_flagged() {
        let source = "def fetchRows():\n    pass\n";
        let findings = analyzer().analyze(source, &options("python")).unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].suggestion.as_deref(), Some("fetch_rows"));
        assert_eq!(findings[0].rule_id.as_deref(), Some("naming/snake-case"));
    }

    #[test]
    fn test_constants_and_underscore_prefixed_names_exempt() {
        let source = "const MAX_RETRIES = 3;\nconst _internal = 1;\n";
        let mut opts = options("javascript");
        opts.naming.enforce_camel_case = true;
        let findings = analyzer().analyze(source, &opts).unwrap();
        assert!(findings.is_empty());
    }

    #[test]
    fn test_disabled_checks_suppress_findings() {
        let mut opts = options("javascript");
        opts.naming.enforce_camel_case = true;
        opts.naming.check_variable_naming = false;

        let findings = analyzer().analyze("const my_var = 1;", &opts).unwrap();
        assert!(findings.is_empty());
    }

    #[test]
    fn test_unsupported_language_degrades_to_empty() {
        let findings = analyzer().analyze("IDENTIFICATION DIVISION.", &options("cobol"));
        assert!(findings.unwrap().is_empty());
    }

    #[test]
    fn test_go_mixed_caps_not_flagged() {
        let source = "func fetchRows() {}\n";
        let findings = analyzer().analyze(source, &options("go")).unwrap();
        assert!(findings.is_empty());
    }

    #[test]
    fn test_go_snake_function_flagged() {
        let source = "func fetch_rows() {}\n";
        let findings = analyzer().analyze(source, &options("go")).unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].suggestion.as_deref(), Some("fetchRows"));
        assert_eq!(findings[0].rule_id.as_deref(), Some("naming/camel-case"));
    }

    #[test]
    fn test_rust_type_naming() {
        let source = "struct http_client { port: u16 }\n";
        let findings = analyzer().analyze(source, &options("rust")).unwrap();
        let finding = findings
            .iter()
            .find(|f| f.original == "http_client")
            .unwrap();
        assert_eq!(finding.suggestion.as_deref(), Some("HttpClient"));
    }
}
