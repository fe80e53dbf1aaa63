//! Syntax-tree parsing capability and per-language declaration metadata.
//!
//! The engine does not own a parser implementation; the structural analyzer
//! consumes one through [`SyntaxTreeProvider`]. The shipped provider wraps
//! the bundled tree-sitter grammars.

use tree_sitter::{Language, Parser, Tree};

use crate::core::errors::{Result, RunelintError};

/// Kind of declaration a node introduces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    /// Variable or constant binding
    Variable,
    /// Function or method
    Function,
    /// Class, struct, interface, enum, or type alias
    Type,
}

/// One declaration-bearing node kind for a language: the tree-sitter node
/// kind, the field holding the declarator name, and what it declares.
#[derive(Debug, Clone, Copy)]
pub struct DeclarationSpec {
    /// Tree-sitter node kind (e.g. `"function_declaration"`)
    pub node_kind: &'static str,
    /// Field name of the declarator identifier (e.g. `"name"`)
    pub name_field: &'static str,
    /// Declaration kind
    pub decl_kind: DeclKind,
}

const fn decl(node_kind: &'static str, name_field: &'static str, decl_kind: DeclKind) -> DeclarationSpec {
    DeclarationSpec {
        node_kind,
        name_field,
        decl_kind,
    }
}

const JAVASCRIPT_DECLS: &[DeclarationSpec] = &[
    decl("function_declaration", "name", DeclKind::Function),
    decl("method_definition", "name", DeclKind::Function),
    decl("class_declaration", "name", DeclKind::Type),
    decl("variable_declarator", "name", DeclKind::Variable),
];

const TYPESCRIPT_DECLS: &[DeclarationSpec] = &[
    decl("function_declaration", "name", DeclKind::Function),
    decl("method_definition", "name", DeclKind::Function),
    decl("class_declaration", "name", DeclKind::Type),
    decl("interface_declaration", "name", DeclKind::Type),
    decl("type_alias_declaration", "name", DeclKind::Type),
    decl("enum_declaration", "name", DeclKind::Type),
    decl("variable_declarator", "name", DeclKind::Variable),
];

const PYTHON_DECLS: &[DeclarationSpec] = &[
    decl("function_definition", "name", DeclKind::Function),
    decl("class_definition", "name", DeclKind::Type),
    decl("assignment", "left", DeclKind::Variable),
];

const RUST_DECLS: &[DeclarationSpec] = &[
    decl("function_item", "name", DeclKind::Function),
    decl("struct_item", "name", DeclKind::Type),
    decl("enum_item", "name", DeclKind::Type),
    decl("trait_item", "name", DeclKind::Type),
    decl("type_item", "name", DeclKind::Type),
    decl("let_declaration", "pattern", DeclKind::Variable),
];

const GO_DECLS: &[DeclarationSpec] = &[
    decl("function_declaration", "name", DeclKind::Function),
    decl("method_declaration", "name", DeclKind::Function),
    decl("type_spec", "name", DeclKind::Type),
    decl("var_spec", "name", DeclKind::Variable),
    decl("const_spec", "name", DeclKind::Variable),
];

/// Metadata for one supported language.
#[derive(Debug, Clone, Copy)]
pub struct LanguageInfo {
    /// Canonical language key (matches `AnalyzerOptions::language`)
    pub key: &'static str,
    /// Accepted aliases
    pub aliases: &'static [&'static str],
    /// Declaration-bearing node kinds
    pub declarations: &'static [DeclarationSpec],
    /// Whether identifiers natively use snake_case (otherwise camelCase)
    pub native_snake_case: bool,
}

const REGISTERED_LANGUAGES: &[LanguageInfo] = &[
    LanguageInfo {
        key: "javascript",
        aliases: &["js", "jsx"],
        declarations: JAVASCRIPT_DECLS,
        native_snake_case: false,
    },
    LanguageInfo {
        key: "typescript",
        aliases: &["ts", "tsx"],
        declarations: TYPESCRIPT_DECLS,
        native_snake_case: false,
    },
    LanguageInfo {
        key: "python",
        aliases: &["py"],
        declarations: PYTHON_DECLS,
        native_snake_case: true,
    },
    LanguageInfo {
        key: "rust",
        aliases: &["rs"],
        declarations: RUST_DECLS,
        native_snake_case: true,
    },
    LanguageInfo {
        key: "go",
        aliases: &["golang"],
        declarations: GO_DECLS,
        // Go convention is mixedCaps, never snake_case (Effective Go).
        native_snake_case: false,
    },
];

/// Look up language metadata by key or alias.
pub fn language_info(language: &str) -> Option<&'static LanguageInfo> {
    let needle = language.to_ascii_lowercase();
    REGISTERED_LANGUAGES
        .iter()
        .find(|info| info.key == needle || info.aliases.contains(&needle.as_str()))
}

/// The languages compiled into this build.
pub fn registered_languages() -> &'static [LanguageInfo] {
    REGISTERED_LANGUAGES
}

/// Capability interface for producing syntax trees.
///
/// Parse failures surface as [`RunelintError::Parse`]; the structural
/// analyzer converts them into an empty finding set rather than a call
/// failure.
pub trait SyntaxTreeProvider: Send + Sync {
    /// Parse one source snapshot in the given language.
    fn parse(&self, source: &str, language: &str) -> Result<Tree>;

    /// Whether this provider can parse the given language.
    fn supports(&self, language: &str) -> bool;
}

/// Provider backed by the bundled tree-sitter grammars.
#[derive(Debug, Default)]
pub struct TreeSitterProvider;

impl TreeSitterProvider {
    /// Create the provider.
    pub fn new() -> Self {
        Self
    }

    fn grammar_for(language: &str) -> Option<Language> {
        let info = language_info(language)?;
        let language: Language = match info.key {
            "javascript" => tree_sitter_javascript::LANGUAGE.into(),
            "typescript" => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            "python" => tree_sitter_python::LANGUAGE.into(),
            "rust" => tree_sitter_rust::LANGUAGE.into(),
            "go" => tree_sitter_go::LANGUAGE.into(),
            _ => return None,
        };
        Some(language)
    }
}

impl SyntaxTreeProvider for TreeSitterProvider {
    fn parse(&self, source: &str, language: &str) -> Result<Tree> {
        let grammar = Self::grammar_for(language).ok_or_else(|| {
            RunelintError::parse(language, "Unsupported language")
        })?;

        let mut parser = Parser::new();
        parser.set_language(&grammar).map_err(|err| {
            RunelintError::parse(language, format!("Failed to load grammar: {err}"))
        })?;

        parser
            .parse(source, None)
            .ok_or_else(|| RunelintError::parse(language, "Parser produced no tree"))
    }

    fn supports(&self, language: &str) -> bool {
        Self::grammar_for(language).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_lookup_by_key_and_alias() {
        assert_eq!(language_info("javascript").unwrap().key, "javascript");
        assert_eq!(language_info("js").unwrap().key, "javascript");
        assert_eq!(language_info("PY").unwrap().key, "python");
        assert!(language_info("cobol").is_none());
    }

    #[test]
    fn test_provider_supports_registered_languages() {
        let provider = TreeSitterProvider::new();
        for info in registered_languages() {
            assert!(provider.supports(info.key), "missing grammar for {}", info.key);
        }
        assert!(!provider.supports("cobol"));
    }

    #[test]
    fn test_parse_simple_javascript() {
        let provider = TreeSitterProvider::new();
        let tree = provider.parse("function hello() {}", "javascript").unwrap();
        assert_eq!(tree.root_node().kind(), "program");
        assert!(!tree.root_node().has_error());
    }

    #[test]
    fn test_parse_unsupported_language_is_parse_error() {
        let provider = TreeSitterProvider::new();
        let err = provider.parse("x", "cobol").unwrap_err();
        assert!(matches!(err, RunelintError::Parse { .. }));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_parse_python() {
        let provider = TreeSitterProvider::new();
        let tree = provider.parse("def f():\n    return 1\n", "python").unwrap();
        assert_eq!(tree.root_node().kind(), "module");
    }
}
