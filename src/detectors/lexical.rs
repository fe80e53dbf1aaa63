//! Lexical known-typo scanner.
//!
//! A stateless detector matching a fixed corpus of known-bad tokens with a
//! compiled Aho-Corasick automaton. Matches must sit on word boundaries;
//! suggestions are left empty here and filled in later by augmentation.

use aho_corasick::{AhoCorasick, MatchKind};

use crate::core::config::AnalyzerOptions;
use crate::core::errors::{Result, RunelintError};
use crate::core::findings::{Finding, Severity, SourceTag};
use crate::core::text::{context_snippet, CharIndex};
use crate::detectors::common::Detector;

/// Rule identifier attached to every lexical finding.
pub const RULE_KNOWN_TYPO: &str = "lexical/known-typo";

/// Common programming typos bundled with the crate.
const DEFAULT_CORPUS: &[&str] = &[
    "funtion", "functon", "fucntion", "consle", "cosole", "conosle", "retrun", "reutrn",
    "lenght", "heigth", "widht", "improt", "exprot", "cosnt", "conts", "vairable", "varaible",
    "paramter", "parmeter", "arguement", "agrument", "recieve", "recieved", "seperate",
    "definately", "occured", "untill", "sucess", "sucessful", "reponse", "respose",
    "requst", "reqeust", "calback", "callbak", "asnyc", "awiat", "tunr", "flase", "ture",
    "nulll", "udpate", "dlete", "inital", "initalize", "instanciate", "proprety", "attirbute",
];

/// Stateless detector over a fixed corpus of known-bad tokens.
pub struct LexicalScanner {
    corpus: Vec<String>,
    automaton: AhoCorasick,
}

impl LexicalScanner {
    /// Build a scanner over a custom corpus of known-bad tokens.
    pub fn new<I, S>(corpus: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let corpus: Vec<String> = corpus
            .into_iter()
            .map(Into::into)
            .filter(|token| !token.trim().is_empty())
            .collect();
        if corpus.is_empty() {
            return Err(RunelintError::config_field(
                "Lexical corpus must contain at least one token",
                "corpus",
            ));
        }

        let automaton = AhoCorasick::builder()
            .match_kind(MatchKind::LeftmostLongest)
            .build(&corpus)
            .map_err(|err| {
                RunelintError::config_field(
                    format!("Failed to compile lexical corpus: {err}"),
                    "corpus",
                )
            })?;

        Ok(Self { corpus, automaton })
    }

    /// Build a scanner over the bundled corpus of common programming typos.
    pub fn with_default_corpus() -> Result<Self> {
        Self::new(DEFAULT_CORPUS.iter().copied())
    }

    /// Number of tokens in the compiled corpus.
    pub fn corpus_len(&self) -> usize {
        self.corpus.len()
    }
}

/// A match neighbor that would make the hit a partial token.
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

impl Detector for LexicalScanner {
    fn id(&self) -> &str {
        "lexical"
    }

    fn source_tag(&self) -> SourceTag {
        SourceTag::Lexical
    }

    fn is_enabled(&self, options: &AnalyzerOptions) -> bool {
        options.lexical_enabled
    }

    fn analyze(&self, source: &str, _options: &AnalyzerOptions) -> Result<Vec<Finding>> {
        let index = CharIndex::new(source);
        let mut findings = Vec::new();

        for hit in self.automaton.find_iter(source) {
            // Reject partial-token matches: neighbors must not be word characters.
            let before = source[..hit.start()].chars().next_back();
            let after = source[hit.end()..].chars().next();
            if before.is_some_and(is_word_char) || after.is_some_and(is_word_char) {
                continue;
            }

            let start = index.char_at_byte(hit.start());
            let end = index.char_at_byte(hit.end());
            let original = &source[hit.start()..hit.end()];

            findings.push(
                Finding::new(original, start, end, Severity::Warning, SourceTag::Lexical)
                    .with_rule_id(RULE_KNOWN_TYPO)
                    .with_context(context_snippet(source, start, end, 20)),
            );
        }

        Ok(findings)
    }
}
