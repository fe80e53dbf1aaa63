//! Semantic augmentation capability interface.
//!
//! Augmentation is strictly additive and best-effort: any provider failure
//! degrades to an empty result or `None`, logged, and never propagates to
//! the orchestrator as a fatal error. Implementations apply their own
//! outbound rate limiting within a caller-configured budget.

use async_trait::async_trait;

use crate::core::findings::Finding;

/// Capability interface wrapping an external contextual-analysis provider.
#[async_trait]
pub trait SemanticAugmenter: Send + Sync {
    /// Ask the provider to examine a window of code around `position`
    /// (a character offset) and return additional findings with offsets
    /// already translated into the source snapshot.
    async fn analyze_context(&self, source: &str, position: usize, token: &str) -> Vec<Finding>;

    /// Ask for a single best replacement for `token` given `context_window`.
    async fn suggest(&self, token: &str, context_window: &str) -> Option<String>;
}

/// Extract a code window around a character position.
///
/// Returns the window text and the character offset of its first character,
/// so window-relative provider offsets can be shifted back into the snapshot.
pub fn context_window(source: &str, position: usize, radius: usize) -> (String, usize) {
    let chars: Vec<char> = source.chars().collect();
    let lo = position.saturating_sub(radius).min(chars.len());
    let hi = (position + radius).min(chars.len());
    (chars[lo..hi].iter().collect(), lo)
}

/// Line and column (both zero-based, in characters) of a character offset.
pub fn line_column(source: &str, position: usize) -> (usize, usize) {
    let mut line = 0;
    let mut column = 0;
    for (i, c) in source.chars().enumerate() {
        if i == position {
            break;
        }
        if c == '\n' {
            line += 1;
            column = 0;
        } else {
            column += 1;
        }
    }
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_window_centered() {
        let (window, start) = context_window("abcdefghij", 5, 2);
        assert_eq!(window, "defg");
        assert_eq!(start, 3);
    }

    #[test]
    fn test_context_window_clamped_at_edges() {
        let (window, start) = context_window("abc", 0, 10);
        assert_eq!(window, "abc");
        assert_eq!(start, 0);

        let (window, start) = context_window("abc", 10, 1);
        assert_eq!(window, "");
        assert_eq!(start, 3);
    }

    #[test]
    fn test_line_column() {
        let source = "one\ntwo\nthree";
        assert_eq!(line_column(source, 0), (0, 0));
        assert_eq!(line_column(source, 4), (1, 0));
        assert_eq!(line_column(source, 6), (1, 2));
        assert_eq!(line_column(source, 9), (2, 1));
    }
}
