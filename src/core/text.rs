//! Character-offset utilities shared by detectors and fix application.
//!
//! Findings carry character offsets while tree-sitter and Aho-Corasick report
//! byte offsets; [`CharIndex`] maps between the two for one source snapshot.

/// Precomputed byte offsets of every character boundary in a source snapshot.
#[derive(Debug)]
pub struct CharIndex {
    /// Byte offset of each character, plus a trailing entry for the total length
    boundaries: Vec<usize>,
}

impl CharIndex {
    /// Build the index for one snapshot. O(n) in source bytes.
    pub fn new(source: &str) -> Self {
        let mut boundaries: Vec<usize> = source.char_indices().map(|(b, _)| b).collect();
        boundaries.push(source.len());
        Self { boundaries }
    }

    /// Number of characters in the snapshot.
    pub fn char_len(&self) -> usize {
        self.boundaries.len() - 1
    }

    /// Convert a byte offset at a character boundary to a character offset.
    ///
    /// Offsets inside a multi-byte character round down to its start.
    pub fn char_at_byte(&self, byte: usize) -> usize {
        match self.boundaries.binary_search(&byte) {
            Ok(idx) => idx,
            Err(idx) => idx.saturating_sub(1),
        }
    }

    /// Convert a character offset to a byte offset. Clamps to the end.
    pub fn byte_at_char(&self, ch: usize) -> usize {
        let idx = ch.min(self.boundaries.len() - 1);
        self.boundaries[idx]
    }
}

/// Extract a display snippet around `[start, end)` character offsets,
/// extending up to `radius` characters on each side.
pub fn context_snippet(source: &str, start: usize, end: usize, radius: usize) -> String {
    let chars: Vec<char> = source.chars().collect();
    let lo = start.saturating_sub(radius);
    let hi = (end + radius).min(chars.len());
    chars[lo.min(chars.len())..hi].iter().collect()
}

/// Replace `[start, end)` character ranges in `source`, applying `edits`
/// strictly in the given order. Edits are `(start, end, replacement)`.
///
/// Callers must pass edits sorted by descending `start` so that earlier
/// (rightmost) splices never shift the offsets of later ones. Ranges that
/// extend past the current buffer, after prior splices shrank it, are clamped;
/// intersecting ranges overwrite whatever the prior edit left behind.
pub fn splice_edits(source: &str, edits: &[(usize, usize, &str)]) -> String {
    let mut chars: Vec<char> = source.chars().collect();
    for &(start, end, replacement) in edits {
        if start > chars.len() {
            continue;
        }
        let end = end.min(chars.len());
        if start > end {
            continue;
        }
        chars.splice(start..end, replacement.chars());
    }
    chars.into_iter().collect()
}
