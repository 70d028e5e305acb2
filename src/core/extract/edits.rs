//! Span-based text edits.
//!
//! Rewrites are never printed from the AST. Every replacement is a slice of the
//! original source with child edits spliced in, so text outside edited spans (comments,
//! formatting, non-ASCII characters) comes out byte for byte.

/// Replace `source[lo..hi]` with `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub lo: usize,
    pub hi: usize,
    pub text: String,
    /// Key of the first lookup call inside `text`.
    pub key: String,
}

impl Edit {
    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self {
            lo: at,
            hi: at,
            text: text.into(),
            key: String::new(),
        }
    }
}

/// Render `source[lo..hi]` with `edits` applied.
///
/// Edits outside the range or overlapping an earlier edit are dropped. Zero-width
/// inserts sort before replacements starting at the same offset.
pub fn splice(source: &str, lo: usize, hi: usize, mut edits: Vec<Edit>) -> String {
    edits.sort_by_key(|e| (e.lo, e.hi));

    let mut out = String::with_capacity(hi.saturating_sub(lo));
    let mut cursor = lo;
    for edit in edits {
        if edit.lo < cursor || edit.hi > hi || edit.hi < edit.lo {
            continue;
        }
        out.push_str(source.get(cursor..edit.lo).unwrap_or_default());
        out.push_str(&edit.text);
        cursor = edit.hi;
    }
    out.push_str(source.get(cursor..hi).unwrap_or_default());
    out
}
