use std::ops::Range;

use serde::{Deserialize, Serialize};
use similar::TextDiff;

/// A single text edit against one file's original content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edit {
    pub range: EditRange,
    pub replacement: String,
}

/// Where an edit applies, in byte offsets of the original text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EditRange {
    /// Insert at this byte offset; no bytes removed.
    InsertAt { offset: usize },

    /// Replace the byte range [start, end) with the replacement.
    ReplaceBytes { start: usize, end: usize },
}

impl Edit {
    pub fn insert(offset: usize, replacement: impl Into<String>) -> Self {
        Self {
            range: EditRange::InsertAt { offset },
            replacement: replacement.into(),
        }
    }

    pub fn replace(range: Range<usize>, replacement: impl Into<String>) -> Self {
        Self {
            range: EditRange::ReplaceBytes {
                start: range.start,
                end: range.end,
            },
            replacement: replacement.into(),
        }
    }
}

/// Apply edits to the original text and return the new text.
///
/// All offsets address the *original* text. Edits are applied from right to
/// left so earlier ranges never shift later ones; at equal start offsets a
/// replacement is applied before an insert, so an insert at the very start
/// of a replaced span ends up in front of the replacement. Invalid ranges
/// are skipped.
pub fn apply_edits(original: &str, edits: &[Edit]) -> String {
    // (start, end, rank, replacement); rank orders inserts before replaces
    // in ascending order, which reverses to replace-first application.
    let mut normalized: Vec<(usize, usize, u8, &str)> = Vec::with_capacity(edits.len());
    for edit in edits {
        match edit.range {
            EditRange::InsertAt { offset } => {
                let off = offset.min(original.len());
                normalized.push((off, off, 0, &edit.replacement));
            }
            EditRange::ReplaceBytes { start, end } => {
                let s = start.min(original.len());
                let e = end.min(original.len());
                if s <= e {
                    normalized.push((s, e, 1, &edit.replacement));
                }
            }
        }
    }

    normalized.sort_by_key(|&(start, end, rank, _)| (start, rank, end));

    let mut text = original.to_string();
    for (start, end, _, replacement) in normalized.into_iter().rev() {
        if start > end || end > text.len() {
            continue;
        }
        text.replace_range(start..end, replacement);
    }
    text
}

/// Build a unified diff between `before` and `after`.
pub fn unified_diff(path: &str, before: &str, after: &str) -> String {
    TextDiff::from_lines(before, after)
        .unified_diff()
        .context_radius(3)
        .header(path, path)
        .to_string()
}
