//! Prefix/suffix text delta
//!
//! Describes how a text node changed between two observations by the length
//! of the unchanged leading and trailing spans. This is not an edit script:
//! it assumes a single contiguous edit, which is what a caret needs to be
//! carried across a remote change or a browser reflow.
//!
//! All lengths and offsets count `char`s.
//!
//! # Example
//!
//! ```
//! use rtsession_core::text::diff;
//!
//! let delta = diff("Hello world", "Hello, world").unwrap();
//! assert_eq!(delta.common_start, 5);
//! assert_eq!(delta.common_end, 6);
//! assert!(delta.insert && !delta.remove);
//! assert_eq!(delta.delta, 1);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Transformation from an old string to a new string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextDelta {
    /// Length of the unchanged leading span
    pub common_start: usize,

    /// Length of the unchanged trailing span
    pub common_end: usize,

    /// `len(new) - len(old)`
    pub delta: isize,

    /// Characters were inserted between the common spans
    pub insert: bool,

    /// Characters were removed between the common spans
    pub remove: bool,

    pub old_len: usize,
    pub new_len: usize,
}

impl TextDelta {
    /// Span of the old text that was replaced
    pub fn removed_range(&self) -> Range<usize> {
        self.common_start..self.old_len - self.common_end
    }

    /// Span of the new text that replaced it
    pub fn inserted_range(&self) -> Range<usize> {
        self.common_start..self.new_len - self.common_end
    }

    /// Map an offset in the old text to the new text
    ///
    /// Offsets in the common prefix are unchanged, offsets in the common
    /// suffix move by `delta`, and offsets inside the replaced span land at
    /// the end of the inserted span. The result never exceeds `new_len`.
    pub fn transform_offset(&self, offset: usize) -> usize {
        let offset = offset.min(self.old_len);
        if offset <= self.common_start {
            offset
        } else if offset >= self.old_len - self.common_end {
            offset + self.new_len - self.old_len
        } else {
            self.new_len - self.common_end
        }
    }
}

/// Compute the delta between `old` and `new`, `None` if they are equal
pub fn diff(old: &str, new: &str) -> Option<TextDelta> {
    if old == new {
        return None;
    }

    let old: Vec<char> = old.chars().collect();
    let new: Vec<char> = new.chars().collect();

    let common_start = old
        .iter()
        .zip(new.iter())
        .take_while(|(a, b)| a == b)
        .count();

    // The suffix scan may not reuse characters already claimed by the prefix.
    let suffix_limit = old.len().min(new.len()) - common_start;
    let common_end = old
        .iter()
        .rev()
        .zip(new.iter().rev())
        .take(suffix_limit)
        .take_while(|(a, b)| a == b)
        .count();

    let common = common_start + common_end;

    Some(TextDelta {
        common_start,
        common_end,
        delta: new.len() as isize - old.len() as isize,
        insert: new.len() != common,
        remove: old.len() != common,
        old_len: old.len(),
        new_len: new.len(),
    })
}
