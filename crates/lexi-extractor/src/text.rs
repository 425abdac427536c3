//! Character-indexed view of chapter text
//!
//! Every offset the pipeline reports or compares counts characters. Regex
//! matches and string slicing work in bytes, so [`IndexedText`] keeps the
//! byte position of each character start and maps between the two.

/// Chapter text with a byte/char position table, built once per run
#[derive(Debug, Clone)]
pub struct IndexedText<'t> {
    text: &'t str,
    /// Byte position of every character start, ascending
    starts: Vec<usize>,
}

impl<'t> IndexedText<'t> {
    pub fn new(text: &'t str) -> Self {
        Self {
            text,
            starts: text.char_indices().map(|(i, _)| i).collect(),
        }
    }

    pub fn as_str(&self) -> &'t str {
        self.text
    }

    /// Length in characters
    pub fn char_len(&self) -> usize {
        self.starts.len()
    }

    /// Character position of a byte position on a char boundary
    pub fn char_at(&self, byte: usize) -> usize {
        self.starts.partition_point(|&start| start < byte)
    }

    /// Byte position of a character position, clamped to the end
    pub fn byte_at(&self, pos: usize) -> usize {
        self.starts.get(pos).copied().unwrap_or(self.text.len())
    }

    /// Text between two character positions
    pub fn slice(&self, start: usize, end: usize) -> &'t str {
        &self.text[self.byte_at(start)..self.byte_at(end)]
    }
}

/// A clipped span of text around a match, in characters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: usize,
    pub end: usize,
    /// Text exists before `start`
    pub truncated_start: bool,
    /// Text exists after `end`
    pub truncated_end: bool,
}

impl Window {
    /// `radius` characters either side of `[start, end)`
    pub fn around(text: &IndexedText<'_>, start: usize, end: usize, radius: usize) -> Self {
        let len = text.char_len();
        let lo = start.saturating_sub(radius);
        let hi = end.saturating_add(radius).min(len);
        Self {
            start: lo,
            end: hi,
            truncated_start: lo > 0,
            truncated_end: hi < len,
        }
    }

    pub fn slice<'t>(&self, text: &IndexedText<'t>) -> &'t str {
        text.slice(self.start, self.end)
    }
}
