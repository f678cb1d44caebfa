//! Single-pass delimiter scanner

use core::iter::FusedIterator;

use crate::is_delimiter;

/// A piece of scanned source text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// A run of characters with no delimiters in it
    Text(&'a str),
    /// A single `(` or `)`
    Delimiter(char),
}

/// Iterator over the [`Segment`]s of a source string
///
/// The cursor only moves forward. Concatenating the yielded segments
/// reproduces the input exactly.
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    source: &'a str,
    cursor: usize,
}

/// Scan source text into segments
pub fn segments(source: &str) -> Segments<'_> {
    Segments { source, cursor: 0 }
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = &self.source[self.cursor..];
        let mut chars = rest.char_indices();
        let (_, first) = chars.next()?;

        if is_delimiter(first) {
            self.cursor += first.len_utf8();
            return Some(Segment::Delimiter(first));
        }

        let end = chars
            .find(|&(_, ch)| is_delimiter(ch))
            .map_or(rest.len(), |(index, _)| index);
        self.cursor += end;
        Some(Segment::Text(&rest[..end]))
    }
}

impl FusedIterator for Segments<'_> {}
