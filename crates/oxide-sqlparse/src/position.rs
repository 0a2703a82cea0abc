//! Mapping between byte offsets and line/column positions.
//!
//! Lines are separated by `\n`, `\r\n` or a lone `\r`; each counts as a single
//! terminator. Lines and columns are 1-based and columns count characters, so
//! a tab or a stray `\r` inside a line advances the column by exactly one.

use crate::lexer::Span;

/// A 1-based line and column pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineCol {
    /// Line number, starting at 1.
    pub line: usize,
    /// Column in characters, starting at 1.
    pub column: usize,
}

impl LineCol {
    /// Creates a new position.
    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// One line of the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// Line number, starting at 1.
    pub number: usize,
    /// Byte range of the line content, terminator excluded.
    pub span: Span,
    /// The line content.
    pub text: &'a str,
    /// The terminator that ends this line; empty for the last line.
    pub terminator: &'a str,
}

/// Line start table for a source text.
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    source: &'a str,
    /// Byte offset at which each line starts. Never empty.
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    /// Builds the index with a single scan over `source`.
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        let bytes = source.as_bytes();
        let mut line_starts = vec![0];
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\n' => line_starts.push(i + 1),
                b'\r' if bytes.get(i + 1) == Some(&b'\n') => {
                    i += 1;
                    line_starts.push(i + 1);
                }
                b'\r' => line_starts.push(i + 1),
                _ => {}
            }
            i += 1;
        }
        Self {
            source,
            line_starts,
        }
    }

    /// Returns the indexed source text.
    #[must_use]
    pub const fn source(&self) -> &'a str {
        self.source
    }

    /// Returns the number of lines. An empty text has one empty line.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Maps a byte offset to its line and column.
    ///
    /// Offsets past the end are clamped to the end of the text.
    #[must_use]
    pub fn line_col(&self, offset: usize) -> LineCol {
        let offset = offset.min(self.source.len());
        let line = self.line_starts.partition_point(|&start| start <= offset);
        let start = self.line_starts[line - 1];
        let column = self
            .source
            .get(start..offset)
            .map_or(offset - start, |prefix| prefix.chars().count());
        LineCol::new(line, column + 1)
    }

    /// Maps a line and column back to a byte offset.
    ///
    /// Column `n + 1` of a line with `n` characters addresses the position
    /// right after its last character. Anything further is `None`.
    #[must_use]
    pub fn offset(&self, position: LineCol) -> Option<usize> {
        if position.column == 0 {
            return None;
        }
        let line = self.line(position.line)?;
        let skip = position.column - 1;
        if skip == 0 {
            return Some(line.span.start);
        }
        let mut chars = line.text.char_indices().skip(skip);
        match chars.next() {
            Some((index, _)) => Some(line.span.start + index),
            None if line.text.chars().count() == skip => Some(line.span.end),
            None => None,
        }
    }

    /// Returns the given 1-based line.
    #[must_use]
    pub fn line(&self, number: usize) -> Option<Line<'a>> {
        let start = *self.line_starts.get(number.checked_sub(1)?)?;
        let next = self
            .line_starts
            .get(number)
            .copied()
            .unwrap_or(self.source.len());
        let raw = &self.source[start..next];
        let content = raw.trim_end_matches(['\n', '\r']);
        let terminator = &raw[content.len()..];
        Some(Line {
            number,
            span: Span::new(start, start + content.len()),
            text: content,
            terminator,
        })
    }

    /// Returns the line containing `offset`.
    #[must_use]
    pub fn line_at(&self, offset: usize) -> Option<Line<'a>> {
        self.line(self.line_col(offset).line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line() {
        let index = LineIndex::new("SELECT 1");
        assert_eq!(index.line_count(), 1);
        assert_eq!(index.line_col(0), LineCol::new(1, 1));
        assert_eq!(index.line_col(7), LineCol::new(1, 8));
        assert_eq!(index.line_col(8), LineCol::new(1, 9));
    }

    #[test]
    fn test_empty_source() {
        let index = LineIndex::new("");
        assert_eq!(index.line_count(), 1);
        assert_eq!(index.line_col(0), LineCol::new(1, 1));
        assert_eq!(index.line(1).map(|l| l.text), Some(""));
    }

    #[test]
    fn test_line_terminators() {
        let index = LineIndex::new("a\nb\r\nc\rd");
        assert_eq!(index.line_count(), 4);
        assert_eq!(index.line_col(2), LineCol::new(2, 1));
        assert_eq!(index.line_col(5), LineCol::new(3, 1));
        assert_eq!(index.line_col(7), LineCol::new(4, 1));
    }

    #[test]
    fn test_tabs_count_as_one_column() {
        let index = LineIndex::new("SELECT 1\t limit");
        assert_eq!(index.line_col(10), LineCol::new(1, 11));
    }

    #[test]
    fn test_columns_count_characters() {
        let source = "'é' x";
        let index = LineIndex::new(source);
        assert_eq!(index.line_col(source.find('x').unwrap_or(0)), LineCol::new(1, 5));
    }

    #[test]
    fn test_offset_clamped_to_end() {
        let index = LineIndex::new("ab\n");
        assert_eq!(index.line_col(100), LineCol::new(2, 1));
    }

    #[test]
    fn test_offset_round_trip() {
        let source = "  \n\tSELECT 1;\r\n  SELECT é, 2";
        let index = LineIndex::new(source);
        for (offset, _) in source.char_indices() {
            // The \n of a \r\n pair has no column of its own.
            let bytes = source.as_bytes();
            if offset > 0 && bytes[offset - 1] == b'\r' && bytes[offset] == b'\n' {
                continue;
            }
            let position = index.line_col(offset);
            assert_eq!(
                index.offset(position),
                Some(offset),
                "offset {offset} -> {position:?}"
            );
        }
    }

    #[test]
    fn test_offset_out_of_range() {
        let index = LineIndex::new("ab\ncd");
        assert_eq!(index.offset(LineCol::new(1, 3)), Some(2));
        assert_eq!(index.offset(LineCol::new(1, 4)), None);
        assert_eq!(index.offset(LineCol::new(3, 1)), None);
        assert_eq!(index.offset(LineCol::new(0, 1)), None);
        assert_eq!(index.offset(LineCol::new(1, 0)), None);
    }

    #[test]
    fn test_line_content_and_terminator() {
        let index = LineIndex::new("one\r\ntwo\nthree");
        let first = index.line(1).unwrap();
        assert_eq!(first.text, "one");
        assert_eq!(first.terminator, "\r\n");
        assert_eq!(first.span, Span::new(0, 3));
        let second = index.line(2).unwrap();
        assert_eq!(second.text, "two");
        assert_eq!(second.terminator, "\n");
        let last = index.line(3).unwrap();
        assert_eq!(last.text, "three");
        assert_eq!(last.terminator, "");
        assert!(index.line(4).is_none());
    }

    #[test]
    fn test_line_at() {
        let index = LineIndex::new("a\n  bc\n");
        assert_eq!(index.line_at(4).map(|l| l.number), Some(2));
        assert_eq!(index.line_at(4).map(|l| l.text), Some("  bc"));
    }
}
