use serde::Serialize;
use std::fmt;

/// A 0-based line/column coordinate. Columns count characters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

/// A half-open span `[start, end)` of document text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// A range confined to one line.
    pub fn on_line(line: usize, start_column: usize, end_column: usize) -> Self {
        Self::new(
            Position::new(line, start_column),
            Position::new(line, end_column),
        )
    }

    /// The range covering all of `text`, from the first character to the end
    /// of the last line. An empty text yields the empty range at the origin.
    pub fn whole_document(text: &str) -> Self {
        let last_line = text.split('\n').count() - 1;
        let last_column = text
            .rsplit('\n')
            .next()
            .map(|line| line.chars().count())
            .unwrap_or(0);

        Self::new(Position::default(), Position::new(last_line, last_column))
    }

    /// Convert to a character-offset span within `text`, clamping positions
    /// that fall past the end of their line or of the document.
    pub fn to_char_span(&self, text: &str) -> std::ops::Range<usize> {
        let start = char_offset(text, self.start);
        let end = char_offset(text, self.end).max(start);
        start..end
    }

    /// The text the range covers, if its positions exist in `text`.
    pub fn slice<'a>(&self, text: &'a str) -> Option<&'a str> {
        if self.start.line != self.end.line {
            let span = self.to_char_span(text);
            let start = text.char_indices().nth(span.start).map(|(i, _)| i)?;
            let end = text
                .char_indices()
                .nth(span.end)
                .map(|(i, _)| i)
                .unwrap_or(text.len());
            return text.get(start..end);
        }

        let line = text.split('\n').nth(self.start.line)?;
        let start = byte_index(line, self.start.column)?;
        let end = byte_index(line, self.end.column)?;
        line.get(start..end)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

fn char_offset(text: &str, position: Position) -> usize {
    let mut offset = 0;
    for (index, line) in text.split('\n').enumerate() {
        let width = line.chars().count();
        if index == position.line {
            return offset + position.column.min(width);
        }
        // +1 for the newline
        offset += width + 1;
    }
    text.chars().count()
}

fn byte_index(line: &str, column: usize) -> Option<usize> {
    if column == line.chars().count() {
        return Some(line.len());
    }
    line.char_indices().nth(column).map(|(i, _)| i)
}
