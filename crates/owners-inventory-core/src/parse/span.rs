//! Source location tracking for OWNERS file diagnostics.

/// Represents a location span in the source file.
///
/// Line and column are 1-based for human-readable messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Byte offset from the start of the input (0-based).
    pub offset: usize,
    /// Line number (1-based).
    pub line: usize,
    /// Column number (1-based).
    pub column: usize,
    /// Length of the span in bytes.
    pub length: usize,
}

impl Span {
    /// Creates a new span with the given position and length.
    pub fn new(offset: usize, line: usize, column: usize, length: usize) -> Self {
        Self {
            offset,
            line,
            column,
            length,
        }
    }

    /// Creates a zero-length span at the given position.
    pub fn point(offset: usize, line: usize, column: usize) -> Self {
        Self::new(offset, line, column, 0)
    }

    /// Returns the end offset of this span.
    pub fn end_offset(&self) -> usize {
        self.offset + self.length
    }
}

impl Default for Span {
    fn default() -> Self {
        Self::new(0, 1, 1, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_new_and_accessors() {
        let span = Span::new(10, 2, 5, 15);
        assert_eq!(span.offset, 10);
        assert_eq!(span.line, 2);
        assert_eq!(span.column, 5);
        assert_eq!(span.end_offset(), 25);
    }

    #[test]
    fn span_point_has_zero_length() {
        let span = Span::point(5, 1, 6);
        assert_eq!(span.length, 0);
        assert_eq!(span.end_offset(), 5);
    }

    #[test]
    fn default_span_starts_at_line_one() {
        let span = Span::default();
        assert_eq!((span.line, span.column), (1, 1));
    }
}
