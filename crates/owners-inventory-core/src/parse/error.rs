//! Diagnostics produced while parsing OWNERS files.
//!
//! Nothing in an OWNERS file is fatal: lines that cannot be read as
//! declarations are dropped. Dropped keyword lines are reported here so
//! callers can surface them in verbose output.

use super::ast::{DeclarationKind, OwnersFile};
use super::span::Span;
use thiserror::Error;

/// A non-fatal problem found while parsing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseIssue {
    /// A line starts with a keyword but no value could be extracted.
    #[error("line {line}: '{kind}' declaration has no value")]
    MissingValue {
        /// The line number (1-based).
        line: usize,
        /// The keyword the line starts with.
        kind: DeclarationKind,
        /// Location of the line.
        span: Span,
    },
}

impl ParseIssue {
    /// Creates a missing value issue.
    pub fn missing_value(kind: DeclarationKind, span: Span) -> Self {
        Self::MissingValue {
            line: span.line,
            kind,
            span,
        }
    }

    /// Returns the span associated with this issue.
    pub fn span(&self) -> &Span {
        match self {
            ParseIssue::MissingValue { span, .. } => span,
        }
    }

    /// Returns the line number where this issue occurred.
    pub fn line(&self) -> usize {
        match self {
            ParseIssue::MissingValue { line, .. } => *line,
        }
    }
}

/// The result of parsing an OWNERS file.
#[derive(Debug, Clone, Default)]
pub struct ParseResult {
    /// The parsed AST.
    pub ast: OwnersFile,
    /// Keyword lines that were dropped.
    pub issues: Vec<ParseIssue>,
}

impl ParseResult {
    /// Creates a parse result.
    pub fn new(ast: OwnersFile, issues: Vec<ParseIssue>) -> Self {
        Self { ast, issues }
    }

    /// Returns the `(label, value)` pairs in file order.
    pub fn pairs(&self) -> Vec<(&'static str, &str)> {
        self.ast.pairs()
    }

    /// Returns true if no declaration was found.
    pub fn is_empty(&self) -> bool {
        self.ast.is_empty()
    }

    /// Returns true if any keyword line was dropped.
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }
}
