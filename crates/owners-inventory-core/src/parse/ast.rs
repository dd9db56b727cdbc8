//! AST data structures for OWNERS files.
//!
//! An OWNERS file is a sequence of lines. Only declaration lines carry
//! ownership metadata; every other line is kept so diagnostics can point
//! at it.

use super::span::Span;
use std::fmt::{self, Display};

/// The closed set of declaration keywords recognized in OWNERS files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    /// `jira-project <value>`: the issue-tracker project key.
    JiraProject,
    /// `jira-component <value>`: the issue-tracker component name.
    JiraComponent,
}

impl DeclarationKind {
    /// All recognized kinds, in the order they are tried against a line.
    pub const ALL: [DeclarationKind; 2] = [Self::JiraProject, Self::JiraComponent];

    /// Returns the keyword token that introduces this declaration.
    ///
    /// The keyword doubles as the label reported for the declaration.
    pub fn keyword(&self) -> &'static str {
        match self {
            DeclarationKind::JiraProject => "jira-project",
            DeclarationKind::JiraComponent => "jira-component",
        }
    }

    /// Returns the kind whose keyword starts the given (already trimmed) line.
    pub fn for_line(line: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| line.starts_with(kind.keyword()))
    }
}

impl Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A single `keyword value` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Which keyword introduced the declaration.
    pub kind: DeclarationKind,
    /// The extracted value, verbatim.
    pub value: String,
    /// Location of the declaration in the source file.
    pub span: Span,
}

impl Declaration {
    /// Creates a new declaration.
    pub fn new(kind: DeclarationKind, value: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            value: value.into(),
            span,
        }
    }

    /// Returns the label reported for this declaration.
    pub fn label(&self) -> &'static str {
        self.kind.keyword()
    }
}

impl Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} \"{}\"", self.kind, self.value)
    }
}

/// Represents the kind of line in an OWNERS file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// A blank line (may contain only whitespace).
    Blank,
    /// A comment line (starts with '#').
    Comment {
        /// The comment content (without the leading '#').
        content: String,
    },
    /// A recognized declaration with an extracted value.
    Declaration(Declaration),
    /// A line starting with a keyword from which no value could be extracted.
    Malformed {
        /// The keyword the line starts with.
        kind: DeclarationKind,
        /// The raw line content.
        raw: String,
    },
    /// Any other line. Ignored.
    Other {
        /// The raw line content.
        raw: String,
    },
}

/// Represents a single line in an OWNERS file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// The kind/content of this line.
    pub kind: LineKind,
    /// Location of the entire line in the source file.
    pub span: Span,
}

impl Line {
    /// Creates a new line with the given kind and span.
    pub fn new(kind: LineKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Creates a blank line.
    pub fn blank(span: Span) -> Self {
        Self::new(LineKind::Blank, span)
    }

    /// Creates a comment line.
    pub fn comment(content: impl Into<String>, span: Span) -> Self {
        Self::new(
            LineKind::Comment {
                content: content.into(),
            },
            span,
        )
    }

    /// Creates a declaration line.
    pub fn declaration(declaration: Declaration, span: Span) -> Self {
        Self::new(LineKind::Declaration(declaration), span)
    }

    /// Creates a malformed declaration line.
    pub fn malformed(kind: DeclarationKind, raw: impl Into<String>, span: Span) -> Self {
        Self::new(
            LineKind::Malformed {
                kind,
                raw: raw.into(),
            },
            span,
        )
    }

    /// Creates an ignored line.
    pub fn other(raw: impl Into<String>, span: Span) -> Self {
        Self::new(LineKind::Other { raw: raw.into() }, span)
    }

    /// Returns true if this is a declaration line.
    pub fn is_declaration(&self) -> bool {
        matches!(self.kind, LineKind::Declaration(_))
    }

    /// Returns true if this is a comment line.
    pub fn is_comment(&self) -> bool {
        matches!(self.kind, LineKind::Comment { .. })
    }

    /// Returns true if this is a blank line.
    pub fn is_blank(&self) -> bool {
        matches!(self.kind, LineKind::Blank)
    }

    /// Returns true if this line starts with a keyword but carries no value.
    pub fn is_malformed(&self) -> bool {
        matches!(self.kind, LineKind::Malformed { .. })
    }
}

impl Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            LineKind::Blank => Ok(()),
            LineKind::Comment { content } => write!(f, "#{}", content),
            LineKind::Declaration(declaration) => write!(f, "{}", declaration),
            LineKind::Malformed { raw, .. } | LineKind::Other { raw } => f.write_str(raw),
        }
    }
}

/// The complete AST for an OWNERS file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OwnersFile {
    /// All lines in the file, in order.
    pub lines: Vec<Line>,
}

impl OwnersFile {
    /// Creates a new OWNERS file AST from the given lines.
    pub fn new(lines: Vec<Line>) -> Self {
        Self { lines }
    }

    /// Returns an iterator over the declarations, in file order.
    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.lines.iter().filter_map(|line| match &line.kind {
            LineKind::Declaration(declaration) => Some(declaration),
            _ => None,
        })
    }

    /// Returns the `(label, value)` pairs in file order.
    ///
    /// Duplicates are kept.
    pub fn pairs(&self) -> Vec<(&'static str, &str)> {
        self.declarations()
            .map(|d| (d.label(), d.value.as_str()))
            .collect()
    }

    /// Returns true if the file declares nothing.
    pub fn is_empty(&self) -> bool {
        self.declarations().next().is_none()
    }
}

impl Display for OwnersFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_span() -> Span {
        Span::new(0, 1, 1, 10)
    }

    #[test]
    fn keywords_match_labels() {
        assert_eq!(DeclarationKind::JiraProject.keyword(), "jira-project");
        assert_eq!(DeclarationKind::JiraComponent.keyword(), "jira-component");
        assert_eq!(DeclarationKind::JiraComponent.to_string(), "jira-component");
    }

    #[test]
    fn kind_for_line() {
        assert_eq!(
            DeclarationKind::for_line("jira-project FOO"),
            Some(DeclarationKind::JiraProject)
        );
        assert_eq!(
            DeclarationKind::for_line("jira-component 'x'"),
            Some(DeclarationKind::JiraComponent)
        );
        assert_eq!(DeclarationKind::for_line("approvers: alice"), None);
        assert_eq!(DeclarationKind::for_line(" jira-project FOO"), None);
    }

    #[test]
    fn line_predicates() {
        let line = Line::blank(test_span());
        assert!(line.is_blank());
        assert!(!line.is_declaration());

        let line = Line::malformed(DeclarationKind::JiraProject, "jira-project", test_span());
        assert!(line.is_malformed());
        assert!(!line.is_declaration());
    }

    #[test]
    fn pairs_preserve_order_and_duplicates() {
        let file = OwnersFile::new(vec![
            Line::comment(" header", test_span()),
            Line::declaration(
                Declaration::new(DeclarationKind::JiraProject, "A", test_span()),
                test_span(),
            ),
            Line::declaration(
                Declaration::new(DeclarationKind::JiraComponent, "c", test_span()),
                test_span(),
            ),
            Line::declaration(
                Declaration::new(DeclarationKind::JiraProject, "A", test_span()),
                test_span(),
            ),
        ]);

        assert_eq!(
            file.pairs(),
            vec![
                ("jira-project", "A"),
                ("jira-component", "c"),
                ("jira-project", "A"),
            ]
        );
        assert!(!file.is_empty());
    }

    #[test]
    fn file_without_declarations_is_empty() {
        let file = OwnersFile::new(vec![
            Line::comment(" only comments", test_span()),
            Line::other("approvers:", test_span()),
        ]);
        assert!(file.is_empty());
        assert!(file.pairs().is_empty());
    }

    #[test]
    fn owners_file_display() {
        let file = OwnersFile::new(vec![
            Line::comment(" OWNERS", test_span()),
            Line::blank(test_span()),
            Line::declaration(
                Declaration::new(DeclarationKind::JiraProject, "PROJ", test_span()),
                test_span(),
            ),
        ]);
        assert_eq!(file.to_string(), "# OWNERS\n\njira-project \"PROJ\"\n");
    }
}
