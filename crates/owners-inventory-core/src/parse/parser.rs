//! Line and file-level parsers for OWNERS files.

use super::ast::{Declaration, DeclarationKind, Line, OwnersFile};
use super::error::{ParseIssue, ParseResult};
use super::lexer::{find_declaration, is_blank_line, parse_comment_line};
use super::span::Span;
use log::{debug, trace};

/// Parses a single line of an OWNERS file.
///
/// Never fails: a keyword line without a value becomes a `Malformed` line
/// and an issue, anything unrecognized becomes an `Other` line.
fn parse_line(line_text: &str, line_num: usize, line_offset: usize) -> (Line, Option<ParseIssue>) {
    let line_span = Span::new(line_offset, line_num, 1, line_text.len());

    if is_blank_line(line_text) {
        return (Line::blank(line_span), None);
    }

    let trimmed = line_text.trim();
    let leading = line_text.len() - line_text.trim_start().len();

    if let Ok((_, comment_content)) = parse_comment_line(trimmed) {
        return (Line::comment(comment_content, line_span), None);
    }

    let Some(kind) = DeclarationKind::for_line(trimmed) else {
        trace!("Line {}: not a declaration, ignoring", line_num);
        return (Line::other(line_text, line_span), None);
    };

    match find_declaration(trimmed, kind) {
        Some(found) => {
            let column = leading + found.offset;
            let value_span = Span::new(
                line_offset + column,
                line_num,
                column + 1,
                found.value.len(),
            );
            trace!("Line {}: found {}: {}", line_num, kind, found.value);
            let declaration = Declaration::new(kind, found.value, value_span);
            (Line::declaration(declaration, line_span), None)
        }
        None => {
            debug!("Line {}: '{}' without a value, dropping", line_num, kind);
            (
                Line::malformed(kind, line_text, line_span),
                Some(ParseIssue::missing_value(kind, line_span)),
            )
        }
    }
}

/// Parses the content of an OWNERS file.
///
/// Declarations are returned in the order they appear. Blank lines, comment
/// lines and unrecognized lines contribute nothing.
pub fn parse_owners(input: &str) -> ParseResult {
    debug!("Parsing OWNERS file ({} bytes)", input.len());
    let mut lines = Vec::new();
    let mut issues = Vec::new();
    let mut offset = 0;

    for (line_idx, chunk) in input.split_inclusive('\n').enumerate() {
        let line_text = chunk.strip_suffix('\n').unwrap_or(chunk);
        let (line, issue) = parse_line(line_text, line_idx + 1, offset);
        lines.push(line);
        issues.extend(issue);
        offset += chunk.len();
    }

    let ast = OwnersFile::new(lines);
    debug!(
        "Parsing complete: {} lines, {} declarations, {} dropped",
        ast.lines.len(),
        ast.declarations().count(),
        issues.len()
    );
    ParseResult::new(ast, issues)
}
