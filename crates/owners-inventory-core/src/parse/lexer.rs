//! Lexer and token parsers for OWNERS files.
//!
//! This module contains nom-based parsers for comment lines and for the
//! value part of `keyword value` declarations.

use nom::{
    IResult, Parser,
    bytes::complete::{tag, take_while1},
    character::complete::{char, one_of, space0},
    combinator::{opt, rest},
};

use super::ast::DeclarationKind;

/// Characters accepted as value delimiters.
const QUOTES: &str = "'\"";

fn is_quote(c: char) -> bool {
    QUOTES.contains(c)
}

/// Parses a complete comment line (optional whitespace + # + content).
pub fn parse_comment_line(input: &str) -> IResult<&str, &str> {
    (space0, char('#'), rest)
        .map(|(_, _, content)| content)
        .parse(input)
}

/// Checks if a line is blank (empty or only whitespace).
pub fn is_blank_line(input: &str) -> bool {
    input.trim().is_empty()
}

/// A value extracted from a declaration line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationValue<'a> {
    /// The captured value text.
    pub value: &'a str,
    /// Byte offset of the value within the line.
    pub offset: usize,
}

/// Optional opening quote, then at least one non-quote character, then an
/// optional closing quote. Quotes need not be balanced.
fn quoted_value(input: &str) -> IResult<&str, (Option<char>, &str)> {
    (
        opt(one_of(QUOTES)),
        take_while1(|c: char| !is_quote(c)),
        opt(one_of(QUOTES)),
    )
        .map(|(open, value, _)| (open, value))
        .parse(input)
}

/// Parses `keyword <whitespace> ['"]?value['"]?` at the start of `input`.
pub fn parse_declaration<'a>(
    input: &'a str,
    keyword: &str,
) -> IResult<&'a str, DeclarationValue<'a>> {
    let (after_keyword, _) = tag(keyword).parse(input)?;
    let (after_sep, separator) = take_while1(char::is_whitespace).parse(after_keyword)?;
    let value_start = keyword.len() + separator.len();

    match quoted_value(after_sep) {
        Ok((remaining, (open, value))) => Ok((
            remaining,
            DeclarationValue {
                value,
                offset: value_start + open.map_or(0, char::len_utf8),
            },
        )),
        Err(err) => {
            // Only quotes (or nothing) follow the separator. With two or more
            // separator characters the last one is captured as the value,
            // matching `\s+['"]?([^'"]+)['"]?` under backtracking.
            match separator.char_indices().last() {
                Some((idx, _)) if idx > 0 => {
                    let remaining = after_sep.strip_prefix(['\'', '"']).unwrap_or(after_sep);
                    Ok((
                        remaining,
                        DeclarationValue {
                            value: &separator[idx..],
                            offset: keyword.len() + idx,
                        },
                    ))
                }
                _ => Err(err),
            }
        }
    }
}

/// Finds the first occurrence of the kind's keyword in `line` that is
/// followed by a value.
///
/// Occurrences are tried left to right, so a line that starts with the
/// keyword but has no value there may still match a later occurrence.
pub fn find_declaration(line: &str, kind: DeclarationKind) -> Option<DeclarationValue<'_>> {
    let keyword = kind.keyword();
    line.match_indices(keyword).find_map(|(idx, _)| {
        parse_declaration(&line[idx..], keyword)
            .ok()
            .map(|(_, found)| DeclarationValue {
                value: found.value,
                offset: idx + found.offset,
            })
    })
}
