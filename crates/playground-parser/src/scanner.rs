//! Tag scanner and markup tokenizer.
//!
//! The tokenizer splits a snippet into a flat list of [`Token`]s: text runs,
//! opening tags (self-closing or not) and closing tags. Nesting is resolved
//! later by [`crate::matcher`] and [`crate::parser`].
//!
//! A `<` only starts a tag when it is followed by a letter or `_`, or by `/`
//! and then a letter or `_`. Any other `<` is ordinary text, so `a < b`
//! survives as a text run.

use crate::error::ParseError;
use crate::lexer::{LexemeKind, TagLexer};
use smol_str::SmolStr;
use source_span::Span;
use text_size::TextSize;

/// An opening tag as written in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTag {
    /// Tag name, possibly dotted (`IndoUI.Button`).
    pub name: SmolStr,
    pub name_span: Span,
    /// Everything between the name and the closing `>` or `/>`.
    pub attributes: Span,
    /// True when the tag ends with `/>`.
    pub self_closing: bool,
    /// The whole tag from `<` through `>`. `span.end` is where scanning
    /// resumes.
    pub span: Span,
}

/// A markup token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// A run of text between tags, untrimmed.
    Text,
    /// `<Name ...>` or `<Name ... />`.
    Open(RawTag),
    /// `</Name>`.
    Close(SmolStr),
}

impl TokenKind {
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Text => "text",
            TokenKind::Open(tag) if tag.self_closing => "self-closing tag",
            TokenKind::Open(_) => "opening tag",
            TokenKind::Close(_) => "closing tag",
        }
    }
}

/// Returns true if the `<` at byte `at` starts an opening or closing tag.
pub fn is_tag_start(source: &str, at: usize) -> bool {
    let bytes = source.as_bytes();
    if bytes.get(at) != Some(&b'<') {
        return false;
    }

    match bytes.get(at + 1) {
        Some(b'/') => bytes.get(at + 2).is_some_and(|b| is_name_start(*b)),
        Some(b) => is_name_start(*b),
        None => false,
    }
}

fn is_name_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.')
}

/// Reads a (possibly dotted) tag name starting at `start`.
fn scan_name(source: &str, start: usize) -> Result<(SmolStr, Span), ParseError> {
    let bytes = source.as_bytes();
    let end = bytes[start..]
        .iter()
        .position(|b| !is_name_char(*b))
        .map_or(bytes.len(), |len| start + len);

    let name = &source[start..end];
    let span = Span::from_offsets(start, end);

    if name.is_empty() {
        return Err(ParseError::malformed_tag("expected a tag name after '<'", span));
    }

    let well_formed = name
        .split('.')
        .all(|segment| segment.bytes().next().is_some_and(is_name_start));
    if !well_formed {
        return Err(ParseError::malformed_tag(
            format!("invalid tag name `{name}`"),
            span,
        ));
    }

    Ok((SmolStr::new(name), span))
}

/// Scans the opening tag whose `<` is at byte `at`.
pub fn scan_open_tag(source: &str, at: usize) -> Result<RawTag, ParseError> {
    if !is_tag_start(source, at) || source.as_bytes().get(at + 1) == Some(&b'/') {
        return Err(ParseError::malformed_tag(
            "expected an opening tag",
            Span::from_offsets(at, (at + 1).min(source.len())),
        ));
    }

    let (name, name_span) = scan_name(source, at + 1)?;
    let attrs_start = name_span.end_index();

    let lexer = TagLexer::with_offset(&source[attrs_start..], name_span.end);
    for lexeme in lexer {
        match lexeme.kind {
            LexemeKind::RAngle | LexemeKind::SlashRAngle => {
                return Ok(RawTag {
                    name,
                    name_span,
                    attributes: Span::new(name_span.end, lexeme.span.start),
                    self_closing: lexeme.kind == LexemeKind::SlashRAngle,
                    span: Span::new(TextSize::from(at as u32), lexeme.span.end),
                });
            }
            LexemeKind::Eof => break,
            _ => {}
        }
    }

    Err(ParseError::malformed_tag(
        format!("tag <{name}> is never terminated by '>' or '/>'"),
        Span::from_offsets(at, source.len()),
    ))
}

/// Scans the closing tag whose `<` is at byte `at`.
pub fn scan_close_tag(source: &str, at: usize) -> Result<(SmolStr, Span), ParseError> {
    if !source[at..].starts_with("</") {
        return Err(ParseError::malformed_tag(
            "expected a closing tag",
            Span::from_offsets(at, (at + 1).min(source.len())),
        ));
    }

    let (name, name_span) = scan_name(source, at + 2)?;
    let rest = &source[name_span.end_index()..];
    let trimmed = rest.trim_start();

    if !trimmed.starts_with('>') {
        let bad = name_span.end_index() + (rest.len() - trimmed.len());
        return Err(ParseError::malformed_tag(
            format!("expected '>' to finish </{name}>"),
            Span::from_offsets(bad, (bad + 1).min(source.len())),
        ));
    }

    let end = source.len() - trimmed.len() + 1;
    Ok((name, Span::from_offsets(at, end)))
}

/// Finds the next tag start at or after `from`.
fn next_tag_start(source: &str, from: usize) -> Option<usize> {
    source[from..]
        .match_indices('<')
        .map(|(i, _)| from + i)
        .find(|at| is_tag_start(source, *at))
}

/// Tokenizes a whole snippet.
pub fn tokenize(source: &str) -> Result<Vec<Token>, ParseError> {
    Tokenizer::new(source).collect()
}

/// Iterator over the markup tokens of a snippet.
///
/// Yields an error at most once and then stops.
pub struct Tokenizer<'src> {
    source: &'src str,
    pos: usize,
    failed: bool,
}

impl<'src> Tokenizer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            pos: 0,
            failed: false,
        }
    }

    fn scan_at(&mut self, at: usize) -> Result<Token, ParseError> {
        if self.source[at..].starts_with("</") {
            let (name, span) = scan_close_tag(self.source, at)?;
            Ok(Token {
                kind: TokenKind::Close(name),
                span,
            })
        } else {
            let tag = scan_open_tag(self.source, at)?;
            let span = tag.span;
            Ok(Token {
                kind: TokenKind::Open(tag),
                span,
            })
        }
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Result<Token, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.source.len() {
            return None;
        }

        if is_tag_start(self.source, self.pos) {
            let result = self.scan_at(self.pos);
            match &result {
                Ok(token) => self.pos = token.span.end_index(),
                Err(_) => self.failed = true,
            }
            return Some(result);
        }

        let end = next_tag_start(self.source, self.pos).unwrap_or(self.source.len());
        let span = Span::from_offsets(self.pos, end);
        self.pos = end;
        Some(Ok(Token {
            kind: TokenKind::Text,
            span,
        }))
    }
}
