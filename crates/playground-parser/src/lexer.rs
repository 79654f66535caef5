//! In-tag lexer using logos.
//!
//! Everything between a tag name and the `>`/`/>` that ends the tag is lexed
//! here: attribute names, `=`, quoted strings and braced expressions. Text
//! between tags never goes through this lexer; the tokenizer in
//! [`crate::scanner`] handles it directly.

use logos::Logos;
use source_span::Span;
use text_size::TextSize;

/// A lexeme inside a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lexeme {
    pub kind: LexemeKind,
    /// Position in the full snippet, not in the lexed sub-slice.
    pub span: Span,
}

/// Lexeme kinds inside a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Logos, Default)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum LexemeKind {
    /// `>`
    #[token(">")]
    RAngle,

    /// `/>`
    #[token("/>")]
    SlashRAngle,

    /// `=`
    #[token("=")]
    Eq,

    /// A quoted literal. No escape sequences are recognised. A quote that
    /// is never closed lexes as a one-byte [`LexemeKind::Error`].
    #[token("\"", lex_quoted)]
    #[token("'", lex_quoted)]
    Str,

    /// A braced expression `{...}`, including both braces.
    #[token("{", lex_braced)]
    Expr,

    /// An attribute name.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_\-]*")]
    Ident,

    /// End of the lexed slice.
    Eof,

    /// Anything else, including an unterminated `{`.
    #[default]
    Error,
}

impl LexemeKind {
    /// Human-readable name for error messages.
    pub fn name(&self) -> &'static str {
        match self {
            LexemeKind::RAngle => "'>'",
            LexemeKind::SlashRAngle => "'/>'",
            LexemeKind::Eq => "'='",
            LexemeKind::Str => "string literal",
            LexemeKind::Expr => "braced expression",
            LexemeKind::Ident => "identifier",
            LexemeKind::Eof => "end of input",
            LexemeKind::Error => "invalid character",
        }
    }
}

/// Consumes a quoted literal after its opening quote.
fn lex_quoted(lex: &mut logos::Lexer<'_, LexemeKind>) -> bool {
    let quote = lex.slice();
    match lex.remainder().find(quote) {
        Some(len) => {
            lex.bump(len + 1);
            true
        }
        None => false,
    }
}

/// Consumes the body of a braced expression after its opening `{`.
fn lex_braced(lex: &mut logos::Lexer<'_, LexemeKind>) -> bool {
    match braced_len(lex.remainder()) {
        Some(len) => {
            lex.bump(len);
            true
        }
        None => false,
    }
}

/// Returns the byte length of `rest` up to and including the `}` that closes
/// an already-consumed `{`.
///
/// Quoted strings are skipped as a unit, so `}` inside `"..."`, `'...'` or
/// `` `...` `` does not close the expression. Nested braces are balanced. A
/// quote directly after a letter or digit is an apostrophe, not a string
/// (`{don't}`). If the quote-aware scan never closes, the first `}` ends the
/// expression.
pub(crate) fn braced_len(rest: &str) -> Option<usize> {
    balanced_len(rest).or_else(|| rest.find('}').map(|i| i + 1))
}

fn balanced_len(rest: &str) -> Option<usize> {
    let mut depth = 1usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut prev: Option<char> = None;

    for (i, c) in rest.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            prev = Some(c);
            continue;
        }

        match c {
            '"' | '\'' | '`' if !prev.is_some_and(char::is_alphanumeric) => quote = Some(c),
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
        prev = Some(c);
    }

    None
}

/// Lexer over a slice of a snippet.
pub struct TagLexer<'src> {
    inner: logos::Lexer<'src, LexemeKind>,
    base: TextSize,
    finished: bool,
}

impl<'src> TagLexer<'src> {
    /// Lexes `source` as if it started at offset 0.
    pub fn new(source: &'src str) -> Self {
        Self::with_offset(source, TextSize::from(0))
    }

    /// Lexes `slice`, reporting spans relative to `base` in the full snippet.
    pub fn with_offset(slice: &'src str, base: TextSize) -> Self {
        Self {
            inner: LexemeKind::lexer(slice),
            base,
            finished: false,
        }
    }

    /// Text of the most recent lexeme.
    pub fn slice(&self) -> &'src str {
        self.inner.slice()
    }

    fn current_span(&self) -> Span {
        let range = self.inner.span();
        Span::from_offsets(range.start, range.end).shift(self.base)
    }
}

impl Iterator for TagLexer<'_> {
    type Item = Lexeme;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.inner.next() {
            Some(Ok(kind)) => Some(Lexeme {
                kind,
                span: self.current_span(),
            }),
            Some(Err(())) => Some(Lexeme {
                kind: LexemeKind::Error,
                span: self.current_span(),
            }),
            None => {
                self.finished = true;
                let end = self.base + TextSize::of(self.inner.source());
                Some(Lexeme {
                    kind: LexemeKind::Eof,
                    span: Span::empty(end),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(source: &str) -> Vec<LexemeKind> {
        TagLexer::new(source)
            .map(|l| l.kind)
            .filter(|k| *k != LexemeKind::Eof)
            .collect()
    }

    #[test]
    fn test_string_attribute() {
        assert_eq!(
            kinds(r#"variant="primary">"#),
            vec![
                LexemeKind::Ident,
                LexemeKind::Eq,
                LexemeKind::Str,
                LexemeKind::RAngle
            ]
        );
    }

    #[test]
    fn test_expression_attribute() {
        assert_eq!(
            kinds("count={42} />"),
            vec![
                LexemeKind::Ident,
                LexemeKind::Eq,
                LexemeKind::Expr,
                LexemeKind::SlashRAngle
            ]
        );
    }

    #[test]
    fn test_angle_inside_string_is_not_tag_end() {
        let lexemes: Vec<_> = TagLexer::new(r#"title="a > b">"#).collect();
        assert_eq!(lexemes[2].kind, LexemeKind::Str);
        assert_eq!(lexemes[3].kind, LexemeKind::RAngle);
        assert_eq!(lexemes[3].span, Span::from_offsets(13, 14));
    }

    #[test]
    fn test_brace_inside_string_expression() {
        let source = r#"label={"a}b"} />"#;
        let mut lexer = TagLexer::new(source);
        lexer.next();
        lexer.next();
        let expr = lexer.next().unwrap();
        assert_eq!(expr.kind, LexemeKind::Expr);
        assert_eq!(expr.span.slice(source), r#"{"a}b"}"#);
    }

    #[test]
    fn test_nested_braces_balance() {
        assert_eq!(braced_len("a {b} c} rest"), Some(8));
    }

    #[test]
    fn test_unterminated_brace_is_error() {
        assert_eq!(
            kinds("x={1 />"),
            vec![
                LexemeKind::Ident,
                LexemeKind::Eq,
                LexemeKind::Error,
                LexemeKind::Error,
                LexemeKind::SlashRAngle
            ]
        );
    }

    #[test]
    fn test_unterminated_quote_stops_at_the_quote() {
        let source = r#"label="oops size={2} />"#;
        let lexemes: Vec<_> = TagLexer::new(source).collect();
        assert_eq!(lexemes[2].kind, LexemeKind::Error);
        assert_eq!(lexemes[2].span, Span::from_offsets(6, 7));
        assert_eq!(
            lexemes.iter().rev().nth(1).map(|l| l.kind),
            Some(LexemeKind::SlashRAngle)
        );
    }

    #[test]
    fn test_apostrophe_in_braces() {
        assert_eq!(braced_len("don't} size={2} />"), Some(6));
        assert_eq!(braced_len("say(\"}\")} />"), Some(9));
    }

    #[test]
    fn test_unbalanced_quote_falls_back_to_first_brace() {
        assert_eq!(braced_len("\"open} />"), Some(6));
    }

    #[test]
    fn test_hyphenated_names() {
        assert_eq!(
            kinds(r#"aria-label="x" data-id='7'"#),
            vec![
                LexemeKind::Ident,
                LexemeKind::Eq,
                LexemeKind::Str,
                LexemeKind::Ident,
                LexemeKind::Eq,
                LexemeKind::Str
            ]
        );
    }

    #[test]
    fn test_spans_are_rebased() {
        let lexemes: Vec<_> = TagLexer::with_offset("a=\"b\"", TextSize::from(10)).collect();
        assert_eq!(lexemes[0].span, Span::from_offsets(10, 11));
        assert_eq!(lexemes[2].span, Span::from_offsets(12, 15));
        assert_eq!(lexemes[3].kind, LexemeKind::Eof);
        assert_eq!(lexemes[3].span, Span::empty(TextSize::from(15)));
    }

    #[test]
    fn test_newlines_are_skipped() {
        assert_eq!(
            kinds("a=\"1\"\n  b={true}\n>"),
            vec![
                LexemeKind::Ident,
                LexemeKind::Eq,
                LexemeKind::Str,
                LexemeKind::Ident,
                LexemeKind::Eq,
                LexemeKind::Expr,
                LexemeKind::RAngle
            ]
        );
    }
}
