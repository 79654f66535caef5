//! Attribute evaluation.
//!
//! Turns the attribute text of a tag into a [`PropMap`]. Two value forms are
//! accepted:
//!
//! - `name="text"` (or `name='text'`): the literal text, with no escape
//!   processing.
//! - `name={expr}`: `true`, `false` and decimal numbers become typed values.
//!   Anything else is kept as the trimmed text between the braces. There is
//!   no identifier lookup and no general expression evaluation.
//!
//! Bare `name` attributes (boolean shorthand) are not supported.

use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::{Lexeme, LexemeKind, TagLexer};
use indexmap::IndexMap;
use smol_str::SmolStr;
use source_span::Span;
use std::fmt;

/// Props of one element, keyed by attribute name.
///
/// A repeated attribute overwrites the earlier value but keeps the
/// position where the name first appeared.
pub type PropMap = IndexMap<SmolStr, PropValue>;

/// A resolved attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    Bool(bool),
    Number(f64),
    String(String),
}

impl PropValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            PropValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Short type name, used in outlines and error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            PropValue::Bool(_) => "boolean",
            PropValue::Number(_) => "number",
            PropValue::String(_) => "string",
        }
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        PropValue::Bool(value)
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        PropValue::Number(value)
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::String(value.to_string())
    }
}

/// Writes the value back in attribute syntax: `"text"`, `{42}`, `{true}`.
///
/// Strings use whichever quote they do not contain. A string holding both
/// quote kinds is written as a braced expression, which reads back as the
/// same raw text.
impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Bool(b) => write!(f, "{{{b}}}"),
            PropValue::Number(n) => write!(f, "{{{n}}}"),
            PropValue::String(s) if !s.contains('"') => write!(f, "\"{s}\""),
            PropValue::String(s) if !s.contains('\'') => write!(f, "'{s}'"),
            PropValue::String(s) => write!(f, "{{{s}}}"),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for PropValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PropValue::Bool(b) => serializer.serialize_bool(*b),
            PropValue::Number(n) if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 => {
                serializer.serialize_i64(*n as i64)
            }
            PropValue::Number(n) => serializer.serialize_f64(*n),
            PropValue::String(s) => serializer.serialize_str(s),
        }
    }
}

/// What to do with an attribute that does not fit either value form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttributeMode {
    /// Skip it and keep going.
    #[default]
    Lenient,
    /// Fail the parse with [`ParseErrorKind::AttributeEvaluation`].
    Strict,
}

/// Evaluates the contents of a braced expression (without the braces).
pub fn evaluate_expression(body: &str) -> PropValue {
    let body = body.trim();
    match body {
        "true" => PropValue::Bool(true),
        "false" => PropValue::Bool(false),
        _ => match parse_decimal(body) {
            Some(n) => PropValue::Number(n),
            None => PropValue::String(body.to_string()),
        },
    }
}

/// Parses `-?digits(.digits)?`. Exponents, hex and `Infinity` are not
/// decimal literals here.
fn parse_decimal(text: &str) -> Option<f64> {
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    let (int, frac) = match unsigned.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (unsigned, None),
    };

    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(int) || !frac.map_or(true, all_digits) {
        return None;
    }

    text.parse().ok()
}

/// Evaluates the attribute text covered by `span` in `source`.
pub fn evaluate_attributes(
    source: &str,
    span: Span,
    mode: AttributeMode,
) -> Result<PropMap, ParseError> {
    let lexemes: Vec<Lexeme> = TagLexer::with_offset(span.slice(source), span.start)
        .filter(|l| l.kind != LexemeKind::Eof)
        .collect();

    let mut props = PropMap::default();
    let mut i = 0;

    while i < lexemes.len() {
        let name = lexemes[i];
        if name.kind != LexemeKind::Ident {
            reject(mode, name, source, "expected an attribute name")?;
            i += 1;
            continue;
        }

        let attr = name.span.slice(source);
        match (lexemes.get(i + 1), lexemes.get(i + 2)) {
            (Some(eq), Some(value)) if eq.kind == LexemeKind::Eq => {
                match value_of(value, source) {
                    Some(v) => {
                        tracing::trace!(attribute = attr, value = ?v, "evaluated attribute");
                        props.insert(SmolStr::new(attr), v);
                    }
                    None => reject(
                        mode,
                        *value,
                        source,
                        &format!("`{attr}` needs a quoted string or a {{...}} value"),
                    )?,
                }
                i += 3;
            }
            (Some(eq), None) if eq.kind == LexemeKind::Eq => {
                reject(mode, *eq, source, &format!("`{attr}` is missing a value"))?;
                i += 2;
            }
            _ => {
                reject(
                    mode,
                    name,
                    source,
                    &format!("`{attr}` has no value; write {attr}={{true}}"),
                )?;
                i += 1;
            }
        }
    }

    Ok(props)
}

fn value_of(lexeme: &Lexeme, source: &str) -> Option<PropValue> {
    let text = lexeme.span.slice(source);
    match lexeme.kind {
        LexemeKind::Str => Some(PropValue::String(text[1..text.len() - 1].to_string())),
        LexemeKind::Expr => Some(evaluate_expression(&text[1..text.len() - 1])),
        _ => None,
    }
}

fn reject(mode: AttributeMode, at: Lexeme, source: &str, message: &str) -> Result<(), ParseError> {
    match mode {
        AttributeMode::Lenient => {
            tracing::debug!(
                found = at.kind.name(),
                text = at.span.slice(source),
                "skipping malformed attribute: {message}"
            );
            Ok(())
        }
        AttributeMode::Strict => Err(ParseError::new(
            ParseErrorKind::AttributeEvaluation {
                message: format!("{message} (found {})", at.kind.name()),
            },
            at.span,
        )),
    }
}
