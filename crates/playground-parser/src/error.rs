//! Parse error types.

use smol_str::SmolStr;
use source_span::{LineIndex, Position, Span};
use thiserror::Error;

/// An error that aborted a parse.
///
/// `parents` lists the elements that were being parsed when the error
/// surfaced, innermost first.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}{}", context_suffix(.parents))]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
    pub parents: Vec<SmolStr>,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        Self {
            kind,
            span,
            parents: Vec::new(),
        }
    }

    pub fn malformed_tag(message: impl Into<String>, span: Span) -> Self {
        Self::new(
            ParseErrorKind::MalformedTag {
                message: message.into(),
            },
            span,
        )
    }

    /// Records that this error surfaced while parsing the children of
    /// `parent`.
    pub fn within(mut self, parent: &str) -> Self {
        self.parents.push(SmolStr::new(parent));
        self
    }

    /// Byte offset of the error in the snippet.
    pub fn offset(&self) -> u32 {
        u32::from(self.span.start)
    }

    /// The tag the error is about, when there is one.
    pub fn tag_name(&self) -> Option<&str> {
        match &self.kind {
            ParseErrorKind::UnclosedTag { tag_name }
            | ParseErrorKind::UnknownComponent { tag_name } => Some(tag_name),
            _ => None,
        }
    }

    /// Parent elements, outermost first.
    pub fn context(&self) -> impl Iterator<Item = &str> {
        self.parents.iter().rev().map(SmolStr::as_str)
    }

    /// Builds the structured report shown in the playground's error panel.
    pub fn report(&self, source: &str) -> ErrorReport {
        let position = LineIndex::new(source).position(source, self.span.start);
        ErrorReport {
            kind: self.kind.label(),
            code: self.kind.code(),
            message: self.to_string(),
            offset: self.offset(),
            position,
            tag_name: self.tag_name().map(SmolStr::new),
            context: self.context().map(SmolStr::new).collect(),
        }
    }
}

/// ` (inside <Stack> > <Card>)`, outermost parent first.
fn context_suffix(parents: &[SmolStr]) -> String {
    if parents.is_empty() {
        return String::new();
    }
    let path: Vec<String> = parents.iter().rev().map(|p| format!("<{p}>")).collect();
    format!(" (inside {})", path.join(" > "))
}

/// The kind of parse error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// A `<` that starts a tag is not followed by a well-formed tag.
    #[error("malformed tag: {message}")]
    MalformedTag { message: String },

    /// An opening tag whose closing tag never appears.
    #[error("unclosed tag: <{tag_name}>")]
    UnclosedTag { tag_name: SmolStr },

    /// A component tag that the registry does not know.
    #[error("unknown component: <{tag_name}>")]
    UnknownComponent { tag_name: SmolStr },

    /// A malformed attribute, reported only in strict attribute mode.
    #[error("invalid attribute: {message}")]
    AttributeEvaluation { message: String },

    /// Elements nested deeper than the configured limit.
    #[error("elements nested deeper than {limit} levels")]
    NestingTooDeep { limit: usize },
}

impl ParseErrorKind {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            ParseErrorKind::MalformedTag { .. } => "malformed-tag",
            ParseErrorKind::UnclosedTag { .. } => "unclosed-tag",
            ParseErrorKind::UnknownComponent { .. } => "unknown-component",
            ParseErrorKind::AttributeEvaluation { .. } => "attribute-evaluation",
            ParseErrorKind::NestingTooDeep { .. } => "nesting-too-deep",
        }
    }

    /// Error class name as shown in the playground's error panel.
    pub fn label(&self) -> &'static str {
        match self {
            ParseErrorKind::MalformedTag { .. } => "MalformedTagError",
            ParseErrorKind::UnclosedTag { .. } => "UnclosedTagError",
            ParseErrorKind::UnknownComponent { .. } => "UnknownComponentError",
            ParseErrorKind::AttributeEvaluation { .. } => "AttributeEvaluationError",
            ParseErrorKind::NestingTooDeep { .. } => "NestingTooDeepError",
        }
    }
}

/// Structured form of a [`ParseError`] for display surfaces.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ErrorReport {
    pub kind: &'static str,
    pub code: &'static str,
    pub message: String,
    pub offset: u32,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub position: Position,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub tag_name: Option<SmolStr>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub context: Vec<SmolStr>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_error_display() {
        let error = ParseError::new(
            ParseErrorKind::UnclosedTag {
                tag_name: "Card".into(),
            },
            Span::from_offsets(0, 6),
        );
        assert_eq!(error.to_string(), "unclosed tag: <Card>");
    }

    #[test]
    fn test_error_display_with_parents() {
        let error =
            ParseError::malformed_tag("unexpected closing tag </b>", Span::from_offsets(9, 13))
                .within("Card")
                .within("Stack");
        assert_eq!(
            error.to_string(),
            "malformed tag: unexpected closing tag </b> (inside <Stack> > <Card>)"
        );
    }

    #[test]
    fn test_report() {
        let source = "<Stack>\n  <IndoUI.Missing />\n</Stack>";
        let error = ParseError::new(
            ParseErrorKind::UnknownComponent {
                tag_name: "IndoUI.Missing".into(),
            },
            Span::from_offsets(10, 28),
        )
        .within("Stack");

        let report = error.report(source);
        assert_eq!(report.kind, "UnknownComponentError");
        assert_eq!(report.code, "unknown-component");
        assert_eq!(report.offset, 10);
        assert_eq!(report.position, Position::new(2, 3));
        assert_eq!(report.tag_name.as_deref(), Some("IndoUI.Missing"));
        assert_eq!(report.context, vec![SmolStr::new("Stack")]);
    }

    #[test]
    fn test_tag_name_absent_for_malformed() {
        let error = ParseError::malformed_tag("expected tag name", Span::from_offsets(0, 1));
        assert_eq!(error.tag_name(), None);
        assert_eq!(error.kind.code(), "malformed-tag");
    }
}
