//! Source-annotated error reports rendered through miette.

use miette::{GraphicalReportHandler, GraphicalTheme, NamedSource, SourceSpan};
use playground_parser::{ParseError, ParseErrorKind};
use thiserror::Error;

/// A [`ParseError`] paired with the snippet it came from.
#[derive(Debug, Error, miette::Diagnostic)]
pub enum SnippetDiagnostic {
    #[error("{message}")]
    #[diagnostic(code("malformed-tag"))]
    MalformedTag {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("malformed tag here")]
        span: SourceSpan,
    },

    #[error("{message}")]
    #[diagnostic(
        code("unclosed-tag"),
        help("add the matching closing tag, or end the opening tag with `/>` if it has no children")
    )]
    UnclosedTag {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("opened here but never closed")]
        span: SourceSpan,
    },

    #[error("{message}")]
    #[diagnostic(
        code("unknown-component"),
        help("register the component with --component or in indo-playground.json")
    )]
    UnknownComponent {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("not in the component registry")]
        span: SourceSpan,
    },

    #[error("{message}")]
    #[diagnostic(
        code("attribute-evaluation"),
        help("attributes take the form name=\"text\" or name={{value}}")
    )]
    AttributeEvaluation {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("invalid attribute")]
        span: SourceSpan,
    },

    #[error("{message}")]
    #[diagnostic(code("nesting-too-deep"), help("raise the limit with --max-depth"))]
    NestingTooDeep {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("nesting limit reached here")]
        span: SourceSpan,
    },
}

impl SnippetDiagnostic {
    pub fn new(filename: &str, source: &str, error: &ParseError) -> Self {
        // Zero-length spans still get an arrow.
        let len = error.span.range().len().max(1);
        let start = error.span.start_index().min(source.len());
        let len = len.min(source.len().saturating_sub(start));

        let message = error.to_string();
        let src = NamedSource::new(filename, source.to_string());
        let span = SourceSpan::from((start, len));

        match error.kind {
            ParseErrorKind::MalformedTag { .. } => Self::MalformedTag { message, src, span },
            ParseErrorKind::UnclosedTag { .. } => Self::UnclosedTag { message, src, span },
            ParseErrorKind::UnknownComponent { .. } => {
                Self::UnknownComponent { message, src, span }
            }
            ParseErrorKind::AttributeEvaluation { .. } => {
                Self::AttributeEvaluation { message, src, span }
            }
            ParseErrorKind::NestingTooDeep { .. } => Self::NestingTooDeep { message, src, span },
        }
    }

    /// Renders the report as plain text, without colors.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let handler = GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor())
            .with_width(100);
        if handler.render_report(&mut out, self).is_err() {
            return format!("{self}\n");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use miette::Diagnostic;
    use playground_parser::{parse, StaticRegistry};
    use pretty_assertions::assert_eq;

    fn diagnostic(source: &str) -> SnippetDiagnostic {
        let err = parse(source, &StaticRegistry::indo_ui()).unwrap_err();
        SnippetDiagnostic::new("demo.jsx", source, &err)
    }

    #[test]
    fn test_render_contains_source_and_label() {
        let output = diagnostic("<Card>\n  <IndoUI.Chart />\n</Card>").render();
        assert!(output.contains("unknown-component"), "{output}");
        assert!(output.contains("demo.jsx"), "{output}");
        assert!(output.contains("<IndoUI.Chart />"), "{output}");
        assert!(output.contains("not in the component registry"), "{output}");
        assert!(output.contains("--component"), "{output}");
    }

    #[test]
    fn test_code_follows_error_kind() {
        let diag = diagnostic("<Card>");
        assert_eq!(diag.code().map(|c| c.to_string()).as_deref(), Some("unclosed-tag"));
        assert!(diag.help().is_some());
        assert_eq!(diag.to_string(), "unclosed tag: <Card>");
    }

    #[test]
    fn test_span_clamped_to_source() {
        let diag = diagnostic("<Card>");
        let label = diag.labels().and_then(|mut labels| labels.next()).unwrap();
        assert_eq!(label.offset(), 0);
        assert_eq!(label.len(), 6);
        assert_eq!(label.label(), Some("opened here but never closed"));
    }
}
