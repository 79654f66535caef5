//! Output formatting.

use crate::cli::OutputFormat;
use crate::diagnostic::SnippetDiagnostic;
use playground_parser::{
    ChildNode, ComponentId, ComponentRef, Document, ElementNode, ErrorReport, LineIndex,
    ParseError,
};
use serde::Serialize;
use std::fmt::Write;

/// One snippet's result in JSON output.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonEntry<'a> {
    pub filename: &'a str,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elements: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tree: Option<&'a Document<ComponentId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorReport>,
}

impl<'a> JsonEntry<'a> {
    pub fn new(
        filename: &'a str,
        source: &str,
        result: Result<&'a Document<ComponentId>, &ParseError>,
    ) -> Self {
        match result {
            Ok(doc) => Self {
                filename,
                ok: true,
                elements: Some(doc.element_count()),
                tree: Some(doc),
                error: None,
            },
            Err(err) => Self {
                filename,
                ok: false,
                elements: None,
                tree: None,
                error: Some(err.report(source)),
            },
        }
    }

    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Formats run results for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// JSON results are collected and printed once at the end.
    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Formats one snippet's result.
    pub fn format(
        &self,
        filename: &str,
        source: &str,
        result: Result<&Document<ComponentId>, &ParseError>,
    ) -> String {
        match (self.format, result) {
            (OutputFormat::Json, result) => {
                let entry = JsonEntry::new(filename, source, result);
                serde_json::to_string_pretty(&entry).unwrap_or_default()
            }
            (OutputFormat::Human, Ok(doc)) => self.format_outline(filename, doc, None),
            (OutputFormat::HumanVerbose, Ok(doc)) => {
                self.format_outline(filename, doc, Some((&LineIndex::new(source), source)))
            }
            (OutputFormat::Machine, Ok(doc)) => {
                format!("OK {} {}\n", filename, doc.element_count())
            }
            (OutputFormat::Markup, Ok(doc)) => format!("{doc}\n"),
            (OutputFormat::HumanVerbose, Err(err)) => {
                SnippetDiagnostic::new(filename, source, err).render()
            }
            (OutputFormat::Machine, Err(err)) => self.format_machine_error(filename, source, err),
            (OutputFormat::Human | OutputFormat::Markup, Err(err)) => {
                self.format_human_error(filename, source, err)
            }
        }
    }

    fn format_human_error(&self, filename: &str, source: &str, err: &ParseError) -> String {
        let report = err.report(source);
        format!(
            "{}:{}:{}\n{}: {} ({})\n\n",
            filename,
            report.position.line,
            report.position.column,
            report.kind,
            report.message,
            report.code
        )
    }

    fn format_machine_error(&self, filename: &str, source: &str, err: &ParseError) -> String {
        let index = LineIndex::new(source);
        let start = index.position(source, err.span.start);
        let end = index.position(source, err.span.end);
        format!(
            "ERROR {}:{}:{}:{}:{} {} ({})\n",
            filename, start.line, start.column, end.line, end.column, err, err.kind.code()
        )
    }

    /// Writes an indented outline of the tree. With a line index each
    /// element also shows where it starts.
    fn format_outline(
        &self,
        filename: &str,
        doc: &Document<ComponentId>,
        lines: Option<(&LineIndex, &str)>,
    ) -> String {
        let count = doc.element_count();
        let mut output = format!(
            "{}: rendered {} {}\n",
            filename,
            count,
            if count == 1 { "element" } else { "elements" }
        );
        for node in &doc.nodes {
            write_node(&mut output, node, 1, lines);
        }
        output.push('\n');
        output
    }
}

fn write_node(
    out: &mut String,
    node: &ChildNode<ComponentId>,
    depth: usize,
    lines: Option<(&LineIndex, &str)>,
) {
    let indent = "  ".repeat(depth);
    match node {
        ChildNode::Text(text) => {
            let _ = writeln!(out, "{indent}{:?}", text.text);
        }
        ChildNode::Element(element) => {
            let _ = write!(out, "{indent}{}", describe(element));
            if let Some((index, source)) = lines {
                let position = index.position(source, element.span.start);
                let _ = write!(out, "  @{}:{}", position.line, position.column);
            }
            out.push('\n');
            for child in &element.children {
                write_node(out, child, depth + 1, lines);
            }
        }
    }
}

/// `IndoUI.Card -> Card title="Hi"`, `div (host)`, `Button size={2}`.
fn describe(element: &ElementNode<ComponentId>) -> String {
    let mut line = match &element.component {
        ComponentRef::Host { tag } => format!("{tag} (host)"),
        ComponentRef::Component { name, .. } if *name != element.tag_name => {
            format!("{} -> {}", element.tag_name, name)
        }
        ComponentRef::Component { name, .. } => name.to_string(),
    };
    for (name, value) in &element.props {
        let _ = write!(line, " {name}={value}");
    }
    line
}

/// Summary of a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of snippets run.
    pub file_count: usize,
    /// Number of snippets that failed to read or parse.
    pub failed_count: usize,
}

impl RunSummary {
    /// Formats the summary line.
    pub fn format(&self) -> String {
        let ok = self.file_count - self.failed_count;
        let snippet_word = if self.file_count == 1 {
            "snippet"
        } else {
            "snippets"
        };
        format!(
            "====================================\nindo-playground rendered {} of {} {}, {} failed",
            ok, self.file_count, snippet_word, self.failed_count
        )
    }
}
