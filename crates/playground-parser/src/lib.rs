//! JSX-subset interpreter for the IndoUI live playground.
//!
//! Parses a restricted JSX dialect at run time and resolves component tags
//! against an injected [`ComponentRegistry`], producing a [`Document`] tree.
//!
//! Supported syntax:
//!
//! - opening, closing and self-closing tags, with dotted names such as
//!   `IndoUI.Button`
//! - attributes written as `name="text"` or `name={expr}`, where `expr` is
//!   `true`, `false`, a decimal number, or anything else kept as raw text
//! - text between tags
//!
//! JavaScript expressions are not evaluated, and fragments, spreads and
//! comments are not supported.
//!
//! # Example
//!
//! ```
//! use playground_parser::{parse, PropValue, StaticRegistry};
//!
//! let registry = StaticRegistry::indo_ui();
//! let doc = parse(r#"<IndoUI.Button label="Save" size={2} />"#, &registry).unwrap();
//!
//! let button = doc.root().unwrap();
//! assert_eq!(button.component.name(), "Button");
//! assert_eq!(button.props["size"], PropValue::Number(2.0));
//! ```

mod attributes;
mod builder;
mod error;
mod lexer;
mod matcher;
mod parser;
mod registry;
mod scanner;
mod tree;

pub use attributes::{evaluate_attributes, evaluate_expression, AttributeMode, PropMap, PropValue};
pub use builder::ElementBuilder;
pub use error::{ErrorReport, ParseError, ParseErrorKind};
pub use lexer::{Lexeme, LexemeKind, TagLexer};
pub use matcher::find_closing_tag;
pub use parser::Parser;
pub use registry::{ComponentId, ComponentRegistry, StaticRegistry, INDO_UI_COMPONENTS};
pub use scanner::{
    is_tag_start, scan_close_tag, scan_open_tag, tokenize, RawTag, Token, TokenKind, Tokenizer,
};
pub use source_span::{LineIndex, Position, Span};
pub use tree::{ChildNode, ComponentRef, Document, ElementNode, TextNode};

/// Default limit on element nesting.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Options for a parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// How malformed attributes are handled.
    pub attribute_mode: AttributeMode,
    /// Maximum element nesting depth.
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            attribute_mode: AttributeMode::Lenient,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParseOptions {
    pub fn strict() -> Self {
        Self {
            attribute_mode: AttributeMode::Strict,
            ..Self::default()
        }
    }
}

/// Parses a snippet with default options.
pub fn parse<R>(source: &str, registry: &R) -> Result<Document<R::Component>, ParseError>
where
    R: ComponentRegistry + ?Sized,
{
    parse_with_options(source, registry, ParseOptions::default())
}

/// Parses a snippet.
///
/// The first error anywhere aborts the parse; no partial tree is returned.
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn parse_with_options<R>(
    source: &str,
    registry: &R,
    options: ParseOptions,
) -> Result<Document<R::Component>, ParseError>
where
    R: ComponentRegistry + ?Sized,
{
    let result = Parser::new(source, registry, options).and_then(Parser::parse);
    match &result {
        Ok(doc) => tracing::debug!(elements = doc.element_count(), "parsed snippet"),
        Err(err) => tracing::debug!(code = err.kind.code(), offset = err.offset(), "parse failed"),
    }
    result
}
