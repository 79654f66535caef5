//! Recursive-descent parser over the token list.
//!
//! Each element is handled in three steps. Its attributes are evaluated
//! first. A paired element then has its closing token located by
//! [`find_closing_tag`] and the tokens in between split into children
//! recursively. The node is built last, so every child is resolved before
//! its parent exists.

use crate::attributes::evaluate_attributes;
use crate::builder::ElementBuilder;
use crate::error::{ParseError, ParseErrorKind};
use crate::matcher::find_closing_tag;
use crate::registry::ComponentRegistry;
use crate::scanner::{tokenize, RawTag, Token, TokenKind};
use crate::tree::{ChildNode, Document, ElementNode, TextNode};
use crate::ParseOptions;
use source_span::Span;

/// Parser state for a single snippet.
pub struct Parser<'src, 'r, R: ComponentRegistry + ?Sized> {
    source: &'src str,
    tokens: Vec<Token>,
    builder: ElementBuilder<'r, R>,
    options: ParseOptions,
}

impl<'src, 'r, R: ComponentRegistry + ?Sized> Parser<'src, 'r, R> {
    /// Tokenizes `source`. Tokenization errors surface here, before any
    /// structural checks run.
    pub fn new(
        source: &'src str,
        registry: &'r R,
        options: ParseOptions,
    ) -> Result<Self, ParseError> {
        let tokens = tokenize(source)?;
        tracing::trace!(tokens = tokens.len(), "tokenized snippet");
        Ok(Self {
            source,
            tokens,
            builder: ElementBuilder::new(registry),
            options,
        })
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Parses the whole snippet.
    pub fn parse(self) -> Result<Document<R::Component>, ParseError> {
        let nodes = self.parse_children(0, self.tokens.len(), 0)?;

        let end = self.source.trim_end().len();
        let start = (self.source.len() - self.source.trim_start().len()).min(end);

        Ok(Document {
            nodes,
            span: Span::from_offsets(start, end),
        })
    }

    /// Splits `tokens[start..end]` into child nodes.
    fn parse_children(
        &self,
        start: usize,
        end: usize,
        depth: usize,
    ) -> Result<Vec<ChildNode<R::Component>>, ParseError> {
        let mut children = Vec::new();
        let mut i = start;

        while i < end {
            let token = &self.tokens[i];
            match &token.kind {
                TokenKind::Text => {
                    if let Some(text) = self.text_node(token) {
                        children.push(ChildNode::Text(text));
                    }
                    i += 1;
                }
                TokenKind::Open(tag) => {
                    let (element, next) = self.parse_element(tag, i, end, depth)?;
                    children.push(ChildNode::Element(element));
                    i = next;
                }
                TokenKind::Close(name) => {
                    return Err(ParseError::malformed_tag(
                        format!("unexpected closing tag </{name}>"),
                        token.span,
                    ));
                }
            }
        }

        Ok(children)
    }

    /// Parses the element opened at `tokens[index]`. Returns the node and
    /// the index of the first token after it.
    fn parse_element(
        &self,
        tag: &RawTag,
        index: usize,
        end: usize,
        depth: usize,
    ) -> Result<(ElementNode<R::Component>, usize), ParseError> {
        if depth >= self.options.max_depth {
            return Err(ParseError::new(
                ParseErrorKind::NestingTooDeep {
                    limit: self.options.max_depth,
                },
                tag.span,
            ));
        }

        let props = evaluate_attributes(self.source, tag.attributes, self.options.attribute_mode)?;

        if tag.self_closing {
            let element = self.builder.build(tag, props, Vec::new(), tag.span)?;
            return Ok((element, index + 1));
        }

        let close = index + 1 + find_closing_tag(tag, &self.tokens[index + 1..end])?;
        let children = self
            .parse_children(index + 1, close, depth + 1)
            .map_err(|err| err.within(&tag.name))?;

        let span = tag.span.cover(self.tokens[close].span);
        let element = self.builder.build(tag, props, children, span)?;
        Ok((element, close + 1))
    }

    fn text_node(&self, token: &Token) -> Option<TextNode> {
        let raw = token.span.slice(self.source);
        let text = raw.trim();
        if text.is_empty() {
            return None;
        }

        let leading = raw.len() - raw.trim_start().len();
        let start = token.span.start_index() + leading;
        Some(TextNode {
            text: text.to_string(),
            span: Span::from_offsets(start, start + text.len()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::StaticRegistry;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> Result<Document<crate::ComponentId>, ParseError> {
        let registry = StaticRegistry::indo_ui();
        Parser::new(source, &registry, ParseOptions::default())?.parse()
    }

    #[test]
    fn test_text_is_trimmed() {
        let source = "<Card>\n   Hello there  \n</Card>";
        let doc = parse(source).unwrap();
        let card = doc.root().unwrap();
        let ChildNode::Text(text) = &card.children[0] else {
            panic!("expected text");
        };
        assert_eq!(text.text, "Hello there");
        assert_eq!(text.span.slice(source), "Hello there");
    }

    #[test]
    fn test_whitespace_only_children_dropped() {
        let doc = parse("<Stack>\n  <Button />\n  \n</Stack>").unwrap();
        assert_eq!(doc.root().unwrap().children.len(), 1);
    }

    #[test]
    fn test_document_span_trims() {
        let source = "\n  <Button />\n";
        let doc = parse(source).unwrap();
        assert_eq!(doc.span.slice(source), "<Button />");
        assert_eq!(parse("   ").unwrap().span, Span::from_offsets(0, 0));
    }

    #[test]
    fn test_stray_closing_tag() {
        let err = parse("<Card></Stack></Card>").unwrap_err();
        assert_eq!(err.kind.code(), "malformed-tag");
        assert_eq!(err.offset(), 6);
        assert_eq!(err.parents, vec![smol_str::SmolStr::new("Card")]);
    }

    #[test]
    fn test_top_level_stray_close() {
        let err = parse("text </Card>").unwrap_err();
        assert_eq!(err.to_string(), "malformed tag: unexpected closing tag </Card>");
    }

    #[test]
    fn test_depth_limit() {
        let registry = StaticRegistry::indo_ui();
        let options = ParseOptions {
            max_depth: 2,
            ..ParseOptions::default()
        };
        let ok = Parser::new("<a><b /></a>", &registry, options).unwrap().parse();
        assert!(ok.is_ok());

        let err = Parser::new("<a><b><c /></b></a>", &registry, options)
            .unwrap()
            .parse()
            .unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::NestingTooDeep { limit: 2 });
        assert_eq!(err.offset(), 6);
        assert_eq!(err.context().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_tokenize_error_wins_over_structure() {
        // Unclosed <Card> comes first, but the bad tag name is a
        // tokenization error and is reported instead.
        let err = parse("<Card><Ns..X />").unwrap_err();
        assert_eq!(err.kind.code(), "malformed-tag");
    }
}
