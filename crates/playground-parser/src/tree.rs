//! Render tree produced by a parse.
//!
//! The tree is owned top-down with no back references and is rebuilt from
//! scratch on every parse. `Display` writes it back out as markup.

use crate::attributes::PropMap;
use smol_str::SmolStr;
use source_span::Span;
use std::fmt;

/// What an element's tag resolved to.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "camelCase"))]
pub enum ComponentRef<C> {
    /// A lowercase host element such as `div`, passed through untouched.
    Host { tag: SmolStr },
    /// A component found in the registry.
    Component {
        /// The name that was looked up (namespace stripped).
        name: SmolStr,
        /// The stripped namespace, e.g. `IndoUI`.
        #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
        namespace: Option<SmolStr>,
        handle: C,
    },
}

impl<C> ComponentRef<C> {
    pub fn is_host(&self) -> bool {
        matches!(self, ComponentRef::Host { .. })
    }

    /// The host tag or registered component name.
    pub fn name(&self) -> &str {
        match self {
            ComponentRef::Host { tag } => tag,
            ComponentRef::Component { name, .. } => name,
        }
    }

    /// The registry's handle, if this is a component.
    pub fn handle(&self) -> Option<&C> {
        match self {
            ComponentRef::Host { .. } => None,
            ComponentRef::Component { handle, .. } => Some(handle),
        }
    }
}

/// A trimmed, non-empty run of text.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TextNode {
    pub text: String,
    /// Span of the trimmed text.
    pub span: Span,
}

/// A child of an element or a top-level node.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "camelCase"))]
pub enum ChildNode<C> {
    Text(TextNode),
    Element(ElementNode<C>),
}

impl<C> ChildNode<C> {
    pub fn span(&self) -> Span {
        match self {
            ChildNode::Text(text) => text.span,
            ChildNode::Element(element) => element.span,
        }
    }

    pub fn as_element(&self) -> Option<&ElementNode<C>> {
        match self {
            ChildNode::Element(element) => Some(element),
            ChildNode::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ChildNode::Text(text) => Some(&text.text),
            ChildNode::Element(_) => None,
        }
    }
}

/// A resolved element.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ElementNode<C> {
    /// The tag name as written, including any namespace.
    pub tag_name: SmolStr,
    pub component: ComponentRef<C>,
    pub props: PropMap,
    pub children: Vec<ChildNode<C>>,
    pub self_closing: bool,
    /// From the `<` of the opening tag to the `>` of the closing tag.
    pub span: Span,
}

impl<C> ElementNode<C> {
    /// Child elements, skipping text.
    pub fn elements(&self) -> impl Iterator<Item = &ElementNode<C>> {
        self.children.iter().filter_map(ChildNode::as_element)
    }

    /// Number of elements in this subtree, including `self`.
    pub fn element_count(&self) -> usize {
        1 + self.elements().map(ElementNode::element_count).sum::<usize>()
    }

    /// Depth of this subtree; a leaf has depth 1.
    pub fn depth(&self) -> usize {
        1 + self.elements().map(ElementNode::depth).max().unwrap_or(0)
    }
}

/// The result of parsing a snippet.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Document<C> {
    /// Top-level nodes in source order.
    pub nodes: Vec<ChildNode<C>>,
    /// The snippet with surrounding whitespace trimmed.
    pub span: Span,
}

impl<C> Document<C> {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Top-level elements, skipping text.
    pub fn elements(&self) -> impl Iterator<Item = &ElementNode<C>> {
        self.nodes.iter().filter_map(ChildNode::as_element)
    }

    /// The single top-level element, if the snippet has exactly one node
    /// and it is an element.
    pub fn root(&self) -> Option<&ElementNode<C>> {
        match self.nodes.as_slice() {
            [ChildNode::Element(root)] => Some(root),
            _ => None,
        }
    }

    /// Number of elements in the whole document.
    pub fn element_count(&self) -> usize {
        self.elements().map(ElementNode::element_count).sum()
    }
}

impl<C> fmt::Display for ChildNode<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChildNode::Text(text) => f.write_str(&text.text),
            ChildNode::Element(element) => element.fmt(f),
        }
    }
}

impl<C> fmt::Display for ElementNode<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.tag_name)?;
        for (name, value) in &self.props {
            write!(f, " {name}={value}")?;
        }

        if self.self_closing {
            return f.write_str(" />");
        }

        f.write_str(">")?;
        for child in &self.children {
            child.fmt(f)?;
        }
        write!(f, "</{}>", self.tag_name)
    }
}

impl<C> fmt::Display for Document<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, node) in self.nodes.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            node.fmt(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::PropValue;
    use pretty_assertions::assert_eq;

    fn leaf(tag: &str) -> ElementNode<()> {
        ElementNode {
            tag_name: tag.into(),
            component: ComponentRef::Component {
                name: tag.into(),
                namespace: None,
                handle: (),
            },
            props: PropMap::default(),
            children: Vec::new(),
            self_closing: true,
            span: Span::default(),
        }
    }

    #[test]
    fn test_display_self_closing() {
        let mut button = leaf("Button");
        button.props.insert("label".into(), PropValue::from("Go"));
        button.props.insert("size".into(), PropValue::Number(2.0));
        assert_eq!(button.to_string(), r#"<Button label="Go" size={2} />"#);
    }

    #[test]
    fn test_display_nested() {
        let mut card = leaf("Card");
        card.self_closing = false;
        card.children.push(ChildNode::Text(TextNode {
            text: "Hi".into(),
            span: Span::default(),
        }));
        card.children.push(ChildNode::Element(leaf("Button")));
        assert_eq!(card.to_string(), "<Card>Hi<Button /></Card>");
        assert_eq!(card.element_count(), 2);
        assert_eq!(card.depth(), 2);
    }

    #[test]
    fn test_component_ref_accessors() {
        let host: ComponentRef<()> = ComponentRef::Host { tag: "div".into() };
        assert!(host.is_host());
        assert_eq!(host.name(), "div");
        assert_eq!(host.handle(), None);
    }

    #[test]
    fn test_document_root() {
        let doc = Document {
            nodes: vec![ChildNode::Element(leaf("Alert"))],
            span: Span::default(),
        };
        assert_eq!(doc.root().map(|r| r.tag_name.as_str()), Some("Alert"));

        let empty: Document<()> = Document {
            nodes: Vec::new(),
            span: Span::default(),
        };
        assert!(empty.root().is_none());
        assert!(empty.is_empty());
    }
}
