//! Element builder: resolves tag names and assembles tree nodes.

use crate::attributes::PropMap;
use crate::error::{ParseError, ParseErrorKind};
use crate::registry::ComponentRegistry;
use crate::scanner::RawTag;
use crate::tree::{ChildNode, ComponentRef, ElementNode};
use smol_str::SmolStr;
use source_span::Span;

/// Builds [`ElementNode`]s against a borrowed registry.
pub struct ElementBuilder<'r, R: ?Sized> {
    registry: &'r R,
}

impl<'r, R: ComponentRegistry + ?Sized> ElementBuilder<'r, R> {
    pub fn new(registry: &'r R) -> Self {
        Self { registry }
    }

    /// Resolves a tag name.
    ///
    /// - A name starting with a lowercase letter and without a `.` is a host
    ///   element and is never looked up.
    /// - Any other name is looked up as written first, so a registry entry
    ///   such as `Group.Item` matches `<Group.Item>`.
    /// - A dotted name that is not registered as written drops its first
    ///   segment as a namespace and looks up the rest: `IndoUI.Button` finds
    ///   `Button` and `IndoUI.Tabs.Panel` finds `Tabs.Panel`.
    ///
    /// A failed lookup reports the full tag name at `span`.
    pub fn resolve(
        &self,
        tag_name: &SmolStr,
        span: Span,
    ) -> Result<ComponentRef<R::Component>, ParseError> {
        let qualified = tag_name.split_once('.');
        if qualified.is_none() && tag_name.starts_with(|c: char| c.is_ascii_lowercase()) {
            return Ok(ComponentRef::Host {
                tag: tag_name.clone(),
            });
        }

        if let Some(handle) = self.registry.resolve(tag_name) {
            return Ok(ComponentRef::Component {
                name: tag_name.clone(),
                namespace: None,
                handle,
            });
        }

        if let Some((namespace, name)) = qualified {
            if let Some(handle) = self.registry.resolve(name) {
                return Ok(ComponentRef::Component {
                    name: SmolStr::new(name),
                    namespace: Some(SmolStr::new(namespace)),
                    handle,
                });
            }
        }

        tracing::debug!(tag = %tag_name, "component not registered");
        Err(ParseError::new(
            ParseErrorKind::UnknownComponent {
                tag_name: tag_name.clone(),
            },
            span,
        ))
    }

    /// Builds the node for `tag` once its children are resolved.
    pub fn build(
        &self,
        tag: &RawTag,
        props: PropMap,
        children: Vec<ChildNode<R::Component>>,
        span: Span,
    ) -> Result<ElementNode<R::Component>, ParseError> {
        let component = self.resolve(&tag.name, tag.span)?;
        tracing::trace!(
            tag = %tag.name,
            props = props.len(),
            children = children.len(),
            "built element"
        );

        Ok(ElementNode {
            tag_name: tag.name.clone(),
            component,
            props,
            children,
            self_closing: tag.self_closing,
            span,
        })
    }
}
