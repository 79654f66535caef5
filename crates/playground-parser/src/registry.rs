//! Component registries.
//!
//! The parser never knows which components exist. The host injects a
//! [`ComponentRegistry`] and the element builder asks it to resolve every
//! component tag. Registries are only read during a parse.

use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use std::collections::HashMap;
use std::fmt;
use std::hash::BuildHasher;
use std::sync::Arc;

/// Maps component names to whatever the host renders them with.
pub trait ComponentRegistry {
    /// The host's handle for a component (a constructor, an id, ...).
    type Component: Clone + fmt::Debug;

    /// Looks up a component by its registered name. A dotted tag is tried
    /// as written (`Tabs.Panel`) and then without its first segment, so
    /// `IndoUI.Button` arrives as `Button` and `IndoUI.Tabs.Panel` as
    /// `Tabs.Panel`.
    fn resolve(&self, name: &str) -> Option<Self::Component>;
}

impl<R: ComponentRegistry + ?Sized> ComponentRegistry for &R {
    type Component = R::Component;

    fn resolve(&self, name: &str) -> Option<Self::Component> {
        (**self).resolve(name)
    }
}

impl<R: ComponentRegistry + ?Sized> ComponentRegistry for Arc<R> {
    type Component = R::Component;

    fn resolve(&self, name: &str) -> Option<Self::Component> {
        (**self).resolve(name)
    }
}

impl<C, S> ComponentRegistry for HashMap<SmolStr, C, S>
where
    C: Clone + fmt::Debug,
    S: BuildHasher,
{
    type Component = C;

    fn resolve(&self, name: &str) -> Option<C> {
        self.get(name).cloned()
    }
}

/// Names of the components shipped by IndoUI.
pub const INDO_UI_COMPONENTS: &[&str] = &[
    "Accordion",
    "Alert",
    "AspectRatio",
    "Avatar",
    "Badge",
    "Box",
    "Breadcrumb",
    "Button",
    "ButtonGroup",
    "Calendar",
    "Card",
    "Carousel",
    "Checkbox",
    "CodeEditor",
    "CodeBlock",
    "Collapse",
    "ColorModeToggle",
    "Container",
    "DatePicker",
    "DateRangePicker",
    "Divider",
    "Drawer",
    "Dropdown",
    "FileUpload",
    "Flex",
    "FormField",
    "Grid",
    "Group",
    "Group.Item",
    "Heading",
    "IconButton",
    "Image",
    "Input",
    "Kbd",
    "Link",
    "List",
    "Menu",
    "Modal",
    "Pagination",
    "PinInput",
    "Popover",
    "Progress",
    "Radio",
    "RadioGroup",
    "Rating",
    "Select",
    "Skeleton",
    "Slider",
    "Spinner",
    "Stack",
    "Stat",
    "Stepper",
    "Switch",
    "Table",
    "Tabs",
    "Tabs.List",
    "Tabs.Panel",
    "Tabs.Tab",
    "Tag",
    "Text",
    "Textarea",
    "TimePicker",
    "Toast",
    "Tooltip",
    "VideoCall",
    "VideoGrid",
    "VideoTile",
];

/// Identifies a registered component by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
pub struct ComponentId(SmolStr);

impl ComponentId {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A registry backed by a fixed set of names.
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    components: FxHashMap<SmolStr, ComponentId>,
}

impl StaticRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every IndoUI component.
    pub fn indo_ui() -> Self {
        INDO_UI_COMPONENTS.iter().copied().collect()
    }

    /// Registers `name`. Returns false if it was already present.
    pub fn register(&mut self, name: impl Into<SmolStr>) -> bool {
        let name = name.into();
        if self.components.contains_key(&name) {
            return false;
        }
        self.components.insert(name.clone(), ComponentId(name));
        true
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, name: impl Into<SmolStr>) -> Self {
        self.register(name);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.components.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.components.keys().map(SmolStr::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl<S: Into<SmolStr>> FromIterator<S> for StaticRegistry {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut registry = Self::new();
        registry.extend(iter);
        registry
    }
}

impl<S: Into<SmolStr>> Extend<S> for StaticRegistry {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for name in iter {
            self.register(name);
        }
    }
}

impl ComponentRegistry for StaticRegistry {
    type Component = ComponentId;

    fn resolve(&self, name: &str) -> Option<ComponentId> {
        self.components.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_indo_ui_registry() {
        let registry = StaticRegistry::indo_ui();
        assert_eq!(registry.len(), INDO_UI_COMPONENTS.len());
        assert_eq!(registry.resolve("Button"), Some(ComponentId::new("Button")));
        assert_eq!(registry.resolve("Tabs.Panel"), Some(ComponentId::new("Tabs.Panel")));
        assert_eq!(registry.resolve("button"), None);
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut registry = StaticRegistry::new();
        assert!(registry.register("Chart"));
        assert!(!registry.register("Chart"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_names_sorted() {
        let registry: StaticRegistry = ["Modal", "Alert", "Card"].into_iter().collect();
        assert_eq!(registry.names(), vec!["Alert", "Card", "Modal"]);
    }

    #[test]
    fn test_hash_map_registry() {
        let mut map: FxHashMap<SmolStr, u32> = FxHashMap::default();
        map.insert("Counter".into(), 7);
        assert_eq!(map.resolve("Counter"), Some(7));
        assert_eq!((&map).resolve("Missing"), None);
    }

    #[test]
    fn test_arc_registry() {
        let registry = Arc::new(StaticRegistry::new().with("Chart"));
        assert!(registry.resolve("Chart").is_some());
    }
}
