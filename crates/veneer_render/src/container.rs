//! Container-wide render state.
//!
//! A [`ContainerState`] lives as long as one rendered container (a page or an
//! app instance). It owns:
//!
//! - the style registry, a set of [`StyleId`]s that never shrinks
//! - the element-context table, one [`ElementContext`] per host element
//! - typed extensions shared by every component (hooks, loaders, ...)
//!
//! # Access discipline
//!
//! The state is handed to render passes as `&mut ContainerState`. Component
//! invocations run one at a time and registration never awaits, so a
//! `has_style` / `add_style` pair can not interleave with another
//! registration and no lock is needed around the registry.
//!
//! # Example
//!
//! ```
//! use veneer_render::container::{ContainerConfig, ContainerState};
//! use veneer_render::style::StyleId;
//!
//! let mut container = ContainerState::new(ContainerConfig::default());
//! assert!(container.add_style(StyleId::from("2p-0")));
//! assert!(!container.add_style(StyleId::from("2p-0")));
//! assert!(container.has_style(&StyleId::from("2p-0")));
//! ```

use core::any::{Any, TypeId};
use std::sync::Arc;

use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};

use crate::element::{ElementContext, ElementId, HostElement};
use crate::style::StyleId;

/// Default prefix of scope tokens.
pub const DEFAULT_SCOPE_PREFIX: &str = "⭐️";

// ─────────────────────────────────────────────────────────────────────────────
// ContainerConfig
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration of a render container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerConfig {
    /// Name recorded on tracing spans.
    name: String,
    /// Prefix prepended to a style ID to form its scope token.
    scope_prefix: String,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            name: "veneer".to_owned(),
            scope_prefix: DEFAULT_SCOPE_PREFIX.to_owned(),
        }
    }
}

impl ContainerConfig {
    /// Creates a config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the container name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the scope token prefix.
    #[must_use]
    pub fn with_scope_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.scope_prefix = prefix.into();
        self
    }

    /// Returns the container name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the scope token prefix.
    #[must_use]
    pub fn scope_prefix(&self) -> &str {
        &self.scope_prefix
    }

    /// Returns the scope token for a style: the prefix followed by the ID.
    #[must_use]
    pub fn scope_token(&self, style_id: &StyleId) -> String {
        format!("{}{}", self.scope_prefix, style_id)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ContainerSnapshot
// ─────────────────────────────────────────────────────────────────────────────

/// Serializable view of the style registry.
///
/// The server embeds a snapshot next to the styles it emitted inline; the
/// client resumes from it so those styles are not resolved a second time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerSnapshot {
    /// Registered style IDs, sorted.
    pub style_ids: Vec<StyleId>,
}

// ─────────────────────────────────────────────────────────────────────────────
// ContainerState
// ─────────────────────────────────────────────────────────────────────────────

/// State shared by every component rendered into one container.
pub struct ContainerState {
    config: ContainerConfig,
    style_ids: HashSet<StyleId>,
    elements: HashMap<ElementId, ElementContext>,
    next_element: usize,
    extensions: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl core::fmt::Debug for ContainerState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ContainerState")
            .field("config", &self.config)
            .field("style_ids", &self.style_ids)
            .field("elements", &self.elements.len())
            .field("extensions", &self.extensions.len())
            .finish()
    }
}

impl Default for ContainerState {
    fn default() -> Self {
        Self::new(ContainerConfig::default())
    }
}

impl ContainerState {
    /// Creates an empty container.
    #[must_use]
    pub fn new(config: ContainerConfig) -> Self {
        Self {
            config,
            style_ids: HashSet::new(),
            elements: HashMap::new(),
            next_element: 0,
            extensions: HashMap::new(),
        }
    }

    /// Creates a container whose registry is seeded from a snapshot.
    #[must_use]
    pub fn resume(config: ContainerConfig, snapshot: ContainerSnapshot) -> Self {
        let mut container = Self::new(config);
        container.style_ids.extend(snapshot.style_ids);
        tracing::debug!(
            container = %container.config.name,
            styles = container.style_ids.len(),
            "resumed container from snapshot"
        );
        container
    }

    /// Returns the container config.
    #[must_use]
    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// Allocates a new host element in this container.
    pub fn create_host(&mut self, tag: &str) -> HostElement {
        let id = ElementId(self.next_element);
        self.next_element += 1;
        HostElement::new(id, tag)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Style registry
    // ─────────────────────────────────────────────────────────────────────

    /// Returns `true` if the style has been registered in this container.
    #[must_use]
    pub fn has_style(&self, style_id: &StyleId) -> bool {
        self.style_ids.contains(style_id)
    }

    /// Registers a style ID.
    ///
    /// Returns `true` if the ID was not registered before. Adding an existing
    /// ID is a no-op.
    pub fn add_style(&mut self, style_id: StyleId) -> bool {
        self.style_ids.insert(style_id)
    }

    /// Returns the number of registered styles.
    #[must_use]
    pub fn style_count(&self) -> usize {
        self.style_ids.len()
    }

    /// Returns the registered style IDs in unspecified order.
    pub fn style_ids(&self) -> impl Iterator<Item = &StyleId> {
        self.style_ids.iter()
    }

    /// Captures the registry for hydration.
    #[must_use]
    pub fn snapshot(&self) -> ContainerSnapshot {
        let mut style_ids: Vec<StyleId> = self.style_ids.iter().cloned().collect();
        style_ids.sort();
        ContainerSnapshot { style_ids }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Element contexts
    // ─────────────────────────────────────────────────────────────────────

    /// Returns the context of `host`, creating it on first access.
    pub fn element_context(&mut self, host: &HostElement) -> ElementContext {
        self.elements.entry(host.id()).or_default().clone()
    }

    /// Returns the context of an element if one has been created.
    #[must_use]
    pub fn find_element_context(&self, id: ElementId) -> Option<ElementContext> {
        self.elements.get(&id).cloned()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Extensions
    // ─────────────────────────────────────────────────────────────────────

    /// Inserts a container-wide extension, replacing any previous value of
    /// the same type.
    pub fn insert_extension<T: Any + Send + Sync>(&mut self, value: T) -> Option<Arc<T>> {
        self.extensions
            .insert(TypeId::of::<T>(), Arc::new(value))
            .and_then(|old| old.downcast::<T>().ok())
    }

    /// Returns a shared handle to an extension.
    #[must_use]
    pub fn extension<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.extensions
            .get(&TypeId::of::<T>())
            .and_then(|value| Arc::clone(value).downcast::<T>().ok())
    }

    /// Returns `true` if an extension of type `T` is installed.
    #[must_use]
    pub fn contains_extension<T: Any + Send + Sync>(&self) -> bool {
        self.extensions.contains_key(&TypeId::of::<T>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_style_is_idempotent() {
        let mut container = ContainerState::default();
        let id = StyleId::from("abc-0");

        assert!(!container.has_style(&id));
        assert!(container.add_style(id.clone()));
        assert!(!container.add_style(id.clone()));
        assert!(container.has_style(&id));
        assert_eq!(container.style_count(), 1);
    }

    #[test]
    fn element_context_is_created_once() {
        let mut container = ContainerState::default();
        let host = container.create_host("div");

        assert!(container.find_element_context(host.id()).is_none());
        let first = container.element_context(&host);
        let second = container.element_context(&host);
        assert!(first.ptr_eq(&second));
        assert!(container.find_element_context(host.id()).is_some());
    }

    #[test]
    fn hosts_get_distinct_ids() {
        let mut container = ContainerState::default();
        let a = container.create_host("div");
        let b = container.create_host("div");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn snapshot_is_sorted_and_resumable() {
        let mut container = ContainerState::default();
        container.add_style(StyleId::from("b-1"));
        container.add_style(StyleId::from("a-0"));

        let snapshot = container.snapshot();
        assert_eq!(
            snapshot.style_ids,
            vec![StyleId::from("a-0"), StyleId::from("b-1")]
        );

        let resumed = ContainerState::resume(ContainerConfig::default(), snapshot);
        assert!(resumed.has_style(&StyleId::from("a-0")));
        assert!(resumed.has_style(&StyleId::from("b-1")));
    }

    #[test]
    fn extensions_replace_by_type() {
        #[derive(Debug, PartialEq)]
        struct Marker(u8);

        let mut container = ContainerState::default();
        assert!(container.insert_extension(Marker(1)).is_none());

        let old = container.insert_extension(Marker(2)).unwrap();
        assert_eq!(*old, Marker(1));
        assert_eq!(*container.extension::<Marker>().unwrap(), Marker(2));
        assert!(!container.contains_extension::<String>());
    }

    #[test]
    fn scope_token_uses_prefix() {
        let config = ContainerConfig::new().with_scope_prefix("s-");
        assert_eq!(config.scope_token(&StyleId::from("2p-0")), "s-2p-0");
        assert_eq!(
            ContainerConfig::default().scope_token(&StyleId::from("2p-0")),
            "⭐️2p-0"
        );
    }
}
