//! Host elements and their per-element style state.
//!
//! Every component renders into a host element. The first style registration
//! for a host lazily creates two ordered lists on its [`ElementContext`]:
//!
//! - `scope_ids` - scope tokens the renderer applies to the element subtree
//! - `append_styles` - styles to emit once the render pass settles
//!
//! `append_styles` positions are reserved when a resolution task is
//! scheduled and filled when it completes, so the final order always matches
//! registration order even if tasks finish out of order.

use core::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::style::{AppendStyle, StyleId};

/// Identifier of a host element within a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(pub(crate) usize);

impl ElementId {
    /// Creates an element ID from a raw index.
    #[must_use]
    pub fn new(id: usize) -> Self {
        Self(id)
    }

    /// Returns the raw index.
    #[must_use]
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "el_{}", self.0)
    }
}

/// The element a component renders into.
///
/// Host elements are handed to style loaders as the owner of a lazy
/// reference, and key the container's element-context table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostElement {
    id: ElementId,
    tag: Arc<str>,
}

impl HostElement {
    /// Creates a host element with the given ID and tag name.
    #[must_use]
    pub fn new(id: ElementId, tag: impl Into<Arc<str>>) -> Self {
        Self {
            id,
            tag: tag.into(),
        }
    }

    /// Returns the element ID.
    #[must_use]
    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Returns the tag name.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl fmt::Display for HostElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}#{}>", self.tag, self.id)
    }
}

/// A reserved position in an element's `append_styles` list.
///
/// Returned by [`ElementContext::reserve_append`] and consumed by
/// [`ElementContext::fill_append`]. Not `Clone`: a position is filled once.
#[derive(Debug)]
pub struct AppendTicket {
    position: usize,
    style_id: StyleId,
}

impl AppendTicket {
    /// Returns the style this position was reserved for.
    #[must_use]
    pub fn style_id(&self) -> &StyleId {
        &self.style_id
    }

    /// Returns the reserved position.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }
}

#[derive(Debug)]
enum AppendSlot {
    Pending(StyleId),
    Ready(AppendStyle),
}

#[derive(Debug, Default)]
struct ElementState {
    scope_ids: Option<Vec<String>>,
    append_styles: Option<Vec<AppendSlot>>,
}

impl ElementState {
    fn ensure(&mut self) {
        self.scope_ids.get_or_insert_with(Vec::new);
        self.append_styles.get_or_insert_with(Vec::new);
    }
}

/// Shared handle to the style state of one host element.
///
/// Cloning the handle is cheap and every clone observes the same state.
/// Background resolution tasks hold a clone so they can fill their reserved
/// position after the registering invocation has returned.
#[derive(Clone, Default)]
pub struct ElementContext {
    inner: Arc<Mutex<ElementState>>,
}

impl fmt::Debug for ElementContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.lock();
        f.debug_struct("ElementContext")
            .field("scope_ids", &state.scope_ids)
            .field("append_styles", &state.append_styles)
            .finish()
    }
}

impl ElementContext {
    /// Creates an element context with no style state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Initializes `scope_ids` and `append_styles` to empty lists if absent.
    pub fn ensure(&self) {
        self.inner.lock().ensure();
    }

    /// Returns `true` once style state has been initialized for this element.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        let state = self.inner.lock();
        state.scope_ids.is_some() && state.append_styles.is_some()
    }

    /// Appends a scope token.
    ///
    /// Tokens are appended unconditionally, so two scoped registrations of
    /// the same style on one element produce two entries.
    pub fn add_scope(&self, token: impl Into<String>) {
        let mut state = self.inner.lock();
        state.scope_ids.get_or_insert_with(Vec::new).push(token.into());
    }

    /// Returns the scope tokens in registration order.
    #[must_use]
    pub fn scope_ids(&self) -> Vec<String> {
        self.inner.lock().scope_ids.clone().unwrap_or_default()
    }

    /// Reserves the next `append_styles` position for `style_id`.
    pub fn reserve_append(&self, style_id: StyleId) -> AppendTicket {
        let mut state = self.inner.lock();
        let slots = state.append_styles.get_or_insert_with(Vec::new);
        let position = slots.len();
        slots.push(AppendSlot::Pending(style_id.clone()));
        AppendTicket { position, style_id }
    }

    /// Fills a reserved position with the transformed style text.
    pub fn fill_append(&self, ticket: AppendTicket, content: String) {
        let mut state = self.inner.lock();
        let slots = state.append_styles.get_or_insert_with(Vec::new);
        let style = AppendStyle {
            style_id: ticket.style_id,
            content,
        };
        match slots.get_mut(ticket.position) {
            Some(slot) => *slot = AppendSlot::Ready(style),
            None => slots.push(AppendSlot::Ready(style)),
        }
    }

    /// Returns the resolved styles in registration order.
    ///
    /// Positions whose task has not settled, or failed, are skipped. The list
    /// is only final after the render pass's completion barrier settles.
    #[must_use]
    pub fn append_styles(&self) -> Vec<AppendStyle> {
        let state = self.inner.lock();
        state
            .append_styles
            .iter()
            .flatten()
            .filter_map(|slot| match slot {
                AppendSlot::Ready(style) => Some(style.clone()),
                AppendSlot::Pending(_) => None,
            })
            .collect()
    }

    /// Returns the styles whose reserved position has not been filled.
    #[must_use]
    pub fn pending_appends(&self) -> Vec<StyleId> {
        let state = self.inner.lock();
        state
            .append_styles
            .iter()
            .flatten()
            .filter_map(|slot| match slot {
                AppendSlot::Pending(id) => Some(id.clone()),
                AppendSlot::Ready(_) => None,
            })
            .collect()
    }

    /// Returns `true` if both handles point at the same element state.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}
