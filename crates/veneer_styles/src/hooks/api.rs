//! Observer registration for style events.
//!
//! [`StyleHooks`] holds named observers grouped by [`StyleEventKind`]. It is
//! installed on a container as an extension with
//! [`install_hooks`](crate::install_hooks); registration then notifies it from
//! the render pass and from background resolution tasks.
//!
//! # Example
//!
//! ```
//! use veneer_styles::hooks::{StyleEvent, StyleEventKind, StyleHooks};
//!
//! let hooks = StyleHooks::new();
//! hooks.register_observer([StyleEventKind::Failed], "alert", |event: &StyleEvent| {
//!     tracing::error!(style_id = %event.style_id(), "style failed");
//! })?;
//! assert!(hooks.contains_hook(StyleEventKind::Failed, "alert"));
//! # Ok::<_, veneer_styles::hooks::HookRegistrationError>(())
//! ```

use std::sync::Arc;

use hashbrown::HashMap;
use parking_lot::RwLock;

use super::events::{StyleEvent, StyleEventKind};

// ─────────────────────────────────────────────────────────────────────────────
// HookRegistrationError
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur during hook registration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HookRegistrationError {
    /// An observer with this name already exists for the event kind.
    #[error("hook '{name}' already registered for '{kind}' events")]
    DuplicateName {
        /// Event kind where the duplicate was found.
        kind: StyleEventKind,
        /// The duplicate hook name.
        name: String,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// StyleHooks
// ─────────────────────────────────────────────────────────────────────────────

type Observer = Arc<dyn Fn(&StyleEvent) + Send + Sync>;

struct HookEntry {
    name: String,
    observer: Observer,
}

/// Registry of style event observers.
///
/// Observers run synchronously, in registration order, on whichever thread
/// emits the event. Interior mutability via [`RwLock`] lets observers be
/// added while the registry is shared.
#[derive(Default)]
pub struct StyleHooks {
    hooks: RwLock<HashMap<StyleEventKind, Vec<HookEntry>>>,
}

impl core::fmt::Debug for StyleHooks {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let hooks = self.hooks.read();
        let mut map = f.debug_map();
        for kind in StyleEventKind::ALL {
            if let Some(entries) = hooks.get(&kind) {
                let names: Vec<&str> = entries.iter().map(|entry| entry.name.as_str()).collect();
                map.entry(&kind, &names);
            }
        }
        map.finish()
    }
}

impl StyleHooks {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an observer for one or more event kinds.
    ///
    /// When registered for several kinds, the observer is stored once per
    /// kind under the same name.
    ///
    /// # Errors
    ///
    /// Returns [`HookRegistrationError::DuplicateName`] if `name` is already
    /// used for one of the kinds. Kinds before the conflicting one stay
    /// registered.
    pub fn register_observer<F>(
        &self,
        kinds: impl IntoIterator<Item = StyleEventKind>,
        name: impl Into<String>,
        observer: F,
    ) -> Result<&Self, HookRegistrationError>
    where
        F: Fn(&StyleEvent) + Send + Sync + 'static,
    {
        let name = name.into();
        let observer: Observer = Arc::new(observer);

        let mut hooks = self.hooks.write();
        for kind in kinds {
            let entries = hooks.entry(kind).or_default();
            if entries.iter().any(|entry| entry.name == name) {
                return Err(HookRegistrationError::DuplicateName { kind, name });
            }
            entries.push(HookEntry {
                name: name.clone(),
                observer: Arc::clone(&observer),
            });
        }

        Ok(self)
    }

    /// Registers an observer for every event kind.
    ///
    /// # Errors
    ///
    /// Returns [`HookRegistrationError::DuplicateName`] if `name` is taken.
    pub fn register_all<F>(
        &self,
        name: impl Into<String>,
        observer: F,
    ) -> Result<&Self, HookRegistrationError>
    where
        F: Fn(&StyleEvent) + Send + Sync + 'static,
    {
        self.register_observer(StyleEventKind::ALL, name, observer)
    }

    /// Invokes the observers registered for the event's kind.
    pub fn invoke(&self, event: &StyleEvent) {
        // Clone out of the lock so observers may register further hooks.
        let observers: Vec<Observer> = {
            let hooks = self.hooks.read();
            hooks
                .get(&event.kind())
                .map(|entries| entries.iter().map(|entry| Arc::clone(&entry.observer)).collect())
                .unwrap_or_default()
        };

        for observer in observers {
            observer(event);
        }
    }

    /// Returns the number of observers registered for `kind`.
    #[must_use]
    pub fn hook_count(&self, kind: StyleEventKind) -> usize {
        let hooks = self.hooks.read();
        hooks.get(&kind).map_or(0, Vec::len)
    }

    /// Checks if an observer with the given name exists for `kind`.
    #[must_use]
    pub fn contains_hook(&self, kind: StyleEventKind, name: &str) -> bool {
        let hooks = self.hooks.read();
        hooks
            .get(&kind)
            .is_some_and(|entries| entries.iter().any(|entry| entry.name == name))
    }
}
