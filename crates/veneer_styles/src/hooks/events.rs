//! Events emitted by style registration.
//!
//! All observers receive `&StyleEvent` and match on the variants they care
//! about.
//!
//! # Example
//!
//! ```
//! use veneer_styles::hooks::events::StyleEvent;
//!
//! fn handle_event(event: &StyleEvent) {
//!     match event {
//!         StyleEvent::Registered { style_id, scoped, .. } => {
//!             println!("registered {style_id} (scoped: {scoped})");
//!         }
//!         StyleEvent::Failed { style_id, error, .. } => {
//!             eprintln!("{style_id} failed: {error}");
//!         }
//!         _ => {}
//!     }
//! }
//! ```

use core::fmt;

use veneer_render::element::HostElement;
use veneer_render::style::StyleId;

/// Kind of a [`StyleEvent`], used to select which events an observer gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StyleEventKind {
    /// See [`StyleEvent::Registered`].
    Registered,
    /// See [`StyleEvent::Deduplicated`].
    Deduplicated,
    /// See [`StyleEvent::Resolved`].
    Resolved,
    /// See [`StyleEvent::Failed`].
    Failed,
}

impl StyleEventKind {
    /// Every event kind.
    pub const ALL: [Self; 4] = [
        Self::Registered,
        Self::Deduplicated,
        Self::Resolved,
        Self::Failed,
    ];

    /// Returns the kind's name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Registered => "registered",
            Self::Deduplicated => "deduplicated",
            Self::Resolved => "resolved",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for StyleEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Event describing one step of a style's registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleEvent {
    /// A style was seen for the first time in the container and its
    /// resolution was scheduled.
    Registered {
        /// Identity of the style.
        style_id: StyleId,
        /// Element that requested it.
        host: HostElement,
        /// Whether the scoped variant was used.
        scoped: bool,
    },

    /// A style was requested again after another call-site registered it.
    /// Nothing is resolved.
    Deduplicated {
        /// Identity of the style.
        style_id: StyleId,
        /// Element that requested it.
        host: HostElement,
        /// Whether the scoped variant was used.
        scoped: bool,
    },

    /// Resolution and transform finished and the content was attached.
    Resolved {
        /// Identity of the style.
        style_id: StyleId,
        /// Element the content was attached to.
        host: HostElement,
        /// Size of the attached content in bytes.
        bytes: usize,
    },

    /// Resolution or transform failed.
    Failed {
        /// Identity of the style.
        style_id: StyleId,
        /// Element that requested it.
        host: HostElement,
        /// Rendered error message.
        error: String,
    },
}

impl StyleEvent {
    /// Returns the event's kind.
    #[must_use]
    pub fn kind(&self) -> StyleEventKind {
        match self {
            Self::Registered { .. } => StyleEventKind::Registered,
            Self::Deduplicated { .. } => StyleEventKind::Deduplicated,
            Self::Resolved { .. } => StyleEventKind::Resolved,
            Self::Failed { .. } => StyleEventKind::Failed,
        }
    }

    /// Returns the event's name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// Returns the identity of the style the event is about.
    #[must_use]
    pub fn style_id(&self) -> &StyleId {
        match self {
            Self::Registered { style_id, .. }
            | Self::Deduplicated { style_id, .. }
            | Self::Resolved { style_id, .. }
            | Self::Failed { style_id, .. } => style_id,
        }
    }

    /// Returns the host element the event is about.
    #[must_use]
    pub fn host(&self) -> &HostElement {
        match self {
            Self::Registered { host, .. }
            | Self::Deduplicated { host, .. }
            | Self::Resolved { host, .. }
            | Self::Failed { host, .. } => host,
        }
    }
}
