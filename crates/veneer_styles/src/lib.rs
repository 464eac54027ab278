//! Component style registration for Veneer.
//!
//! `veneer_styles` attaches stylesheets to rendered components exactly once
//! per distinct style, defers loading the stylesheet until the render pass
//! needs it, and optionally scopes selectors to the owning component.
//!
//! - [`reference`] - Lazy style references, loaders and style identity
//! - [`use_styles`](mod@use_styles) - The registration hooks
//! - [`transform`] - Transforms applied to resolved style text
//! - [`scoped`] - Selector scoping rewriter
//! - [`hooks`] - Observers for registration events
//! - [`error`] - Registration errors
//!
//! # Architecture
//!
//! - **Layer 1** (`veneer_render`): render pass primitives
//! - **Layer 2** (`veneer_styles`): style registration (this crate)
//!
//! # Example
//!
//! ```
//! use veneer_render::container::ContainerState;
//! use veneer_render::context::RenderContext;
//! use veneer_render::scope::ComponentInstance;
//! use veneer_styles::{StyleRef, use_styles};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut container = ContainerState::default();
//! let styles = StyleRef::inline("list.css", "ul { padding: 0 }");
//! let mut items: Vec<ComponentInstance> = (0..3)
//!     .map(|_| ComponentInstance::new(container.create_host("ul")))
//!     .collect();
//!
//! let mut pass = RenderContext::new(&mut container);
//! for item in &mut items {
//!     pass.render(item, |cx| use_styles(cx, &styles))?;
//! }
//! let summary = pass.finish().await?;
//!
//! // Three instances, one registry entry, one resolution.
//! assert_eq!(summary.tasks, 1);
//! assert_eq!(container.style_count(), 1);
//! # Ok(())
//! # }
//! ```

/// Registration errors.
pub mod error;

/// Observers for registration events.
pub mod hooks;

/// Lazy style references and style identity.
pub mod reference;

/// Selector scoping rewriter.
pub mod scoped;

/// Transforms applied to resolved style text.
pub mod transform;

/// Style registration hooks.
pub mod use_styles;

pub use error::StyleError;
pub use hooks::{HookRegistrationError, StyleEvent, StyleEventKind, StyleHooks};
pub use reference::{FileLoader, LoadError, StyleLoader, StyleRef, derive_style_id, hash_code};
pub use scoped::ScopedStylesheet;
pub use transform::{Identity, StyleTransform, TransformError};
pub use use_styles::{
    Registration, StyleSlot, install_hooks, use_styles, use_styles_scoped, use_styles_with,
};

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::error::*;
    pub use crate::hooks::*;
    pub use crate::reference::*;
    pub use crate::scoped::*;
    pub use crate::transform::*;
    pub use crate::use_styles::*;
}
