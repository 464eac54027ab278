//! Component style registration for server-rendered, resumable UIs.
//!
//! Styles are attached to components exactly once per distinct style,
//! loaded lazily through the render pass's completion barrier, and
//! optionally scoped to the component that requested them.

pub use veneer_internal::*;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use veneer_internal::prelude::*;
}
