//! # Veneer Internal Library
//!
//! Re-exports the core Veneer crates for convenience.

/// Layer 1: Render pass primitives.
pub use veneer_render;

/// Layer 2: Component style registration.
pub use veneer_styles;

/// Tracing subscriber configuration.
#[cfg(feature = "diagnostics")]
pub use veneer_diagnostics;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use veneer_render::prelude::*;
    pub use veneer_styles::prelude::*;
}
