//! Render pass primitives for Veneer.
//!
//! `veneer_render` provides the state a component renderer threads through a
//! render pass:
//!
//! - [`scope`] - Persistent, per-call-site hook slots of a component instance
//! - [`element`] - Host elements and their accumulated style state
//! - [`container`] - Container-wide state: style registry, element table, extensions
//! - [`context`] - Render pass and component invocation contexts
//! - [`barrier`] - Completion barrier collecting a pass's background tasks
//! - [`style`] - Style identifiers and resolved style payloads
//!
//! # Architecture
//!
//! - **Layer 1** (`veneer_render`): render pass primitives (this crate)
//! - **Layer 2** (`veneer_styles`): style registration on top of these primitives
//!
//! # Scheduling model
//!
//! Component invocations are synchronous and never interleave. Anything that
//! suspends is registered on the pass's [`CompletionBarrier`](barrier::CompletionBarrier)
//! and driven when the pass finishes.

/// Render pass completion barrier.
pub mod barrier;

/// Container-wide render state.
pub mod container;

/// Render pass and invocation contexts.
pub mod context;

/// Host elements and per-element style state.
pub mod element;

/// Sequential hook slots.
pub mod scope;

/// Style identifiers and payloads.
pub mod style;

pub use container::{ContainerConfig, ContainerSnapshot, ContainerState};
pub use context::{InvocationContext, RenderContext, RenderSummary};
pub use element::{ElementContext, ElementId, HostElement};
pub use style::{AppendStyle, StyleId};

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::barrier::*;
    pub use crate::container::*;
    pub use crate::context::*;
    pub use crate::element::*;
    pub use crate::scope::*;
    pub use crate::style::*;
}
