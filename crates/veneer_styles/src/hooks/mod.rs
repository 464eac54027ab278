//! Observer hooks for style registration.
//!
//! Hooks let applications watch registration without touching the
//! registration path: logging, metrics, asset manifests, test assertions.
//!
//! - **Events** ([`events`]): [`StyleEvent`] carrying the style ID and host
//! - **API** ([`api`]): [`StyleHooks`], the named observer registry
//!
//! Observers are grouped by [`StyleEventKind`] and run in registration order.

pub mod api;
pub mod events;

pub use api::{HookRegistrationError, StyleHooks};
pub use events::{StyleEvent, StyleEventKind};
