//! Errors raised by style registration.

use veneer_render::scope::ScopeError;
use veneer_render::style::StyleId;

use crate::reference::LoadError;
use crate::transform::TransformError;

/// Errors produced by [`use_styles`](crate::use_styles) and its background
/// tasks.
///
/// `Scope` is returned synchronously from the registration call.
/// `Resolution` and `Transform` surface from
/// [`RenderContext::finish`](veneer_render::context::RenderContext::finish)
/// inside a [`BarrierError`](veneer_render::barrier::BarrierError) and can be
/// recovered with `BarrierError::first_as::<StyleError>()`.
#[derive(Debug, thiserror::Error)]
pub enum StyleError {
    /// The call-site's sequential slot could not be used.
    #[error(transparent)]
    Scope(#[from] ScopeError),

    /// The style reference failed to resolve.
    #[error("failed to resolve style {style_id}")]
    Resolution {
        /// Identity of the style.
        style_id: StyleId,
        /// Loader error.
        #[source]
        source: LoadError,
    },

    /// The resolved text could not be transformed.
    #[error("failed to transform style {style_id}")]
    Transform {
        /// Identity of the style.
        style_id: StyleId,
        /// Transform error.
        #[source]
        source: TransformError,
    },
}

impl StyleError {
    /// Returns the style the error is about, if it concerns a single style.
    #[must_use]
    pub fn style_id(&self) -> Option<&StyleId> {
        match self {
            Self::Scope(_) => None,
            Self::Resolution { style_id, .. } | Self::Transform { style_id, .. } => Some(style_id),
        }
    }
}
