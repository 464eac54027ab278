//! Style text transforms applied after resolution.
//!
//! Unscoped registrations use [`Identity`]. Scoped registrations use
//! [`ScopedStylesheet`](crate::scoped::ScopedStylesheet), which rewrites
//! selectors so they only match inside the owning component.

use veneer_render::style::StyleId;

/// Errors raised while transforming style text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransformError {
    /// The stylesheet could not be parsed. Lines are 1-based.
    #[error("invalid stylesheet at {line}:{column}: {message}")]
    Parse {
        /// Parser message.
        message: String,
        /// Line of the offending token.
        line: u32,
        /// Column of the offending token.
        column: u32,
    },

    /// The rewritten stylesheet could not be printed.
    #[error("failed to print stylesheet: {0}")]
    Print(String),

    /// A custom transform refused the input.
    #[error("stylesheet rejected: {0}")]
    Rejected(String),
}

/// Rewrites resolved style text before it is attached to an element.
pub trait StyleTransform: Send + Sync + 'static {
    /// Transforms `css`, registered under `style_id`.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError`] if `css` cannot be processed.
    fn apply(&self, css: &str, style_id: &StyleId) -> Result<String, TransformError>;
}

/// Transform returning its input unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Identity;

impl StyleTransform for Identity {
    fn apply(&self, css: &str, _style_id: &StyleId) -> Result<String, TransformError> {
        Ok(css.to_owned())
    }
}

impl<F> StyleTransform for F
where
    F: Fn(&str, &StyleId) -> Result<String, TransformError> + Send + Sync + 'static,
{
    fn apply(&self, css: &str, style_id: &StyleId) -> Result<String, TransformError> {
        self(css, style_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_returns_input() {
        let id = StyleId::from("x-0");
        assert_eq!(Identity.apply("a { b: c }", &id).unwrap(), "a { b: c }");
        assert_eq!(Identity.apply("", &id).unwrap(), "");
    }

    #[test]
    fn closures_are_transforms() {
        let upper = |css: &str, id: &StyleId| {
            Ok::<_, TransformError>(format!("/*{id}*/{}", css.to_uppercase()))
        };
        let out = upper.apply("p{}", &StyleId::from("x-0")).unwrap();
        assert_eq!(out, "/*x-0*/P{}");
    }

    #[test]
    fn error_messages_carry_locations() {
        let err = TransformError::Parse {
            message: "unexpected token".into(),
            line: 3,
            column: 7,
        };
        assert_eq!(err.to_string(), "invalid stylesheet at 3:7: unexpected token");
        assert_eq!(
            TransformError::Rejected("empty".into()).to_string(),
            "stylesheet rejected: empty"
        );
    }
}
