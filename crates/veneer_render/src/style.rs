//! Style identity and resolved style payloads.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier for a registered style resource.
///
/// A `StyleId` is derived from a style reference's symbol and the index of the
/// call-site that registered it, so the same call-site produces the same id on
/// the server and on the client. The container registry and every element
/// accumulator key styles by this value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleId(String);

impl StyleId {
    /// Wraps an already-derived identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StyleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StyleId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// A resolved style waiting to be emitted for a host element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppendStyle {
    /// Identity of the style.
    pub style_id: StyleId,
    /// Transformed style text.
    pub content: String,
}
