//! Lazy style references and style identity.
//!
//! A [`StyleRef`] is a cheap, cloneable handle to style text that may not be
//! loaded yet. It carries a `symbol`: a deterministic token naming the style
//! source (typically derived from where the stylesheet is imported). The
//! symbol together with the registering call-site's slot index yields the
//! [`StyleId`] used for deduplication.
//!
//! # Example
//!
//! ```
//! use veneer_styles::reference::{StyleRef, derive_style_id};
//!
//! let card = StyleRef::inline("card.css", ".card { padding: 4px }");
//! let id = derive_style_id(&card, 0);
//! assert_eq!(id, derive_style_id(&card.clone(), 0));
//! assert_ne!(id, derive_style_id(&card, 1));
//! ```

use core::fmt;
use core::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use veneer_render::element::HostElement;
use veneer_render::style::StyleId;

// ─────────────────────────────────────────────────────────────────────────────
// LoadError
// ─────────────────────────────────────────────────────────────────────────────

/// Errors produced while resolving a style reference.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Reading a stylesheet from disk failed.
    #[error("failed to read stylesheet {}: {source}", .path.display())]
    Io {
        /// Path of the stylesheet.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A custom loader reported a failure.
    #[error("{0}")]
    Failed(String),
}

impl LoadError {
    /// Creates a [`LoadError::Failed`] with the given message.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// StyleLoader
// ─────────────────────────────────────────────────────────────────────────────

/// Asynchronously produces the text behind a lazy style reference.
///
/// The owner element is passed so loaders can resolve relative to the
/// component that requested the style.
#[async_trait]
pub trait StyleLoader: Send + Sync + 'static {
    /// Loads the style text.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if the text cannot be produced.
    async fn load(&self, owner: &HostElement) -> Result<String, LoadError>;
}

/// Loader backed by an async closure.
pub struct FnLoader<F>(F);

#[async_trait]
impl<F, Fut> StyleLoader for FnLoader<F>
where
    F: Fn(HostElement) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<String, LoadError>> + Send + 'static,
{
    async fn load(&self, owner: &HostElement) -> Result<String, LoadError> {
        (self.0)(owner.clone()).await
    }
}

/// Loader reading a stylesheet from the filesystem.
#[derive(Debug, Clone)]
pub struct FileLoader {
    path: PathBuf,
}

impl FileLoader {
    /// Creates a loader for `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the stylesheet path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl StyleLoader for FileLoader {
    async fn load(&self, _owner: &HostElement) -> Result<String, LoadError> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| LoadError::Io {
                path: self.path.clone(),
                source,
            })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// StyleRef
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
enum StyleSource {
    Inline(Arc<str>),
    Lazy(Arc<dyn StyleLoader>),
}

/// Lazy, cloneable handle to style source text.
#[derive(Clone)]
pub struct StyleRef {
    symbol: Arc<str>,
    source: StyleSource,
}

impl fmt::Debug for StyleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = match &self.source {
            StyleSource::Inline(_) => "inline",
            StyleSource::Lazy(_) => "lazy",
        };
        f.debug_struct("StyleRef")
            .field("symbol", &self.symbol)
            .field("source", &source)
            .finish()
    }
}

impl StyleRef {
    /// Creates a reference to style text that is already in memory.
    #[must_use]
    pub fn inline(symbol: impl Into<Arc<str>>, text: impl Into<Arc<str>>) -> Self {
        Self {
            symbol: symbol.into(),
            source: StyleSource::Inline(text.into()),
        }
    }

    /// Creates a reference resolved by `loader`.
    #[must_use]
    pub fn lazy<L: StyleLoader>(symbol: impl Into<Arc<str>>, loader: L) -> Self {
        Self {
            symbol: symbol.into(),
            source: StyleSource::Lazy(Arc::new(loader)),
        }
    }

    /// Creates a reference resolved by an async closure.
    #[must_use]
    pub fn from_fn<F, Fut>(symbol: impl Into<Arc<str>>, load: F) -> Self
    where
        F: Fn(HostElement) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String, LoadError>> + Send + 'static,
    {
        Self::lazy(symbol, FnLoader(load))
    }

    /// Creates a reference to a stylesheet on disk.
    ///
    /// The path doubles as the symbol.
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let symbol = path.to_string_lossy().into_owned();
        Self::lazy(symbol, FileLoader::new(path))
    }

    /// Returns the identity symbol.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Resolves the reference to style text.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if the loader fails.
    pub async fn resolve(&self, owner: &HostElement) -> Result<String, LoadError> {
        match &self.source {
            StyleSource::Inline(text) => Ok(text.to_string()),
            StyleSource::Lazy(loader) => loader.load(owner).await,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Identity
// ─────────────────────────────────────────────────────────────────────────────

/// Hashes `text` to a short base-36 token.
///
/// 32-bit rolling hash (`h = h * 31 + unit`, wrapping) over the UTF-16 code
/// units of the text, rendered as the base-36 absolute value. The result only
/// depends on the text, so server and client derive the same token.
#[must_use]
pub fn hash_code(text: &str) -> String {
    let mut hash: i32 = 0;
    for unit in text.encode_utf16() {
        hash = (hash << 5).wrapping_sub(hash).wrapping_add(i32::from(unit));
    }
    to_base36(i64::from(hash).unsigned_abs())
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    if value == 0 {
        return "0".to_owned();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    digits.iter().rev().map(|&d| char::from(d)).collect()
}

/// Derives the identity of the style registered by `style` at `slot_index`.
#[must_use]
pub fn derive_style_id(style: &StyleRef, slot_index: usize) -> StyleId {
    StyleId::new(format!("{}-{}", hash_code(style.symbol()), slot_index))
}
