//! Error types for the layout engine and the key inspector seam.
//!
//! Tokenizing never fails: malformed markup degrades to plain text or opaque
//! code lines. The only hard failures are impossible viewport geometry and
//! errors reported by an injected [`KeyInspector`](crate::pgp::KeyInspector).

use thiserror::Error;

/// Errors returned by [`layout`](crate::layout::layout).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The viewport has no columns to lay text into.
    #[error("layout width must be at least 1 column")]
    ZeroWidth,
    /// A height bound of zero rows was supplied.
    #[error("layout height must be at least 1 row when given")]
    ZeroHeight,
}

/// Errors reported while inspecting PGP material.
///
/// These never abort tokenizing; the tokenizer renders them as an
/// `Error: ...` line under the key attachment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PgpError {
    /// The armored block did not contain a usable public key.
    #[error("Invalid key")]
    InvalidKey,
    /// The inspector backend failed for another reason.
    #[error("{0}")]
    Backend(String),
}

impl PgpError {
    /// Create a backend error from any message.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }
}
