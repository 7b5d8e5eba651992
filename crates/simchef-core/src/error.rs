//! Domain errors that callers may want to match on.
//!
//! Everything else is propagated as `anyhow::Error` with context.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ChefError {
    /// Server answered with a non-2xx status.
    #[error("GET {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u32 },

    /// A required element was not found in a saved page.
    #[error("no element matching `{selector}` in {}", path.display())]
    MissingElement { selector: String, path: PathBuf },

    /// Link policies only support the root page (0) or one level of links (1).
    #[error("link policy levels = {0} not supported (expected 0 or 1)")]
    UnsupportedLinkDepth(u8),

    /// A configured CSS selector failed to parse.
    #[error("invalid selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },
}
