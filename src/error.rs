//! Error taxonomy for provider interactions
//!
//! Every failure a page render can see falls into one of three buckets:
//! a missing document, a transport problem, or a provider payload that is
//! missing fields we require. None of these is fatal to the process; all
//! are scoped to a single render.

use thiserror::Error;

/// Errors surfaced by the content provider boundary.
#[derive(Debug, Error)]
pub enum Error {
    /// The requested slug has no backing document. Rendered as a 404,
    /// never as an empty page.
    #[error("no document found for slug: {0}")]
    NotFound(String),

    /// Transport or provider failure. Retryable; callers must keep any
    /// already-accumulated state intact.
    #[error("provider fetch failed: {0}")]
    Fetch(String),

    /// The provider returned a document missing required fields.
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),
}

impl Error {
    /// Whether this error means the document simply does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
