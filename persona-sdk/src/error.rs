//! Lookup client errors

use thiserror::Error;

/// Failure of a single lookup call
#[derive(Debug, Error)]
pub enum LookupError {
    /// Transport-level failure: DNS, connect, timeout, connection reset
    #[error("Lookup source unavailable: {0}")]
    Unavailable(String),

    /// Source answered with a non-2xx status
    #[error("Lookup source returned {0}: {1}")]
    Upstream(u16, String),

    /// Body did not match the source's JSON shape
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Invalid source URL '{0}': {1}")]
    InvalidUrl(String, String),

    /// HTTP client could not be constructed
    #[error("Client error: {0}")]
    Client(String),
}
