//! Common error types for persona

use thiserror::Error;

/// Common result type for persona operations
pub type Result<T> = std::result::Result<T, Error>;

/// Closed error taxonomy shared by every layer.
///
/// The HTTP layer maps each variant to a status code with an exhaustive match,
/// so adding a variant forces a decision there.
#[derive(Error, Debug)]
pub enum Error {
    /// Requested entity does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Storage or downstream failure
    #[error("Internal error: {0}")]
    Internal(String),

    /// Malformed query parameters (sort order, sort field, paging)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Request body failed validation
    #[error("Invalid request body: {0}")]
    Validation(String),

    /// One or more lookup sources failed; which one is intentionally not reported
    #[error("Enrichment incomplete: one or more lookup sources failed")]
    PartialEnrichment,

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
