//! Domain-level error taxonomy shared by all crates.

use uuid::Uuid;

/// Errors raised by domain logic, independent of any transport.
///
/// The HTTP layer maps each variant onto a status code and a stable
/// error code string; nothing below the HTTP layer knows about HTTP.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A requested entity does not exist.
    #[error("{entity} with id {id} not found")]
    NotFound {
        /// Entity name used in error messages (e.g. "Story").
        entity: &'static str,
        /// Primary key of the missing row.
        id: Uuid,
    },

    /// Input failed validation before any work was attempted.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The requested operation conflicts with current state.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// An unexpected internal failure.
    #[error("Internal error: {0}")]
    Internal(String),
}
