use crate::types::DbId;

/// Domain-level error type shared by every carta crate.
///
/// Cross-tenant misses are reported as `NotFound`, never as a permission
/// error, so callers cannot probe for the existence of other brands' data.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A referenced entity does not exist (or is out of the acting
    /// brand's scope).
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// A name collision under the same (brand, parent) location.
    #[error("{0}")]
    AlreadyExists(String),

    /// A structurally invalid request: cross-brand move/attach, malformed
    /// path, rejected field value.
    #[error("{0}")]
    InvalidArgument(String),

    /// A storage-layer failure surfaced with a sanitized message.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Convenience alias for service and store return values.
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    pub fn not_found(entity: &'static str, id: DbId) -> Self {
        CoreError::NotFound { entity, id }
    }
}
