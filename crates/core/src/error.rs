use crate::types::DbId;

/// Domain-level failures raised by the item rules and services.
///
/// The HTTP layer maps each variant to a status code; nothing here knows
/// about HTTP.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// A collaborator outside this process (e.g. a link preview target)
    /// failed or returned something unusable.
    #[error("Upstream failure: {0}")]
    Upstream(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for the not-found error every item lookup produces.
    pub fn item_not_found(id: DbId) -> Self {
        CoreError::NotFound { entity: "Item", id }
    }
}
