use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// The operation is not allowed while the entity is in its current state.
    #[error("Not allowed: {0}")]
    PreconditionFailed(String),

    /// Something nested under an existing entity is absent. The message
    /// names it.
    #[error("Not found: {0}")]
    Missing(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
