use thiserror::Error;

#[derive(Error, Debug)]
pub enum BegripError {
    #[error("Validation error: {field}: {message}")]
    ValidationError { field: String, message: String },

    #[error("Configuration error: {parameter}: {reason}")]
    ConfigurationError { parameter: String, reason: String },

    #[error("Database operation failed: {operation}: {reason}")]
    DatabaseError { operation: String, reason: String },

    #[error("Definitie voor '{term}' bestaat al in context '{context}'")]
    DuplicateDefinition { term: String, context: String },

    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    #[error("Timeout error: {operation}: {duration_ms}ms")]
    TimeoutError { operation: String, duration_ms: u64 },

    #[error("Network error: {operation}: {reason}")]
    NetworkError { operation: String, reason: String },

    #[error("AI generation failed: {reason}")]
    AiGenerationError { reason: String },

    #[error("Invalid status transition: {from} -> {to}")]
    StatusTransitionError { from: String, to: String },

    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    #[error("Internal error: {message}")]
    InternalError { message: String },
}

pub type BegripResult<T> = Result<T, BegripError>;

impl From<serde_json::Error> for BegripError {
    fn from(err: serde_json::Error) -> Self {
        BegripError::SerializationError {
            reason: err.to_string(),
        }
    }
}

impl From<uuid::Error> for BegripError {
    fn from(err: uuid::Error) -> Self {
        BegripError::ValidationError {
            field: "uuid".to_string(),
            message: err.to_string(),
        }
    }
}
