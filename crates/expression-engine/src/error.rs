use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExpressionError {
    #[error("Parameter '{0}' is not bound")]
    UnboundParameter(String),

    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    #[error("Sequence contains no elements ({0})")]
    EmptySequence(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Field not found: {0}")]
    FieldNotFound(String),
}

impl ExpressionError {
    pub(crate) fn mismatch(expected: impl Into<String>, actual: &model::core::value::Value) -> Self {
        ExpressionError::TypeMismatch {
            expected: expected.into(),
            actual: actual.data_type().to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ExpressionError>;
