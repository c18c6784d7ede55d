use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("Type '{0}' is already registered")]
    DuplicateType(String),

    #[error("Field '{field}' is already registered on type '{type_name}'")]
    DuplicateField { type_name: String, field: String },

    #[error("Unknown type '{0}'")]
    UnknownType(String),

    #[error("Field '{field}' not found on type '{type_name}'")]
    UnknownField { type_name: String, field: String },

    #[error("Field '{field}' on '{type_name}' cannot be used here: {reason}")]
    InvalidField {
        type_name: String,
        field: String,
        reason: String,
    },
}
