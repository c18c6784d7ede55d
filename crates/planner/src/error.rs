use expression_engine::ExpressionError;
use filter_syntax::error::SyntaxError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("Cannot convert '{value}' to {target} for field '{field}'")]
    TypeCoercion {
        field: String,
        value: String,
        target: String,
    },

    #[error("No supported comparison operator for field '{field}'")]
    UnsupportedOperator { field: String },

    #[error("Unsupported mutation result shape: {shape}")]
    UnsupportedMutationShape { shape: String },

    #[error("Field '{field}' missing required argument '{argument}'")]
    MissingRequiredArgument { field: String, argument: String },

    #[error("Field '{field}' not found on type '{type_name}'")]
    UnknownField { field: String, type_name: String },

    #[error("Unknown type '{0}'")]
    UnknownType(String),

    #[error("Filter clause {index} rejected: {reason}")]
    AmbiguousFilterClause { index: usize, reason: String },

    #[error("Expected a sequence, found {found}")]
    NotASequence { found: String },

    #[error("Invalid compile settings: {0}")]
    InvalidSettings(#[source] serde_json::Error),

    #[error(transparent)]
    Expression(#[from] ExpressionError),

    #[error(transparent)]
    Syntax(#[from] SyntaxError),
}

pub type Result<T> = std::result::Result<T, CompileError>;
