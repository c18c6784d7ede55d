use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyntaxError {
    #[error("Malformed {what}: {source}")]
    Malformed {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Expected {expected} for {what}, found {found}")]
    UnexpectedShape {
        what: &'static str,
        expected: &'static str,
        found: String,
    },
}

pub type Result<T> = std::result::Result<T, SyntaxError>;
