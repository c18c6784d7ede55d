pub mod error;
pub mod field;
pub mod registry;
pub mod types;
