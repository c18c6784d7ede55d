pub mod core;
pub mod expr;
pub mod mutation;
pub mod query;
pub mod schema;
pub mod selection;
