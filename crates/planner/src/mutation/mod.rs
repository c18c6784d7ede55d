mod rewrite;
mod shape;

pub use rewrite::rewrite_mutation;
pub use shape::MutationShape;
