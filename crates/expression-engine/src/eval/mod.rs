mod binary;
pub mod closed;
pub mod runtime;
mod sequence;

pub use runtime::Evaluator;
