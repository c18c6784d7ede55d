pub mod context;
pub mod error;
pub mod eval;
pub mod provider;

pub use context::EvalContext;
pub use error::{ExpressionError, Result};
pub use eval::{Evaluator, closed::eval_closed_expression};
pub use provider::{InMemoryProvider, QueryProvider};
