use crate::{core::value::Value, expr::Lambda};

/// What running a mutation produced: a query over the context to select
/// from, or an already materialized value.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationResult {
    Expression(Lambda),
    Value(Value),
}

impl From<Lambda> for MutationResult {
    fn from(lambda: Lambda) -> Self {
        MutationResult::Expression(lambda)
    }
}

impl From<Value> for MutationResult {
    fn from(value: Value) -> Self {
        MutationResult::Value(value)
    }
}
