use crate::{
    context::EvalContext,
    error::{ExpressionError, Result},
    eval::Evaluator,
};
use model::{core::value::Value, expr::bound::BoundExpr};
use tracing::debug;

/// Back-end that runs a bound expression against a root object.
pub trait QueryProvider {
    fn execute(&self, query: &BoundExpr, root: &Value) -> Result<Value>;
}

/// Reference provider over in-memory `Value` graphs. Objects are records and
/// sequences are lists.
#[derive(Debug, Default, Clone, Copy)]
pub struct InMemoryProvider;

impl InMemoryProvider {
    pub fn new() -> Self {
        Self
    }
}

impl QueryProvider for InMemoryProvider {
    fn execute(&self, query: &BoundExpr, root: &Value) -> Result<Value> {
        let mut ctx = EvalContext::new();
        for (param, value) in &query.constants {
            ctx.bind(param, value.clone());
        }
        if let Some(context) = &query.context {
            ctx.bind(context, root.clone());
        }

        if let Some(open) = query
            .expression
            .free_parameters()
            .into_iter()
            .find(|p| ctx.lookup(&p.id).is_none())
        {
            return Err(ExpressionError::UnboundParameter(open.name));
        }

        debug!(query = %query, "executing in memory");
        query.expression.evaluate(&ctx)
    }
}
