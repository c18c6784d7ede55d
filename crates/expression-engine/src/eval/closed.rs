use super::runtime::Evaluator;
use crate::{
    context::EvalContext,
    error::{ExpressionError, Result},
};
use model::{core::value::Value, expr::Expr};
use tracing::trace;

/// Evaluate a closed expression (no free parameters) to a value.
/// Used for argument values and member access on captured constants.
pub fn eval_closed_expression(expr: &Expr) -> Result<Value> {
    if let Some(free) = expr.free_parameters().first() {
        return Err(ExpressionError::UnboundParameter(free.name.clone()));
    }
    let value = expr.evaluate(&EvalContext::new())?;
    trace!(%expr, %value, "evaluated closed expression");
    Ok(value)
}
