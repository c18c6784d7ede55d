use super::runtime::{Evaluator, as_bool};
use crate::{
    context::EvalContext,
    error::{ExpressionError, Result},
};
use model::{
    core::value::Value,
    expr::{Expr, Lambda, SequenceOp},
};
use std::cmp::Ordering;
use tracing::trace;

/// Evaluates one call of the closed sequence operator set.
pub(crate) fn eval_call(
    op: SequenceOp,
    source: &Expr,
    args: &[Expr],
    ctx: &EvalContext<'_>,
) -> Result<Value> {
    let source = source.evaluate(ctx)?;
    let items = source
        .as_list()
        .ok_or_else(|| ExpressionError::mismatch("sequence", &source))?;
    trace!(op = op.name(), len = items.len(), "evaluating sequence operator");

    match op {
        SequenceOp::Where => {
            let predicate = lambda_arg(op, args)?;
            Ok(Value::List(filter(items, predicate, ctx)?))
        }
        SequenceOp::Select => {
            let selector = lambda_arg(op, args)?;
            let projected = items
                .into_iter()
                .map(|item| apply(selector, item, ctx))
                .collect::<Result<Vec<_>>>()?;
            Ok(Value::List(projected))
        }
        SequenceOp::OrderBy | SequenceOp::OrderByDescending => {
            let key = lambda_arg(op, args)?;
            let mut keyed = items
                .into_iter()
                .map(|item| Ok((apply(key, item.clone(), ctx)?, item)))
                .collect::<Result<Vec<_>>>()?;
            // sort_by is stable, so equal keys keep their input order either way
            keyed.sort_by(|(a, _), (b, _)| {
                let ordering = a.compare(b).unwrap_or(Ordering::Equal);
                match op {
                    SequenceOp::OrderByDescending => ordering.reverse(),
                    _ => ordering,
                }
            });
            Ok(Value::List(keyed.into_iter().map(|(_, item)| item).collect()))
        }
        SequenceOp::Reverse => Ok(Value::List(items.into_iter().rev().collect())),
        SequenceOp::Skip => {
            let count = count_arg(op, args, ctx)?;
            Ok(Value::List(items.into_iter().skip(count).collect()))
        }
        SequenceOp::Take => {
            let count = count_arg(op, args, ctx)?;
            Ok(Value::List(items.into_iter().take(count).collect()))
        }
        SequenceOp::First | SequenceOp::FirstOrDefault | SequenceOp::Last | SequenceOp::LastOrDefault => {
            let items = match args.first() {
                Some(Expr::Lambda(predicate)) => filter(items, predicate, ctx)?,
                Some(other) => {
                    return Err(ExpressionError::UnsupportedOperation(format!(
                        "{} expects a predicate lambda, got {other}",
                        op.name()
                    )));
                }
                None => items,
            };
            let picked = match op {
                SequenceOp::First | SequenceOp::FirstOrDefault => items.into_iter().next(),
                _ => items.into_iter().next_back(),
            };
            match (picked, op) {
                (Some(item), _) => Ok(item),
                (None, SequenceOp::FirstOrDefault | SequenceOp::LastOrDefault) => Ok(Value::Null),
                (None, _) => Err(ExpressionError::EmptySequence(op.name().to_string())),
            }
        }
    }
}

fn lambda_arg(op: SequenceOp, args: &[Expr]) -> Result<&Lambda> {
    match args.first() {
        Some(Expr::Lambda(lambda)) if lambda.params.len() == 1 => Ok(lambda),
        _ => Err(ExpressionError::UnsupportedOperation(format!(
            "{} expects a single-parameter lambda",
            op.name()
        ))),
    }
}

/// Skip/take count. Negative counts behave as zero.
fn count_arg(op: SequenceOp, args: &[Expr], ctx: &EvalContext<'_>) -> Result<usize> {
    let arg = args.first().ok_or_else(|| {
        ExpressionError::UnsupportedOperation(format!("{} expects a count", op.name()))
    })?;
    let value = arg.evaluate(ctx)?;
    let count = value
        .as_i64()
        .ok_or_else(|| ExpressionError::mismatch("Int", &value))?;
    Ok(usize::try_from(count.max(0)).unwrap_or(usize::MAX))
}

fn apply(lambda: &Lambda, item: Value, ctx: &EvalContext<'_>) -> Result<Value> {
    let mut scope = ctx.child();
    if let Some(param) = lambda.params.first() {
        scope.bind(param, item);
    }
    lambda.body.evaluate(&scope)
}

fn filter(items: Vec<Value>, predicate: &Lambda, ctx: &EvalContext<'_>) -> Result<Vec<Value>> {
    let mut kept = Vec::with_capacity(items.len());
    for item in items {
        if as_bool(&apply(predicate, item.clone(), ctx)?)? {
            kept.push(item);
        }
    }
    Ok(kept)
}
