use super::{binary::BinaryOpEvaluator, sequence::eval_call};
use crate::{
    context::EvalContext,
    error::{ExpressionError, Result},
};
use model::{
    core::value::Value,
    expr::{BinaryOp, Expr},
};
use std::{cmp::Ordering, collections::BTreeMap};

/// Trait for evaluating expression trees against parameter bindings
pub trait Evaluator {
    fn evaluate(&self, ctx: &EvalContext<'_>) -> Result<Value>;
}

impl Evaluator for Expr {
    fn evaluate(&self, ctx: &EvalContext<'_>) -> Result<Value> {
        match self {
            Expr::Parameter(param) => ctx
                .lookup(&param.id)
                .cloned()
                .ok_or_else(|| ExpressionError::UnboundParameter(param.name.clone())),

            Expr::Constant { value, .. } => Ok(value.clone()),

            Expr::Member { target, name, .. } => {
                let target = target.evaluate(ctx)?;
                member_of(&target, name)
            }

            Expr::Binary { left, op, right } if op.is_logical() => {
                let left = as_bool(&left.evaluate(ctx)?)?;
                // short-circuit
                match (op, left) {
                    (BinaryOp::And, false) => Ok(Value::Boolean(false)),
                    (BinaryOp::Or, true) => Ok(Value::Boolean(true)),
                    _ => Ok(Value::Boolean(as_bool(&right.evaluate(ctx)?)?)),
                }
            }

            Expr::Binary { left, op, right } => {
                let left = left.evaluate(ctx)?;
                let right = right.evaluate(ctx)?;
                BinaryOpEvaluator::new(&left, &right, op)
                    .evaluate()
                    .ok_or_else(|| ExpressionError::TypeMismatch {
                        expected: format!("operands comparable with {}", op.symbol()),
                        actual: format!("{} and {}", left.data_type(), right.data_type()),
                    })
            }

            Expr::Not(inner) => Ok(Value::Boolean(!as_bool(&inner.evaluate(ctx)?)?)),

            Expr::Compare { left, right } => {
                let left = left.evaluate(ctx)?;
                let right = right.evaluate(ctx)?;
                let ordering = left.compare(&right).ok_or_else(|| ExpressionError::TypeMismatch {
                    expected: left.data_type().to_string(),
                    actual: right.data_type().to_string(),
                })?;
                Ok(Value::Int(match ordering {
                    Ordering::Less => -1,
                    Ordering::Equal => 0,
                    Ordering::Greater => 1,
                }))
            }

            Expr::Text(inner) => Ok(Value::String(inner.evaluate(ctx)?.to_text())),

            Expr::Contains { set, item } => {
                let item = item.evaluate(ctx)?.to_text();
                Ok(Value::Boolean(set.iter().any(|s| *s == item)))
            }

            Expr::Call { op, source, args } => eval_call(*op, source, args, ctx),

            Expr::Lambda(lambda) => Err(ExpressionError::UnsupportedOperation(format!(
                "lambda '{lambda}' outside a sequence operator"
            ))),

            Expr::New { fields, .. } => {
                let record = fields
                    .iter()
                    .map(|(name, expr)| Ok((name.clone(), expr.evaluate(ctx)?)))
                    .collect::<Result<BTreeMap<_, _>>>()?;
                Ok(Value::Record(record))
            }
        }
    }
}

/// Member access. Access on null yields null.
pub(crate) fn member_of(target: &Value, name: &str) -> Result<Value> {
    match target {
        Value::Null => Ok(Value::Null),
        Value::Record(fields) => fields
            .get(name)
            .or_else(|| {
                fields
                    .iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(name))
                    .map(|(_, v)| v)
            })
            .cloned()
            .ok_or_else(|| ExpressionError::FieldNotFound(name.to_string())),
        other => Err(ExpressionError::mismatch(format!("record with member '{name}'"), other)),
    }
}

pub(crate) fn as_bool(value: &Value) -> Result<bool> {
    match value {
        Value::Boolean(b) => Ok(*b),
        other => Err(ExpressionError::mismatch("Boolean", other)),
    }
}
