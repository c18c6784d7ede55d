use super::members::FieldRef;
use crate::error::{CompileError, Result};
use model::{
    core::{data_type::DataType, value::Value},
    expr::{BinaryOp, Expr, ExprType},
    query::filter::{ComparisonOp, LiteralValue},
};

/// Translates one comparison against a typed field into a boolean expression.
pub fn translate(field: &FieldRef, op: Option<ComparisonOp>, literal: &LiteralValue) -> Result<Expr> {
    let op = op.ok_or_else(|| CompileError::UnsupportedOperator {
        field: field.path.to_string(),
    })?;

    match (op, literal) {
        (ComparisonOp::Equals, LiteralValue::Text(text)) => {
            Ok(Expr::binary(field.expr.clone(), BinaryOp::Equal, coerce(field, text)?))
        }
        (ComparisonOp::NotEqualTo, LiteralValue::Text(text)) => {
            Ok(Expr::binary(field.expr.clone(), BinaryOp::NotEqual, coerce(field, text)?))
        }
        (op, LiteralValue::Text(text)) if op.is_ordering() => {
            let relation = match op {
                ComparisonOp::GreaterThan => BinaryOp::GreaterThan,
                ComparisonOp::GreaterThanOrEqualTo => BinaryOp::GreaterOrEqual,
                ComparisonOp::LessThan => BinaryOp::LessThan,
                _ => BinaryOp::LessOrEqual,
            };
            let compare = Expr::Compare {
                left: Box::new(field.expr.clone()),
                right: Box::new(coerce(field, text)?),
            };
            Ok(Expr::binary(compare, relation, Expr::constant(Value::Int(0))))
        }
        // membership tests the string projection of the field
        (ComparisonOp::In, LiteralValue::TextSet(set)) => Ok(contains(field, set)),
        (ComparisonOp::NotIn, LiteralValue::TextSet(set)) => Ok(Expr::not(contains(field, set))),
        // null check is an empty-string test on the string projection
        (ComparisonOp::IsNull, LiteralValue::Flag(is_null)) => {
            let relation = if *is_null {
                BinaryOp::Equal
            } else {
                BinaryOp::NotEqual
            };
            Ok(Expr::binary(
                Expr::Text(Box::new(field.expr.clone())),
                relation,
                Expr::constant(Value::String(String::new())),
            ))
        }
        (op, literal) => Err(CompileError::TypeCoercion {
            field: field.path.to_string(),
            value: literal.to_string(),
            target: format!("a {} operand", expected_literal(op)),
        }),
    }
}

fn expected_literal(op: ComparisonOp) -> &'static str {
    match op {
        ComparisonOp::In | ComparisonOp::NotIn => "text set",
        ComparisonOp::IsNull => "flag",
        _ => "text",
    }
}

fn contains(field: &FieldRef, set: &[String]) -> Expr {
    Expr::Contains {
        set: set.to_vec(),
        item: Box::new(Expr::Text(Box::new(field.expr.clone()))),
    }
}

/// Parses the raw literal as the field's declared scalar type.
fn coerce(field: &FieldRef, text: &str) -> Result<Expr> {
    let failure = |target: String| CompileError::TypeCoercion {
        field: field.path.to_string(),
        value: text.to_string(),
        target,
    };
    let data_type = field
        .declared_type()
        .ok_or_else(|| failure(field.ty.to_string()))?;
    let value = match data_type {
        DataType::Null | DataType::Json => Some(Value::String(text.to_string())),
        declared => Value::parse_as(text, declared),
    }
    .ok_or_else(|| failure(data_type.to_string()))?;
    Ok(Expr::typed_constant(value, ExprType::Scalar(data_type.clone())))
}
