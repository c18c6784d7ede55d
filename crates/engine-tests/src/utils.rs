#![allow(dead_code)]

use super::{directory, people_schema};
use expression_engine::{InMemoryProvider, QueryProvider};
use model::{
    core::value::Value,
    expr::{Expr, ExprType, Parameter, bound::BoundExpr},
    schema::{field::ArgumentValues, registry::Schema},
};
use planner::{QueryCompiler, Result};
use serde_json::Value as Json;

/// The root context parameter every resolved field is re-parented onto.
pub fn root() -> Parameter {
    Parameter::new("db", ExprType::object("Query"))
}

/// Argument values as a caller would supply them: each one a closed constant.
pub fn args<const N: usize>(pairs: [(&str, Value); N]) -> ArgumentValues {
    pairs
        .into_iter()
        .map(|(name, value)| (name.to_string(), Expr::constant(value)))
        .collect()
}

pub fn json_arg(json: Json) -> Value {
    Value::Json(json)
}

/// Resolves a root query field with the default settings.
pub fn resolve(schema: &Schema, field: &str, supplied: &ArgumentValues) -> Result<BoundExpr> {
    QueryCompiler::new(schema).resolve_field("Query", field, supplied, &root().expr())
}

/// Runs a bound expression against the sample directory.
pub fn run(bound: &BoundExpr) -> Value {
    InMemoryProvider::new()
        .execute(bound, &directory())
        .expect("in-memory execution")
}

pub fn query(field: &str, supplied: &ArgumentValues) -> Value {
    let schema = people_schema();
    let bound = resolve(&schema, field, supplied).expect("field resolves");
    run(&bound)
}

/// The `name` member of every element of a list result, in order.
pub fn names(value: &Value) -> Vec<String> {
    value
        .as_list()
        .expect("list result")
        .iter()
        .map(|item| item.get("name").map(Value::to_text).unwrap_or_default())
        .collect()
}
