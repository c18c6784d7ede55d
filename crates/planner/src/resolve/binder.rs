use crate::{
    error::{CompileError, Result},
    settings::MemberLookup,
};
use expression_engine::eval_closed_expression;
use filter_syntax::input::{FilterInput, clauses_from_value, decode_sort};
use model::{
    core::{data_type::DataType, value::Value},
    expr::Expr,
    query::{
        filter::FilterClause,
        pagination::PaginationSpec,
        sort::{SortDirection, SortSpec},
    },
    schema::field::{ArgumentDescriptor, ArgumentType, ArgumentValues, SchemaField},
};
use std::collections::BTreeMap;
use tracing::{trace, warn};

/// Argument values of one field invocation, split into the holder record the
/// template reads and the query-shaping arguments the planner compiles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundArguments {
    pub holder: BTreeMap<String, Value>,
    pub clauses: Vec<FilterClause>,
    pub sort: Option<SortSpec>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl BoundArguments {
    pub fn pagination(&self) -> PaginationSpec {
        PaginationSpec::new(self.page, self.page_size)
    }

    pub fn holder_value(&self) -> Value {
        Value::Record(self.holder.clone())
    }
}

fn supplied_value<'a>(supplied: &'a ArgumentValues, name: &str, lookup: MemberLookup) -> Option<&'a Expr> {
    supplied.get(name).or_else(|| {
        supplied
            .iter()
            .find(|(key, _)| lookup.matches(key, name))
            .map(|(_, expr)| expr)
    })
}

/// Checks required arguments, evaluates supplied values and coerces them to
/// their declared types.
pub fn bind_arguments(
    field: &SchemaField,
    supplied: &ArgumentValues,
    lookup: MemberLookup,
) -> Result<BoundArguments> {
    for name in supplied.keys() {
        if !field.arguments.iter().any(|a| lookup.matches(&a.name, name)) {
            warn!(field = %field.name, argument = %name, "ignoring undeclared argument");
        }
    }

    let mut bound = BoundArguments::default();
    for argument in &field.arguments {
        let value = match supplied_value(supplied, &argument.name, lookup) {
            Some(expr) => Some(bind_supplied(field, argument, expr, &mut bound)?),
            None if argument.required => {
                return Err(CompileError::MissingRequiredArgument {
                    field: field.name.clone(),
                    argument: argument.name.clone(),
                });
            }
            None => None,
        };
        let value = value
            .or_else(|| argument.default.clone())
            .unwrap_or_else(|| absent_value(&argument.kind));
        trace!(field = %field.name, argument = %argument.name, %value, "bound argument");
        bound.holder.insert(argument.name.clone(), value);
    }
    Ok(bound)
}

fn absent_value(kind: &ArgumentType) -> Value {
    match kind {
        ArgumentType::FilterQuery => filter_holder(Value::Null),
        _ => Value::Null,
    }
}

/// `{hasValue, query}` where `query` is the filter exactly as supplied.
fn filter_holder(raw: Value) -> Value {
    let raw = match raw {
        Value::Json(serde_json::Value::Null) => Value::Null,
        other => other,
    };
    Value::record([("hasValue", Value::Boolean(!raw.is_null())), ("query", raw)])
}

fn bind_supplied(
    field: &SchemaField,
    argument: &ArgumentDescriptor,
    expr: &Expr,
    bound: &mut BoundArguments,
) -> Result<Value> {
    match &argument.kind {
        ArgumentType::Value(data_type) => coerce(argument, eval_closed_expression(expr)?, data_type),
        ArgumentType::FilterQuery => {
            // clauses are compiled from the raw constant, never evaluated into the holder
            let raw = match expr {
                Expr::Constant { value, .. } => value.clone(),
                other => eval_closed_expression(other)?,
            };
            bound.clauses = clauses_from_value(&raw)?
                .iter()
                .map(FilterInput::to_clause)
                .collect();
            trace!(field = %field.name, clauses = bound.clauses.len(), "bound filter argument");
            Ok(filter_holder(raw))
        }
        ArgumentType::Sort => {
            let spec = decode_sort(&eval_closed_expression(expr)?.to_json())?;
            let value = match &spec {
                Some(spec) => sort_holder(spec),
                None => Value::Null,
            };
            bound.sort = spec;
            Ok(value)
        }
        ArgumentType::Page => {
            let value = coerce(argument, eval_closed_expression(expr)?, &DataType::Int)?;
            bound.page = value.as_i64();
            Ok(value)
        }
        ArgumentType::PageSize => {
            let value = coerce(argument, eval_closed_expression(expr)?, &DataType::Int)?;
            bound.page_size = value.as_i64();
            Ok(value)
        }
    }
}

fn sort_holder(spec: &SortSpec) -> Value {
    let field = spec
        .field
        .as_ref()
        .map(|f| Value::String(f.to_string()))
        .unwrap_or(Value::Null);
    let direction = match spec.direction {
        SortDirection::Ascending => "ASC",
        SortDirection::Descending => "DESC",
    };
    Value::record([("field", field), ("direction", Value::from(direction))])
}

fn coerce(argument: &ArgumentDescriptor, value: Value, target: &DataType) -> Result<Value> {
    value
        .coerce_to(target)
        .ok_or_else(|| CompileError::TypeCoercion {
            field: argument.name.clone(),
            value: value.to_text(),
            target: target.to_string(),
        })
}
