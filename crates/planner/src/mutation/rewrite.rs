use super::shape::MutationShape;
use crate::error::{CompileError, Result};
use expression_engine::eval_closed_expression;
use model::{
    core::value::Value,
    expr::{Expr, ExprType, Parameter, SequenceOp, bound::BoundExpr},
    mutation::MutationResult,
    selection::SelectionTree,
};
use tracing::debug;

/// Splices `selection` into a mutation result so the projection runs before
/// any single-result operator.
pub fn rewrite_mutation(result: &MutationResult, selection: &SelectionTree) -> Result<BoundExpr> {
    let select = |source: Expr| {
        Expr::call(
            SequenceOp::Select,
            source,
            vec![Expr::Lambda(selection.as_lambda())],
        )
    };
    let lambda = match result {
        MutationResult::Value(value) if ExprType::of_value(value).is_sequence() => {
            debug!(value = %value, "projecting materialized mutation result");
            let mut bound = BoundExpr::new(None, select(Expr::constant(value.clone())));
            bound.constants.extend(selection.constants.iter().cloned());
            return Ok(bound);
        }
        MutationResult::Value(value) => return Ok(bind_selection(None, selection, value.clone())),
        MutationResult::Expression(lambda) => lambda,
    };
    let context = lambda.param(0).cloned();
    let shape = MutationShape::classify(&lambda.body);
    debug!(shape = shape.name(), body = %lambda.body, "rewriting mutation result");

    let expression = match shape {
        MutationShape::Sequence(body) => select(body.clone()),
        MutationShape::Terminal { op, source, filter } => {
            let source = match filter {
                Some(filter) => Expr::call(
                    SequenceOp::Where,
                    source.clone(),
                    vec![Expr::Lambda(filter.clone())],
                ),
                None => source.clone(),
            };
            Expr::call(op, select(source), vec![])
        }
        MutationShape::MemberOnConstant(body) => {
            let value = eval_closed_expression(body)?;
            return Ok(bind_selection(context, selection, value));
        }
        MutationShape::Constant(value) => {
            return Ok(bind_selection(context, selection, value.clone()));
        }
        MutationShape::Unsupported => {
            return Err(CompileError::UnsupportedMutationShape {
                shape: lambda.body.to_string(),
            });
        }
    };

    let mut bound = BoundExpr::new(context, expression);
    bound.constants.extend(selection.constants.iter().cloned());
    Ok(bound)
}

/// The selection body with its element parameter bound to `value`.
fn bind_selection(context: Option<Parameter>, selection: &SelectionTree, value: Value) -> BoundExpr {
    let mut bound = BoundExpr::new(context, selection.body.clone())
        .with_constant(selection.param.clone(), value);
    bound.constants.extend(selection.constants.iter().cloned());
    bound
}

#[cfg(test)]
mod tests {
    use super::*;
    use expression_engine::{InMemoryProvider, QueryProvider};
    use model::{
        core::data_type::DataType,
        expr::{BinaryOp, ExprType, Lambda},
    };

    fn person() -> ExprType {
        ExprType::object("Person")
    }

    fn people(ctx: &Parameter) -> Expr {
        Expr::member(ctx.expr(), "people", ExprType::sequence_of(person()))
    }

    fn name_selection() -> SelectionTree {
        let e = Parameter::new("e", person());
        SelectionTree::new(
            e.clone(),
            Expr::member(e.expr(), "name", ExprType::Scalar(DataType::String)),
        )
    }

    fn id_is(id: i64) -> Lambda {
        let p = Parameter::new("p", person());
        Lambda::new(
            vec![p.clone()],
            Expr::binary(
                Expr::member(p.expr(), "id", ExprType::Scalar(DataType::Int)),
                BinaryOp::Equal,
                Expr::constant(Value::Int(id)),
            ),
        )
    }

    #[test]
    fn test_selection_goes_before_terminal_operator() {
        let ctx = Parameter::new("ctx", ExprType::object("Query"));
        let body = Expr::call(
            SequenceOp::First,
            Expr::call(SequenceOp::Where, people(&ctx), vec![Expr::Lambda(id_is(1))]),
            vec![],
        );
        let result = MutationResult::from(Lambda::new(vec![ctx.clone()], body));

        let bound = rewrite_mutation(&result, &name_selection()).unwrap();
        assert_eq!(
            bound.to_string(),
            "ctx.people.Where(p => (p.id == 1)).Select(e => e.name).First()"
        );
        assert_eq!(bound.unbound_parameters()[0].id, ctx.id);
    }

    #[test]
    fn test_inline_filter_moves_into_where() {
        let ctx = Parameter::new("ctx", ExprType::object("Query"));
        let body = Expr::call(SequenceOp::FirstOrDefault, people(&ctx), vec![Expr::Lambda(id_is(2))]);
        let result = MutationResult::from(Lambda::new(vec![ctx], body));

        let bound = rewrite_mutation(&result, &name_selection()).unwrap();
        assert_eq!(
            bound.to_string(),
            "ctx.people.Where(p => (p.id == 2)).Select(e => e.name).FirstOrDefault()"
        );
    }

    #[test]
    fn test_sequence_result_is_projected() {
        let ctx = Parameter::new("ctx", ExprType::object("Query"));
        let result = MutationResult::from(Lambda::new(vec![ctx.clone()], people(&ctx)));
        let bound = rewrite_mutation(&result, &name_selection()).unwrap();
        assert_eq!(bound.to_string(), "ctx.people.Select(e => e.name)");
    }

    #[test]
    fn test_constant_result_binds_selection() {
        let created = Value::record([("id", Value::Int(9)), ("name", Value::from("Ada"))]);
        let bound = rewrite_mutation(&MutationResult::from(created), &name_selection()).unwrap();
        assert!(bound.unbound_parameters().is_empty());

        let value = InMemoryProvider::new().execute(&bound, &Value::Null).unwrap();
        assert_eq!(value, Value::from("Ada"));
    }

    #[test]
    fn test_list_result_projects_each_element() {
        let created = Value::List(vec![
            Value::record([("id", Value::Int(1)), ("name", Value::from("Ada"))]),
            Value::record([("id", Value::Int(2)), ("name", Value::from("Bo"))]),
        ]);
        let bound = rewrite_mutation(&MutationResult::from(created), &name_selection()).unwrap();
        assert!(bound.context.is_none());
        assert!(bound.unbound_parameters().is_empty());

        let value = InMemoryProvider::new().execute(&bound, &Value::Null).unwrap();
        assert_eq!(value, Value::List(vec![Value::from("Ada"), Value::from("Bo")]));
    }

    #[test]
    fn test_member_on_constant_is_evaluated_eagerly() {
        let ctx = Parameter::new("ctx", ExprType::object("Query"));
        let created = Expr::constant(Value::record([(
            "person",
            Value::record([("name", Value::from("Grace"))]),
        )]));
        let body = Expr::member(created, "person", person());
        let result = MutationResult::from(Lambda::new(vec![ctx], body));

        let bound = rewrite_mutation(&result, &name_selection()).unwrap();
        let value = InMemoryProvider::new().execute(&bound, &Value::Null).unwrap();
        assert_eq!(value, Value::from("Grace"));
    }

    #[test]
    fn test_unsupported_shape_fails() {
        let ctx = Parameter::new("ctx", ExprType::object("Query"));
        let body = Expr::member(ctx.expr(), "count", ExprType::Scalar(DataType::Int));
        let result = MutationResult::from(Lambda::new(vec![ctx], body));
        let err = rewrite_mutation(&result, &name_selection()).unwrap_err();
        assert!(matches!(err, CompileError::UnsupportedMutationShape { .. }));
    }
}
