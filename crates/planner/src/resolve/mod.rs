mod binder;

pub use binder::{BoundArguments, bind_arguments};

use crate::{
    compile::{bundle::compile_bundle, members::MemberResolver},
    error::Result,
    settings::AmbiguousClausePolicy,
};
use model::{
    expr::{Expr, Parameter, bound::BoundExpr},
    schema::field::{ArgumentValues, SchemaField},
};
use tracing::{debug, warn};

/// Binds `supplied` into the field's template and re-parents it onto `context`.
///
/// The argument holder is closed over as a bound constant, so the only free
/// variables of the result are those of `context`. A sequence-valued field
/// with filter, sort or page arguments gets them applied in that order.
pub fn resolve_field(
    resolver: MemberResolver<'_>,
    policy: AmbiguousClausePolicy,
    field: &SchemaField,
    supplied: &ArgumentValues,
    context: &Expr,
) -> Result<BoundExpr> {
    let arguments = bind_arguments(field, supplied, resolver.lookup())?;

    let mut body = field.body().clone();
    let mut holder = None;
    if let Some(args) = field.args_param() {
        let param = Parameter::new(args.name.clone(), field.holder_type());
        body = body.replace_parameter(&args.id, &param.expr());
        holder = Some(param);
    }

    if field.has_query_arguments() {
        let body_type = body.ty();
        match body_type.element_type() {
            Some(element_type) => {
                let bundle = compile_bundle(
                    resolver,
                    policy,
                    &arguments.clauses,
                    arguments.sort.as_ref(),
                    arguments.pagination(),
                    element_type,
                )?;
                body = bundle.apply(body);
            }
            None => warn!(field = %field.name, ty = %body_type, "query arguments on a non-sequence field"),
        }
    }

    let mut bound = BoundExpr::new(field.context_param().cloned(), body);
    if let Some(param) = holder {
        bound = bound.with_constant(param, arguments.holder_value());
    }
    let bound = bound.substitute_context(context);
    debug!(field = %field.name, expression = %bound, "resolved field");
    Ok(bound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compile::tests::fixture_schema, error::CompileError, settings::MemberLookup};
    use model::{core::value::Value, expr::ExprType};
    use serde_json::json;

    fn db() -> Parameter {
        Parameter::new("db", ExprType::object("Query"))
    }

    #[test]
    fn test_bound_field_only_leaves_context_free() {
        let schema = fixture_schema();
        let resolver = MemberResolver::new(&schema, MemberLookup::IgnoreAsciiCase);
        let field = schema.query_field("person").unwrap();
        let db = db();
        let supplied = ArgumentValues::from([("id".to_string(), Expr::constant(Value::Int(2)))]);

        let bound = resolve_field(resolver, AmbiguousClausePolicy::Drop, field, &supplied, &db.expr()).unwrap();
        assert_eq!(
            bound.to_string(),
            "db.people.Where(x => (x.id == args.id)).First()"
        );
        let unbound = bound.unbound_parameters();
        assert_eq!(unbound.len(), 1);
        assert_eq!(unbound[0].id, db.id);
        assert_eq!(bound.context.map(|p| p.id), Some(db.id));
    }

    #[test]
    fn test_missing_required_argument_fails() {
        let schema = fixture_schema();
        let resolver = MemberResolver::new(&schema, MemberLookup::IgnoreAsciiCase);
        let field = schema.query_field("person").unwrap();
        let err = resolve_field(
            resolver,
            AmbiguousClausePolicy::Drop,
            field,
            &ArgumentValues::new(),
            &db().expr(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CompileError::MissingRequiredArgument { ref field, ref argument } if field == "person" && argument == "id"
        ));
    }

    #[test]
    fn test_filter_query_applies_bundle() {
        let schema = fixture_schema();
        let resolver = MemberResolver::new(&schema, MemberLookup::IgnoreAsciiCase);
        let field = schema.query_field("peopleFilterQuery").unwrap();
        let supplied = ArgumentValues::from([
            (
                "filter".to_string(),
                Expr::constant(Value::Json(json!([{ "field": "age", "greaterThan": "20" }]))),
            ),
            (
                "sort".to_string(),
                Expr::constant(Value::Json(json!({ "field": "age", "direction": "DESC" }))),
            ),
            ("page".to_string(), Expr::constant(Value::Int(2))),
            ("pageSize".to_string(), Expr::constant(Value::Int(1))),
        ]);

        let bound = resolve_field(resolver, AmbiguousClausePolicy::Drop, field, &supplied, &db().expr()).unwrap();
        assert_eq!(
            bound.to_string(),
            "db.people.Where(p => (Compare(p.age, 20) > 0)).OrderByDescending(s => s.age).Skip(1).Take(1)"
        );
        assert_eq!(bound.unbound_parameters().len(), 1);
    }

    #[test]
    fn test_context_can_be_any_expression() {
        let schema = fixture_schema();
        let resolver = MemberResolver::new(&schema, MemberLookup::IgnoreAsciiCase);
        let field = schema.query_field("people").unwrap();
        let root = Parameter::new("root", ExprType::Record(vec![("data".into(), ExprType::object("Query"))]));
        let context = Expr::member(root.expr(), "data", ExprType::object("Query"));

        let bound = resolve_field(
            resolver,
            AmbiguousClausePolicy::Drop,
            field,
            &ArgumentValues::new(),
            &context,
        )
        .unwrap();
        assert_eq!(bound.to_string(), "root.data.people");
        assert_eq!(bound.context.map(|p| p.id), Some(root.id));
    }
}
