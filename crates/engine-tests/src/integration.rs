#[cfg(test)]
mod tests {
    use crate::{
        directory, people_schema,
        utils::{args, json_arg, names, query, resolve, root, run},
    };
    use expression_engine::{InMemoryProvider, QueryProvider};
    use model::{
        core::{data_type::DataType, value::Value},
        expr::{BinaryOp, Expr, ExprType, Lambda, Parameter, SequenceOp},
        mutation::MutationResult,
        selection::SelectionTree,
    };
    use planner::{
        CompileError, QueryCompiler,
        settings::{AmbiguousClausePolicy, CompileSettings},
    };
    use serde_json::json;
    use tracing_test::traced_test;

    // Scenario: no arguments on the filter query field.
    // Expected Outcome: every person, in source order.
    #[traced_test]
    #[test]
    fn tc01() {
        let result = query("peopleFilterQuery", &args([]));
        assert_eq!(names(&result), vec!["Ada", "Grace", "Linus", "Barbara", "Alan"]);
    }

    // Scenario: `age > 40 OR name == Ada AND age == 36`.
    // Expected Outcome: AND binds tighter, so Ada plus everyone over 40.
    #[traced_test]
    #[test]
    fn tc02() {
        let filter = json!([
            { "field": "age", "greaterThan": "40" },
            { "field": "name", "equals": "Ada", "conjunction": "OR" },
            { "field": "age", "equals": 36, "conjunction": "AND" }
        ]);
        let result = query("peopleFilterQuery", &args([("filter", json_arg(filter))]));
        assert_eq!(names(&result), vec!["Ada", "Grace", "Alan"]);
    }

    // Scenario: `age < "10"` against an integer field.
    // Expected Outcome: compared as numbers, so only the nine-year-old matches.
    #[traced_test]
    #[test]
    fn tc03() {
        let filter = json!([{ "field": "age", "lessThan": "10" }]);
        let result = query("peopleFilterQuery", &args([("filter", json_arg(filter))]));
        assert_eq!(names(&result), vec!["Linus"]);
    }

    // Scenario: sorted by age, second page of two.
    // Expected Outcome: skips the two youngest and yields the next two.
    #[traced_test]
    #[test]
    fn tc04() {
        let result = query(
            "peopleFilterQuery",
            &args([
                ("sort", json_arg(json!({ "field": "age", "direction": "ASC" }))),
                ("page", Value::Int(2)),
                ("pageSize", Value::Int(2)),
            ]),
        );
        assert_eq!(names(&result), vec!["Ada", "Alan"]);
    }

    // Scenario: page size of zero.
    // Expected Outcome: no take limit; the page offset is zero as well.
    #[traced_test]
    #[test]
    fn tc05() {
        let result = query(
            "peopleFilterQuery",
            &args([("page", Value::Int(3)), ("pageSize", Value::Int(0))]),
        );
        assert_eq!(names(&result).len(), 5);
    }

    // Scenario: descending sort without a field.
    // Expected Outcome: source order reversed.
    #[traced_test]
    #[test]
    fn tc06() {
        let result = query(
            "peopleFilterQuery",
            &args([("sort", json_arg(json!({ "direction": "DESC" })))]),
        );
        assert_eq!(names(&result), vec!["Alan", "Barbara", "Linus", "Grace", "Ada"]);
    }

    // Scenario: one clause sets two comparisons, the other is valid.
    // Expected Outcome: the ambiguous clause is dropped with a warning.
    #[traced_test]
    #[test]
    fn tc07() {
        let filter = json!([
            { "field": "age", "equals": "9", "greaterThan": "1" },
            { "field": "name", "equals": "Grace" }
        ]);
        let result = query("peopleFilterQuery", &args([("filter", json_arg(filter))]));
        assert_eq!(names(&result), vec!["Grace"]);
        assert!(logs_contain("dropping filter clause"));
    }

    // Test Settings: ambiguous_clauses = reject.
    // Expected Outcome: the same filter fails instead of being pruned.
    #[traced_test]
    #[test]
    fn tc08() {
        let schema = people_schema();
        let settings = CompileSettings::from_json_str(r#"{ "ambiguous_clauses": "reject" }"#).unwrap();
        assert_eq!(settings.ambiguous_clauses, AmbiguousClausePolicy::Reject);
        let compiler = QueryCompiler::new(&schema).with_settings(settings);
        let filter = json!([{ "field": "age", "equals": "9", "greaterThan": "1" }]);

        let err = compiler
            .resolve_field(
                "Query",
                "peopleFilterQuery",
                &args([("filter", json_arg(filter))]),
                &root().expr(),
            )
            .unwrap_err();
        assert!(matches!(err, CompileError::AmbiguousFilterClause { index: 0, .. }));
    }

    // Scenario: membership and null checks.
    // Expected Outcome: `in` tests the text form of the age; `isNull` finds the missing email.
    #[traced_test]
    #[test]
    fn tc09() {
        let filter = json!([{ "field": "age", "in": [9, "45"] }]);
        let result = query("peopleFilterQuery", &args([("filter", json_arg(filter))]));
        assert_eq!(names(&result), vec!["Grace", "Linus"]);

        let filter = json!([{ "field": "email", "isNull": true }]);
        let result = query("peopleFilterQuery", &args([("filter", json_arg(filter))]));
        assert_eq!(names(&result), vec!["Alan"]);

        let filter = json!([{ "field": "name", "notIn": ["Ada", "Alan"] }]);
        let result = query("peopleFilterQuery", &args([("filter", json_arg(filter))]));
        assert_eq!(names(&result), vec!["Grace", "Linus", "Barbara"]);
    }

    // Scenario: date ordering and a nested member path.
    // Expected Outcome: both filters are typed against the declared member types.
    #[traced_test]
    #[test]
    fn tc10() {
        let filter = json!([{ "field": "born", "greaterThanOrEqualTo": "1939-11-07" }]);
        let result = query("peopleFilterQuery", &args([("filter", json_arg(filter))]));
        assert_eq!(names(&result), vec!["Linus", "Barbara"]);

        let schema = people_schema();
        let compiler = QueryCompiler::new(&schema);
        let clauses = filter_syntax::input::decode_clauses(&json!([
            { "field": "owner.name", "equals": "Turing" }
        ]))
        .unwrap();
        let bundle = compiler
            .compile_filter_sort_page(&clauses, None, Default::default(), &ExprType::object("Person"))
            .unwrap();
        let db = root();
        let people = Expr::member(
            db.expr(),
            "people",
            ExprType::sequence_of(ExprType::object("Person")),
        );
        let bound = model::expr::bound::BoundExpr::new(Some(db), bundle.apply(people));
        assert_eq!(names(&run(&bound)), vec!["Alan"]);
    }

    // Scenario: id lookup with the id supplied as text.
    // Expected Outcome: coerced to the declared integer type; only the context stays free.
    #[traced_test]
    #[test]
    fn tc11() {
        let schema = people_schema();
        let bound = resolve(&schema, "person", &args([("id", Value::from("4"))])).unwrap();
        assert_eq!(bound.unbound_parameters().len(), 1);
        assert_eq!(bound.to_string(), "db.people.Where(x => (x.id == args.id)).First()");

        let person = run(&bound);
        assert_eq!(person.get("name"), Some(&Value::from("Barbara")));
    }

    // Scenario: id lookup without its required argument.
    // Expected Outcome: the error names the field and the argument.
    #[traced_test]
    #[test]
    fn tc12() {
        let schema = people_schema();
        let err = resolve(&schema, "person", &args([])).unwrap_err();
        assert_eq!(err.to_string(), "Field 'person' missing required argument 'id'");
    }

    // Scenario: malformed filter and an undeclared argument.
    // Expected Outcome: the wire error surfaces; the unknown argument is only logged.
    #[traced_test]
    #[test]
    fn tc13() {
        let schema = people_schema();
        let err = resolve(
            &schema,
            "peopleFilterQuery",
            &args([("filter", json_arg(json!({ "field": "age" })))]),
        )
        .unwrap_err();
        assert!(matches!(err, CompileError::Syntax(_)));

        let result = query("peopleFilterQuery", &args([("limit", Value::Int(1))]));
        assert_eq!(names(&result).len(), 5);
        assert!(logs_contain("ignoring undeclared argument"));
    }

    // Scenario: a mutation returns `ctx.people.Where(p => p.id == 2).First()`.
    // Expected Outcome: the selection runs before `First` and yields the projected record.
    #[traced_test]
    #[test]
    fn tc14() {
        let schema = people_schema();
        let compiler = QueryCompiler::new(&schema);
        let ctx = Parameter::new("ctx", ExprType::object("Query"));
        let p = Parameter::new("p", ExprType::object("Person"));
        let people = Expr::member(
            ctx.expr(),
            "people",
            ExprType::sequence_of(ExprType::object("Person")),
        );
        let by_id = Expr::lambda(
            vec![p.clone()],
            Expr::binary(
                Expr::member(p.expr(), "id", ExprType::Scalar(DataType::Int)),
                BinaryOp::Equal,
                Expr::constant(Value::Int(2)),
            ),
        );
        let body = Expr::call(
            SequenceOp::First,
            Expr::call(SequenceOp::Where, people, vec![by_id]),
            vec![],
        );
        let result = MutationResult::from(Lambda::new(vec![ctx], body));
        let e = Parameter::new("e", ExprType::object("Person"));
        let selection = SelectionTree::fields(
            e,
            &[
                ("name", ExprType::Scalar(DataType::String)),
                ("age", ExprType::Scalar(DataType::Int)),
            ],
        );

        let bound = compiler
            .rewrite_mutation_onto(&result, &selection, &root().expr())
            .unwrap();
        assert_eq!(
            bound.to_string(),
            "db.people.Where(p => (p.id == 2)).Select(e => new {name = e.name, age = e.age}).First()"
        );
        assert_eq!(
            run(&bound),
            Value::record([("name", Value::from("Grace")), ("age", Value::Int(45))])
        );
    }

    // Scenario: a mutation returns the created object itself.
    // Expected Outcome: the selection is evaluated over that value, with no query.
    #[traced_test]
    #[test]
    fn tc15() {
        let schema = people_schema();
        let compiler = QueryCompiler::new(&schema);
        let created = Value::record([("id", Value::Int(6)), ("name", Value::from("Edsger"))]);
        let e = Parameter::new("e", ExprType::object("Person"));
        let selection = SelectionTree::fields(e, &[("name", ExprType::Scalar(DataType::String))]);

        let bound = compiler
            .rewrite_mutation(&MutationResult::from(created), &selection)
            .unwrap();
        assert!(bound.unbound_parameters().is_empty());
        let value = InMemoryProvider::new().execute(&bound, &directory()).unwrap();
        assert_eq!(value, Value::record([("name", Value::from("Edsger"))]));
    }
}
