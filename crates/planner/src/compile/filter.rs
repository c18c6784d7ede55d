use super::{comparison::translate, members::MemberResolver};
use crate::{
    error::{CompileError, Result},
    settings::AmbiguousClausePolicy,
};
use filter_syntax::issues::{ClauseIssue, Severity};
use model::{
    expr::{Expr, ExprType, Lambda, Parameter},
    query::filter::{Conjunction, FilterClause},
};
use tracing::{debug, trace, warn};

/// A compiled filter predicate plus the clauses that were dropped on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledFilter {
    pub predicate: Lambda,
    pub issues: Vec<ClauseIssue>,
}

impl CompiledFilter {
    /// True when the predicate accepts every element.
    pub fn is_noop(&self) -> bool {
        self.predicate.body.is_true_constant()
    }
}

/// Folds an ordered clause list into one predicate over `element_type`.
///
/// Clauses are grouped left to right: an `OR` clause closes the running group
/// and starts a new one, an `AND` clause joins the running group. The result
/// is the disjunction of the groups, so `AND` binds tighter than `OR`. The
/// first clause's conjunction is ignored. An empty list compiles to `true`.
pub fn compile_filter(
    resolver: MemberResolver<'_>,
    clauses: &[FilterClause],
    element_type: &ExprType,
    policy: AmbiguousClausePolicy,
) -> Result<CompiledFilter> {
    let param = Parameter::new("p", element_type.clone());
    let mut issues = Vec::new();
    let mut groups: Vec<Expr> = Vec::new();
    let mut current: Option<Expr> = None;
    let severity = match policy {
        AmbiguousClausePolicy::Drop => Severity::Warning,
        AmbiguousClausePolicy::Reject => Severity::Error,
    };

    for (index, clause) in clauses.iter().enumerate() {
        if let Some(issue) = ClauseIssue::inspect(index, clause, severity) {
            if issue.is_error() {
                return Err(CompileError::AmbiguousFilterClause {
                    index,
                    reason: issue.message,
                });
            }
            warn!(index, clause = %clause, reason = %issue.message, "dropping filter clause");
            issues.push(issue);
            continue;
        }

        let Some(path) = clause.field.as_ref() else {
            continue;
        };
        resolver.check_filterable(element_type, path)?;
        let field = resolver.resolve_path(param.expr(), path)?;
        let condition = translate(&field, clause.comparison, &clause.literal)?;
        trace!(index, condition = %condition, "translated filter clause");

        current = Some(match (current.take(), clause.conjunction) {
            (None, _) => condition,
            (Some(running), Conjunction::And) => Expr::and(running, condition),
            (Some(running), Conjunction::Or) => {
                groups.push(running);
                condition
            }
        });
    }
    groups.extend(current);

    let body = groups
        .into_iter()
        .reduce(Expr::or)
        .unwrap_or_else(|| Expr::boolean(true));
    let predicate = Lambda::new(vec![param], body);
    debug!(predicate = %predicate, dropped = issues.len(), "compiled filter");

    Ok(CompiledFilter { predicate, issues })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compile::tests::fixture_schema, settings::MemberLookup};
    use expression_engine::{EvalContext, Evaluator};
    use filter_syntax::{input::decode_clauses, issues::ClauseIssueKind};
    use model::{
        core::value::Value,
        query::filter::{ComparisonOp, LiteralValue},
    };
    use proptest::prelude::*;
    use serde_json::json;
    use tracing_test::traced_test;

    fn person() -> ExprType {
        ExprType::object("Person")
    }

    fn compile(clauses: &[FilterClause]) -> Result<CompiledFilter> {
        let schema = fixture_schema();
        let resolver = MemberResolver::new(&schema, MemberLookup::IgnoreAsciiCase);
        compile_filter(resolver, clauses, &person(), AmbiguousClausePolicy::Drop)
    }

    fn accepts(filter: &CompiledFilter, element: Value) -> bool {
        let ctx = EvalContext::new().with_binding(&filter.predicate.params[0], element);
        filter.predicate.body.evaluate(&ctx).unwrap() == Value::Boolean(true)
    }

    #[test]
    fn test_empty_list_accepts_everything() {
        let filter = compile(&[]).unwrap();
        assert!(filter.is_noop());
        assert_eq!(filter.predicate.to_string(), "p => true");
    }

    #[test]
    fn test_and_binds_tighter_than_or() {
        let clauses = [
            FilterClause::text("age", ComparisonOp::Equals, "1"),
            FilterClause::text("name", ComparisonOp::Equals, "Ada").or(),
            FilterClause::text("age", ComparisonOp::Equals, "36").and(),
        ];
        let filter = compile(&clauses).unwrap();
        assert_eq!(
            filter.predicate.to_string(),
            "p => ((p.age == 1) || ((p.name == \"Ada\") && (p.age == 36)))"
        );

        let ada = Value::record([("name", Value::from("Ada")), ("age", Value::Int(36))]);
        let young_ada = Value::record([("name", Value::from("Ada")), ("age", Value::Int(12))]);
        let one = Value::record([("name", Value::from("Bo")), ("age", Value::Int(1))]);
        assert!(accepts(&filter, ada));
        assert!(!accepts(&filter, young_ada));
        assert!(accepts(&filter, one));
    }

    #[traced_test]
    #[test]
    fn test_ambiguous_clause_is_dropped_with_issue() {
        let mut two_ops = FilterClause::text("age", ComparisonOp::Equals, "5");
        two_ops.comparison = None;
        two_ops.literal = LiteralValue::Absent;
        let clauses = [two_ops, FilterClause::text("name", ComparisonOp::Equals, "Ada")];

        let filter = compile(&clauses).unwrap();
        assert_eq!(filter.predicate.to_string(), "p => (p.name == \"Ada\")");
        assert_eq!(filter.issues.len(), 1);
        assert_eq!(filter.issues[0].index, 0);
        assert_eq!(filter.issues[0].kind, ClauseIssueKind::NoComparison);
        assert!(logs_contain("dropping filter clause"));
    }

    #[traced_test]
    #[test]
    fn test_clause_with_two_operators_matches_first_clause_alone() {
        let both = decode_clauses(&json!([
            { "field": "age", "equals": "5" },
            { "field": "age", "equals": "5", "greaterThan": "3" }
        ]))
        .unwrap();
        let first = decode_clauses(&json!([{ "field": "age", "equals": "5" }])).unwrap();

        let filter = compile(&both).unwrap();
        assert_eq!(
            filter.predicate.to_string(),
            compile(&first).unwrap().predicate.to_string()
        );
        assert_eq!(filter.issues.len(), 1);
        assert_eq!(filter.issues[0].index, 1);
        assert_eq!(
            filter.issues[0].kind,
            ClauseIssueKind::MultipleComparisons {
                operators: vec![ComparisonOp::Equals, ComparisonOp::GreaterThan],
            }
        );
        assert!(logs_contain("dropping filter clause"));
        assert!(logs_contain("equals, greaterThan"));

        let five = Value::record([("age", Value::Int(5))]);
        let six = Value::record([("age", Value::Int(6))]);
        assert!(accepts(&filter, five));
        assert!(!accepts(&filter, six));
    }

    #[traced_test]
    #[test]
    fn test_ambiguous_clause_rejected_under_strict_policy() {
        let schema = fixture_schema();
        let resolver = MemberResolver::new(&schema, MemberLookup::IgnoreAsciiCase);
        let clauses = [FilterClause::default()];
        let err = compile_filter(resolver, &clauses, &person(), AmbiguousClausePolicy::Reject).unwrap_err();
        assert!(matches!(err, CompileError::AmbiguousFilterClause { index: 0, .. }));
        assert!(!logs_contain("dropping filter clause"));
    }

    #[test]
    fn test_numeric_ordering_is_not_lexical() {
        let filter = compile(&[FilterClause::text("age", ComparisonOp::LessThan, "10")]).unwrap();
        assert!(accepts(&filter, Value::record([("age", Value::Int(9))])));
        assert!(!accepts(&filter, Value::record([("age", Value::Int(10))])));
    }

    #[test]
    fn test_unknown_field_fails() {
        let err = compile(&[FilterClause::text("height", ComparisonOp::Equals, "1")]).unwrap_err();
        assert!(matches!(err, CompileError::UnknownField { .. }));
    }

    #[test]
    fn test_sequence_member_is_not_filterable() {
        let err = compile(&[FilterClause::is_null("pets", true)]).unwrap_err();
        match err {
            CompileError::UnknownField { type_name, .. } => assert_eq!(type_name, "PersonFilterEnum"),
            other => panic!("unexpected error: {other}"),
        }
    }

    fn ordering_op() -> impl Strategy<Value = ComparisonOp> {
        prop_oneof![
            Just(ComparisonOp::Equals),
            Just(ComparisonOp::NotEqualTo),
            Just(ComparisonOp::GreaterThan),
            Just(ComparisonOp::GreaterThanOrEqualTo),
            Just(ComparisonOp::LessThan),
            Just(ComparisonOp::LessThanOrEqualTo),
        ]
    }

    proptest! {
        #[test]
        fn all_and_clauses_match_only_when_each_does(
            conditions in prop::collection::vec((ordering_op(), -50i64..50), 1..6),
            age in -60i64..60,
        ) {
            let clauses: Vec<_> = conditions
                .iter()
                .map(|(op, bound)| FilterClause::text("age", *op, bound.to_string()))
                .collect();
            let element = Value::record([("age", Value::Int(age))]);

            let combined = compile(&clauses).unwrap();
            let each = clauses
                .iter()
                .all(|clause| accepts(&compile(std::slice::from_ref(clause)).unwrap(), element.clone()));

            prop_assert_eq!(accepts(&combined, element), each);
        }
    }
}
