use filter_syntax::{
    error::SyntaxError,
    input::{decode_clauses, decode_filters},
    issues::ClauseIssueKind,
};
use model::query::filter::{ComparisonOp, Conjunction, LiteralValue};
use serde_json::json;

#[test]
fn test_decode_clause_list_in_order() {
    let clauses = decode_clauses(&json!([
        { "field": "name", "equals": "Ada" },
        { "field": "age", "conjunction": "OR", "lessThan": "10" },
        { "field": "email", "conjunction": "AND", "isNull": true },
    ]))
    .unwrap();

    assert_eq!(clauses.len(), 3);
    assert_eq!(clauses[0].conjunction, Conjunction::And);
    assert_eq!(clauses[0].comparison, Some(ComparisonOp::Equals));
    assert_eq!(clauses[0].literal, LiteralValue::Text("Ada".into()));
    assert_eq!(clauses[1].conjunction, Conjunction::Or);
    assert_eq!(clauses[1].comparison, Some(ComparisonOp::LessThan));
    assert_eq!(clauses[2].literal, LiteralValue::Flag(true));
}

#[test]
fn test_membership_sets_decode() {
    let clauses = decode_clauses(&json!([
        { "field": "name", "in": ["Ada", "Grace"] },
        { "field": "id", "notIn": [1, 2] },
    ]))
    .unwrap();

    assert_eq!(
        clauses[0].literal,
        LiteralValue::TextSet(vec!["Ada".into(), "Grace".into()])
    );
    assert_eq!(clauses[1].comparison, Some(ComparisonOp::NotIn));
    assert_eq!(
        clauses[1].literal,
        LiteralValue::TextSet(vec!["1".into(), "2".into()])
    );
}

#[test]
fn test_two_operators_leave_comparison_absent() {
    let json = json!([{ "field": "age", "equals": "5", "greaterThan": "3" }]);
    let inputs = decode_filters(&json).unwrap();

    assert_eq!(
        inputs[0].defect(),
        Some(ClauseIssueKind::MultipleComparisons {
            operators: vec![ComparisonOp::Equals, ComparisonOp::GreaterThan],
        })
    );
    let clause = inputs[0].to_clause();
    assert!(clause.comparison.is_none());
    assert!(!clause.is_valid());
}

#[test]
fn test_clause_without_operator_or_field() {
    let inputs = decode_filters(&json!([{ "field": "age" }, { "equals": "1" }])).unwrap();
    assert_eq!(inputs[0].defect(), Some(ClauseIssueKind::NoComparison));
    assert_eq!(inputs[1].defect(), Some(ClauseIssueKind::MissingField));
}

#[test]
fn test_null_filter_is_empty() {
    assert!(decode_clauses(&serde_json::Value::Null).unwrap().is_empty());
}

#[test]
fn test_unknown_attribute_is_malformed() {
    let err = decode_filters(&json!([{ "field": "age", "like": "A%" }])).unwrap_err();
    assert!(matches!(err, SyntaxError::Malformed { what: "filter clause", .. }));
}

#[test]
fn test_non_list_filter_is_rejected() {
    let err = decode_filters(&json!({ "field": "age" })).unwrap_err();
    assert!(matches!(err, SyntaxError::UnexpectedShape { what: "filter", .. }));
}
