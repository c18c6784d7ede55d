use filter_syntax::input::{decode_page, decode_sort};
use model::query::sort::SortDirection;
use serde_json::json;

#[test]
fn test_decode_sort_with_field() {
    let sort = decode_sort(&json!({ "field": "age", "direction": "DESC" }))
        .unwrap()
        .unwrap();
    assert_eq!(sort.field.as_ref().map(|f| f.as_str()), Some("age"));
    assert_eq!(sort.direction, SortDirection::Descending);
}

#[test]
fn test_decode_sort_defaults_to_ascending_without_field() {
    let sort = decode_sort(&json!({})).unwrap().unwrap();
    assert!(sort.field.is_none());
    assert_eq!(sort.direction, SortDirection::Ascending);
    assert!(decode_sort(&serde_json::Value::Null).unwrap().is_none());
}

#[test]
fn test_decode_page() {
    let page = decode_page(&json!({ "page": 2, "pageSize": 10 })).unwrap();
    assert_eq!(page.skip(), 10);
    assert_eq!(page.take(), Some(10));

    let unlimited = decode_page(&json!({ "pageSize": 0 })).unwrap();
    assert_eq!(unlimited.take(), None);
}

#[test]
fn test_malformed_page_is_reported() {
    assert!(decode_page(&json!({ "page": "two" })).is_err());
}
