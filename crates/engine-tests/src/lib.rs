#![allow(dead_code)]

use chrono::NaiveDate;
use model::{
    core::{data_type::DataType, value::Value},
    expr::{Expr, ExprType, Lambda, Parameter},
    schema::{
        field::{SchemaField, TypeRef},
        registry::{Schema, SchemaBuilder},
        types::TypeDescriptor,
    },
};

pub mod integration;
pub mod utils;

fn scalar(data_type: DataType) -> ExprType {
    ExprType::Scalar(data_type)
}

/// `Query { people: [Person] }` with the generated `person(id)` lookup and
/// `peopleFilterQuery(filter, sort, page, pageSize)` fields.
pub fn people_schema() -> Schema {
    let mut builder = SchemaBuilder::new("Query");
    builder
        .add_type(
            TypeDescriptor::new("Query")
                .with_member("people", ExprType::sequence_of(ExprType::object("Person"))),
        )
        .expect("query type");
    builder
        .add_type(
            TypeDescriptor::new("Person")
                .with_description("Someone in the directory")
                .with_member("id", scalar(DataType::Int))
                .with_member("name", scalar(DataType::String))
                .with_member("age", scalar(DataType::Int))
                .with_member("born", scalar(DataType::Date))
                .with_member("email", scalar(DataType::String))
                .with_member("owner", ExprType::object("Owner"))
                .with_member("pets", ExprType::sequence_of(ExprType::object("Pet"))),
        )
        .expect("person type");
    builder
        .add_type(TypeDescriptor::new("Owner").with_member("name", scalar(DataType::String)))
        .expect("owner type");
    builder
        .add_type(TypeDescriptor::new("Pet").with_member("name", scalar(DataType::String)))
        .expect("pet type");

    let ctx = Parameter::new("ctx", ExprType::object("Query"));
    let people = Expr::member(
        ctx.expr(),
        "people",
        ExprType::sequence_of(ExprType::object("Person")),
    );
    builder
        .add_query_field(
            SchemaField::new("people", Lambda::new(vec![ctx], people), TypeRef::list("Person"))
                .with_description("Everyone in the directory"),
        )
        .expect("people field");
    builder.add_id_lookup_field("people", "person").expect("lookup field");
    builder.add_filter_query_field("people").expect("filter query field");
    builder.build().expect("schema")
}

fn person(id: i64, name: &str, age: i64, born: (i32, u32, u32), email: Option<&str>, owner: &str) -> Value {
    let born = NaiveDate::from_ymd_opt(born.0, born.1, born.2).expect("valid date");
    Value::record([
        ("id", Value::Int(id)),
        ("name", Value::from(name)),
        ("age", Value::Int(age)),
        ("born", Value::Date(born)),
        ("email", email.map(Value::from).unwrap_or(Value::Null)),
        ("owner", Value::record([("name", Value::from(owner))])),
        ("pets", Value::List(Vec::new())),
    ])
}

/// Root object the in-memory provider queries.
pub fn directory() -> Value {
    Value::record([(
        "people",
        Value::List(vec![
            person(1, "Ada", 36, (1815, 12, 10), Some("ada@example.com"), "Byron"),
            person(2, "Grace", 45, (1906, 12, 9), Some("grace@example.com"), "Hopper"),
            person(3, "Linus", 9, (1969, 12, 28), Some("linus@example.com"), "Torvalds"),
            person(4, "Barbara", 10, (1939, 11, 7), Some("barbara@example.com"), "Liskov"),
            person(5, "Alan", 41, (1912, 6, 23), None, "Turing"),
        ]),
    )])
}
