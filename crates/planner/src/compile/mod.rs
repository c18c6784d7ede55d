pub mod bundle;
pub mod comparison;
pub mod filter;
pub mod members;
pub mod pagination;
pub mod sort;

#[cfg(test)]
pub(crate) mod tests {
    use model::{
        core::data_type::DataType,
        expr::{Expr, ExprType, Lambda, Parameter},
        schema::{
            field::{SchemaField, TypeRef},
            registry::{Schema, SchemaBuilder},
            types::TypeDescriptor,
        },
    };

    /// `Query { people: [Person] }` where a person has an owner and pets.
    pub(crate) fn fixture_schema() -> Schema {
        let mut builder = SchemaBuilder::new("Query");
        builder
            .add_type(
                TypeDescriptor::new("Person")
                    .with_member("id", ExprType::Scalar(DataType::Int))
                    .with_member("name", ExprType::Scalar(DataType::String))
                    .with_member("age", ExprType::Scalar(DataType::Int))
                    .with_member("born", ExprType::Scalar(DataType::Date))
                    .with_member("owner", ExprType::object("Owner"))
                    .with_member("pets", ExprType::sequence_of(ExprType::object("Pet"))),
            )
            .unwrap();
        builder
            .add_type(TypeDescriptor::new("Owner").with_member("name", ExprType::Scalar(DataType::String)))
            .unwrap();
        builder
            .add_type(TypeDescriptor::new("Pet").with_member("name", ExprType::Scalar(DataType::String)))
            .unwrap();

        let db = Parameter::new("db", ExprType::object("Query"));
        let people = Expr::member(
            db.expr(),
            "people",
            ExprType::sequence_of(ExprType::object("Person")),
        );
        builder
            .add_query_field(SchemaField::new(
                "people",
                Lambda::new(vec![db], people),
                TypeRef::list("Person"),
            ))
            .unwrap();
        builder.add_id_lookup_field("people", "person").unwrap();
        builder.add_filter_query_field("people").unwrap();
        builder.build().unwrap()
    }
}
