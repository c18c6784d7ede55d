use super::{
    error::SchemaError,
    field::{ArgumentDescriptor, ArgumentType, SchemaField, TypeRef},
    types::{FilterFieldEnum, TypeDescriptor},
};
use crate::{
    core::{data_type::DataType, identifiers::TypeName},
    expr::{BinaryOp, Expr, ExprType, Lambda, Parameter, SequenceOp},
};
use std::collections::BTreeMap;

pub type SchemaResult<T> = Result<T, SchemaError>;

/// Read-only view of a schema consulted while compiling queries.
pub trait SchemaRegistry: Send + Sync {
    fn lookup_field(&self, type_name: &str, field: &str) -> Option<&SchemaField>;

    fn lookup_type(&self, name: &str) -> Option<&TypeDescriptor>;

    fn filter_enum(&self, type_name: &str) -> Option<&FilterFieldEnum>;
}

/// Immutable schema snapshot produced by [`SchemaBuilder::build`].
#[derive(Debug, Clone)]
pub struct Schema {
    query_type: TypeName,
    types: BTreeMap<TypeName, TypeDescriptor>,
    fields: BTreeMap<TypeName, BTreeMap<String, SchemaField>>,
    mutations: BTreeMap<String, SchemaField>,
    filter_enums: BTreeMap<TypeName, FilterFieldEnum>,
}

impl Schema {
    pub fn query_type(&self) -> &TypeName {
        &self.query_type
    }

    pub fn query_field(&self, name: &str) -> Option<&SchemaField> {
        self.lookup_field(self.query_type.as_str(), name)
    }

    pub fn mutation(&self, name: &str) -> Option<&SchemaField> {
        self.mutations.get(name)
    }

    pub fn fields_of(&self, type_name: &str) -> impl Iterator<Item = &SchemaField> {
        self.fields
            .get(&TypeName::from(type_name))
            .into_iter()
            .flat_map(|fields| fields.values())
    }

    pub fn filter_enums(&self) -> impl Iterator<Item = &FilterFieldEnum> {
        self.filter_enums.values()
    }
}

impl SchemaRegistry for Schema {
    fn lookup_field(&self, type_name: &str, field: &str) -> Option<&SchemaField> {
        self.fields.get(&TypeName::from(type_name))?.get(field)
    }

    fn lookup_type(&self, name: &str) -> Option<&TypeDescriptor> {
        self.types.get(&TypeName::from(name))
    }

    fn filter_enum(&self, type_name: &str) -> Option<&FilterFieldEnum> {
        self.filter_enums.get(&TypeName::from(type_name))
    }
}

/// Collects types and fields, then freezes them into a [`Schema`].
#[derive(Debug)]
pub struct SchemaBuilder {
    query_type: TypeName,
    types: BTreeMap<TypeName, TypeDescriptor>,
    fields: BTreeMap<TypeName, BTreeMap<String, SchemaField>>,
    mutations: BTreeMap<String, SchemaField>,
}

impl SchemaBuilder {
    pub fn new(query_type: impl Into<TypeName>) -> Self {
        let query_type = query_type.into();
        let mut types = BTreeMap::new();
        types.insert(query_type.clone(), TypeDescriptor::new(query_type.clone()));
        Self {
            query_type,
            types,
            fields: BTreeMap::new(),
            mutations: BTreeMap::new(),
        }
    }

    pub fn query_type(&self) -> &TypeName {
        &self.query_type
    }

    /// Registers a type. The query type may be re-registered once to declare its members.
    pub fn add_type(&mut self, descriptor: TypeDescriptor) -> SchemaResult<&mut Self> {
        let is_bare_query = descriptor.name == self.query_type
            && self
                .types
                .get(&self.query_type)
                .is_some_and(|t| t.members.is_empty());
        if self.types.contains_key(&descriptor.name) && !is_bare_query {
            return Err(SchemaError::DuplicateType(descriptor.name.to_string()));
        }
        self.types.insert(descriptor.name.clone(), descriptor);
        Ok(self)
    }

    pub fn add_field(
        &mut self,
        type_name: impl Into<TypeName>,
        field: SchemaField,
    ) -> SchemaResult<&mut Self> {
        let type_name = type_name.into();
        if !self.types.contains_key(&type_name) {
            return Err(SchemaError::UnknownType(type_name.to_string()));
        }
        let fields = self.fields.entry(type_name.clone()).or_default();
        if fields.contains_key(&field.name) {
            return Err(SchemaError::DuplicateField {
                type_name: type_name.to_string(),
                field: field.name,
            });
        }
        fields.insert(field.name.clone(), field);
        Ok(self)
    }

    pub fn add_query_field(&mut self, field: SchemaField) -> SchemaResult<&mut Self> {
        let query_type = self.query_type.clone();
        self.add_field(query_type, field)
    }

    pub fn add_mutation(&mut self, field: SchemaField) -> SchemaResult<&mut Self> {
        if self.mutations.contains_key(&field.name) {
            return Err(SchemaError::DuplicateField {
                type_name: "Mutation".to_string(),
                field: field.name,
            });
        }
        self.mutations.insert(field.name.clone(), field);
        Ok(self)
    }

    /// Registers `name(id: ...)` returning the element of the root list field
    /// `list_field` whose id matches: `(ctx, args) => ctx.<list>.Where(x => x.id == args.id).First()`.
    pub fn add_id_lookup_field(&mut self, list_field: &str, name: &str) -> SchemaResult<&mut Self> {
        let (source, element) = self.list_field_parts(list_field)?;
        let element_type = self
            .types
            .get(&element)
            .ok_or_else(|| SchemaError::UnknownType(element.to_string()))?;
        let id_member = element_type
            .members
            .iter()
            .find(|m| {
                let lower = m.name.to_lowercase();
                lower == "id" || lower == format!("{}id", list_field.to_lowercase())
            })
            .cloned()
            .ok_or_else(|| SchemaError::InvalidField {
                type_name: self.query_type.to_string(),
                field: list_field.to_string(),
                reason: format!("element type '{element}' has no id member"),
            })?;
        let id_type = id_member
            .ty
            .scalar()
            .cloned()
            .ok_or_else(|| SchemaError::InvalidField {
                type_name: element.to_string(),
                field: id_member.name.clone(),
                reason: "id member is not a scalar".to_string(),
            })?;

        let argument = ArgumentDescriptor::required(id_member.name.clone(), id_type);
        let ctx = Parameter::new("ctx", ExprType::Object(self.query_type.clone()));
        let args = Parameter::new(
            "args",
            ExprType::Record(vec![(argument.name.clone(), argument.kind.holder_type())]),
        );
        let item = Parameter::new("x", ExprType::Object(element.clone()));

        let source_ctx = source
            .context_param()
            .map(|p| p.id)
            .ok_or_else(|| SchemaError::InvalidField {
                type_name: self.query_type.to_string(),
                field: list_field.to_string(),
                reason: "template has no context parameter".to_string(),
            })?;
        let list = source.template.body.replace_parameter(&source_ctx, &ctx.expr());
        let matches_id = Expr::lambda(
            vec![item.clone()],
            Expr::binary(
                Expr::member(item.expr(), id_member.name.clone(), id_member.ty.clone()),
                BinaryOp::Equal,
                Expr::member(args.expr(), argument.name.clone(), id_member.ty.clone()),
            ),
        );
        let body = Expr::call(
            SequenceOp::First,
            Expr::call(SequenceOp::Where, list, vec![matches_id]),
            vec![],
        );

        let field = SchemaField::new(name, Lambda::new(vec![ctx, args], body), TypeRef::single(element.clone()))
            .with_description(format!("Return a {element} by its Id"))
            .with_argument(argument);
        self.add_query_field(field)
    }

    /// Registers `<list>FilterQuery(filter, sort, page, pageSize)` over a root list field.
    pub fn add_filter_query_field(&mut self, list_field: &str) -> SchemaResult<&mut Self> {
        let (source, element) = self.list_field_parts(list_field)?;
        let ctx = Parameter::new("ctx", ExprType::Object(self.query_type.clone()));
        let body = match source.context_param() {
            Some(old) => source.template.body.replace_parameter(&old.id, &ctx.expr()),
            None => source.template.body.as_ref().clone(),
        };

        let mut field = SchemaField::new(
            format!("{list_field}FilterQuery"),
            Lambda::new(vec![ctx], body),
            TypeRef::list(element.clone()),
        )
        .with_description(format!("Return a {element} after filtering it"))
        .with_argument(ArgumentDescriptor::of_kind("filter", ArgumentType::FilterQuery))
        .with_argument(ArgumentDescriptor::of_kind("sort", ArgumentType::Sort))
        .with_argument(ArgumentDescriptor::of_kind("page", ArgumentType::Page))
        .with_argument(ArgumentDescriptor::of_kind("pageSize", ArgumentType::PageSize));

        let args = Parameter::new("args", field.holder_type());
        field.template.params.push(args);
        self.add_query_field(field)
    }

    /// Validates return types and freezes the schema, generating one filter
    /// field enumeration per object type.
    pub fn build(self) -> SchemaResult<Schema> {
        let all_fields = self
            .fields
            .values()
            .flat_map(|fields| fields.values())
            .chain(self.mutations.values());
        for field in all_fields {
            let returns = &field.return_type.type_name;
            let is_scalar = DataType::from_scalar_name(returns.as_str()).is_ok();
            if !is_scalar && !self.types.contains_key(returns) {
                return Err(SchemaError::UnknownType(returns.to_string()));
            }
        }

        let filter_enums = self
            .types
            .values()
            .filter(|t| t.name != self.query_type && t.scalar_members().next().is_some())
            .map(|t| (t.name.clone(), FilterFieldEnum::for_type(t)))
            .collect();

        Ok(Schema {
            query_type: self.query_type,
            types: self.types,
            fields: self.fields,
            mutations: self.mutations,
            filter_enums,
        })
    }

    fn list_field_parts(&self, list_field: &str) -> SchemaResult<(SchemaField, TypeName)> {
        let source = self
            .fields
            .get(&self.query_type)
            .and_then(|fields| fields.get(list_field))
            .cloned()
            .ok_or_else(|| SchemaError::UnknownField {
                type_name: self.query_type.to_string(),
                field: list_field.to_string(),
            })?;
        if !source.return_type.is_list || !source.template.body.ty().is_sequence() {
            return Err(SchemaError::InvalidField {
                type_name: self.query_type.to_string(),
                field: list_field.to_string(),
                reason: "not a list field".to_string(),
            });
        }
        let element = source.return_type.type_name.clone();
        Ok((source, element))
    }
}
