use crate::{
    core::{data_type::DataType, identifiers::TypeName, value::Value},
    expr::{Expr, ExprType, Lambda, Parameter},
};
use std::collections::BTreeMap;

/// Supplied argument expressions keyed by argument name.
pub type ArgumentValues = BTreeMap<String, Expr>;

#[derive(Debug, Clone, PartialEq)]
pub enum ArgumentType {
    Value(DataType),
    /// Filter clauses passed by reference; compiled rather than evaluated.
    FilterQuery,
    Sort,
    Page,
    PageSize,
}

impl ArgumentType {
    /// Type of this argument's slot in the argument holder record.
    pub fn holder_type(&self) -> ExprType {
        match self {
            ArgumentType::Value(dt) => ExprType::Scalar(dt.clone()),
            ArgumentType::FilterQuery => ExprType::Record(vec![
                ("hasValue".to_string(), ExprType::boolean()),
                ("query".to_string(), ExprType::Scalar(DataType::Json)),
            ]),
            ArgumentType::Sort => ExprType::Record(vec![
                ("field".to_string(), ExprType::Scalar(DataType::String)),
                ("direction".to_string(), ExprType::Scalar(DataType::String)),
            ]),
            ArgumentType::Page | ArgumentType::PageSize => ExprType::Scalar(DataType::Int),
        }
    }

    pub fn is_query_shaping(&self) -> bool {
        !matches!(self, ArgumentType::Value(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentDescriptor {
    pub name: String,
    pub kind: ArgumentType,
    pub required: bool,
    pub default: Option<Value>,
}

impl ArgumentDescriptor {
    pub fn required(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            kind: ArgumentType::Value(data_type),
            required: true,
            default: None,
        }
    }

    pub fn optional(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            kind: ArgumentType::Value(data_type),
            required: false,
            default: None,
        }
    }

    pub fn of_kind(name: impl Into<String>, kind: ArgumentType) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            default: None,
        }
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    pub type_name: TypeName,
    pub is_list: bool,
}

impl TypeRef {
    pub fn single(type_name: impl Into<TypeName>) -> Self {
        Self {
            type_name: type_name.into(),
            is_list: false,
        }
    }

    pub fn list(type_name: impl Into<TypeName>) -> Self {
        Self {
            type_name: type_name.into(),
            is_list: true,
        }
    }
}

/// A schema field: a template lambda over `(context[, args])` plus the
/// arguments it accepts.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaField {
    pub name: String,
    pub description: Option<String>,
    pub template: Lambda,
    pub arguments: Vec<ArgumentDescriptor>,
    pub return_type: TypeRef,
}

impl SchemaField {
    pub fn new(name: impl Into<String>, template: Lambda, return_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            description: None,
            template,
            arguments: Vec::new(),
            return_type,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_argument(mut self, argument: ArgumentDescriptor) -> Self {
        self.arguments.push(argument);
        self
    }

    pub fn context_param(&self) -> Option<&Parameter> {
        self.template.param(0)
    }

    pub fn args_param(&self) -> Option<&Parameter> {
        self.template.param(1)
    }

    pub fn body(&self) -> &Expr {
        &self.template.body
    }

    pub fn argument(&self, name: &str) -> Option<&ArgumentDescriptor> {
        self.arguments.iter().find(|a| a.name == name)
    }

    pub fn required_argument_names(&self) -> Vec<&str> {
        self.arguments
            .iter()
            .filter(|a| a.required)
            .map(|a| a.name.as_str())
            .collect()
    }

    pub fn has_query_arguments(&self) -> bool {
        self.arguments.iter().any(|a| a.kind.is_query_shaping())
    }

    /// Record type of the argument holder bound to the template's second parameter.
    pub fn holder_type(&self) -> ExprType {
        ExprType::Record(
            self.arguments
                .iter()
                .map(|a| (a.name.clone(), a.kind.holder_type()))
                .collect(),
        )
    }
}
