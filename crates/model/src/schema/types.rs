use crate::{core::identifiers::TypeName, expr::ExprType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberDescriptor {
    pub name: String,
    pub ty: ExprType,
}

impl MemberDescriptor {
    pub fn is_scalar(&self) -> bool {
        matches!(self.ty, ExprType::Scalar(_))
    }
}

/// Object type known to the schema: its name and declared members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    pub name: TypeName,
    pub description: Option<String>,
    pub members: Vec<MemberDescriptor>,
}

impl TypeDescriptor {
    pub fn new(name: impl Into<TypeName>) -> Self {
        Self {
            name: name.into(),
            description: None,
            members: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_member(mut self, name: impl Into<String>, ty: ExprType) -> Self {
        self.members.push(MemberDescriptor {
            name: name.into(),
            ty,
        });
        self
    }

    pub fn member(&self, name: &str) -> Option<&MemberDescriptor> {
        self.members.iter().find(|m| m.name == name)
    }

    pub fn scalar_members(&self) -> impl Iterator<Item = &MemberDescriptor> {
        self.members.iter().filter(|m| m.is_scalar())
    }
}

/// Names of the members of a type that filter clauses may reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterFieldEnum {
    pub name: String,
    pub type_name: TypeName,
    pub description: String,
    pub fields: Vec<String>,
}

impl FilterFieldEnum {
    pub fn for_type(descriptor: &TypeDescriptor) -> Self {
        Self {
            name: format!("{}FilterEnum", descriptor.name),
            type_name: descriptor.name.clone(),
            description: format!(
                "A list of the fields in {} that can be filtered by.",
                descriptor.name
            ),
            fields: descriptor.scalar_members().map(|m| m.name.clone()).collect(),
        }
    }
}
