use crate::{
    error::{CompileError, Result},
    settings::MemberLookup,
};
use model::{
    core::{data_type::DataType, identifiers::FieldPath},
    expr::{Expr, ExprType},
    schema::registry::SchemaRegistry,
};

/// A resolved member path: the access expression and its declared type.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRef {
    pub path: FieldPath,
    pub expr: Expr,
    pub ty: ExprType,
}

impl FieldRef {
    pub fn declared_type(&self) -> Option<&DataType> {
        self.ty.scalar()
    }
}

/// Looks members up on schema object types and structural record types.
#[derive(Clone, Copy)]
pub struct MemberResolver<'s> {
    schema: &'s dyn SchemaRegistry,
    lookup: MemberLookup,
}

impl<'s> MemberResolver<'s> {
    pub fn new(schema: &'s dyn SchemaRegistry, lookup: MemberLookup) -> Self {
        Self { schema, lookup }
    }

    pub fn schema(&self) -> &'s dyn SchemaRegistry {
        self.schema
    }

    pub fn lookup(&self) -> MemberLookup {
        self.lookup
    }

    /// Canonical name and type of `name` on `owner`.
    pub fn member(&self, owner: &ExprType, name: &str) -> Result<(String, ExprType)> {
        let unknown = || CompileError::UnknownField {
            field: name.to_string(),
            type_name: owner.to_string(),
        };
        match owner {
            ExprType::Object(type_name) => {
                let descriptor = self
                    .schema
                    .lookup_type(type_name.as_str())
                    .ok_or_else(|| CompileError::UnknownType(type_name.to_string()))?;
                descriptor
                    .member(name)
                    .or_else(|| {
                        descriptor
                            .members
                            .iter()
                            .find(|m| self.lookup.matches(&m.name, name))
                    })
                    .map(|m| (m.name.clone(), m.ty.clone()))
                    .ok_or_else(unknown)
            }
            ExprType::Record(fields) => fields
                .iter()
                .find(|(n, _)| n == name)
                .or_else(|| fields.iter().find(|(n, _)| self.lookup.matches(n, name)))
                .map(|(n, t)| (n.clone(), t.clone()))
                .ok_or_else(unknown),
            _ => Err(unknown()),
        }
    }

    /// Walks a dotted path from `root`, building nested member accesses.
    pub fn resolve_path(&self, root: Expr, path: &FieldPath) -> Result<FieldRef> {
        let root_type = root.ty();
        if path.is_empty() {
            return Err(CompileError::UnknownField {
                field: path.to_string(),
                type_name: root_type.to_string(),
            });
        }
        let mut expr = root;
        let mut ty = root_type;
        for segment in path.segments() {
            let (name, member_ty) = self.member(&ty, segment)?;
            expr = Expr::member(expr, name, member_ty.clone());
            ty = member_ty;
        }
        Ok(FieldRef {
            path: path.clone(),
            expr,
            ty,
        })
    }

    /// Rejects a top-level path the type's filter field enumeration does not list.
    pub fn check_filterable(&self, owner: &ExprType, path: &FieldPath) -> Result<()> {
        let Some(type_name) = owner.object_name() else {
            return Ok(());
        };
        let Some(filter_enum) = self.schema.filter_enum(type_name.as_str()) else {
            return Ok(());
        };
        let mut segments = path.segments();
        let (Some(first), None) = (segments.next(), segments.next()) else {
            return Ok(());
        };
        if filter_enum.fields.iter().any(|f| self.lookup.matches(f, first)) {
            Ok(())
        } else {
            Err(CompileError::UnknownField {
                field: path.to_string(),
                type_name: filter_enum.name.clone(),
            })
        }
    }
}
