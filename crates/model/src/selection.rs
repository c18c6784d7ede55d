use crate::{
    core::value::Value,
    expr::{Expr, ExprType, Lambda, Parameter},
};

/// Output shape requested for one element: `param => body`.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionTree {
    pub param: Parameter,
    pub body: Expr,
    pub constants: Vec<(Parameter, Value)>,
}

impl SelectionTree {
    pub fn new(param: Parameter, body: Expr) -> Self {
        Self {
            param,
            body,
            constants: Vec::new(),
        }
    }

    /// Projects the named members of `param` into an anonymous record.
    pub fn fields(param: Parameter, members: &[(&str, ExprType)]) -> Self {
        let fields = members
            .iter()
            .map(|(name, ty)| {
                (
                    name.to_string(),
                    Expr::member(param.expr(), *name, ty.clone()),
                )
            })
            .collect();
        Self::new(param, Expr::New { ty: None, fields })
    }

    pub fn as_lambda(&self) -> Lambda {
        Lambda::new(vec![self.param.clone()], self.body.clone())
    }
}
