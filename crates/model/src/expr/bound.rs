use super::{Expr, ParamId, Parameter};
use crate::core::value::Value;
use std::fmt;

/// Expression whose only open variable is `context`; every other parameter is
/// closed over by a bound constant.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundExpr {
    pub context: Option<Parameter>,
    pub expression: Expr,
    pub constants: Vec<(Parameter, Value)>,
}

impl BoundExpr {
    pub fn new(context: Option<Parameter>, expression: Expr) -> Self {
        Self {
            context,
            expression,
            constants: Vec::new(),
        }
    }

    pub fn with_constant(mut self, param: Parameter, value: Value) -> Self {
        self.constants.push((param, value));
        self
    }

    pub fn bound_value(&self, id: &ParamId) -> Option<&Value> {
        self.constants
            .iter()
            .find(|(p, _)| &p.id == id)
            .map(|(_, v)| v)
    }

    /// Free variables not covered by a bound constant.
    pub fn unbound_parameters(&self) -> Vec<Parameter> {
        self.expression
            .free_parameters()
            .into_iter()
            .filter(|p| self.bound_value(&p.id).is_none())
            .collect()
    }

    /// Re-parents the expression onto `replacement`, whose free variables become
    /// the new open set.
    pub fn substitute_context(self, replacement: &Expr) -> BoundExpr {
        let expression = match &self.context {
            Some(ctx) => self.expression.replace_parameter(&ctx.id, replacement),
            None => self.expression,
        };
        let context = match replacement {
            Expr::Parameter(p) => Some(p.clone()),
            other => other.free_parameters().into_iter().next(),
        };
        BoundExpr {
            context,
            expression,
            constants: self.constants,
        }
    }

    /// The expression with every bound parameter replaced by its constant.
    pub fn inline_constants(&self) -> Expr {
        self.constants
            .iter()
            .fold(self.expression.clone(), |expr, (param, value)| {
                expr.replace_parameter(
                    &param.id,
                    &Expr::typed_constant(value.clone(), param.ty.clone()),
                )
            })
    }
}

impl fmt::Display for BoundExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expression)
    }
}
