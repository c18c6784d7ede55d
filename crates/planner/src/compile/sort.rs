use super::members::MemberResolver;
use crate::error::Result;
use model::{
    expr::{Expr, ExprType, Lambda, Parameter, SequenceOp},
    query::sort::{SortDirection, SortSpec},
};
use tracing::debug;

/// What a sort spec does to a sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum CompiledSort {
    Unchanged,
    Reversed,
    ByKey { key: Lambda, descending: bool },
}

impl CompiledSort {
    pub fn apply(&self, seq: Expr) -> Expr {
        match self {
            CompiledSort::Unchanged => seq,
            CompiledSort::Reversed => Expr::call(SequenceOp::Reverse, seq, vec![]),
            CompiledSort::ByKey { key, descending } => {
                let op = if *descending {
                    SequenceOp::OrderByDescending
                } else {
                    SequenceOp::OrderBy
                };
                Expr::call(op, seq, vec![Expr::Lambda(key.clone())])
            }
        }
    }
}

pub fn compile_sort(
    resolver: MemberResolver<'_>,
    spec: Option<&SortSpec>,
    element_type: &ExprType,
) -> Result<CompiledSort> {
    let Some(spec) = spec else {
        return Ok(CompiledSort::Unchanged);
    };
    let descending = spec.direction == SortDirection::Descending;
    let Some(path) = spec.field.as_ref() else {
        return Ok(if descending {
            CompiledSort::Reversed
        } else {
            CompiledSort::Unchanged
        });
    };

    let param = Parameter::new("s", element_type.clone());
    let field = resolver.resolve_path(param.expr(), path)?;
    let key = Lambda::new(vec![param], field.expr);
    debug!(key = %key, descending, "compiled sort");
    Ok(CompiledSort::ByKey { key, descending })
}

/// Appends the ordering `spec` describes to `seq`.
pub fn apply_sort(
    resolver: MemberResolver<'_>,
    seq: Expr,
    spec: Option<&SortSpec>,
    element_type: &ExprType,
) -> Result<Expr> {
    Ok(compile_sort(resolver, spec, element_type)?.apply(seq))
}
