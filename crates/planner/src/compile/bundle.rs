use super::{
    filter::{CompiledFilter, compile_filter},
    members::MemberResolver,
    pagination::apply_pagination,
    sort::{CompiledSort, compile_sort},
};
use crate::{error::Result, settings::AmbiguousClausePolicy};
use model::{
    expr::{Expr, ExprType, SequenceOp},
    query::{filter::FilterClause, pagination::PaginationSpec, sort::SortSpec},
};

/// Filter, sort and page compiled together for one sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct PredicateBundle {
    pub filter: CompiledFilter,
    pub sort: CompiledSort,
    pub page: PaginationSpec,
}

impl PredicateBundle {
    /// Applies filter, then sort, then pagination. A filter that accepts
    /// everything adds no `Where`.
    pub fn apply(&self, seq: Expr) -> Expr {
        let filtered = if self.filter.is_noop() {
            seq
        } else {
            Expr::call(
                SequenceOp::Where,
                seq,
                vec![Expr::Lambda(self.filter.predicate.clone())],
            )
        };
        apply_pagination(self.sort.apply(filtered), &self.page)
    }

    pub fn is_noop(&self) -> bool {
        self.filter.is_noop() && self.sort == CompiledSort::Unchanged && self.page.is_noop()
    }
}

/// Compiles the three query-shaping arguments of one sequence field.
pub fn compile_bundle(
    resolver: MemberResolver<'_>,
    policy: AmbiguousClausePolicy,
    clauses: &[FilterClause],
    sort: Option<&SortSpec>,
    page: PaginationSpec,
    element_type: &ExprType,
) -> Result<PredicateBundle> {
    Ok(PredicateBundle {
        filter: compile_filter(resolver, clauses, element_type, policy)?,
        sort: compile_sort(resolver, sort, element_type)?,
        page,
    })
}
