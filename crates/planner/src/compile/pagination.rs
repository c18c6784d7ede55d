use model::{
    core::value::Value,
    expr::{Expr, SequenceOp},
    query::pagination::PaginationSpec,
};

/// Appends `Skip` when the page offset is non-zero and `Take` when a page size
/// limits the result. Negative counts are passed through to the provider.
pub fn apply_pagination(seq: Expr, spec: &PaginationSpec) -> Expr {
    let skip = spec.skip();
    let seq = if skip != 0 {
        Expr::call(SequenceOp::Skip, seq, vec![Expr::constant(Value::Int(skip))])
    } else {
        seq
    };
    match spec.take() {
        Some(take) => Expr::call(SequenceOp::Take, seq, vec![Expr::constant(Value::Int(take))]),
        None => seq,
    }
}
