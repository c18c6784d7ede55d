use model::{
    core::value::Value,
    expr::{Expr, Lambda, SequenceOp},
};

/// The forms a mutation result body can take.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MutationShape<'a> {
    /// A sequence of results, e.g. `ctx.people.Where(...)`.
    Sequence(&'a Expr),
    /// A single-result operator with an optional inline filter.
    Terminal {
        op: SequenceOp,
        source: &'a Expr,
        filter: Option<&'a Lambda>,
    },
    /// A member chain rooted at a captured constant.
    MemberOnConstant(&'a Expr),
    Constant(&'a Value),
    Unsupported,
}

impl<'a> MutationShape<'a> {
    pub fn classify(body: &'a Expr) -> Self {
        match body {
            Expr::Call { op, source, args } if op.is_terminal() => match args.as_slice() {
                [] => MutationShape::Terminal {
                    op: *op,
                    source,
                    filter: None,
                },
                [Expr::Lambda(filter)] => MutationShape::Terminal {
                    op: *op,
                    source,
                    filter: Some(filter),
                },
                _ => MutationShape::Unsupported,
            },
            _ if body.ty().is_sequence() => MutationShape::Sequence(body),
            Expr::Member { .. } if rooted_at_constant(body) => MutationShape::MemberOnConstant(body),
            Expr::Constant { value, .. } => MutationShape::Constant(value),
            _ => MutationShape::Unsupported,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MutationShape::Sequence(_) => "sequence",
            MutationShape::Terminal { .. } => "terminal",
            MutationShape::MemberOnConstant(_) => "member on constant",
            MutationShape::Constant(_) => "constant",
            MutationShape::Unsupported => "unsupported",
        }
    }
}

fn rooted_at_constant(expr: &Expr) -> bool {
    match expr {
        Expr::Member { target, .. } => rooted_at_constant(target),
        Expr::Constant { .. } => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::{
        core::data_type::DataType,
        expr::{ExprType, Parameter},
    };

    #[test]
    fn test_classifies_terminal_with_inline_filter() {
        let ctx = Parameter::new("ctx", ExprType::object("Query"));
        let p = Parameter::new("p", ExprType::object("Person"));
        let people = Expr::member(
            ctx.expr(),
            "people",
            ExprType::sequence_of(ExprType::object("Person")),
        );
        let body = Expr::call(
            SequenceOp::LastOrDefault,
            people,
            vec![Expr::lambda(vec![p], Expr::boolean(true))],
        );
        assert!(matches!(
            MutationShape::classify(&body),
            MutationShape::Terminal {
                op: SequenceOp::LastOrDefault,
                filter: Some(_),
                ..
            }
        ));
    }

    #[test]
    fn test_classifies_member_chain_on_constant() {
        let created = Expr::constant(Value::record([(
            "owner",
            Value::record([("name", Value::from("Ada"))]),
        )]));
        let owner = Expr::member(
            created,
            "owner",
            ExprType::Record(vec![("name".into(), ExprType::Scalar(DataType::String))]),
        );
        let name = Expr::member(owner, "name", ExprType::Scalar(DataType::String));
        assert_eq!(MutationShape::classify(&name).name(), "member on constant");
    }

    #[test]
    fn test_member_on_parameter_is_unsupported() {
        let ctx = Parameter::new("ctx", ExprType::object("Query"));
        let body = Expr::member(ctx.expr(), "count", ExprType::Scalar(DataType::Int));
        assert_eq!(MutationShape::classify(&body), MutationShape::Unsupported);
    }
}
