use super::{Expr, ExprType, Lambda};
use std::fmt;

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Parameter(p) => write!(f, "{}", p.name),
            Expr::Constant { value, .. } => write!(f, "{value}"),
            Expr::Member { target, name, .. } => write!(f, "{target}.{name}"),
            Expr::Binary { left, op, right } => write!(f, "({left} {} {right})", op.symbol()),
            Expr::Not(inner) => match inner.as_ref() {
                Expr::Binary { .. } => write!(f, "!{inner}"),
                _ => write!(f, "!({inner})"),
            },
            Expr::Compare { left, right } => write!(f, "Compare({left}, {right})"),
            Expr::Text(inner) => write!(f, "{inner}.ToString()"),
            Expr::Contains { set, item } => {
                let items = set
                    .iter()
                    .map(|s| format!("\"{s}\""))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "[{items}].Contains({item})")
            }
            Expr::Call { op, source, args } => {
                let args = args
                    .iter()
                    .map(|a| a.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "{source}.{}({args})", op.name())
            }
            Expr::Lambda(lambda) => write!(f, "{lambda}"),
            Expr::New { ty, fields } => {
                let fields = fields
                    .iter()
                    .map(|(name, e)| format!("{name} = {e}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                match ty {
                    Some(name) => write!(f, "new {name} {{{fields}}}"),
                    None => write!(f, "new {{{fields}}}"),
                }
            }
        }
    }
}

impl fmt::Display for Lambda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.params.as_slice() {
            [single] => write!(f, "{} => {}", single.name, self.body),
            params => {
                let names = params
                    .iter()
                    .map(|p| p.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "({names}) => {}", self.body)
            }
        }
    }
}

impl fmt::Display for ExprType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExprType::Scalar(dt) => write!(f, "{dt}"),
            ExprType::Object(name) => write!(f, "{name}"),
            ExprType::Record(fields) => {
                let fields = fields
                    .iter()
                    .map(|(name, ty)| format!("{name}: {ty}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "{{{fields}}}")
            }
            ExprType::Sequence(inner) => write!(f, "[{inner}]"),
            ExprType::Function { params, output } => {
                let params = params
                    .iter()
                    .map(|p| p.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "({params}) -> {output}")
            }
        }
    }
}
