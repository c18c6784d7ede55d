use model::{core::value::Value, expr::BinaryOp};
use std::cmp::Ordering;
use tracing::warn;

/// Binary operation evaluator over already evaluated operands
pub(crate) struct BinaryOpEvaluator<'a> {
    left: &'a Value,
    right: &'a Value,
    op: &'a BinaryOp,
}

impl<'a> BinaryOpEvaluator<'a> {
    pub fn new(left: &'a Value, right: &'a Value, op: &'a BinaryOp) -> Self {
        Self { left, right, op }
    }

    pub fn evaluate(&self) -> Option<Value> {
        match self.op {
            BinaryOp::Equal | BinaryOp::NotEqual => self.eval_equality(),
            BinaryOp::GreaterThan
            | BinaryOp::GreaterOrEqual
            | BinaryOp::LessThan
            | BinaryOp::LessOrEqual => self.eval_ordering(),
            BinaryOp::And | BinaryOp::Or => self.eval_logical(),
        }
    }

    fn eval_equality(&self) -> Option<Value> {
        let equal = match (self.left, self.right) {
            (Value::Null, Value::Null) => true,
            (Value::Null, _) | (_, Value::Null) => false,
            (l, r) => l.equal(r),
        };
        Some(Value::Boolean(match self.op {
            BinaryOp::Equal => equal,
            _ => !equal,
        }))
    }

    fn eval_ordering(&self) -> Option<Value> {
        let Some(ordering) = self.left.compare(self.right) else {
            warn!(
                "Cannot order {} against {}",
                self.left.data_type(),
                self.right.data_type()
            );
            return None;
        };
        Some(Value::Boolean(match self.op {
            BinaryOp::GreaterThan => ordering == Ordering::Greater,
            BinaryOp::GreaterOrEqual => ordering != Ordering::Less,
            BinaryOp::LessThan => ordering == Ordering::Less,
            BinaryOp::LessOrEqual => ordering != Ordering::Greater,
            _ => return None,
        }))
    }

    fn eval_logical(&self) -> Option<Value> {
        match (self.left, self.right) {
            (Value::Boolean(l), Value::Boolean(r)) => Some(Value::Boolean(match self.op {
                BinaryOp::And => *l && *r,
                _ => *l || *r,
            })),
            _ => {
                warn!("Unsupported binary operation for non-boolean operands: {:?}", self.op);
                None
            }
        }
    }
}
