use crate::core::{data_type::DataType, identifiers::TypeName, value::Value};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

pub mod bound;
pub mod display;

/// Identity of a parameter. Two parameters sharing a display name are still distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParamId(Uuid);

impl ParamId {
    pub fn fresh() -> Self {
        Self(Uuid::new_v4())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub id: ParamId,
    pub name: String,
    pub ty: ExprType,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: ExprType) -> Self {
        Self {
            id: ParamId::fresh(),
            name: name.into(),
            ty,
        }
    }

    pub fn expr(&self) -> Expr {
        Expr::Parameter(self.clone())
    }
}

/// Static type of an expression node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExprType {
    Scalar(DataType),
    Object(TypeName),
    Record(Vec<(String, ExprType)>),
    Sequence(Box<ExprType>),
    Function {
        params: Vec<ExprType>,
        output: Box<ExprType>,
    },
}

impl ExprType {
    pub fn boolean() -> Self {
        ExprType::Scalar(DataType::Boolean)
    }

    pub fn object(name: impl Into<TypeName>) -> Self {
        ExprType::Object(name.into())
    }

    pub fn sequence_of(element: ExprType) -> Self {
        ExprType::Sequence(Box::new(element))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, ExprType::Sequence(_))
    }

    pub fn element_type(&self) -> Option<&ExprType> {
        match self {
            ExprType::Sequence(inner) => Some(inner),
            _ => None,
        }
    }

    pub fn scalar(&self) -> Option<&DataType> {
        match self {
            ExprType::Scalar(dt) => Some(dt),
            _ => None,
        }
    }

    pub fn object_name(&self) -> Option<&TypeName> {
        match self {
            ExprType::Object(name) => Some(name),
            _ => None,
        }
    }

    /// Best-effort static type of a runtime value.
    pub fn of_value(value: &Value) -> Self {
        match value {
            Value::Record(fields) => ExprType::Record(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), ExprType::of_value(v)))
                    .collect(),
            ),
            Value::List(items) => ExprType::sequence_of(
                items
                    .first()
                    .map(ExprType::of_value)
                    .unwrap_or(ExprType::Scalar(DataType::Null)),
            ),
            Value::StringArray(_) => ExprType::sequence_of(ExprType::Scalar(DataType::String)),
            other => ExprType::Scalar(other.data_type()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
    And,
    Or,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::GreaterThan => ">",
            BinaryOp::GreaterOrEqual => ">=",
            BinaryOp::LessThan => "<",
            BinaryOp::LessOrEqual => "<=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }
}

/// Closed set of sequence operators a query provider must understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SequenceOp {
    Where,
    Select,
    OrderBy,
    OrderByDescending,
    Reverse,
    Skip,
    Take,
    First,
    FirstOrDefault,
    Last,
    LastOrDefault,
}

impl SequenceOp {
    /// Operators that collapse a sequence into a single element.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SequenceOp::First | SequenceOp::FirstOrDefault | SequenceOp::Last | SequenceOp::LastOrDefault
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            SequenceOp::Where => "Where",
            SequenceOp::Select => "Select",
            SequenceOp::OrderBy => "OrderBy",
            SequenceOp::OrderByDescending => "OrderByDescending",
            SequenceOp::Reverse => "Reverse",
            SequenceOp::Skip => "Skip",
            SequenceOp::Take => "Take",
            SequenceOp::First => "First",
            SequenceOp::FirstOrDefault => "FirstOrDefault",
            SequenceOp::Last => "Last",
            SequenceOp::LastOrDefault => "LastOrDefault",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lambda {
    pub params: Vec<Parameter>,
    pub body: Box<Expr>,
}

impl Lambda {
    pub fn new(params: Vec<Parameter>, body: Expr) -> Self {
        Self {
            params,
            body: Box::new(body),
        }
    }

    pub fn param(&self, index: usize) -> Option<&Parameter> {
        self.params.get(index)
    }

    pub fn ty(&self) -> ExprType {
        ExprType::Function {
            params: self.params.iter().map(|p| p.ty.clone()).collect(),
            output: Box::new(self.body.ty()),
        }
    }

    pub fn free_parameters(&self) -> Vec<Parameter> {
        Expr::Lambda(self.clone()).free_parameters()
    }
}

/// Typed expression tree handed to a query provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Parameter(Parameter),
    Constant {
        value: Value,
        ty: ExprType,
    },
    Member {
        target: Box<Expr>,
        name: String,
        ty: ExprType,
    },
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },
    Not(Box<Expr>),
    /// Three-way comparison producing a negative, zero or positive integer.
    Compare {
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// String projection of the operand; null projects to `""`.
    Text(Box<Expr>),
    Contains {
        set: Vec<String>,
        item: Box<Expr>,
    },
    Call {
        op: SequenceOp,
        source: Box<Expr>,
        args: Vec<Expr>,
    },
    Lambda(Lambda),
    New {
        ty: Option<TypeName>,
        fields: Vec<(String, Expr)>,
    },
}

impl Expr {
    pub fn constant(value: Value) -> Self {
        let ty = ExprType::of_value(&value);
        Expr::Constant { value, ty }
    }

    pub fn typed_constant(value: Value, ty: ExprType) -> Self {
        Expr::Constant { value, ty }
    }

    pub fn boolean(value: bool) -> Self {
        Expr::Constant {
            value: Value::Boolean(value),
            ty: ExprType::boolean(),
        }
    }

    pub fn member(target: Expr, name: impl Into<String>, ty: ExprType) -> Self {
        Expr::Member {
            target: Box::new(target),
            name: name.into(),
            ty,
        }
    }

    pub fn binary(left: Expr, op: BinaryOp, right: Expr) -> Self {
        Expr::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    pub fn and(left: Expr, right: Expr) -> Self {
        Expr::binary(left, BinaryOp::And, right)
    }

    pub fn or(left: Expr, right: Expr) -> Self {
        Expr::binary(left, BinaryOp::Or, right)
    }

    pub fn not(inner: Expr) -> Self {
        Expr::Not(Box::new(inner))
    }

    pub fn call(op: SequenceOp, source: Expr, args: Vec<Expr>) -> Self {
        Expr::Call {
            op,
            source: Box::new(source),
            args,
        }
    }

    pub fn lambda(params: Vec<Parameter>, body: Expr) -> Self {
        Expr::Lambda(Lambda::new(params, body))
    }

    pub fn is_true_constant(&self) -> bool {
        matches!(
            self,
            Expr::Constant {
                value: Value::Boolean(true),
                ..
            }
        )
    }

    pub fn ty(&self) -> ExprType {
        match self {
            Expr::Parameter(p) => p.ty.clone(),
            Expr::Constant { ty, .. } | Expr::Member { ty, .. } => ty.clone(),
            Expr::Binary { .. } | Expr::Not(_) | Expr::Contains { .. } => ExprType::boolean(),
            Expr::Compare { .. } => ExprType::Scalar(DataType::Int),
            Expr::Text(_) => ExprType::Scalar(DataType::String),
            Expr::Call { op, source, args } => match op {
                SequenceOp::Select => match args.first() {
                    Some(Expr::Lambda(selector)) => ExprType::sequence_of(selector.body.ty()),
                    _ => source.ty(),
                },
                op if op.is_terminal() => {
                    let source_ty = source.ty();
                    source_ty.element_type().cloned().unwrap_or(source_ty)
                }
                _ => source.ty(),
            },
            Expr::Lambda(lambda) => lambda.ty(),
            Expr::New { ty: Some(name), .. } => ExprType::Object(name.clone()),
            Expr::New { ty: None, fields } => ExprType::Record(
                fields
                    .iter()
                    .map(|(name, expr)| (name.clone(), expr.ty()))
                    .collect(),
            ),
        }
    }

    /// Visits every node, parents before children.
    pub fn walk<F: FnMut(&Expr)>(&self, f: &mut F) {
        f(self);
        match self {
            Expr::Parameter(_) | Expr::Constant { .. } => {}
            Expr::Member { target, .. } => target.walk(f),
            Expr::Binary { left, right, .. } | Expr::Compare { left, right } => {
                left.walk(f);
                right.walk(f);
            }
            Expr::Not(inner) | Expr::Text(inner) => inner.walk(f),
            Expr::Contains { item, .. } => item.walk(f),
            Expr::Call { source, args, .. } => {
                source.walk(f);
                args.iter().for_each(|arg| arg.walk(f));
            }
            Expr::Lambda(lambda) => lambda.body.walk(f),
            Expr::New { fields, .. } => fields.iter().for_each(|(_, e)| e.walk(f)),
        }
    }

    /// Rebuilds the tree. Where `f` returns a replacement the subtree is not descended.
    pub fn transform<F: Fn(&Expr) -> Option<Expr>>(&self, f: &F) -> Expr {
        if let Some(replacement) = f(self) {
            return replacement;
        }
        match self {
            Expr::Parameter(_) | Expr::Constant { .. } => self.clone(),
            Expr::Member { target, name, ty } => Expr::Member {
                target: Box::new(target.transform(f)),
                name: name.clone(),
                ty: ty.clone(),
            },
            Expr::Binary { left, op, right } => Expr::Binary {
                left: Box::new(left.transform(f)),
                op: *op,
                right: Box::new(right.transform(f)),
            },
            Expr::Not(inner) => Expr::Not(Box::new(inner.transform(f))),
            Expr::Compare { left, right } => Expr::Compare {
                left: Box::new(left.transform(f)),
                right: Box::new(right.transform(f)),
            },
            Expr::Text(inner) => Expr::Text(Box::new(inner.transform(f))),
            Expr::Contains { set, item } => Expr::Contains {
                set: set.clone(),
                item: Box::new(item.transform(f)),
            },
            Expr::Call { op, source, args } => Expr::Call {
                op: *op,
                source: Box::new(source.transform(f)),
                args: args.iter().map(|arg| arg.transform(f)).collect(),
            },
            Expr::Lambda(lambda) => Expr::Lambda(Lambda {
                params: lambda.params.clone(),
                body: Box::new(lambda.body.transform(f)),
            }),
            Expr::New { ty, fields } => Expr::New {
                ty: ty.clone(),
                fields: fields
                    .iter()
                    .map(|(name, e)| (name.clone(), e.transform(f)))
                    .collect(),
            },
        }
    }

    /// Replaces every occurrence of the parameter `id` with `replacement`.
    pub fn replace_parameter(&self, id: &ParamId, replacement: &Expr) -> Expr {
        self.transform(&|node| match node {
            Expr::Parameter(p) if &p.id == id => Some(replacement.clone()),
            _ => None,
        })
    }

    /// Parameters referenced but not declared by an enclosing lambda, in first-use order.
    pub fn free_parameters(&self) -> Vec<Parameter> {
        let mut bound = HashSet::new();
        let mut free = Vec::new();
        collect_free(self, &mut bound, &mut free);
        free
    }

    pub fn references(&self, id: &ParamId) -> bool {
        let mut found = false;
        self.walk(&mut |node| {
            if let Expr::Parameter(p) = node {
                found |= &p.id == id;
            }
        });
        found
    }
}

fn collect_free(expr: &Expr, bound: &mut HashSet<ParamId>, free: &mut Vec<Parameter>) {
    match expr {
        Expr::Parameter(p) => {
            if !bound.contains(&p.id) && !free.iter().any(|f| f.id == p.id) {
                free.push(p.clone());
            }
        }
        Expr::Lambda(lambda) => {
            let introduced: Vec<ParamId> = lambda
                .params
                .iter()
                .filter(|p| bound.insert(p.id))
                .map(|p| p.id)
                .collect();
            collect_free(&lambda.body, bound, free);
            for id in introduced {
                bound.remove(&id);
            }
        }
        Expr::Constant { .. } => {}
        Expr::Member { target, .. } => collect_free(target, bound, free),
        Expr::Binary { left, right, .. } | Expr::Compare { left, right } => {
            collect_free(left, bound, free);
            collect_free(right, bound, free);
        }
        Expr::Not(inner) | Expr::Text(inner) => collect_free(inner, bound, free),
        Expr::Contains { item, .. } => collect_free(item, bound, free),
        Expr::Call { source, args, .. } => {
            collect_free(source, bound, free);
            for arg in args {
                collect_free(arg, bound, free);
            }
        }
        Expr::New { fields, .. } => {
            for (_, e) in fields {
                collect_free(e, bound, free);
            }
        }
    }
}
