use crate::core::identifiers::FieldPath;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonOp {
    Equals,
    NotEqualTo,
    GreaterThan,
    GreaterThanOrEqualTo,
    LessThan,
    LessThanOrEqualTo,
    In,
    NotIn,
    IsNull,
}

impl ComparisonOp {
    pub const ALL: [ComparisonOp; 9] = [
        ComparisonOp::Equals,
        ComparisonOp::NotEqualTo,
        ComparisonOp::GreaterThan,
        ComparisonOp::GreaterThanOrEqualTo,
        ComparisonOp::LessThan,
        ComparisonOp::LessThanOrEqualTo,
        ComparisonOp::In,
        ComparisonOp::NotIn,
        ComparisonOp::IsNull,
    ];

    /// Name of the attribute carrying this operator on the wire.
    pub fn wire_name(&self) -> &'static str {
        match self {
            ComparisonOp::Equals => "equals",
            ComparisonOp::NotEqualTo => "notEqualTo",
            ComparisonOp::GreaterThan => "greaterThan",
            ComparisonOp::GreaterThanOrEqualTo => "greaterThanOrEqualTo",
            ComparisonOp::LessThan => "lessThan",
            ComparisonOp::LessThanOrEqualTo => "lessThanOrEqualTo",
            ComparisonOp::In => "in",
            ComparisonOp::NotIn => "notIn",
            ComparisonOp::IsNull => "isNull",
        }
    }

    pub fn is_ordering(&self) -> bool {
        matches!(
            self,
            ComparisonOp::GreaterThan
                | ComparisonOp::GreaterThanOrEqualTo
                | ComparisonOp::LessThan
                | ComparisonOp::LessThanOrEqualTo
        )
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Joins a clause to the one before it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Conjunction {
    #[default]
    #[serde(rename = "AND")]
    And,
    #[serde(rename = "OR")]
    Or,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum LiteralValue {
    Text(String),
    TextSet(Vec<String>),
    Flag(bool),
    #[default]
    Absent,
}

impl LiteralValue {
    pub fn kind(&self) -> &'static str {
        match self {
            LiteralValue::Text(_) => "text",
            LiteralValue::TextSet(_) => "text set",
            LiteralValue::Flag(_) => "flag",
            LiteralValue::Absent => "nothing",
        }
    }
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Text(s) => write!(f, "\"{s}\""),
            LiteralValue::TextSet(items) => write!(f, "{items:?}"),
            LiteralValue::Flag(b) => write!(f, "{b}"),
            LiteralValue::Absent => f.write_str("<absent>"),
        }
    }
}

/// One structured filter condition. `comparison` is absent when the clause set
/// zero or several operators; `conflicting` lists them in the latter case.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterClause {
    pub field: Option<FieldPath>,
    pub comparison: Option<ComparisonOp>,
    pub literal: LiteralValue,
    pub conjunction: Conjunction,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conflicting: Vec<ComparisonOp>,
}

impl FilterClause {
    pub fn new(field: impl Into<FieldPath>, comparison: ComparisonOp, literal: LiteralValue) -> Self {
        Self {
            field: Some(field.into()),
            comparison: Some(comparison),
            literal,
            conjunction: Conjunction::And,
            conflicting: Vec::new(),
        }
    }

    pub fn text(field: impl Into<FieldPath>, comparison: ComparisonOp, text: impl Into<String>) -> Self {
        Self::new(field, comparison, LiteralValue::Text(text.into()))
    }

    pub fn one_of<I, S>(field: impl Into<FieldPath>, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set = items.into_iter().map(Into::into).collect();
        Self::new(field, ComparisonOp::In, LiteralValue::TextSet(set))
    }

    pub fn is_null(field: impl Into<FieldPath>, flag: bool) -> Self {
        Self::new(field, ComparisonOp::IsNull, LiteralValue::Flag(flag))
    }

    pub fn or(mut self) -> Self {
        self.conjunction = Conjunction::Or;
        self
    }

    pub fn and(mut self) -> Self {
        self.conjunction = Conjunction::And;
        self
    }

    pub fn is_valid(&self) -> bool {
        self.comparison.is_some() && self.field.as_ref().is_some_and(|f| !f.is_empty())
    }
}

impl fmt::Display for FilterClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = self.field.as_ref().map(FieldPath::as_str).unwrap_or("<none>");
        match self.comparison {
            Some(op) => write!(f, "{field} {op} {}", self.literal),
            None => write!(f, "{field} <no single comparison>"),
        }
    }
}
