use crate::{
    error::{Result, SyntaxError},
    issues::ClauseIssueKind,
};
use model::{
    core::{identifiers::FieldPath, value::Value},
    query::{
        filter::{ComparisonOp, Conjunction, FilterClause, LiteralValue},
        pagination::PaginationSpec,
        sort::{SortDirection, SortSpec},
    },
};
use serde::{Deserialize, Deserializer, Serialize, de::Error as _};
use serde_json::Value as Json;
use tracing::trace;

/// One filter clause as it arrives on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FilterInput {
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub conjunction: Conjunction,
    #[serde(default, deserialize_with = "text_literal")]
    pub equals: Option<String>,
    #[serde(default, deserialize_with = "text_literal")]
    pub not_equal_to: Option<String>,
    #[serde(default, deserialize_with = "text_literal")]
    pub greater_than: Option<String>,
    #[serde(default, deserialize_with = "text_literal")]
    pub greater_than_or_equal_to: Option<String>,
    #[serde(default, deserialize_with = "text_literal")]
    pub less_than: Option<String>,
    #[serde(default, deserialize_with = "text_literal")]
    pub less_than_or_equal_to: Option<String>,
    #[serde(default, rename = "in", deserialize_with = "text_set")]
    pub in_set: Option<Vec<String>>,
    #[serde(default, deserialize_with = "text_set")]
    pub not_in: Option<Vec<String>>,
    #[serde(default)]
    pub is_null: Option<bool>,
}

impl FilterInput {
    /// Operators whose attribute is set on this clause.
    pub fn set_operators(&self) -> Vec<ComparisonOp> {
        ComparisonOp::ALL
            .into_iter()
            .filter(|op| self.literal_for(*op).is_some())
            .collect()
    }

    fn literal_for(&self, op: ComparisonOp) -> Option<LiteralValue> {
        let text = |v: &Option<String>| v.clone().map(LiteralValue::Text);
        match op {
            ComparisonOp::Equals => text(&self.equals),
            ComparisonOp::NotEqualTo => text(&self.not_equal_to),
            ComparisonOp::GreaterThan => text(&self.greater_than),
            ComparisonOp::GreaterThanOrEqualTo => text(&self.greater_than_or_equal_to),
            ComparisonOp::LessThan => text(&self.less_than),
            ComparisonOp::LessThanOrEqualTo => text(&self.less_than_or_equal_to),
            ComparisonOp::In => self.in_set.clone().map(LiteralValue::TextSet),
            ComparisonOp::NotIn => self.not_in.clone().map(LiteralValue::TextSet),
            ComparisonOp::IsNull => self.is_null.map(LiteralValue::Flag),
        }
    }

    /// What keeps this clause from compiling, if anything.
    pub fn defect(&self) -> Option<ClauseIssueKind> {
        ClauseIssueKind::detect(&self.to_clause())
    }

    /// Converts to a clause. Zero or several set operators leave `comparison`
    /// absent; several are kept in `conflicting`.
    pub fn to_clause(&self) -> FilterClause {
        let operators = self.set_operators();
        let (comparison, literal, conflicting) = match operators.as_slice() {
            [op] => (Some(*op), self.literal_for(*op).unwrap_or_default(), Vec::new()),
            _ => (None, LiteralValue::Absent, operators),
        };
        FilterClause {
            field: self.field.as_deref().map(FieldPath::from),
            comparison,
            literal,
            conjunction: self.conjunction,
            conflicting,
        }
    }
}

fn text_literal<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<String>, D::Error> {
    match Option::<Json>::deserialize(deserializer)? {
        None | Some(Json::Null) => Ok(None),
        Some(Json::String(s)) => Ok(Some(s)),
        Some(Json::Number(n)) => Ok(Some(n.to_string())),
        Some(Json::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected a scalar literal, found {other}"
        ))),
    }
}

fn text_set<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<Vec<String>>, D::Error> {
    match Option::<Json>::deserialize(deserializer)? {
        None | Some(Json::Null) => Ok(None),
        Some(Json::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Json::String(s) => Ok(s),
                Json::Number(n) => Ok(n.to_string()),
                Json::Bool(b) => Ok(b.to_string()),
                other => Err(D::Error::custom(format!(
                    "expected scalar set members, found {other}"
                ))),
            })
            .collect::<std::result::Result<Vec<_>, _>>()
            .map(Some),
        Some(other) => Err(D::Error::custom(format!("expected a list, found {other}"))),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortInput {
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub direction: SortDirection,
}

impl From<SortInput> for SortSpec {
    fn from(input: SortInput) -> Self {
        SortSpec {
            field: input
                .field
                .filter(|f| !f.trim().is_empty())
                .map(FieldPath::from),
            direction: input.direction,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInput {
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub page_size: Option<i64>,
}

impl From<PageInput> for PaginationSpec {
    fn from(input: PageInput) -> Self {
        PaginationSpec::new(input.page, input.page_size)
    }
}

/// Decodes an ordered list of filter clauses. `null` decodes as no clauses.
pub fn decode_filters(json: &Json) -> Result<Vec<FilterInput>> {
    let items = match json {
        Json::Null => return Ok(Vec::new()),
        Json::Array(items) => items,
        other => {
            return Err(SyntaxError::UnexpectedShape {
                what: "filter",
                expected: "a list of clauses",
                found: other.to_string(),
            });
        }
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let input = FilterInput::deserialize(item).map_err(|source| SyntaxError::Malformed {
                what: "filter clause",
                source,
            })?;
            trace!(index, clause = ?input, "decoded filter clause");
            Ok(input)
        })
        .collect()
}

pub fn decode_clauses(json: &Json) -> Result<Vec<FilterClause>> {
    Ok(decode_filters(json)?.iter().map(FilterInput::to_clause).collect())
}

/// Decodes filter clauses carried by an already evaluated argument value.
pub fn clauses_from_value(value: &Value) -> Result<Vec<FilterInput>> {
    decode_filters(&value.to_json())
}

pub fn decode_sort(json: &Json) -> Result<Option<SortSpec>> {
    if json.is_null() {
        return Ok(None);
    }
    let input = SortInput::deserialize(json).map_err(|source| SyntaxError::Malformed {
        what: "sort",
        source,
    })?;
    Ok(Some(input.into()))
}

pub fn decode_page(json: &Json) -> Result<PaginationSpec> {
    if json.is_null() {
        return Ok(PaginationSpec::default());
    }
    let input = PageInput::deserialize(json).map_err(|source| SyntaxError::Malformed {
        what: "page",
        source,
    })?;
    Ok(input.into())
}
