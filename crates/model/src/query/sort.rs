use crate::core::identifiers::FieldPath;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    #[serde(rename = "ASC", alias = "asc")]
    Ascending,
    #[serde(rename = "DESC", alias = "desc")]
    Descending,
}

/// Ordering request. Without a field the sequence keeps (or reverses) its order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: Option<FieldPath>,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn ascending(field: impl Into<FieldPath>) -> Self {
        Self {
            field: Some(field.into()),
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(field: impl Into<FieldPath>) -> Self {
        Self {
            field: Some(field.into()),
            direction: SortDirection::Descending,
        }
    }

    pub fn reversed() -> Self {
        Self {
            field: None,
            direction: SortDirection::Descending,
        }
    }
}
