use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::{borrow::Cow, collections::HashMap, fmt};

/// Declared scalar type of a schema member or argument.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum DataType {
    Boolean,
    Short,
    Int,
    Long,
    IntUnsigned,
    Float,
    Double,
    Decimal,
    String,
    Char,
    Uuid,
    Date,
    Timestamp,
    Json,
    Enum,
    Null,
    Custom(String),
}

lazy_static! {
    static ref SCALAR_TYPE_MAP: HashMap<&'static str, DataType> = build_scalar_type_map();
}

impl DataType {
    /// Maps a schema scalar name (`Int`, `String`, `ID`, ...) to its data type.
    pub fn from_scalar_name(name: &str) -> Result<Self, String> {
        let normalized = Self::normalize_type_name(name);
        SCALAR_TYPE_MAP
            .get(normalized.as_str())
            .cloned()
            .ok_or_else(|| format!("Unknown scalar type: {name}"))
    }

    pub fn scalar_name(&self) -> Cow<'_, str> {
        match self {
            DataType::Boolean => Cow::Borrowed("Boolean"),
            DataType::Short | DataType::Int => Cow::Borrowed("Int"),
            DataType::Long => Cow::Borrowed("Long"),
            DataType::IntUnsigned => Cow::Borrowed("UInt"),
            DataType::Float | DataType::Double => Cow::Borrowed("Float"),
            DataType::Decimal => Cow::Borrowed("Decimal"),
            DataType::String | DataType::Char => Cow::Borrowed("String"),
            DataType::Uuid => Cow::Borrowed("ID"),
            DataType::Date => Cow::Borrowed("Date"),
            DataType::Timestamp => Cow::Borrowed("DateTime"),
            DataType::Json => Cow::Borrowed("JSON"),
            DataType::Enum => Cow::Borrowed("Enum"),
            DataType::Null => Cow::Borrowed("Null"),
            DataType::Custom(name) => Cow::Borrowed(name),
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            DataType::Short | DataType::Int | DataType::Long | DataType::IntUnsigned
        )
    }

    pub fn is_textual(&self) -> bool {
        matches!(
            self,
            DataType::String | DataType::Char | DataType::Enum | DataType::Custom(_)
        )
    }

    /// Whether a value of type `other` can stand in for `self` without conversion.
    pub fn is_compatible(&self, other: &DataType) -> bool {
        match (self, other) {
            (DataType::Short, DataType::Int)
            | (DataType::Int, DataType::Short)
            | (DataType::Int, DataType::Long)
            | (DataType::Long, DataType::Int)
            | (DataType::Short, DataType::Long)
            | (DataType::Long, DataType::Short) => true,
            (DataType::Float, DataType::Double) | (DataType::Double, DataType::Float) => true,
            (DataType::String, DataType::Char) | (DataType::Char, DataType::String) => true,
            (DataType::Enum, DataType::String) | (DataType::String, DataType::Enum) => true,
            (DataType::Custom(_), DataType::String) => true,
            _ => self == other,
        }
    }

    fn normalize_type_name(type_name: &str) -> String {
        type_name.trim().trim_end_matches('!').to_uppercase()
    }
}

impl TryFrom<&str> for DataType {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        DataType::from_scalar_name(s)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.scalar_name())
    }
}

fn build_scalar_type_map() -> HashMap<&'static str, DataType> {
    use DataType::*;

    let entries = [
        ("BOOLEAN", Boolean),
        ("BOOL", Boolean),
        ("SHORT", Short),
        ("INT", Int),
        ("INTEGER", Int),
        ("LONG", Long),
        ("UINT", IntUnsigned),
        ("FLOAT", Float),
        ("DOUBLE", Double),
        ("DECIMAL", Decimal),
        ("STRING", String),
        ("CHAR", Char),
        ("ID", Uuid),
        ("UUID", Uuid),
        ("DATE", Date),
        ("DATETIME", Timestamp),
        ("TIMESTAMP", Timestamp),
        ("JSON", Json),
        ("ENUM", Enum),
    ];

    let mut map = HashMap::new();
    for (name, data_type) in entries {
        map.insert(name, data_type);
    }
    map
}
