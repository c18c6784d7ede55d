use crate::core::data_type::DataType;
use bigdecimal::{BigDecimal, FromPrimitive, ToPrimitive};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, collections::BTreeMap, fmt, hash::Hash, str::FromStr};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Value {
    Int(i64),
    Uint(u64),
    Float(f64),
    Decimal(BigDecimal),
    String(String),
    Boolean(bool),
    Json(serde_json::Value),
    Uuid(Uuid),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
    Enum(String, String),
    StringArray(Vec<String>),
    List(Vec<Value>),
    Record(BTreeMap<String, Value>),
    Null,
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        use Value::*;
        std::mem::discriminant(self).hash(state);
        match self {
            Int(v) => v.hash(state),
            Uint(v) => v.hash(state),
            Float(v) => {
                // Hash the bits of the float to handle NaN and -0.0 correctly
                let bits = v.to_bits();
                bits.hash(state);
            }
            Decimal(v) => v.hash(state),
            String(v) => v.hash(state),
            Boolean(v) => v.hash(state),
            Json(v) => {
                let json_str = serde_json::to_string(v).unwrap_or_default();
                json_str.hash(state);
            }
            Uuid(v) => v.hash(state),
            Date(v) => v.hash(state),
            Timestamp(v) => v.hash(state),
            Enum(name, value) => {
                name.hash(state);
                value.hash(state);
            }
            StringArray(v) => v.hash(state),
            List(v) => v.hash(state),
            Record(v) => v.hash(state),
            Null => {}
        }
    }
}

impl Value {
    pub fn record<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Record(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Uint(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            Value::Decimal(v) => v.to_f64(),
            Value::String(v) => v.parse::<f64>().ok(),
            Value::Boolean(v) => Some(if *v { 1.0 } else { 0.0 }),
            Value::Json(v) => v.as_f64(),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::Uint(v) => i64::try_from(*v).ok(),
            Value::Float(v) if v.fract() == 0.0 => v.to_i64(),
            Value::Decimal(v) if v.is_integer() => v.to_i64(),
            Value::String(v) => v.trim().parse::<i64>().ok(),
            Value::Json(v) => v.as_i64(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Int(v) => Some(*v != 0),
            Value::Uint(v) => Some(*v != 0),
            Value::String(v) => match v.to_lowercase().as_str() {
                "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                _ => None,
            },
            Value::Boolean(v) => Some(*v),
            Value::Json(v) => v.as_bool(),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<Vec<Value>> {
        match self {
            Value::List(items) => Some(items.clone()),
            Value::StringArray(items) => Some(items.iter().cloned().map(Value::String).collect()),
            Value::Json(serde_json::Value::Array(items)) => {
                Some(items.iter().map(Value::from_json).collect())
            }
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Looks up a member of a record value.
    pub fn get(&self, field: &str) -> Option<&Value> {
        match self {
            Value::Record(fields) => fields.get(field),
            _ => None,
        }
    }

    /// Textual projection of the value. Null projects to the empty string.
    pub fn to_text(&self) -> String {
        match self {
            Value::Int(v) => v.to_string(),
            Value::Uint(v) => v.to_string(),
            Value::Float(v) => v.to_string(),
            Value::Decimal(v) => v.to_string(),
            Value::String(v) => v.clone(),
            Value::Boolean(v) => v.to_string(),
            Value::Json(serde_json::Value::String(s)) => s.clone(),
            Value::Json(v) => v.to_string(),
            Value::Uuid(v) => v.to_string(),
            Value::Date(v) => v.format("%Y-%m-%d").to_string(),
            Value::Timestamp(v) => v.to_rfc3339(),
            Value::Enum(_, v) => v.clone(),
            Value::StringArray(v) => v.join(","),
            Value::List(_) | Value::Record(_) => self.to_json().to_string(),
            Value::Null => String::new(),
        }
    }

    /// Total-ish ordering used by comparisons and sorting. Null orders first.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        use Value::*;
        match (self, other) {
            (Null, Null) => Some(Ordering::Equal),
            (Null, _) => Some(Ordering::Less),
            (_, Null) => Some(Ordering::Greater),
            (Int(a), Int(b)) => Some(a.cmp(b)),
            (Uint(a), Uint(b)) => Some(a.cmp(b)),
            (Int(a), Uint(b)) => Some((*a as i128).cmp(&(*b as i128))),
            (Uint(a), Int(b)) => Some((*a as i128).cmp(&(*b as i128))),
            (Float(a), Float(b)) => a.partial_cmp(b),
            (Int(_) | Uint(_), Float(b)) => self.as_f64()?.partial_cmp(b),
            (Float(a), Int(_) | Uint(_)) => a.partial_cmp(&other.as_f64()?),
            (Decimal(a), Decimal(b)) => Some(a.cmp(b)),
            (Decimal(a), Int(b)) => Some(a.cmp(&BigDecimal::from(*b))),
            (Int(a), Decimal(b)) => Some(BigDecimal::from(*a).cmp(b)),
            (Decimal(a), Uint(b)) => Some(a.cmp(&BigDecimal::from(*b))),
            (Uint(a), Decimal(b)) => Some(BigDecimal::from(*a).cmp(b)),
            (Decimal(a), Float(b)) => a.to_f64()?.partial_cmp(b),
            (Float(a), Decimal(b)) => a.partial_cmp(&b.to_f64()?),
            (String(a), String(b)) => Some(a.cmp(b)),
            (Enum(_, a), Enum(_, b)) => Some(a.cmp(b)),
            (Enum(_, a), String(b)) | (String(a), Enum(_, b)) => Some(a.cmp(b)),
            (Boolean(a), Boolean(b)) => Some(a.cmp(b)),
            (Uuid(a), Uuid(b)) => Some(a.cmp(b)),
            (Date(a), Date(b)) => Some(a.cmp(b)),
            (Timestamp(a), Timestamp(b)) => Some(a.cmp(b)),
            (Date(a), Timestamp(b)) => Some(a.and_hms_opt(0, 0, 0)?.and_utc().cmp(b)),
            (Timestamp(a), Date(b)) => Some(a.cmp(&b.and_hms_opt(0, 0, 0)?.and_utc())),
            (Json(a), Json(b)) => Some(a.to_string().cmp(&b.to_string())),
            _ => None,
        }
    }

    pub fn equal(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::List(a), Value::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(l, r)| l.equal(r))
            }
            (Value::Record(a), Value::Record(b)) => a == b,
            (Value::StringArray(a), Value::StringArray(b)) => a == b,
            _ => self.compare(other) == Some(Ordering::Equal),
        }
    }

    pub fn data_type(&self) -> DataType {
        match self {
            Value::Int(_) => DataType::Long,
            Value::Uint(_) => DataType::IntUnsigned,
            Value::Float(_) => DataType::Double,
            Value::Decimal(_) => DataType::Decimal,
            Value::String(_) => DataType::String,
            Value::Boolean(_) => DataType::Boolean,
            Value::Json(_) => DataType::Json,
            Value::Uuid(_) => DataType::Uuid,
            Value::Date(_) => DataType::Date,
            Value::Timestamp(_) => DataType::Timestamp,
            Value::Enum(_, _) => DataType::Enum,
            Value::StringArray(_) | Value::List(_) | Value::Record(_) => DataType::Json,
            Value::Null => DataType::Null,
        }
    }

    /// Parses a raw literal as the given declared type.
    pub fn parse_as(text: &str, target: &DataType) -> Option<Value> {
        let trimmed = text.trim();
        match target {
            DataType::Boolean => trimmed.to_lowercase().parse::<bool>().ok().map(Value::Boolean),
            DataType::Short | DataType::Int | DataType::Long => trimmed
                .parse::<i64>()
                .ok()
                .map(Value::Int)
                .filter(|v| v.fits(target)),
            DataType::IntUnsigned => trimmed.parse::<u64>().ok().map(Value::Uint),
            DataType::Float | DataType::Double => trimmed.parse::<f64>().ok().map(Value::Float),
            DataType::Decimal => BigDecimal::from_str(trimmed).ok().map(Value::Decimal),
            DataType::Uuid => Uuid::parse_str(trimmed).ok().map(Value::Uuid),
            DataType::Date => parse_date(trimmed).map(Value::Date),
            DataType::Timestamp => parse_timestamp(trimmed).map(Value::Timestamp),
            DataType::Json => serde_json::from_str(trimmed).ok().map(Value::Json),
            DataType::Null => None,
            DataType::String | DataType::Char | DataType::Enum | DataType::Custom(_) => {
                Some(Value::String(text.to_string()))
            }
        }
    }

    /// Converts the value to the declared type, if a lossless conversion exists.
    pub fn coerce_to(&self, target: &DataType) -> Option<Value> {
        if self.is_null() {
            return Some(Value::Null);
        }
        if target.is_compatible(&self.data_type()) {
            return Some(self.clone()).filter(|v| v.fits(target));
        }
        match (self, target) {
            (Value::String(s), _) => Value::parse_as(s, target),
            (Value::Json(serde_json::Value::String(s)), _) => Value::parse_as(s, target),
            (Value::Enum(_, v), t) if t.is_textual() => Some(Value::String(v.clone())),
            (_, t) if t.is_textual() => Some(Value::String(self.to_text())),
            (_, DataType::Short | DataType::Int | DataType::Long) => {
                self.as_i64().map(Value::Int).filter(|v| v.fits(target))
            }
            (_, DataType::IntUnsigned) => self
                .as_i64()
                .and_then(|v| u64::try_from(v).ok())
                .map(Value::Uint),
            (_, DataType::Float | DataType::Double) => self.as_f64().map(Value::Float),
            (Value::Int(v), DataType::Decimal) => Some(Value::Decimal(BigDecimal::from(*v))),
            (Value::Uint(v), DataType::Decimal) => Some(Value::Decimal(BigDecimal::from(*v))),
            (Value::Float(v), DataType::Decimal) => BigDecimal::from_f64(*v).map(Value::Decimal),
            (Value::Timestamp(v), DataType::Date) => Some(Value::Date(v.date_naive())),
            (Value::Date(v), DataType::Timestamp) => {
                Some(Value::Timestamp(v.and_hms_opt(0, 0, 0)?.and_utc()))
            }
            (_, DataType::Boolean) => self.as_bool().map(Value::Boolean),
            (_, DataType::Json) => Some(Value::Json(self.to_json())),
            _ => None,
        }
    }

    /// False for an integer outside the range of a narrower integer type.
    fn fits(&self, target: &DataType) -> bool {
        match (self, target) {
            (Value::Int(v), DataType::Short) => i16::try_from(*v).is_ok(),
            (Value::Int(v), DataType::Int) => i32::try_from(*v).is_ok(),
            _ => true,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;
        match self {
            Value::Int(v) => Json::from(*v),
            Value::Uint(v) => Json::from(*v),
            Value::Float(v) => Json::from(*v),
            Value::Boolean(v) => Json::Bool(*v),
            Value::Json(v) => v.clone(),
            Value::StringArray(v) => Json::Array(v.iter().cloned().map(Json::String).collect()),
            Value::List(v) => Json::Array(v.iter().map(Value::to_json).collect()),
            Value::Record(fields) => Json::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Value::Null => Json::Null,
            other => Json::String(other.to_text()),
        }
    }

    pub fn from_json(json: &serde_json::Value) -> Value {
        use serde_json::Value as Json;
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Boolean(*b),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::Uint(u)
                } else {
                    n.as_f64().map(Value::Float).unwrap_or(Value::Null)
                }
            }
            Json::String(s) => Value::String(s.clone()),
            Json::Array(items) => Value::List(items.iter().map(Value::from_json).collect()),
            Json::Object(fields) => Value::Record(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::from_json(v)))
                    .collect(),
            ),
        }
    }
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_timestamp(text).map(|ts| ts.date_naive()))
}

fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Uint(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Decimal(v) => write!(f, "{v}m"),
            Value::String(v) => write!(f, "\"{}\"", v.replace('"', "\\\"")),
            Value::Boolean(v) => write!(f, "{v}"),
            Value::Json(v) => write!(f, "{v}"),
            Value::Uuid(v) => write!(f, "\"{v}\""),
            Value::Date(v) => write!(f, "\"{}\"", v.format("%Y-%m-%d")),
            Value::Timestamp(v) => write!(f, "\"{}\"", v.to_rfc3339()),
            Value::Enum(_, v) => write!(f, "{v}"),
            Value::StringArray(v) => {
                let items = v
                    .iter()
                    .map(|s| format!("\"{}\"", s.replace('"', "\\\"")))
                    .collect::<Vec<String>>()
                    .join(", ");
                write!(f, "[{items}]")
            }
            Value::List(v) => {
                let items = v
                    .iter()
                    .map(|item| item.to_string())
                    .collect::<Vec<String>>()
                    .join(", ");
                write!(f, "[{items}]")
            }
            Value::Record(fields) => {
                let items = fields
                    .iter()
                    .map(|(k, v)| format!("{k}: {v}"))
                    .collect::<Vec<String>>()
                    .join(", ");
                write!(f, "{{{items}}}")
            }
            Value::Null => write!(f, "null"),
        }
    }
}
