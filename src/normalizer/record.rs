// src/normalizer/record.rs

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};

/// Leaf value of a record. Dates travel as ISO-8601 strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

impl Scalar {
    /// Loose truthiness used for flags coming from older clients
    /// (`true`, `1`, `"1"`, `"true"`).
    pub fn is_truthy(&self) -> bool {
        match self {
            Scalar::Null => false,
            Scalar::Bool(b) => *b,
            Scalar::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
            Scalar::String(s) => {
                let s = s.trim();
                !(s.is_empty() || s == "0" || s.eq_ignore_ascii_case("false"))
            }
        }
    }
}

/// A record value: a scalar, a nested record or a list of values.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Scalar(Scalar),
    Record(Record),
    List(Vec<Field>),
}

impl Field {
    pub fn is_null(&self) -> bool {
        matches!(self, Field::Scalar(Scalar::Null))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Field::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }
}

impl From<Value> for Field {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Field::Scalar(Scalar::Null),
            Value::Bool(b) => Field::Scalar(Scalar::Bool(b)),
            Value::Number(n) => Field::Scalar(Scalar::Number(n)),
            Value::String(s) => Field::Scalar(Scalar::String(s)),
            Value::Array(items) => Field::List(items.into_iter().map(Field::from).collect()),
            Value::Object(map) => Field::Record(map.into_iter().map(|(k, v)| (k, Field::from(v))).collect()),
        }
    }
}

impl From<Field> for Value {
    fn from(field: Field) -> Self {
        match field {
            Field::Scalar(Scalar::Null) => Value::Null,
            Field::Scalar(Scalar::Bool(b)) => Value::Bool(b),
            Field::Scalar(Scalar::Number(n)) => Value::Number(n),
            Field::Scalar(Scalar::String(s)) => Value::String(s),
            Field::Record(record) => record.into(),
            Field::List(items) => Value::Array(items.into_iter().map(Value::from).collect()),
        }
    }
}

impl From<bool> for Field {
    fn from(b: bool) -> Self { Field::Scalar(Scalar::Bool(b)) }
}

impl From<i64> for Field {
    fn from(n: i64) -> Self { Field::Scalar(Scalar::Number(n.into())) }
}

impl From<&str> for Field {
    fn from(s: &str) -> Self { Field::Scalar(Scalar::String(s.to_owned())) }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Field::Scalar(scalar) => scalar.serialize(serializer),
            Field::Record(record) => record.serialize(serializer),
            Field::List(items) => items.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Field {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Field::from)
    }
}

/// Ordered mapping of field name to value.
///
/// Insertion order is kept; inserting an existing key replaces its value in
/// place, which is what gives renaming its "later key wins" behaviour.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(IndexMap<String, Field>);

#[derive(Debug, thiserror::Error)]
#[error("expected a JSON object, found {0}")]
pub struct NotARecord(&'static str);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Field>) -> Option<Field> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Field> {
        self.0.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Field)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Field)>>(iter: I) -> Self {
        Record(iter.into_iter().collect())
    }
}

impl TryFrom<Value> for Record {
    type Error = NotARecord;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match Field::from(value) {
            Field::Record(record) => Ok(record),
            Field::List(_) => Err(NotARecord("an array")),
            Field::Scalar(Scalar::Null) => Err(NotARecord("null")),
            Field::Scalar(_) => Err(NotARecord("a scalar")),
        }
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Object(record.0.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
    }
}

impl From<Record> for Field {
    fn from(record: Record) -> Self { Field::Record(record) }
}
