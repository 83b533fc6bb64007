//! The document value type.
//!
//! A datum is an opaque, immutable, structurally-typed value (object, array
//! or scalar) exchanged with the table engine. Copies are logically
//! independent. Numbers are doubles, like the wire format they come from.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{DatumError, DatumResult};

/// A structured document value.
#[derive(Debug, Clone, PartialEq)]
pub enum Datum {
    /// Null/missing value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Numeric value (64-bit float).
    Num(f64),
    /// UTF-8 string.
    Str(String),
    /// Ordered sequence of datums.
    Array(Vec<Datum>),
    /// Field-name keyed mapping.
    Object(BTreeMap<String, Datum>),
}

/// The structural type of a datum, for introspection and error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatumType {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl fmt::Display for DatumType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DatumType::Null => "NULL",
            DatumType::Bool => "BOOL",
            DatumType::Number => "NUMBER",
            DatumType::String => "STRING",
            DatumType::Array => "ARRAY",
            DatumType::Object => "OBJECT",
        };
        write!(f, "{name}")
    }
}

impl Datum {
    /// An empty object datum.
    pub fn empty_object() -> Self {
        Datum::Object(BTreeMap::new())
    }

    /// The structural type of this datum.
    pub fn datum_type(&self) -> DatumType {
        match self {
            Datum::Null => DatumType::Null,
            Datum::Bool(_) => DatumType::Bool,
            Datum::Num(_) => DatumType::Number,
            Datum::Str(_) => DatumType::String,
            Datum::Array(_) => DatumType::Array,
            Datum::Object(_) => DatumType::Object,
        }
    }

    /// Returns true if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Datum::Null)
    }

    /// Returns true if this is an object.
    pub fn is_object(&self) -> bool {
        matches!(self, Datum::Object(_))
    }

    /// Get as boolean if this is a Bool value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Datum::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as number if this is a Num value.
    pub fn as_num(&self) -> Option<f64> {
        match self {
            Datum::Num(n) => Some(*n),
            _ => None,
        }
    }

    /// Get as string reference if this is a Str value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Datum::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Get as element slice if this is an Array value.
    pub fn as_array(&self) -> Option<&[Datum]> {
        match self {
            Datum::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Get as field map if this is an Object value.
    pub fn as_object(&self) -> Option<&BTreeMap<String, Datum>> {
        match self {
            Datum::Object(fields) => Some(fields),
            _ => None,
        }
    }

    /// Get as string or fail with a type error.
    pub fn try_as_str(&self) -> DatumResult<&str> {
        self.as_str()
            .ok_or_else(|| DatumError::type_mismatch(DatumType::String, self.datum_type()))
    }

    /// Get as boolean or fail with a type error.
    pub fn try_as_bool(&self) -> DatumResult<bool> {
        self.as_bool()
            .ok_or_else(|| DatumError::type_mismatch(DatumType::Bool, self.datum_type()))
    }

    /// Get as field map or fail with a type error.
    pub fn try_as_object(&self) -> DatumResult<&BTreeMap<String, Datum>> {
        self.as_object()
            .ok_or_else(|| DatumError::type_mismatch(DatumType::Object, self.datum_type()))
    }

    /// Look up a top-level field. Returns None for missing fields and for
    /// non-object datums.
    pub fn get_field(&self, name: &str) -> Option<&Datum> {
        self.as_object().and_then(|fields| fields.get(name))
    }

    /// Look up a top-level field, failing on non-objects and missing
    /// fields.
    pub fn field(&self, name: &str) -> DatumResult<&Datum> {
        self.try_as_object()?
            .get(name)
            .ok_or_else(|| DatumError::missing_field(name))
    }

    /// Convert a JSON value into a datum.
    pub fn from_json(value: serde_json::Value) -> Self {
        Self::from(value)
    }

    /// Render this datum as a JSON value. Non-finite numbers become null.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Datum::Null => serde_json::Value::Null,
            Datum::Bool(b) => serde_json::Value::Bool(*b),
            Datum::Num(n) => {
                // Integral values render as JSON integers, not "1.0".
                if n.fract() == 0.0 && *n >= i64::MIN as f64 && *n <= i64::MAX as f64 {
                    serde_json::Value::Number(serde_json::Number::from(*n as i64))
                } else {
                    serde_json::Number::from_f64(*n)
                        .map(serde_json::Value::Number)
                        .unwrap_or(serde_json::Value::Null)
                }
            }
            Datum::Str(s) => serde_json::Value::String(s.clone()),
            Datum::Array(items) => {
                serde_json::Value::Array(items.iter().map(Datum::to_json).collect())
            }
            Datum::Object(fields) => serde_json::Value::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

impl fmt::Display for Datum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Datum::Null => write!(f, "null"),
            Datum::Bool(b) => write!(f, "{b}"),
            Datum::Num(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{n}")
                }
            }
            Datum::Str(s) => write!(f, "{s:?}"),
            Datum::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Datum::Object(fields) => {
                write!(f, "{{")?;
                for (i, (key, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key:?}: {value}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<bool> for Datum {
    fn from(v: bool) -> Self {
        Datum::Bool(v)
    }
}

impl From<f64> for Datum {
    fn from(v: f64) -> Self {
        Datum::Num(v)
    }
}

impl From<i64> for Datum {
    fn from(v: i64) -> Self {
        Datum::Num(v as f64)
    }
}

impl From<usize> for Datum {
    fn from(v: usize) -> Self {
        Datum::Num(v as f64)
    }
}

impl From<&str> for Datum {
    fn from(v: &str) -> Self {
        Datum::Str(v.to_string())
    }
}

impl From<String> for Datum {
    fn from(v: String) -> Self {
        Datum::Str(v)
    }
}

impl From<Vec<Datum>> for Datum {
    fn from(v: Vec<Datum>) -> Self {
        Datum::Array(v)
    }
}

impl From<serde_json::Value> for Datum {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Datum::Null,
            serde_json::Value::Bool(b) => Datum::Bool(b),
            serde_json::Value::Number(n) => Datum::Num(n.as_f64().unwrap_or(0.0)),
            serde_json::Value::String(s) => Datum::Str(s),
            serde_json::Value::Array(items) => {
                Datum::Array(items.into_iter().map(Datum::from).collect())
            }
            serde_json::Value::Object(fields) => Datum::Object(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, Datum::from(v)))
                    .collect(),
            ),
        }
    }
}

/// Helper macro to build object datums.
#[macro_export]
macro_rules! obj {
    () => {
        $crate::Datum::empty_object()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = std::collections::BTreeMap::new();
        $(
            map.insert($key.to_string(), $crate::Datum::from($value));
        )+
        $crate::Datum::Object(map)
    }};
}
