use std::any::Any;
use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde_json::Number;

use crate::converter::types::builtin;
use crate::converter::TypeInfo;

/// Renderable form of a value, as handed to the log sink.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Decimal(BigDecimal),
    String(String),
    List(Vec<Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Renders the value for structured output. Numbers keep their JSON number type,
    /// non-finite floats become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(x) => serde_json::Value::Bool(*x),
            Self::Int(x) => serde_json::Value::Number(Number::from(*x)),
            Self::UInt(x) => serde_json::Value::Number(Number::from(*x)),
            Self::Float(x) => Number::from_f64(*x).map(serde_json::Value::Number).unwrap_or(serde_json::Value::Null),
            Self::Decimal(x) => Number::from_str(&x.to_string())
                .map(serde_json::Value::Number)
                .unwrap_or_else(|_| serde_json::Value::String(x.to_string())),
            Self::String(x) => serde_json::Value::String(x.clone()),
            Self::List(x) => serde_json::Value::Array(x.iter().map(Value::to_json).collect()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(x) => write!(f, "{}", x),
            Self::Int(x) => write!(f, "{}", x),
            Self::UInt(x) => write!(f, "{}", x),
            Self::Float(x) => write!(f, "{}", x),
            Self::Decimal(x) => write!(f, "{}", x),
            Self::String(x) => f.write_str(x),
            Self::List(x) => {
                f.write_str("[")?;
                for (i, value) in x.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                f.write_str("]")
            },
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Self::UInt(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// A runtime value that can be passed to the interceptor.
///
/// [`Self::to_value`] is the identity rendering used when no converter applies. Use the
/// [`loggable`](crate::loggable) macro to implement it for your own types.
pub trait Loggable: Any {
    fn type_info(&self) -> &'static TypeInfo;

    fn to_value(&self) -> Value;

    fn as_any(&self) -> &dyn Any;
}

crate::loggable!(() => &builtin::UNIT, |_value| Value::Null);
crate::loggable!(bool => &builtin::BOOL, |value| Value::Bool(*value));
crate::loggable!(i32 => &builtin::I32, |value| Value::Int(*value as i64));
crate::loggable!(i64 => &builtin::I64, |value| Value::Int(*value));
crate::loggable!(u32 => &builtin::U32, |value| Value::UInt(*value as u64));
crate::loggable!(u64 => &builtin::U64, |value| Value::UInt(*value));
crate::loggable!(usize => &builtin::USIZE, |value| Value::UInt(*value as u64));
crate::loggable!(f32 => &builtin::F32, |value| Value::Float(*value as f64));
crate::loggable!(f64 => &builtin::F64, |value| Value::Float(*value));
crate::loggable!(BigDecimal => &builtin::DECIMAL, |value| Value::Decimal(value.clone()));
crate::loggable!(String => &builtin::STRING, |value| Value::String(value.clone()));
crate::loggable!(&'static str => &builtin::STRING, |value| Value::String(value.to_string()));
