use std::collections::BTreeMap;
use std::fmt;

use super::kind::Kind;
use super::quantity::Quantity;

/// Runtime values flowing through expression evaluation.
///
/// `Map` holds string-keyed string maps (annotations, capacity); `Object`
/// holds a bridged host structure with fields keyed by their serde names.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Bool(bool),
    String(String),
    Quantity(Quantity),
    Map(BTreeMap<String, String>),
    Object(BTreeMap<String, Value>),
}

impl Value {
    /// Short name of this value's dynamic type, for diagnostics.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Bool(_) => "bool",
            Value::String(_) => "string",
            Value::Quantity(_) => "quantity",
            Value::Map(_) => "map",
            Value::Object(_) => "object",
        }
    }

    /// The static [`Kind`] of this value, where one exists. Objects carry no
    /// schema name at runtime and return `None`; method dispatch only needs
    /// scalar receivers.
    pub(crate) fn kind(&self) -> Option<Kind> {
        match self {
            Value::Int(_) => Some(Kind::Int),
            Value::Bool(_) => Some(Kind::Bool),
            Value::String(_) => Some(Kind::String),
            Value::Quantity(_) => Some(Kind::Quantity),
            Value::Map(_) => Some(Kind::StringMap),
            Value::Object(_) => None,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Quantity> for Value {
    fn from(v: Quantity) -> Self {
        Value::Quantity(v)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "\"{v}\""),
            Value::Quantity(v) => write!(f, "{v}"),
            Value::Map(m) => write!(f, "map({} entries)", m.len()),
            Value::Object(o) => write!(f, "object({} fields)", o.len()),
        }
    }
}
