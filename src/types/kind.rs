use std::fmt;

/// Static types known to the expression compiler.
///
/// Every expression is checked to exactly one `Kind` before evaluation;
/// the evaluator never sees an ill-typed program.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Kind {
    /// A 64-bit signed integer.
    Int,
    /// A boolean value.
    Bool,
    /// A UTF-8 string.
    String,
    /// A numeric value with a unit suffix, convertible to exact bytes.
    Quantity,
    /// A string-keyed map of strings (annotations, capacity).
    StringMap,
    /// A registered host object type, addressed by schema name.
    Object(&'static str),
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Int => write!(f, "int"),
            Kind::Bool => write!(f, "bool"),
            Kind::String => write!(f, "string"),
            Kind::Quantity => write!(f, "quantity"),
            Kind::StringMap => write!(f, "map<string, string>"),
            Kind::Object(name) => write!(f, "{name}"),
        }
    }
}
