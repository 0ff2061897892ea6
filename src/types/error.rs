use thiserror::Error;

use super::kind::Kind;
use super::quantity::QuantityError;

/// Errors raised while building an environment or type-checking a decision
/// expression against it. All of these are startup-fatal: a process holding
/// one must not proceed to evaluation.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("unknown variable '{name}'")]
    UnknownVariable { name: String },

    #[error("unknown object type '{name}'")]
    UnknownType { name: String },

    #[error("no field '{field}' on type '{object}'")]
    UnknownField { object: String, field: String },

    #[error("unknown function '{name}'")]
    UnknownFunction { name: String },

    #[error("no method '{name}' on {receiver}")]
    UnknownMethod { receiver: Kind, name: String },

    #[error("'{function}' expects {expected} argument(s), got {found}")]
    ArityMismatch {
        function: String,
        expected: usize,
        found: usize,
    },

    #[error("expected {expected}, found {found}")]
    TypeMismatch { expected: Kind, found: Kind },

    #[error("operator '{op}' is not defined for {lhs} and {rhs}")]
    InvalidOperands { op: String, lhs: Kind, rhs: Kind },

    #[error("cannot access field '{field}' on {found}")]
    NotAnObject { field: String, found: Kind },

    #[error("cannot index into {found}")]
    NotAMap { found: Kind },

    #[error("conditional branches disagree: {then_kind} vs {else_kind}")]
    BranchMismatch { then_kind: Kind, else_kind: Kind },

    #[error("expression must evaluate to an integer, found {found}")]
    NotInteger { found: Kind },
}

/// Errors raised while evaluating a compiled policy. Recoverable per claim:
/// the decision loop classifies them and continues with the next claim.
#[derive(Debug, Error)]
pub enum EvalError {
    /// The policy explicitly denied the claim. A business outcome rather
    /// than a failure; carries the reason passed to `deny()`. The rendered
    /// message keeps the `deny:` marker prefix for wire compatibility, but
    /// callers should branch on this variant, never on the prefix.
    #[error("deny: {0}")]
    Deny(String),

    /// The evaluation cost ceiling was tripped mid-evaluation. No partial
    /// result is produced.
    #[error("evaluation cost limit of {limit} exceeded")]
    CostLimitExceeded { limit: u64 },

    #[error("no value bound for variable '{name}'")]
    MissingBinding { name: String },

    #[error("no such key '{key}'")]
    NoSuchKey { key: String },

    #[error("'{function}' requires a {expected} argument, got {found}")]
    BadArgument {
        function: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error(transparent)]
    Quantity(#[from] QuantityError),

    #[error("invalid integer '{0}'")]
    BadInteger(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow")]
    Overflow,

    #[error("unknown function '{name}'")]
    UnknownFunction { name: String },

    #[error("no method '{name}' for receiver")]
    UnknownMethod { name: String },

    /// Dynamic type mismatch that slipped past the static checker. Kept so
    /// evaluation can never panic.
    #[error("expected {expected} value, found {found}")]
    UnexpectedType {
        expected: &'static str,
        found: &'static str,
    },
}

impl EvalError {
    /// The denial reason, if this error is a policy denial.
    #[must_use]
    pub fn deny_reason(&self) -> Option<&str> {
        match self {
            EvalError::Deny(reason) => Some(reason),
            _ => None,
        }
    }
}
