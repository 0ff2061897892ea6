use super::env::{Bindings, Env};
use super::error::{CompileError, EvalError};
use super::expr::Expr;
use super::kind::Kind;
use super::value::Value;

/// A compiled decision expression bound to its environment.
///
/// Compiled once at startup and immutable thereafter; safe to evaluate
/// repeatedly, and from multiple threads over disjoint bindings.
///
/// # Example
///
/// ```
/// use pvc_policy::{Bindings, Env, Kind, Policy, Value};
///
/// let env = Env::builder().variable("n", Kind::Int).build().unwrap();
/// let policy = Policy::compile("n * 2", env).unwrap();
///
/// let out = policy.evaluate(&Bindings::new().bind("n", Value::Int(21))).unwrap();
/// assert_eq!(out.value, Value::Int(42));
/// ```
#[derive(Debug, Clone)]
pub struct Policy {
    expr: Expr,
    env: Env,
}

/// A successful evaluation: the computed value plus the cost actually
/// consumed (as opposed to the environment's ceiling).
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub value: Value,
    pub cost: u64,
}

impl Policy {
    /// Parse and type-check `source` against `env`.
    ///
    /// The expression's static result type must be an integer; anything else
    /// is rejected at compile time because the decision loop only interprets
    /// integer and error outcomes.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError`](crate::PolicyError) on parse failure, type
    /// error, or a non-integer result type. All are startup-fatal.
    pub fn compile(source: &str, env: Env) -> Result<Self, crate::PolicyError> {
        let expr = crate::parse::parse(source)?;
        let kind = crate::compile::check(&expr, &env)?;
        if kind != Kind::Int {
            return Err(CompileError::NotInteger { found: kind }.into());
        }
        Ok(Self { expr, env })
    }

    /// Evaluate against one set of bindings under the environment's cost
    /// ceiling.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError`] on denial, budget exhaustion, or any runtime
    /// failure. All are recoverable per evaluation.
    pub fn evaluate(&self, bindings: &Bindings) -> Result<Evaluation, EvalError> {
        crate::evaluate::evaluate(&self.expr, &self.env, bindings)
    }

    /// The environment this policy was compiled against.
    #[must_use]
    pub fn env(&self) -> &Env {
        &self.env
    }
}
