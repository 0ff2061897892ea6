use crate::parse::ParseError;
use crate::types::CompileError;

/// Startup-fatal errors: anything that prevents a policy from being loaded
/// and compiled. Per-evaluation failures are [`EvalError`](crate::EvalError)
/// instead.
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
