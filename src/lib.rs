//! Policy evaluation core for storage volume resizing.
//!
//! A resize policy is a small typed expression compiled once at startup and
//! evaluated per claim under a cost ceiling. For each claim the decision
//! loop resolves the claim's storage class and volume usage stats, binds
//! them as `pvc`, `sc`, and `stats`, evaluates the policy, and classifies
//! the outcome:
//!
//! - an integer result is the resize byte threshold;
//! - a `deny(reason)` call is an explicit, reasoned refusal;
//! - any other failure marks just that claim as errored;
//! - claims whose class or stats cannot be resolved are skipped.
//!
//! ```
//! use pvc_policy::{bridge, decide, snapshot, Policy, DEFAULT_COST_LIMIT, DEFAULT_POLICY};
//!
//! let env = bridge::policy_env(DEFAULT_COST_LIMIT).unwrap();
//! let policy = Policy::compile(DEFAULT_POLICY, env).unwrap();
//!
//! let claims = snapshot::parse_claims(r#"{"items": []}"#).unwrap();
//! let decisions = decide::run(&policy, &claims, &[], &Default::default());
//! assert!(decisions.is_empty());
//! ```

pub mod bridge;
pub mod decide;
pub mod snapshot;

mod compile;
mod error;
mod evaluate;
mod parse;
mod types;

pub use error::PolicyError;
pub use parse::ParseError;
pub use types::{
    Bindings, ClaimDecision, ClaimSpec, ClaimStatus, CompileError, Decision, Env, EnvBuilder,
    EvalError, Evaluation, FunctionDecl, Kind, ObjectMeta, ObjectSchema, Policy, Quantity,
    QuantityError, StorageClass, Value, VolumeClaim, VolumeStats, DEFAULT_COST_LIMIT,
};

/// The built-in resize policy: annotation-driven guard chain plus a
/// threshold that defaults to 10% of capacity.
pub const DEFAULT_POLICY: &str = include_str!("default.cel");
