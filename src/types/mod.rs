mod env;
mod error;
mod expr;
mod functions;
mod kind;
mod outcome;
mod policy;
mod quantity;
mod resources;
mod value;

pub use env::{Bindings, Env, EnvBuilder, ObjectSchema, DEFAULT_COST_LIMIT};
pub use error::{CompileError, EvalError};
pub use expr::{BinOp, Expr, UnOp};
pub use functions::{FunctionDecl, FunctionRegistry};
pub use kind::Kind;
pub use outcome::{ClaimDecision, Decision};
pub use policy::{Evaluation, Policy};
pub use quantity::{Quantity, QuantityError};
pub use resources::{ClaimSpec, ClaimStatus, ObjectMeta, StorageClass, VolumeClaim, VolumeStats};
pub use value::Value;

pub(crate) use functions::{deny, quantity_as_integer};
