use std::collections::HashMap;

use super::error::EvalError;
use super::kind::Kind;
use super::quantity::Quantity;
use super::value::Value;

/// Implementation of a registered function. Receives already-evaluated
/// arguments; for methods the receiver is prepended to the slice.
pub type FunctionImpl = fn(&[Value]) -> Result<Value, EvalError>;

/// Cost charged for a call whose declaration does not estimate its own.
/// Deliberately conservative so unestimated custom functions eat into the
/// budget faster than built-ins.
pub(crate) const DEFAULT_CALL_COST: u64 = 10;

/// Declaration of a callable operation: signature, per-call evaluation cost,
/// and implementation.
#[derive(Debug, Clone)]
pub struct FunctionDecl {
    name: String,
    receiver: Option<Kind>,
    params: Vec<Kind>,
    ret: Kind,
    cost: u64,
    imp: FunctionImpl,
}

impl FunctionDecl {
    /// Declare a free function.
    #[must_use]
    pub fn function(name: &str, params: Vec<Kind>, ret: Kind, imp: FunctionImpl) -> Self {
        Self {
            name: name.to_owned(),
            receiver: None,
            params,
            ret,
            cost: DEFAULT_CALL_COST,
            imp,
        }
    }

    /// Declare a method on a scalar receiver kind. `params` excludes the
    /// receiver.
    #[must_use]
    pub fn method(receiver: Kind, name: &str, params: Vec<Kind>, ret: Kind, imp: FunctionImpl) -> Self {
        Self {
            name: name.to_owned(),
            receiver: Some(receiver),
            params,
            ret,
            cost: DEFAULT_CALL_COST,
            imp,
        }
    }

    /// Override the per-call cost estimate.
    #[must_use]
    pub fn with_cost(mut self, cost: u64) -> Self {
        self.cost = cost;
        self
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn params(&self) -> &[Kind] {
        &self.params
    }

    pub(crate) fn ret(&self) -> &Kind {
        &self.ret
    }

    pub(crate) fn cost(&self) -> u64 {
        self.cost
    }

    pub(crate) fn call(&self, args: &[Value]) -> Result<Value, EvalError> {
        (self.imp)(args)
    }
}

/// Registered callable operations, looked up by name (free functions) or by
/// receiver kind and name (methods).
#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, FunctionDecl>,
    methods: HashMap<(Kind, String), FunctionDecl>,
}

impl FunctionRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn register(&mut self, decl: FunctionDecl) {
        match &decl.receiver {
            Some(receiver) => {
                self.methods
                    .insert((receiver.clone(), decl.name.clone()), decl);
            }
            None => {
                self.functions.insert(decl.name.clone(), decl);
            }
        }
    }

    pub(crate) fn function(&self, name: &str) -> Option<&FunctionDecl> {
        self.functions.get(name)
    }

    pub(crate) fn method(&self, receiver: &Kind, name: &str) -> Option<&FunctionDecl> {
        self.methods.get(&(receiver.clone(), name.to_owned()))
    }
}

/// Built-in functions available in every environment.
pub(crate) fn builtins() -> Vec<FunctionDecl> {
    vec![
        FunctionDecl::function("quantity", vec![Kind::String], Kind::Quantity, quantity_from_string)
            .with_cost(3),
        FunctionDecl::function("int", vec![Kind::String], Kind::Int, int_from_string).with_cost(2),
        FunctionDecl::method(Kind::String, "startsWith", vec![Kind::String], Kind::Bool, starts_with)
            .with_cost(1),
        FunctionDecl::method(Kind::String, "endsWith", vec![Kind::String], Kind::Bool, ends_with)
            .with_cost(1),
        FunctionDecl::method(Kind::String, "trimSuffix", vec![Kind::String], Kind::String, trim_suffix)
            .with_cost(1),
    ]
}

fn found(args: &[Value]) -> &'static str {
    args.first().map_or("nothing", Value::kind_name)
}

/// `deny(reason)`: declared to return an integer so it can stand in for a
/// branch of an integer conditional, but never returns a value. Always
/// raises the distinguished denial error carrying `reason`.
pub(crate) fn deny(args: &[Value]) -> Result<Value, EvalError> {
    match args {
        [Value::String(reason)] => Err(EvalError::Deny(reason.clone())),
        _ => Err(EvalError::BadArgument {
            function: "deny",
            expected: "string",
            found: found(args),
        }),
    }
}

/// `quantityAsInteger(q)`: the exact byte count of a quantity value.
pub(crate) fn quantity_as_integer(args: &[Value]) -> Result<Value, EvalError> {
    match args {
        [Value::Quantity(q)] => Ok(Value::Int(q.as_i64())),
        _ => Err(EvalError::BadArgument {
            function: "quantityAsInteger",
            expected: "quantity",
            found: found(args),
        }),
    }
}

fn quantity_from_string(args: &[Value]) -> Result<Value, EvalError> {
    match args {
        [Value::String(s)] => Ok(Value::Quantity(s.parse::<Quantity>()?)),
        _ => Err(EvalError::BadArgument {
            function: "quantity",
            expected: "string",
            found: found(args),
        }),
    }
}

fn int_from_string(args: &[Value]) -> Result<Value, EvalError> {
    match args {
        [Value::String(s)] => s
            .trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| EvalError::BadInteger(s.clone())),
        _ => Err(EvalError::BadArgument {
            function: "int",
            expected: "string",
            found: found(args),
        }),
    }
}

fn starts_with(args: &[Value]) -> Result<Value, EvalError> {
    match args {
        [Value::String(s), Value::String(prefix)] => Ok(Value::Bool(s.starts_with(prefix))),
        _ => Err(EvalError::BadArgument {
            function: "startsWith",
            expected: "string",
            found: found(args),
        }),
    }
}

fn ends_with(args: &[Value]) -> Result<Value, EvalError> {
    match args {
        [Value::String(s), Value::String(suffix)] => Ok(Value::Bool(s.ends_with(suffix))),
        _ => Err(EvalError::BadArgument {
            function: "endsWith",
            expected: "string",
            found: found(args),
        }),
    }
}

fn trim_suffix(args: &[Value]) -> Result<Value, EvalError> {
    match args {
        [Value::String(s), Value::String(suffix)] => Ok(Value::String(
            s.strip_suffix(suffix).unwrap_or(s).to_owned(),
        )),
        _ => Err(EvalError::BadArgument {
            function: "trimSuffix",
            expected: "string",
            found: found(args),
        }),
    }
}
