use crate::types::{BinOp, CompileError, Env, Expr, Kind, UnOp};

/// Static type check of `expr` against the environment's declared variables,
/// object schemas, and function signatures. Returns the expression's result
/// kind; any failure is startup-fatal.
pub(crate) fn check(expr: &Expr, env: &Env) -> Result<Kind, CompileError> {
    match expr {
        Expr::Int(_) => Ok(Kind::Int),
        Expr::Bool(_) => Ok(Kind::Bool),
        Expr::Str(_) => Ok(Kind::String),

        Expr::Var(name) => env
            .variable_kind(name)
            .cloned()
            .ok_or_else(|| CompileError::UnknownVariable { name: name.clone() }),

        Expr::Field(recv, field) => match check(recv, env)? {
            Kind::Object(object) => {
                let schema = env
                    .schema(object)
                    .ok_or_else(|| CompileError::UnknownType {
                        name: object.to_owned(),
                    })?;
                schema
                    .kind_of(field)
                    .cloned()
                    .ok_or_else(|| CompileError::UnknownField {
                        object: object.to_owned(),
                        field: field.clone(),
                    })
            }
            found => Err(CompileError::NotAnObject {
                field: field.clone(),
                found,
            }),
        },

        Expr::Index(map, key) => {
            match check(map, env)? {
                Kind::StringMap => {}
                found => return Err(CompileError::NotAMap { found }),
            }
            expect(key, Kind::String, env)?;
            Ok(Kind::String)
        }

        Expr::In(key, map) => {
            expect(key, Kind::String, env)?;
            match check(map, env)? {
                Kind::StringMap => Ok(Kind::Bool),
                found => Err(CompileError::NotAMap { found }),
            }
        }

        Expr::Unary(UnOp::Not, inner) => {
            expect(inner, Kind::Bool, env)?;
            Ok(Kind::Bool)
        }
        Expr::Unary(UnOp::Neg, inner) => {
            expect(inner, Kind::Int, env)?;
            Ok(Kind::Int)
        }

        Expr::Binary(op, lhs, rhs) => {
            let lk = check(lhs, env)?;
            let rk = check(rhs, env)?;
            check_binary(*op, lk, rk)
        }

        Expr::Cond(cond, then, els) => {
            expect(cond, Kind::Bool, env)?;
            let then_kind = check(then, env)?;
            let else_kind = check(els, env)?;
            if then_kind != else_kind {
                return Err(CompileError::BranchMismatch {
                    then_kind,
                    else_kind,
                });
            }
            Ok(then_kind)
        }

        Expr::Call(name, args) => {
            let decl = env
                .functions()
                .function(name)
                .ok_or_else(|| CompileError::UnknownFunction { name: name.clone() })?;
            check_args(decl.name(), decl.params(), args, env)?;
            Ok(decl.ret().clone())
        }

        Expr::Method(recv, name, args) => {
            let receiver = check(recv, env)?;
            let decl = env
                .functions()
                .method(&receiver, name)
                .ok_or_else(|| CompileError::UnknownMethod {
                    receiver: receiver.clone(),
                    name: name.clone(),
                })?;
            check_args(decl.name(), decl.params(), args, env)?;
            Ok(decl.ret().clone())
        }
    }
}

fn expect(expr: &Expr, expected: Kind, env: &Env) -> Result<(), CompileError> {
    let found = check(expr, env)?;
    if found == expected {
        Ok(())
    } else {
        Err(CompileError::TypeMismatch { expected, found })
    }
}

fn check_binary(op: BinOp, lhs: Kind, rhs: Kind) -> Result<Kind, CompileError> {
    let ok = match op {
        BinOp::Mul | BinOp::Div | BinOp::Add | BinOp::Sub => {
            if lhs == Kind::Int && rhs == Kind::Int {
                return Ok(Kind::Int);
            }
            false
        }
        BinOp::Lt | BinOp::Lte | BinOp::Gt | BinOp::Gte => {
            lhs == rhs && matches!(lhs, Kind::Int | Kind::String)
        }
        BinOp::Eq | BinOp::Neq => lhs == rhs && matches!(lhs, Kind::Int | Kind::String | Kind::Bool),
        BinOp::And | BinOp::Or => lhs == Kind::Bool && rhs == Kind::Bool,
    };
    if ok {
        Ok(Kind::Bool)
    } else {
        Err(CompileError::InvalidOperands {
            op: op.to_string(),
            lhs,
            rhs,
        })
    }
}

fn check_args(
    function: &str,
    params: &[Kind],
    args: &[Expr],
    env: &Env,
) -> Result<(), CompileError> {
    if params.len() != args.len() {
        return Err(CompileError::ArityMismatch {
            function: function.to_owned(),
            expected: params.len(),
            found: args.len(),
        });
    }
    for (param, arg) in params.iter().zip(args) {
        expect(arg, param.clone(), env)?;
    }
    Ok(())
}
