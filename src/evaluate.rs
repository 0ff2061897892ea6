use crate::types::{BinOp, Bindings, Env, EvalError, Evaluation, Expr, UnOp, Value};

/// Cost charged for visiting one expression node. Function calls charge
/// their declared per-call cost on top.
const NODE_COST: u64 = 1;

struct CostTracker {
    limit: u64,
    used: u64,
}

impl CostTracker {
    fn charge(&mut self, units: u64) -> Result<(), EvalError> {
        self.used = self.used.saturating_add(units);
        if self.used > self.limit {
            Err(EvalError::CostLimitExceeded { limit: self.limit })
        } else {
            Ok(())
        }
    }
}

/// Evaluate a type-checked expression under the environment's cost ceiling.
///
/// Only the branches actually taken are evaluated (and charged), so the
/// reported cost is the actual consumption, not a static worst case.
pub(crate) fn evaluate(
    expr: &Expr,
    env: &Env,
    bindings: &Bindings,
) -> Result<Evaluation, EvalError> {
    let mut tracker = CostTracker {
        limit: env.cost_limit(),
        used: 0,
    };
    let value = eval_expr(expr, env, bindings, &mut tracker)?;
    Ok(Evaluation {
        value,
        cost: tracker.used,
    })
}

fn eval_expr(
    expr: &Expr,
    env: &Env,
    bindings: &Bindings,
    tracker: &mut CostTracker,
) -> Result<Value, EvalError> {
    tracker.charge(NODE_COST)?;
    match expr {
        Expr::Int(v) => Ok(Value::Int(*v)),
        Expr::Bool(v) => Ok(Value::Bool(*v)),
        Expr::Str(s) => Ok(Value::String(s.clone())),

        Expr::Var(name) => bindings
            .get(name)
            .cloned()
            .ok_or_else(|| EvalError::MissingBinding { name: name.clone() }),

        Expr::Field(recv, field) => match eval_expr(recv, env, bindings, tracker)? {
            Value::Object(fields) => {
                fields
                    .get(field)
                    .cloned()
                    .ok_or_else(|| EvalError::NoSuchKey { key: field.clone() })
            }
            other => Err(EvalError::UnexpectedType {
                expected: "object",
                found: other.kind_name(),
            }),
        },

        Expr::Index(map, key) => {
            let map = eval_expr(map, env, bindings, tracker)?;
            let key = eval_expr(key, env, bindings, tracker)?;
            match (map, key) {
                (Value::Map(entries), Value::String(key)) => entries
                    .get(&key)
                    .cloned()
                    .map(Value::String)
                    .ok_or(EvalError::NoSuchKey { key }),
                (Value::Map(_), other) => Err(EvalError::UnexpectedType {
                    expected: "string",
                    found: other.kind_name(),
                }),
                (other, _) => Err(EvalError::UnexpectedType {
                    expected: "map",
                    found: other.kind_name(),
                }),
            }
        }

        Expr::In(key, map) => {
            let key = eval_expr(key, env, bindings, tracker)?;
            let map = eval_expr(map, env, bindings, tracker)?;
            match (key, map) {
                (Value::String(key), Value::Map(entries)) => {
                    Ok(Value::Bool(entries.contains_key(&key)))
                }
                (other, Value::Map(_)) => Err(EvalError::UnexpectedType {
                    expected: "string",
                    found: other.kind_name(),
                }),
                (_, other) => Err(EvalError::UnexpectedType {
                    expected: "map",
                    found: other.kind_name(),
                }),
            }
        }

        Expr::Unary(op, inner) => {
            let value = eval_expr(inner, env, bindings, tracker)?;
            match (op, value) {
                (UnOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
                (UnOp::Neg, Value::Int(v)) => {
                    v.checked_neg().map(Value::Int).ok_or(EvalError::Overflow)
                }
                (UnOp::Not, other) => Err(EvalError::UnexpectedType {
                    expected: "bool",
                    found: other.kind_name(),
                }),
                (UnOp::Neg, other) => Err(EvalError::UnexpectedType {
                    expected: "int",
                    found: other.kind_name(),
                }),
            }
        }

        Expr::Binary(BinOp::And, lhs, rhs) => {
            if !as_bool(eval_expr(lhs, env, bindings, tracker)?)? {
                return Ok(Value::Bool(false));
            }
            Ok(Value::Bool(as_bool(eval_expr(rhs, env, bindings, tracker)?)?))
        }
        Expr::Binary(BinOp::Or, lhs, rhs) => {
            if as_bool(eval_expr(lhs, env, bindings, tracker)?)? {
                return Ok(Value::Bool(true));
            }
            Ok(Value::Bool(as_bool(eval_expr(rhs, env, bindings, tracker)?)?))
        }
        Expr::Binary(op, lhs, rhs) => {
            let lhs = eval_expr(lhs, env, bindings, tracker)?;
            let rhs = eval_expr(rhs, env, bindings, tracker)?;
            apply_binary(*op, lhs, rhs)
        }

        Expr::Cond(cond, then, els) => {
            if as_bool(eval_expr(cond, env, bindings, tracker)?)? {
                eval_expr(then, env, bindings, tracker)
            } else {
                eval_expr(els, env, bindings, tracker)
            }
        }

        Expr::Call(name, args) => {
            let decl = env
                .functions()
                .function(name)
                .ok_or_else(|| EvalError::UnknownFunction { name: name.clone() })?;
            tracker.charge(decl.cost())?;
            let mut values = Vec::with_capacity(args.len());
            for arg in args {
                values.push(eval_expr(arg, env, bindings, tracker)?);
            }
            decl.call(&values)
        }

        Expr::Method(recv, name, args) => {
            let receiver = eval_expr(recv, env, bindings, tracker)?;
            let decl = receiver
                .kind()
                .and_then(|kind| env.functions().method(&kind, name))
                .ok_or_else(|| EvalError::UnknownMethod { name: name.clone() })?;
            tracker.charge(decl.cost())?;
            let mut values = Vec::with_capacity(args.len() + 1);
            values.push(receiver);
            for arg in args {
                values.push(eval_expr(arg, env, bindings, tracker)?);
            }
            decl.call(&values)
        }
    }
}

fn as_bool(value: Value) -> Result<bool, EvalError> {
    match value {
        Value::Bool(b) => Ok(b),
        other => Err(EvalError::UnexpectedType {
            expected: "bool",
            found: other.kind_name(),
        }),
    }
}

fn apply_binary(op: BinOp, lhs: Value, rhs: Value) -> Result<Value, EvalError> {
    match (op, &lhs, &rhs) {
        (BinOp::Add, Value::Int(a), Value::Int(b)) => {
            a.checked_add(*b).map(Value::Int).ok_or(EvalError::Overflow)
        }
        (BinOp::Sub, Value::Int(a), Value::Int(b)) => {
            a.checked_sub(*b).map(Value::Int).ok_or(EvalError::Overflow)
        }
        (BinOp::Mul, Value::Int(a), Value::Int(b)) => {
            a.checked_mul(*b).map(Value::Int).ok_or(EvalError::Overflow)
        }
        (BinOp::Div, Value::Int(a), Value::Int(b)) => {
            if *b == 0 {
                Err(EvalError::DivisionByZero)
            } else {
                a.checked_div(*b).map(Value::Int).ok_or(EvalError::Overflow)
            }
        }
        (BinOp::Lt, Value::Int(a), Value::Int(b)) => Ok(Value::Bool(a < b)),
        (BinOp::Lte, Value::Int(a), Value::Int(b)) => Ok(Value::Bool(a <= b)),
        (BinOp::Gt, Value::Int(a), Value::Int(b)) => Ok(Value::Bool(a > b)),
        (BinOp::Gte, Value::Int(a), Value::Int(b)) => Ok(Value::Bool(a >= b)),
        (BinOp::Lt, Value::String(a), Value::String(b)) => Ok(Value::Bool(a < b)),
        (BinOp::Lte, Value::String(a), Value::String(b)) => Ok(Value::Bool(a <= b)),
        (BinOp::Gt, Value::String(a), Value::String(b)) => Ok(Value::Bool(a > b)),
        (BinOp::Gte, Value::String(a), Value::String(b)) => Ok(Value::Bool(a >= b)),
        (BinOp::Eq, _, _) => Ok(Value::Bool(lhs == rhs)),
        (BinOp::Neq, _, _) => Ok(Value::Bool(lhs != rhs)),
        _ => Err(EvalError::UnexpectedType {
            expected: "matching operand types",
            found: rhs.kind_name(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse;
    use crate::types::Kind;

    fn eval(source: &str) -> Result<Evaluation, EvalError> {
        eval_with_limit(source, 1000)
    }

    fn eval_with_limit(source: &str, limit: u64) -> Result<Evaluation, EvalError> {
        let env = Env::builder()
            .variable("n", Kind::Int)
            .cost_limit(limit)
            .build()
            .unwrap();
        let expr = parse(source).unwrap();
        evaluate(&expr, &env, &Bindings::new().bind("n", Value::Int(10)))
    }

    #[test]
    fn arithmetic() {
        assert_eq!(eval("n * 2 + 1").unwrap().value, Value::Int(21));
        assert_eq!(eval("n / 3").unwrap().value, Value::Int(3));
        assert_eq!(eval("-n").unwrap().value, Value::Int(-10));
    }

    #[test]
    fn division_by_zero() {
        assert!(matches!(eval("n / 0"), Err(EvalError::DivisionByZero)));
    }

    #[test]
    fn overflow() {
        assert!(matches!(
            eval("9223372036854775807 + 1"),
            Err(EvalError::Overflow)
        ));
    }

    #[test]
    fn conditional_takes_one_branch() {
        assert_eq!(eval("n > 5 ? 1 : 2").unwrap().value, Value::Int(1));
        assert_eq!(eval("n > 50 ? 1 : 2").unwrap().value, Value::Int(2));
    }

    #[test]
    fn untaken_branch_is_not_charged() {
        let cheap = eval("true ? 1 : 1 + 2 + 3 + 4 + 5 + 6 + 7").unwrap();
        let dear = eval("false ? 1 : 1 + 2 + 3 + 4 + 5 + 6 + 7").unwrap();
        assert!(cheap.cost < dear.cost);
    }

    #[test]
    fn short_circuit_skips_failing_operand() {
        // The division by zero on the right is never evaluated.
        assert_eq!(
            eval("false && n / 0 == 1").unwrap().value,
            Value::Bool(false)
        );
        assert_eq!(
            eval("true || n / 0 == 1").unwrap().value,
            Value::Bool(true)
        );
    }

    #[test]
    fn cost_ceiling_aborts_without_partial_result() {
        let result = eval_with_limit("1 + 2 + 3 + 4 + 5 + 6 + 7 + 8", 5);
        assert!(matches!(
            result,
            Err(EvalError::CostLimitExceeded { limit: 5 })
        ));
    }

    #[test]
    fn cost_is_deterministic() {
        let a = eval("n > 5 ? n * 3 : 0").unwrap();
        let b = eval("n > 5 ? n * 3 : 0").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn missing_binding() {
        let env = Env::builder()
            .variable("n", Kind::Int)
            .build()
            .unwrap();
        let expr = parse("n").unwrap();
        let result = evaluate(&expr, &env, &Bindings::new());
        assert!(matches!(result, Err(EvalError::MissingBinding { name }) if name == "n"));
    }

    #[test]
    fn string_comparison() {
        let env = Env::builder()
            .variable("s", Kind::String)
            .build()
            .unwrap();
        let expr = parse(r#"s == "Bound""#).unwrap();
        let out = evaluate(
            &expr,
            &env,
            &Bindings::new().bind("s", Value::from("Bound")),
        )
        .unwrap();
        assert_eq!(out.value, Value::Bool(true));
    }

    #[test]
    fn map_membership_and_index() {
        let env = Env::builder()
            .variable("m", Kind::StringMap)
            .build()
            .unwrap();
        let map: std::collections::BTreeMap<String, String> =
            [("storage".to_owned(), "10Gi".to_owned())].into();
        let bindings = Bindings::new().bind("m", Value::Map(map));

        let expr = parse(r#""storage" in m"#).unwrap();
        assert_eq!(
            evaluate(&expr, &env, &bindings).unwrap().value,
            Value::Bool(true)
        );

        let expr = parse(r#"m["storage"]"#).unwrap();
        assert_eq!(
            evaluate(&expr, &env, &bindings).unwrap().value,
            Value::from("10Gi")
        );

        let expr = parse(r#"m["missing"]"#).unwrap();
        assert!(matches!(
            evaluate(&expr, &env, &bindings),
            Err(EvalError::NoSuchKey { key }) if key == "missing"
        ));
    }

    #[test]
    fn function_call_cost_charged() {
        let plain = eval("1").unwrap();
        let with_call = eval(r#"int("1")"#).unwrap();
        assert!(with_call.cost > plain.cost);
    }
}
