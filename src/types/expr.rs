use std::fmt;

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Not,
    Neg,
}

/// Binary operators, listed by grammar precedence (tightest first).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Mul,
    Div,
    Add,
    Sub,
    Lt,
    Lte,
    Gt,
    Gte,
    Eq,
    Neq,
    And,
    Or,
}

/// Expression AST produced by the parser, checked by the compiler, and
/// walked by the evaluator. Never mutated after parsing.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Int(i64),
    Bool(bool),
    Str(String),
    /// A declared variable (`pvc`, `sc`, `stats`).
    Var(String),
    /// Field access on an object value: `pvc.metadata.name`.
    Field(Box<Expr>, String),
    /// Map indexing: `m["key"]`.
    Index(Box<Expr>, Box<Expr>),
    /// Membership test: `"key" in m`.
    In(Box<Expr>, Box<Expr>),
    Unary(UnOp, Box<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),
    /// Lazy conditional: only the taken branch is evaluated.
    Cond(Box<Expr>, Box<Expr>, Box<Expr>),
    /// Free function call: `deny("...")`.
    Call(String, Vec<Expr>),
    /// Method call on a receiver: `s.endsWith("%")`.
    Method(Box<Expr>, String, Vec<Expr>),
}

impl fmt::Display for UnOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnOp::Not => write!(f, "!"),
            UnOp::Neg => write!(f, "-"),
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sym = match self {
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Lt => "<",
            BinOp::Lte => "<=",
            BinOp::Gt => ">",
            BinOp::Gte => ">=",
            BinOp::Eq => "==",
            BinOp::Neq => "!=",
            BinOp::And => "&&",
            BinOp::Or => "||",
        };
        write!(f, "{sym}")
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Int(v) => write!(f, "{v}"),
            Expr::Bool(v) => write!(f, "{v}"),
            Expr::Str(s) => write!(f, "\"{s}\""),
            Expr::Var(name) => write!(f, "{name}"),
            Expr::Field(recv, field) => write!(f, "{recv}.{field}"),
            Expr::Index(map, key) => write!(f, "{map}[{key}]"),
            Expr::In(key, map) => write!(f, "({key} in {map})"),
            Expr::Unary(op, inner) => write!(f, "{op}{inner}"),
            Expr::Binary(op, a, b) => write!(f, "({a} {op} {b})"),
            Expr::Cond(c, t, e) => write!(f, "({c} ? {t} : {e})"),
            Expr::Call(name, args) => {
                write!(f, "{name}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
            Expr::Method(recv, name, args) => {
                write!(f, "{recv}.{name}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
        }
    }
}
