use winnow::ascii::{dec_int, till_line_ending};
use winnow::combinator::{alt, cut_err, delimited, opt, preceded, repeat, separated};
use winnow::error::{ErrMode, ModalResult, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{any, take_till, take_while};

use crate::types::{BinOp, Expr, UnOp};

// -- Whitespace & comments --------------------------------------------------

fn ws(input: &mut &str) -> ModalResult<()> {
    let _: () = repeat(
        0..,
        alt((
            take_while(1.., |c: char| c.is_ascii_whitespace()).void(),
            ("//", till_line_ending).void(),
        )),
    )
    .parse_next(input)?;
    Ok(())
}

// -- Identifiers ------------------------------------------------------------

fn ident<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        take_while(1.., |c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '_'),
    )
        .take()
        .parse_next(input)
}

/// Match `word` only as a complete identifier, not as a prefix of one.
fn keyword<'i>(word: &'static str) -> impl FnMut(&mut &'i str) -> ModalResult<()> {
    move |input: &mut &'i str| {
        let start = input.checkpoint();
        let name = ident.parse_next(input)?;
        if name == word {
            Ok(())
        } else {
            input.reset(&start);
            Err(ErrMode::from_input(input))
        }
    }
}

// -- Literals ---------------------------------------------------------------

fn string_literal(input: &mut &str) -> ModalResult<String> {
    '"'.parse_next(input)?;
    let mut s = String::new();
    loop {
        let chunk: &str = take_till(0.., ['"', '\\']).parse_next(input)?;
        s.push_str(chunk);
        // Either the closing quote or the start of an escape.
        if any.parse_next(input)? == '"' {
            return Ok(s);
        }
        let esc = cut_err(any)
            .context(StrContext::Expected(StrContextValue::Description(
                "escape character",
            )))
            .parse_next(input)?;
        s.push(match esc {
            '"' => '"',
            '\\' => '\\',
            'n' => '\n',
            't' => '\t',
            _ => return Err(ErrMode::from_input(input).cut()),
        });
    }
}

// -- Primaries and postfix chains -------------------------------------------

fn primary(input: &mut &str) -> ModalResult<Expr> {
    ws.parse_next(input)?;
    alt((
        delimited('(', expr, (ws, ')')),
        string_literal.map(Expr::Str),
        dec_int::<_, i64, _>.map(Expr::Int),
        ident_or_call,
    ))
    .context(StrContext::Expected(StrContextValue::Description(
        "expression",
    )))
    .parse_next(input)
}

fn ident_or_call(input: &mut &str) -> ModalResult<Expr> {
    let name = ident.parse_next(input)?;
    match name {
        "true" => return Ok(Expr::Bool(true)),
        "false" => return Ok(Expr::Bool(false)),
        _ => {}
    }
    let checkpoint = input.checkpoint();
    ws.parse_next(input)?;
    if opt('(').parse_next(input)?.is_some() {
        let args = arg_list(input)?;
        Ok(Expr::Call(name.to_owned(), args))
    } else {
        input.reset(&checkpoint);
        Ok(Expr::Var(name.to_owned()))
    }
}

fn arg_list(input: &mut &str) -> ModalResult<Vec<Expr>> {
    let args: Vec<Expr> = separated(0.., expr, (ws, ',')).parse_next(input)?;
    ws.parse_next(input)?;
    cut_err(')').parse_next(input)?;
    Ok(args)
}

fn postfix(input: &mut &str) -> ModalResult<Expr> {
    let mut e = primary(input)?;
    loop {
        let checkpoint = input.checkpoint();
        ws.parse_next(input)?;
        if opt('.').parse_next(input)?.is_some() {
            let name = cut_err(ident)
                .context(StrContext::Expected(StrContextValue::Description(
                    "field or method name",
                )))
                .parse_next(input)?;
            let call = input.checkpoint();
            ws.parse_next(input)?;
            if opt('(').parse_next(input)?.is_some() {
                let args = arg_list(input)?;
                e = Expr::Method(Box::new(e), name.to_owned(), args);
            } else {
                input.reset(&call);
                e = Expr::Field(Box::new(e), name.to_owned());
            }
        } else if opt('[').parse_next(input)?.is_some() {
            let key = cut_err(expr).parse_next(input)?;
            ws.parse_next(input)?;
            cut_err(']').parse_next(input)?;
            e = Expr::Index(Box::new(e), Box::new(key));
        } else {
            input.reset(&checkpoint);
            return Ok(e);
        }
    }
}

// -- Operators (precedence: ?: < || < && < comparison < + - < * / < unary) --

fn unary(input: &mut &str) -> ModalResult<Expr> {
    ws.parse_next(input)?;
    if opt('!').parse_next(input)?.is_some() {
        let inner = cut_err(unary).parse_next(input)?;
        Ok(Expr::Unary(UnOp::Not, Box::new(inner)))
    } else if opt('-').parse_next(input)?.is_some() {
        let inner = cut_err(unary).parse_next(input)?;
        Ok(Expr::Unary(UnOp::Neg, Box::new(inner)))
    } else {
        postfix(input)
    }
}

fn mul_op(input: &mut &str) -> ModalResult<BinOp> {
    alt(('*'.value(BinOp::Mul), '/'.value(BinOp::Div))).parse_next(input)
}

fn multiplicative(input: &mut &str) -> ModalResult<Expr> {
    let first = unary(input)?;
    let rest: Vec<(BinOp, Expr)> =
        repeat(0.., (preceded(ws, mul_op), cut_err(unary))).parse_next(input)?;
    Ok(rest.into_iter().fold(first, |acc, (op, r)| {
        Expr::Binary(op, Box::new(acc), Box::new(r))
    }))
}

fn add_op(input: &mut &str) -> ModalResult<BinOp> {
    alt(('+'.value(BinOp::Add), '-'.value(BinOp::Sub))).parse_next(input)
}

fn additive(input: &mut &str) -> ModalResult<Expr> {
    let first = multiplicative(input)?;
    let rest: Vec<(BinOp, Expr)> =
        repeat(0.., (preceded(ws, add_op), cut_err(multiplicative))).parse_next(input)?;
    Ok(rest.into_iter().fold(first, |acc, (op, r)| {
        Expr::Binary(op, Box::new(acc), Box::new(r))
    }))
}

fn cmp_op(input: &mut &str) -> ModalResult<BinOp> {
    alt((
        "==".value(BinOp::Eq),
        "!=".value(BinOp::Neq),
        "<=".value(BinOp::Lte),
        "<".value(BinOp::Lt),
        ">=".value(BinOp::Gte),
        ">".value(BinOp::Gt),
    ))
    .parse_next(input)
}

fn comparison(input: &mut &str) -> ModalResult<Expr> {
    let first = additive(input)?;
    let checkpoint = input.checkpoint();
    ws.parse_next(input)?;
    if let Ok(op) = cmp_op.parse_next(input) {
        let rhs = cut_err(additive).parse_next(input)?;
        return Ok(Expr::Binary(op, Box::new(first), Box::new(rhs)));
    }
    input.reset(&checkpoint);
    ws.parse_next(input)?;
    if keyword("in")(input).is_ok() {
        let rhs = cut_err(additive).parse_next(input)?;
        return Ok(Expr::In(Box::new(first), Box::new(rhs)));
    }
    input.reset(&checkpoint);
    Ok(first)
}

fn and_expr(input: &mut &str) -> ModalResult<Expr> {
    let first = comparison(input)?;
    let rest: Vec<Expr> =
        repeat(0.., preceded((ws, "&&"), cut_err(comparison))).parse_next(input)?;
    Ok(rest.into_iter().fold(first, |acc, r| {
        Expr::Binary(BinOp::And, Box::new(acc), Box::new(r))
    }))
}

fn or_expr(input: &mut &str) -> ModalResult<Expr> {
    let first = and_expr(input)?;
    let rest: Vec<Expr> =
        repeat(0.., preceded((ws, "||"), cut_err(and_expr))).parse_next(input)?;
    Ok(rest.into_iter().fold(first, |acc, r| {
        Expr::Binary(BinOp::Or, Box::new(acc), Box::new(r))
    }))
}

fn ternary(input: &mut &str) -> ModalResult<Expr> {
    let cond = or_expr(input)?;
    let checkpoint = input.checkpoint();
    ws.parse_next(input)?;
    if opt('?').parse_next(input)?.is_some() {
        let then = cut_err(ternary)
            .context(StrContext::Expected(StrContextValue::Description(
                "then-branch",
            )))
            .parse_next(input)?;
        ws.parse_next(input)?;
        cut_err(':').parse_next(input)?;
        let els = cut_err(ternary)
            .context(StrContext::Expected(StrContextValue::Description(
                "else-branch",
            )))
            .parse_next(input)?;
        Ok(Expr::Cond(Box::new(cond), Box::new(then), Box::new(els)))
    } else {
        input.reset(&checkpoint);
        Ok(cond)
    }
}

fn expr(input: &mut &str) -> ModalResult<Expr> {
    ws.parse_next(input)?;
    ternary(input)
}

// -- Top-level parser -------------------------------------------------------

pub(crate) fn expression(input: &mut &str) -> ModalResult<Expr> {
    let e = expr(input)?;
    ws.parse_next(input)?;
    Ok(e)
}
