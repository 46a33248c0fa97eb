use std::cmp::Ordering;

use crate::expression::ast::{BinaryOp, Expr, UnaryOp};
use crate::expression::context::FeatureExpressionContext;
use crate::expression::error::EvalError;
use crate::expression::value::Value;

pub(crate) fn eval(expr: &Expr, ctx: &FeatureExpressionContext) -> Result<Value, EvalError> {
    match expr {
        Expr::Lit(v) => Ok(v.clone()),
        Expr::Attr(name) => Ok(ctx.attribute(name)),
        Expr::Var(name) => Ok(ctx.variable(name)),
        Expr::Unary { op, expr } => {
            let v = eval(expr, ctx)?;
            match op {
                UnaryOp::Neg => match v {
                    Value::Long(i) => Ok(Value::Long(i.wrapping_neg())),
                    other => Ok(Value::Double(-numeric(&other)?)),
                },
                UnaryOp::Not => Ok(Value::Bool(!v.is_truthy())),
            }
        }
        Expr::Binary { op, left, right } => match op {
            BinaryOp::And => {
                let l = eval(left, ctx)?;
                if !l.is_truthy() {
                    return Ok(Value::Bool(false));
                }
                Ok(Value::Bool(eval(right, ctx)?.is_truthy()))
            }
            BinaryOp::Or => {
                let l = eval(left, ctx)?;
                if l.is_truthy() {
                    return Ok(Value::Bool(true));
                }
                Ok(Value::Bool(eval(right, ctx)?.is_truthy()))
            }
            _ => {
                let l = eval(left, ctx)?;
                let r = eval(right, ctx)?;
                binary(*op, l, r)
            }
        },
        Expr::Call { func, args } => {
            let mut vals = Vec::with_capacity(args.len());
            for a in args {
                vals.push(eval(a, ctx)?);
            }
            call_builtin(func, &vals)
        }
        Expr::Concat(parts) => {
            let mut out = String::new();
            for p in parts {
                out.push_str(&eval(p, ctx)?.to_string());
            }
            Ok(Value::String(out))
        }
    }
}

fn numeric(v: &Value) -> Result<f64, EvalError> {
    v.as_f64()
        .ok_or_else(|| EvalError::new(format!("expected numeric, got {v:?}")))
}

fn binary(op: BinaryOp, l: Value, r: Value) -> Result<Value, EvalError> {
    match op {
        BinaryOp::Add => {
            if matches!(l, Value::String(_)) || matches!(r, Value::String(_)) {
                return Ok(Value::String(format!("{l}{r}")));
            }
            arith(l, r, i64::checked_add, |a, b| a + b)
        }
        BinaryOp::Sub => arith(l, r, i64::checked_sub, |a, b| a - b),
        BinaryOp::Mul => arith(l, r, i64::checked_mul, |a, b| a * b),
        BinaryOp::Div => Ok(Value::Double(numeric(&l)? / numeric(&r)?)),
        BinaryOp::Mod => arith(l, r, i64::checked_rem, |a, b| a % b),
        BinaryOp::Eq => Ok(Value::Bool(values_equal(&l, &r))),
        BinaryOp::Ne => Ok(Value::Bool(!values_equal(&l, &r))),
        BinaryOp::Lt => compare(&l, &r).map(|o| Value::Bool(o == Ordering::Less)),
        BinaryOp::Le => compare(&l, &r).map(|o| Value::Bool(o != Ordering::Greater)),
        BinaryOp::Gt => compare(&l, &r).map(|o| Value::Bool(o == Ordering::Greater)),
        BinaryOp::Ge => compare(&l, &r).map(|o| Value::Bool(o != Ordering::Less)),
        BinaryOp::And => Ok(Value::Bool(l.is_truthy() && r.is_truthy())),
        BinaryOp::Or => Ok(Value::Bool(l.is_truthy() || r.is_truthy())),
    }
}

fn arith(
    l: Value,
    r: Value,
    int_op: impl FnOnce(i64, i64) -> Option<i64>,
    float_op: impl FnOnce(f64, f64) -> f64,
) -> Result<Value, EvalError> {
    if let (Value::Long(a), Value::Long(b)) = (&l, &r) {
        if let Some(v) = int_op(*a, *b) {
            return Ok(Value::Long(v));
        }
    }
    Ok(Value::Double(float_op(numeric(&l)?, numeric(&r)?)))
}

fn values_equal(l: &Value, r: &Value) -> bool {
    match (l, r) {
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::String(_), _) | (_, Value::String(_)) => false,
        (a, b) => a.as_f64() == b.as_f64(),
    }
}

fn compare(l: &Value, r: &Value) -> Result<Ordering, EvalError> {
    if let (Value::String(a), Value::String(b)) = (l, r) {
        return Ok(a.cmp(b));
    }
    let (a, b) = (numeric(l)?, numeric(r)?);
    a.partial_cmp(&b)
        .ok_or_else(|| EvalError::new("cannot compare NaN"))
}

fn call_builtin(func: &str, args: &[Value]) -> Result<Value, EvalError> {
    let expect = |n: usize| -> Result<(), EvalError> {
        if args.len() == n {
            Ok(())
        } else {
            Err(EvalError::new(format!(
                "{func} expects {n} arg(s), got {}",
                args.len()
            )))
        }
    };

    let v = match func {
        "abs" => {
            expect(1)?;
            match &args[0] {
                Value::Long(i) => return Ok(Value::Long(i.wrapping_abs())),
                other => numeric(other)?.abs(),
            }
        }
        "sqrt" => {
            expect(1)?;
            numeric(&args[0])?.sqrt()
        }
        "min" => {
            expect(2)?;
            numeric(&args[0])?.min(numeric(&args[1])?)
        }
        "max" => {
            expect(2)?;
            numeric(&args[0])?.max(numeric(&args[1])?)
        }
        "pow" => {
            expect(2)?;
            numeric(&args[0])?.powf(numeric(&args[1])?)
        }
        "clamp" => {
            expect(3)?;
            let (x, lo, hi) = (
                numeric(&args[0])?,
                numeric(&args[1])?,
                numeric(&args[2])?,
            );
            if lo > hi {
                return Err(EvalError::new("clamp expects lo <= hi"));
            }
            x.clamp(lo, hi)
        }
        other => return Err(EvalError::new(format!("unknown function '{other}'"))),
    };
    Ok(Value::Double(v))
}

#[cfg(test)]
#[path = "../../tests/unit/expression/eval.rs"]
mod tests;
