use super::{check_arity, invalid, unsupported, Builtin};
use crate::object::{EvalError, Object, Result};
use crate::runtime::{OutputSink, Runtime};
use std::convert::TryFrom;

pub(super) const BUILTINS: &[Builtin] = &[
    Builtin { name: "sqrt", callback: sqrt },
    Builtin { name: "pow", callback: pow },
    Builtin { name: "abs", callback: abs },
    Builtin { name: "floor", callback: floor },
    Builtin { name: "ceil", callback: ceil },
    Builtin { name: "max", callback: max },
    Builtin { name: "min", callback: min },
    Builtin { name: "pi", callback: pi },
];

fn number(fn_name: &'static str, obj: &Object) -> Result<f64> {
    match obj {
        Object::Integer(n) => Ok(*n as f64),
        Object::Float(x) => Ok(*x),
        obj => Err(unsupported(fn_name, obj)),
    }
}

fn sqrt(_: &mut dyn Runtime, _: &OutputSink, args: Vec<Object>) -> Result<Object> {
    check_arity(&args, 1)?;
    let x = number("sqrt", &args[0])?;
    if x < 0.0 {
        return Err(invalid("sqrt", "negative argument"));
    }
    Ok(Object::Float(x.sqrt()))
}

fn pow(_: &mut dyn Runtime, _: &OutputSink, args: Vec<Object>) -> Result<Object> {
    check_arity(&args, 2)?;
    match (&args[0], &args[1]) {
        (Object::Integer(base), Object::Integer(exp)) if *exp >= 0 => {
            let exp = u32::try_from(*exp).map_err(|_| invalid("pow", "exponent too large"))?;
            Ok(Object::Integer(base.wrapping_pow(exp)))
        }
        (base, exp) => Ok(Object::Float(
            number("pow", base)?.powf(number("pow", exp)?),
        )),
    }
}

fn abs(_: &mut dyn Runtime, _: &OutputSink, args: Vec<Object>) -> Result<Object> {
    check_arity(&args, 1)?;
    match &args[0] {
        Object::Integer(n) => Ok(Object::Integer(n.wrapping_abs())),
        Object::Float(x) => Ok(Object::Float(x.abs())),
        obj => Err(unsupported("abs", obj)),
    }
}

fn floor(_: &mut dyn Runtime, _: &OutputSink, args: Vec<Object>) -> Result<Object> {
    check_arity(&args, 1)?;
    Ok(Object::Integer(number("floor", &args[0])?.floor() as i64))
}

fn ceil(_: &mut dyn Runtime, _: &OutputSink, args: Vec<Object>) -> Result<Object> {
    check_arity(&args, 1)?;
    Ok(Object::Integer(number("ceil", &args[0])?.ceil() as i64))
}

/// Picks the extreme argument by numeric value, keeping its original type.
fn extreme(fn_name: &'static str, args: Vec<Object>, prefer_later: fn(f64, f64) -> bool) -> Result<Object> {
    let mut best: Option<(f64, Object)> = None;
    for arg in args {
        let value = number(fn_name, &arg)?;
        best = match best {
            Some((current, _)) if !prefer_later(value, current) => best,
            _ => Some((value, arg)),
        };
    }
    best.map(|(_, obj)| obj)
        .ok_or(EvalError::IncorrectArity { got: 0, want: 1 })
}

fn max(_: &mut dyn Runtime, _: &OutputSink, args: Vec<Object>) -> Result<Object> {
    extreme("max", args, |candidate, current| candidate > current)
}

fn min(_: &mut dyn Runtime, _: &OutputSink, args: Vec<Object>) -> Result<Object> {
    extreme("min", args, |candidate, current| candidate < current)
}

fn pi(_: &mut dyn Runtime, _: &OutputSink, args: Vec<Object>) -> Result<Object> {
    check_arity(&args, 0)?;
    Ok(Object::Float(std::f64::consts::PI))
}
