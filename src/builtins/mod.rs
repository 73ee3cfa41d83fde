use crate::object::{EvalError, Object, Result};
use crate::runtime::{OutputSink, Runtime};
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::fmt;

mod collections;
mod functional;
mod general;
mod math;
mod strings;

pub type BuiltinFn = fn(&mut dyn Runtime, &OutputSink, Vec<Object>) -> Result<Object>;

#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub callback: BuiltinFn,
}

impl Builtin {
    pub fn call(
        &self,
        runtime: &mut dyn Runtime,
        output: &OutputSink,
        args: Vec<Object>,
    ) -> Object {
        (self.callback)(runtime, output, args).into()
    }
}

impl PartialEq for Builtin {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Builtin({})", self.name)
    }
}

fn table(builtins: &[&[Builtin]]) -> HashMap<&'static str, Builtin> {
    builtins
        .iter()
        .flat_map(|group| group.iter())
        .map(|builtin| (builtin.name, *builtin))
        .collect()
}

lazy_static! {
    static ref BUILTINS: HashMap<&'static str, Builtin> = table(&[
        general::BUILTINS,
        collections::BUILTINS,
        functional::BUILTINS,
    ]);
    static ref PACKAGES: HashMap<&'static str, HashMap<&'static str, Builtin>> = vec![
        ("math", table(&[math::BUILTINS])),
        ("strings", table(&[strings::BUILTINS])),
    ]
    .into_iter()
    .collect();
}

pub fn lookup(name: &str) -> Option<Builtin> {
    BUILTINS.get(name).copied()
}

pub fn has_package(name: &str) -> bool {
    PACKAGES.contains_key(name)
}

pub fn package_function(package: &str, name: &str) -> Option<Builtin> {
    PACKAGES.get(package)?.get(name).copied()
}

fn check_arity(args: &[Object], want: usize) -> Result<()> {
    if args.len() != want {
        return Err(EvalError::IncorrectArity {
            got: args.len(),
            want,
        });
    }
    Ok(())
}

fn check_arity_between(args: &[Object], min: usize, max: usize) -> Result<()> {
    if args.len() < min {
        return Err(EvalError::IncorrectArity {
            got: args.len(),
            want: min,
        });
    }
    if args.len() > max {
        return Err(EvalError::IncorrectArity {
            got: args.len(),
            want: max,
        });
    }
    Ok(())
}

fn unsupported(fn_name: &'static str, obj: &Object) -> EvalError {
    EvalError::UnsupportedArgType {
        fn_name,
        type_name: obj.type_name(),
    }
}

fn invalid(fn_name: &'static str, message: impl Into<String>) -> EvalError {
    EvalError::InvalidArgument {
        fn_name,
        message: message.into(),
    }
}
