use super::{check_arity, check_arity_between, invalid, unsupported, Builtin};
use crate::object::{range_len, EvalError, Object, Result};
use crate::runtime::{OutputSink, Runtime};

pub(super) const BUILTINS: &[Builtin] = &[
    Builtin { name: "print", callback: print },
    Builtin { name: "println", callback: println },
    Builtin { name: "typeof", callback: type_of },
    Builtin { name: "len", callback: len },
    Builtin { name: "str", callback: as_string },
    Builtin { name: "int", callback: int },
    Builtin { name: "float", callback: float },
    Builtin { name: "read_line", callback: read_line },
    Builtin { name: "error", callback: error },
    Builtin { name: "is_error", callback: is_error },
    Builtin { name: "is_same_ref", callback: is_same_ref },
    Builtin { name: "assert", callback: assert },
];

fn joined(args: &[Object]) -> String {
    args.iter()
        .map(Object::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

fn print(_: &mut dyn Runtime, output: &OutputSink, args: Vec<Object>) -> Result<Object> {
    output.write_str(&joined(&args))?;
    Ok(Object::Nil)
}

fn println(_: &mut dyn Runtime, output: &OutputSink, args: Vec<Object>) -> Result<Object> {
    output.write_str(&format!("{}\n", joined(&args)))?;
    Ok(Object::Nil)
}

fn type_of(_: &mut dyn Runtime, _: &OutputSink, args: Vec<Object>) -> Result<Object> {
    check_arity(&args, 1)?;
    Ok(args[0].type_name().into())
}

fn len(_: &mut dyn Runtime, _: &OutputSink, args: Vec<Object>) -> Result<Object> {
    check_arity(&args, 1)?;
    let length = match &args[0] {
        Object::String(s) => s.chars().count(),
        Object::Array(elements) | Object::List(elements) => elements.borrow().len(),
        Object::Tuple(elements) => elements.len(),
        Object::Map(map) => map.borrow().len(),
        Object::Set(set) => set.borrow().len(),
        Object::Range(start, end) => range_len(*start, *end)?,
        obj => return Err(unsupported("len", obj)),
    };
    Ok(Object::Integer(length as i64))
}

fn as_string(_: &mut dyn Runtime, _: &OutputSink, args: Vec<Object>) -> Result<Object> {
    check_arity(&args, 1)?;
    Ok(args[0].to_string().into())
}

fn int(_: &mut dyn Runtime, _: &OutputSink, args: Vec<Object>) -> Result<Object> {
    check_arity(&args, 1)?;
    match &args[0] {
        Object::Integer(n) => Ok(Object::Integer(*n)),
        Object::Float(x) => Ok(Object::Integer(x.trunc() as i64)),
        Object::Boolean(b) => Ok(Object::Integer(*b as i64)),
        Object::String(s) => s
            .trim()
            .parse::<i64>()
            .map(Object::Integer)
            .map_err(|_| invalid("int", format!("cannot parse {:?} as an integer", s))),
        obj => Err(unsupported("int", obj)),
    }
}

fn float(_: &mut dyn Runtime, _: &OutputSink, args: Vec<Object>) -> Result<Object> {
    check_arity(&args, 1)?;
    match &args[0] {
        Object::Integer(n) => Ok(Object::Float(*n as f64)),
        Object::Float(x) => Ok(Object::Float(*x)),
        Object::String(s) => s
            .trim()
            .parse::<f64>()
            .map(Object::Float)
            .map_err(|_| invalid("float", format!("cannot parse {:?} as a float", s))),
        obj => Err(unsupported("float", obj)),
    }
}

fn read_line(runtime: &mut dyn Runtime, output: &OutputSink, args: Vec<Object>) -> Result<Object> {
    check_arity_between(&args, 0, 1)?;
    if let Some(prompt) = args.first() {
        output.write_str(&prompt.to_string())?;
    }
    Ok(runtime
        .input_reader()
        .read_line()?
        .map_or(Object::Nil, Object::String))
}

fn error(_: &mut dyn Runtime, _: &OutputSink, args: Vec<Object>) -> Result<Object> {
    check_arity(&args, 1)?;
    Ok(Object::Error(EvalError::Custom {
        message: args[0].to_string(),
    }))
}

fn is_error(_: &mut dyn Runtime, _: &OutputSink, args: Vec<Object>) -> Result<Object> {
    check_arity(&args, 1)?;
    Ok(args[0].is_error().into())
}

fn is_same_ref(_: &mut dyn Runtime, _: &OutputSink, args: Vec<Object>) -> Result<Object> {
    check_arity(&args, 2)?;
    Ok(args[0].same_ref(&args[1]).into())
}

fn assert(_: &mut dyn Runtime, _: &OutputSink, args: Vec<Object>) -> Result<Object> {
    check_arity_between(&args, 1, 2)?;
    if args[0].truth_value() {
        return Ok(Object::Nil);
    }
    let message = match args.get(1) {
        Some(message) => format!("assertion failed: {}", message),
        None => "assertion failed".to_owned(),
    };
    Err(EvalError::Custom { message })
}

#[cfg(test)]
mod test {
    use super::super::test::{call, BuiltinsOnly};
    use super::*;
    use crate::runtime::{InputReader, SharedBuffer};

    #[test]
    fn test_print_writes_to_sink() {
        let buffer = SharedBuffer::new();
        let output = OutputSink::new(buffer.clone());
        let mut runtime = BuiltinsOnly::new();
        println(&mut runtime, &output, vec!["a".into(), Object::Integer(1)]).unwrap();
        print(&mut runtime, &output, vec![Object::list(vec!["b".into()])]).unwrap();
        assert_eq!(buffer.contents(), "a 1\nlist(\"b\")");
    }

    #[test]
    fn test_conversions() {
        let cases = vec![
            ("typeof", vec![Object::Range(1, 2)], Object::from("range")),
            ("len", vec!["héllo".into()], Object::Integer(5)),
            ("len", vec![Object::Range(3, 1)], Object::Integer(3)),
            ("str", vec![Object::Float(1.0)], Object::from("1.0")),
            ("int", vec![" 42 ".into()], Object::Integer(42)),
            ("int", vec![Object::Float(-2.7)], Object::Integer(-2)),
            ("float", vec![Object::Integer(3)], Object::Float(3.0)),
            ("is_error", vec![EvalError::DivisionByZero.into()], Object::Boolean(true)),
        ];

        for (name, args, expected) in cases {
            assert_eq!(call(name, args), expected, "{}", name);
        }

        assert!(call("int", vec!["x1".into()]).is_error());
        assert!(call("len", vec![Object::Nil]).is_error());
        assert_eq!(
            call("len", vec![Object::Range(i64::MIN, i64::MAX)]),
            Object::Error(EvalError::RangeTooLarge {
                start: i64::MIN,
                end: i64::MAX
            })
        );
        assert_eq!(
            call("len", vec![Object::Range(0, i64::MAX - 1)]),
            Object::Integer(i64::MAX)
        );
    }

    #[test]
    fn test_error_builtin_returns_value() {
        assert_eq!(
            call("error", vec!["boom".into()]).to_string(),
            "ERROR: boom"
        );
        assert_eq!(
            call("assert", vec![false.into(), "x > 0".into()]).to_string(),
            "ERROR: assertion failed: x > 0"
        );
        assert_eq!(call("assert", vec![Object::Integer(1)]), Object::Nil);
    }

    #[test]
    fn test_read_line_uses_runtime_input() {
        let mut runtime = BuiltinsOnly {
            input: InputReader::from_string("one\ntwo\n"),
        };
        let output = OutputSink::new(SharedBuffer::new());
        assert_eq!(
            read_line(&mut runtime, &output, vec![]).unwrap(),
            Object::from("one")
        );
        assert_eq!(
            read_line(&mut runtime, &output, vec![]).unwrap(),
            Object::from("two")
        );
        assert_eq!(read_line(&mut runtime, &output, vec![]).unwrap(), Object::Nil);
    }
}
