use super::{check_arity, check_arity_between, invalid, unsupported, Builtin};
use crate::object::{Object, Result};
use crate::runtime::{OutputSink, Runtime};

pub(super) const BUILTINS: &[Builtin] = &[
    Builtin { name: "upper", callback: upper },
    Builtin { name: "lower", callback: lower },
    Builtin { name: "trim", callback: trim },
    Builtin { name: "split", callback: split },
    Builtin { name: "join", callback: join },
    Builtin { name: "contains", callback: contains },
    Builtin { name: "replace", callback: replace },
    Builtin { name: "substr", callback: substr },
    Builtin { name: "index_of", callback: index_of },
];

fn string<'a>(fn_name: &'static str, obj: &'a Object) -> Result<&'a str> {
    match obj {
        Object::String(s) => Ok(s.as_str()),
        obj => Err(unsupported(fn_name, obj)),
    }
}

fn upper(_: &mut dyn Runtime, _: &OutputSink, args: Vec<Object>) -> Result<Object> {
    check_arity(&args, 1)?;
    Ok(string("upper", &args[0])?.to_uppercase().into())
}

fn lower(_: &mut dyn Runtime, _: &OutputSink, args: Vec<Object>) -> Result<Object> {
    check_arity(&args, 1)?;
    Ok(string("lower", &args[0])?.to_lowercase().into())
}

fn trim(_: &mut dyn Runtime, _: &OutputSink, args: Vec<Object>) -> Result<Object> {
    check_arity(&args, 1)?;
    Ok(string("trim", &args[0])?.trim().into())
}

/// An empty separator splits into characters.
fn split(_: &mut dyn Runtime, _: &OutputSink, args: Vec<Object>) -> Result<Object> {
    check_arity(&args, 2)?;
    let s = string("split", &args[0])?;
    let separator = string("split", &args[1])?;
    let parts: Vec<Object> = if separator.is_empty() {
        s.chars().map(|c| c.to_string().into()).collect()
    } else {
        s.split(separator).map(Object::from).collect()
    };
    Ok(Object::list(parts))
}

fn join(_: &mut dyn Runtime, _: &OutputSink, args: Vec<Object>) -> Result<Object> {
    check_arity(&args, 2)?;
    let separator = string("join", &args[1])?;
    let parts: Vec<String> = args[0]
        .elements()
        .ok_or_else(|| unsupported("join", &args[0]))?
        .iter()
        .map(Object::to_string)
        .collect();
    Ok(parts.join(separator).into())
}

fn contains(_: &mut dyn Runtime, _: &OutputSink, args: Vec<Object>) -> Result<Object> {
    check_arity(&args, 2)?;
    let s = string("contains", &args[0])?;
    Ok(s.contains(string("contains", &args[1])?).into())
}

fn replace(_: &mut dyn Runtime, _: &OutputSink, args: Vec<Object>) -> Result<Object> {
    check_arity(&args, 3)?;
    let s = string("replace", &args[0])?;
    let from = string("replace", &args[1])?;
    let to = string("replace", &args[2])?;
    if from.is_empty() {
        return Err(invalid("replace", "pattern must not be empty"));
    }
    Ok(s.replace(from, to).into())
}

/// `substr(s, start[, length])`, counted in characters.
fn substr(_: &mut dyn Runtime, _: &OutputSink, args: Vec<Object>) -> Result<Object> {
    check_arity_between(&args, 2, 3)?;
    let s = string("substr", &args[0])?;
    let count = s.chars().count() as i64;
    let start = match &args[1] {
        Object::Integer(n) if *n < 0 => (count + n).max(0),
        Object::Integer(n) => *n,
        obj => return Err(unsupported("substr", obj)),
    };
    let length = match args.get(2) {
        Some(Object::Integer(n)) if *n >= 0 => *n,
        Some(Object::Integer(_)) => return Err(invalid("substr", "length must not be negative")),
        Some(obj) => return Err(unsupported("substr", obj)),
        None => count,
    };
    Ok(s.chars()
        .skip(start as usize)
        .take(length as usize)
        .collect::<String>()
        .into())
}

/// Character index of the first match, or -1.
fn index_of(_: &mut dyn Runtime, _: &OutputSink, args: Vec<Object>) -> Result<Object> {
    check_arity(&args, 2)?;
    let s = string("index_of", &args[0])?;
    let needle = string("index_of", &args[1])?;
    let index = s
        .find(needle)
        .map_or(-1, |byte| s[..byte].chars().count() as i64);
    Ok(Object::Integer(index))
}

#[cfg(test)]
mod test {
    use super::super::test::call;
    use super::*;

    #[test]
    fn test_strings() {
        let cases = vec![
            ("upper", vec!["abc".into()], Object::from("ABC")),
            ("lower", vec!["AbC".into()], Object::from("abc")),
            ("trim", vec!["  x \n".into()], Object::from("x")),
            ("join", vec![Object::list(vec![Object::Integer(1), "b".into()]), "-".into()], Object::from("1-b")),
            ("contains", vec!["haystack".into(), "st".into()], Object::Boolean(true)),
            ("replace", vec!["a.b.c".into(), ".".into(), "/".into()], Object::from("a/b/c")),
            ("substr", vec!["héllo".into(), Object::Integer(1), Object::Integer(3)], Object::from("éll")),
            ("substr", vec!["hello".into(), Object::Integer(-2)], Object::from("lo")),
            ("index_of", vec!["héllo".into(), "l".into()], Object::Integer(2)),
            ("index_of", vec!["hello".into(), "z".into()], Object::Integer(-1)),
        ];

        for (name, args, expected) in cases {
            assert_eq!(call(name, args), expected, "{}", name);
        }
    }

    #[test]
    fn test_split() {
        assert_eq!(
            call("split", vec!["a,b,,c".into(), ",".into()]).to_string(),
            "list(\"a\", \"b\", \"\", \"c\")"
        );
        assert_eq!(
            call("split", vec!["ab".into(), "".into()]).to_string(),
            "list(\"a\", \"b\")"
        );
        assert!(call("split", vec![Object::Integer(1), ",".into()]).is_error());
    }
}
