use super::{check_arity, unsupported, Builtin};
use crate::object::{EvalError, Object, Result};
use crate::runtime::{OutputSink, Runtime};

pub(super) const BUILTINS: &[Builtin] = &[
    Builtin { name: "list", callback: list },
    Builtin { name: "tuple", callback: tuple },
    Builtin { name: "size_list", callback: size_list },
    Builtin { name: "size_tuple", callback: size_tuple },
    Builtin { name: "size_array", callback: size_array },
    Builtin { name: "pushback_list", callback: pushback_list },
    Builtin { name: "pushfront_list", callback: pushfront_list },
    Builtin { name: "popback_list", callback: popback_list },
    Builtin { name: "popfront_list", callback: popfront_list },
    Builtin { name: "insert_list", callback: insert_list },
    Builtin { name: "keys_map", callback: keys_map },
    Builtin { name: "values_map", callback: values_map },
    Builtin { name: "has_key", callback: has_key },
    Builtin { name: "delete_map", callback: delete_map },
    Builtin { name: "size_map", callback: size_map },
    Builtin { name: "add_set", callback: add_set },
    Builtin { name: "has_set", callback: has_set },
    Builtin { name: "remove_set", callback: remove_set },
    Builtin { name: "size_set", callback: size_set },
    Builtin { name: "to_list", callback: to_list },
    Builtin { name: "to_array", callback: to_array },
];

fn list(_: &mut dyn Runtime, _: &OutputSink, args: Vec<Object>) -> Result<Object> {
    Ok(Object::list(args))
}

fn tuple(_: &mut dyn Runtime, _: &OutputSink, args: Vec<Object>) -> Result<Object> {
    Ok(Object::tuple(args))
}

fn size_list(_: &mut dyn Runtime, _: &OutputSink, args: Vec<Object>) -> Result<Object> {
    check_arity(&args, 1)?;
    match &args[0] {
        Object::List(elements) => Ok(Object::Integer(elements.borrow().len() as i64)),
        obj => Err(unsupported("size_list", obj)),
    }
}

fn size_tuple(_: &mut dyn Runtime, _: &OutputSink, args: Vec<Object>) -> Result<Object> {
    check_arity(&args, 1)?;
    match &args[0] {
        Object::Tuple(elements) => Ok(Object::Integer(elements.len() as i64)),
        obj => Err(unsupported("size_tuple", obj)),
    }
}

fn size_array(_: &mut dyn Runtime, _: &OutputSink, args: Vec<Object>) -> Result<Object> {
    check_arity(&args, 1)?;
    match &args[0] {
        Object::Array(elements) => Ok(Object::Integer(elements.borrow().len() as i64)),
        obj => Err(unsupported("size_array", obj)),
    }
}

/// Applies `mutate` to the elements of a list; every other kind, tuples
/// included, is rejected.
fn with_list<T>(
    fn_name: &'static str,
    target: &Object,
    mutate: impl FnOnce(&mut Vec<Object>) -> Result<T>,
) -> Result<T> {
    match target {
        Object::List(elements) => mutate(&mut elements.borrow_mut()),
        obj => Err(unsupported(fn_name, obj)),
    }
}

fn pushback_list(_: &mut dyn Runtime, _: &OutputSink, mut args: Vec<Object>) -> Result<Object> {
    check_arity(&args, 2)?;
    let value = args.pop().unwrap_or_default();
    with_list("pushback_list", &args[0], |elements| {
        elements.push(value);
        Ok(Object::Nil)
    })
}

fn pushfront_list(_: &mut dyn Runtime, _: &OutputSink, mut args: Vec<Object>) -> Result<Object> {
    check_arity(&args, 2)?;
    let value = args.pop().unwrap_or_default();
    with_list("pushfront_list", &args[0], |elements| {
        elements.insert(0, value);
        Ok(Object::Nil)
    })
}

fn popback_list(_: &mut dyn Runtime, _: &OutputSink, args: Vec<Object>) -> Result<Object> {
    check_arity(&args, 1)?;
    with_list("popback_list", &args[0], |elements| {
        Ok(elements.pop().unwrap_or_default())
    })
}

fn popfront_list(_: &mut dyn Runtime, _: &OutputSink, args: Vec<Object>) -> Result<Object> {
    check_arity(&args, 1)?;
    with_list("popfront_list", &args[0], |elements| {
        if elements.is_empty() {
            return Ok(Object::Nil);
        }
        Ok(elements.remove(0))
    })
}

fn insert_list(_: &mut dyn Runtime, _: &OutputSink, mut args: Vec<Object>) -> Result<Object> {
    check_arity(&args, 3)?;
    let value = args.pop().unwrap_or_default();
    let index = match &args[1] {
        Object::Integer(n) => *n,
        obj => {
            return Err(EvalError::InvalidIndex {
                type_name: obj.type_name(),
            })
        }
    };
    with_list("insert_list", &args[0], |elements| {
        let length = elements.len();
        let position = if index < 0 { index + length as i64 } else { index };
        if position < 0 || position as usize > length {
            return Err(EvalError::IndexOutOfRange { index, length });
        }
        elements.insert(position as usize, value);
        Ok(Object::Nil)
    })
}

fn keys_map(_: &mut dyn Runtime, _: &OutputSink, args: Vec<Object>) -> Result<Object> {
    check_arity(&args, 1)?;
    match &args[0] {
        Object::Map(map) => Ok(Object::list(
            map.borrow().keys().map(|key| key.as_str().into()).collect(),
        )),
        obj => Err(unsupported("keys_map", obj)),
    }
}

fn values_map(_: &mut dyn Runtime, _: &OutputSink, args: Vec<Object>) -> Result<Object> {
    check_arity(&args, 1)?;
    match &args[0] {
        Object::Map(map) => Ok(Object::list(map.borrow().values().cloned().collect())),
        obj => Err(unsupported("values_map", obj)),
    }
}

fn has_key(_: &mut dyn Runtime, _: &OutputSink, args: Vec<Object>) -> Result<Object> {
    check_arity(&args, 2)?;
    match &args[0] {
        Object::Map(map) => Ok(map.borrow().contains_key(&args[1].key_string()).into()),
        obj => Err(unsupported("has_key", obj)),
    }
}

fn delete_map(_: &mut dyn Runtime, _: &OutputSink, args: Vec<Object>) -> Result<Object> {
    check_arity(&args, 2)?;
    match &args[0] {
        Object::Map(map) => Ok(map
            .borrow_mut()
            .remove(&args[1].key_string())
            .unwrap_or_default()),
        obj => Err(unsupported("delete_map", obj)),
    }
}

fn size_map(_: &mut dyn Runtime, _: &OutputSink, args: Vec<Object>) -> Result<Object> {
    check_arity(&args, 1)?;
    match &args[0] {
        Object::Map(map) => Ok(Object::Integer(map.borrow().len() as i64)),
        obj => Err(unsupported("size_map", obj)),
    }
}

fn add_set(_: &mut dyn Runtime, _: &OutputSink, mut args: Vec<Object>) -> Result<Object> {
    check_arity(&args, 2)?;
    let value = args.pop().unwrap_or_default();
    match &args[0] {
        Object::Set(set) => Ok(set.borrow_mut().insert(value).into()),
        obj => Err(unsupported("add_set", obj)),
    }
}

fn has_set(_: &mut dyn Runtime, _: &OutputSink, args: Vec<Object>) -> Result<Object> {
    check_arity(&args, 2)?;
    match &args[0] {
        Object::Set(set) => Ok(set.borrow().contains(&args[1]).into()),
        obj => Err(unsupported("has_set", obj)),
    }
}

fn remove_set(_: &mut dyn Runtime, _: &OutputSink, args: Vec<Object>) -> Result<Object> {
    check_arity(&args, 2)?;
    match &args[0] {
        Object::Set(set) => Ok(set.borrow_mut().remove(&args[1]).into()),
        obj => Err(unsupported("remove_set", obj)),
    }
}

fn size_set(_: &mut dyn Runtime, _: &OutputSink, args: Vec<Object>) -> Result<Object> {
    check_arity(&args, 1)?;
    match &args[0] {
        Object::Set(set) => Ok(Object::Integer(set.borrow().len() as i64)),
        obj => Err(unsupported("size_set", obj)),
    }
}

fn to_list(_: &mut dyn Runtime, _: &OutputSink, args: Vec<Object>) -> Result<Object> {
    check_arity(&args, 1)?;
    args[0]
        .elements()
        .map(Object::list)
        .ok_or_else(|| unsupported("to_list", &args[0]))
}

fn to_array(_: &mut dyn Runtime, _: &OutputSink, args: Vec<Object>) -> Result<Object> {
    check_arity(&args, 1)?;
    args[0]
        .elements()
        .map(Object::array)
        .ok_or_else(|| unsupported("to_array", &args[0]))
}
