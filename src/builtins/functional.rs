use super::{check_arity, check_arity_between, unsupported, Builtin};
use crate::object::{EvalError, Object, Result};
use crate::runtime::{OutputSink, Runtime};
use std::cmp::Ordering;

pub(super) const BUILTINS: &[Builtin] = &[
    Builtin { name: "map", callback: map },
    Builtin { name: "filter", callback: filter },
    Builtin { name: "reduce", callback: reduce },
    Builtin { name: "sort", callback: sort },
];

/// Rebuilds a collection of the same kind as `template`; anything that is
/// not an array or tuple comes back as a list.
fn same_kind(template: &Object, elements: Vec<Object>) -> Object {
    match template {
        Object::Array(_) => Object::array(elements),
        Object::Tuple(_) => Object::tuple(elements),
        _ => Object::list(elements),
    }
}

fn elements(fn_name: &'static str, collection: &Object) -> Result<Vec<Object>> {
    collection
        .elements()
        .ok_or_else(|| unsupported(fn_name, collection))
}

fn map(runtime: &mut dyn Runtime, _: &OutputSink, args: Vec<Object>) -> Result<Object> {
    check_arity(&args, 2)?;
    let mapped = elements("map", &args[0])?
        .into_iter()
        .map(|element| runtime.call_function(&args[1], vec![element]).into_result())
        .collect::<Result<Vec<Object>>>()?;
    Ok(same_kind(&args[0], mapped))
}

fn filter(runtime: &mut dyn Runtime, _: &OutputSink, args: Vec<Object>) -> Result<Object> {
    check_arity(&args, 2)?;
    let mut kept = vec![];
    for element in elements("filter", &args[0])? {
        let keep = runtime
            .call_function(&args[1], vec![element.clone()])
            .into_result()?;
        if keep.truth_value() {
            kept.push(element);
        }
    }
    Ok(same_kind(&args[0], kept))
}

fn reduce(runtime: &mut dyn Runtime, _: &OutputSink, args: Vec<Object>) -> Result<Object> {
    check_arity(&args, 3)?;
    elements("reduce", &args[0])?
        .into_iter()
        .try_fold(args[2].clone(), |acc, element| {
            runtime
                .call_function(&args[1], vec![acc, element])
                .into_result()
        })
}

fn natural_order(a: &Object, b: &Object) -> Result<Ordering> {
    let ordering = match (a, b) {
        (Object::Integer(x), Object::Integer(y)) => Some(x.cmp(y)),
        (Object::Integer(x), Object::Float(y)) => (*x as f64).partial_cmp(y),
        (Object::Float(x), Object::Integer(y)) => x.partial_cmp(&(*y as f64)),
        (Object::Float(x), Object::Float(y)) => x.partial_cmp(y),
        (Object::String(x), Object::String(y)) => Some(x.cmp(y)),
        (Object::Boolean(x), Object::Boolean(y)) => Some(x.cmp(y)),
        _ => None,
    };
    ordering.ok_or_else(|| EvalError::InvalidArgument {
        fn_name: "sort",
        message: format!("cannot compare {} with {}", a.type_name(), b.type_name()),
    })
}

/// Interprets a comparator result: a bool means "less than", an int is a signed ordering.
fn comparator_less(result: Object) -> Result<bool> {
    match result {
        Object::Boolean(less) => Ok(less),
        Object::Integer(n) => Ok(n < 0),
        obj => Err(EvalError::InvalidArgument {
            fn_name: "sort",
            message: format!("comparator must return bool or int, got {}", obj.type_name()),
        }),
    }
}

/// Stable merge sort with a fallible comparison.
fn merge_sort(
    mut items: Vec<Object>,
    less: &mut dyn FnMut(&Object, &Object) -> Result<bool>,
) -> Result<Vec<Object>> {
    if items.len() <= 1 {
        return Ok(items);
    }
    let right = items.split_off(items.len() / 2);
    let left = merge_sort(items, less)?;
    let right = merge_sort(right, less)?;

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    while let (Some(l), Some(r)) = (left.peek(), right.peek()) {
        let next = if less(r, l)? { right.next() } else { left.next() };
        merged.extend(next);
    }
    merged.extend(left);
    merged.extend(right);
    Ok(merged)
}

fn sort(runtime: &mut dyn Runtime, _: &OutputSink, args: Vec<Object>) -> Result<Object> {
    check_arity_between(&args, 1, 2)?;
    let items = elements("sort", &args[0])?;
    let sorted = match args.get(1) {
        Some(comparator) => merge_sort(items, &mut |a, b| {
            comparator_less(
                runtime
                    .call_function(comparator, vec![a.clone(), b.clone()])
                    .into_result()?,
            )
        })?,
        None => merge_sort(items, &mut |a, b| {
            Ok(natural_order(a, b)? == Ordering::Less)
        })?,
    };
    Ok(same_kind(&args[0], sorted))
}
