use crate::object::{range_len, range_values, EvalError, Object, Result};
use std::ops::Range;

/// Resolves a possibly negative index against `length`.
fn position(index: &Object, length: usize) -> Result<usize> {
    let index = match index {
        Object::Integer(n) => *n,
        other => {
            return Err(EvalError::InvalidIndex {
                type_name: other.type_name(),
            })
        }
    };
    let resolved = if index < 0 {
        index + length as i64
    } else {
        index
    };
    if resolved < 0 || resolved >= length as i64 {
        return Err(EvalError::IndexOutOfRange { index, length });
    }
    Ok(resolved as usize)
}

pub fn index(target: &Object, index: &Object) -> Result<Object> {
    match target {
        Object::Array(elements) | Object::List(elements) => {
            let elements = elements.borrow();
            Ok(elements[position(index, elements.len())?].clone())
        }
        Object::Tuple(elements) => Ok(elements[position(index, elements.len())?].clone()),
        Object::String(s) => {
            let at = position(index, s.chars().count())?;
            Ok(s.chars().nth(at).map(String::from).unwrap_or_default().into())
        }
        Object::Range(start, end) => {
            let offset = position(index, range_len(*start, *end)?)? as i64;
            Ok(Object::Integer(if start <= end {
                start + offset
            } else {
                start - offset
            }))
        }
        Object::Map(map) => Ok(map
            .borrow()
            .get(&index.key_string())
            .cloned()
            .unwrap_or_default()),
        other => Err(EvalError::NotIndexable {
            type_name: other.type_name(),
        }),
    }
}

fn bound(value: Option<&Object>, default: usize, length: usize) -> Result<i64> {
    match value {
        None => Ok(default as i64),
        Some(Object::Integer(n)) if *n < 0 => Ok(n + length as i64),
        Some(Object::Integer(n)) => Ok(*n),
        Some(other) => Err(EvalError::InvalidIndex {
            type_name: other.type_name(),
        }),
    }
}

fn slice_range(start: Option<&Object>, end: Option<&Object>, length: usize) -> Result<Range<usize>> {
    let from = bound(start, 0, length)?;
    let to = bound(end, length, length)?;
    if from < 0 || to > length as i64 || from > to {
        return Err(EvalError::InvalidSlice {
            start: from,
            end: to,
            length,
        });
    }
    Ok(from as usize..to as usize)
}

/// `target[start:end]`, end exclusive. Produces a new value of the same kind,
/// except ranges, which slice into an array.
pub fn slice(target: &Object, start: Option<&Object>, end: Option<&Object>) -> Result<Object> {
    match target {
        Object::Array(elements) => {
            let elements = elements.borrow();
            let range = slice_range(start, end, elements.len())?;
            Ok(Object::array(elements[range].to_vec()))
        }
        Object::List(elements) => {
            let elements = elements.borrow();
            let range = slice_range(start, end, elements.len())?;
            Ok(Object::list(elements[range].to_vec()))
        }
        Object::Tuple(elements) => {
            let range = slice_range(start, end, elements.len())?;
            Ok(Object::tuple(elements[range].to_vec()))
        }
        Object::String(s) => {
            let range = slice_range(start, end, s.chars().count())?;
            Ok(s.chars()
                .skip(range.start)
                .take(range.len())
                .collect::<String>()
                .into())
        }
        Object::Range(first, last) => {
            let range = slice_range(start, end, range_len(*first, *last)?)?;
            Ok(Object::array(
                range_values(*first, *last)
                    .skip(range.start)
                    .take(range.len())
                    .map(Object::Integer)
                    .collect(),
            ))
        }
        other => Err(EvalError::NotIndexable {
            type_name: other.type_name(),
        }),
    }
}

/// `target[index] = value`, in place.
pub fn assign_index(target: &Object, index: &Object, value: Object) -> Result<()> {
    match target {
        Object::Array(elements) | Object::List(elements) => {
            let mut elements = elements.borrow_mut();
            let at = position(index, elements.len())?;
            elements[at] = value;
            Ok(())
        }
        Object::Tuple(_) => Err(EvalError::ImmutableTuple),
        Object::Map(map) => {
            map.borrow_mut().insert(index.key_string(), value);
            Ok(())
        }
        other => Err(EvalError::NotIndexable {
            type_name: other.type_name(),
        }),
    }
}
