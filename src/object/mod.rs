use crate::ast;
use crate::builtins::Builtin;
use crate::environment::Environment;
use std::cell::RefCell;
use std::fmt::{self, Display, Formatter};
use std::rc::Rc;

mod eval_error;
pub use eval_error::EvalError;

mod ordered;
pub use ordered::{OrderedMap, OrderedSet};

mod structs;
pub use structs::{Instance, StructType};

pub type Result<T> = std::result::Result<T, EvalError>;

/// Shared, mutable element storage for arrays and lists.
pub type Elements = Rc<RefCell<Vec<Object>>>;

#[derive(Debug, Clone)]
pub enum Object {
    Integer(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    Nil,
    Error(EvalError),
    Array(Elements),
    List(Elements),
    Tuple(Rc<Vec<Object>>),
    Map(Rc<RefCell<OrderedMap>>),
    Set(Rc<RefCell<OrderedSet>>),
    Range(i64, i64),
    Function(Rc<FunctionObject>),
    Builtin(Builtin),
    Struct(Rc<StructType>),
    Instance(Rc<Instance>),
    Break(Option<Box<Object>>),
    Continue,
    ReturnValue(Box<Object>),
}

impl Display for Object {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{}", n),
            Self::Float(x) => write_float(f, *x),
            Self::String(s) => write!(f, "{}", s),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Nil => write!(f, "nil"),
            Self::Error(err) => write!(f, "ERROR: {}", err),
            Self::Array(elements) => write_nested(f, elements, "[", "]", || {
                join_repr(elements.borrow().iter())
            }),
            Self::List(elements) => write_nested(f, elements, "list(", ")", || {
                join_repr(elements.borrow().iter())
            }),
            Self::Tuple(elements) => {
                write_nested(f, elements, "tuple(", ")", || join_repr(elements.iter()))
            }
            Self::Map(map) => write_nested(f, map, "map{", "}", || {
                let pairs: Vec<String> = map
                    .borrow()
                    .iter()
                    .map(|(key, value)| format!("{:?}: {}", key, value.repr()))
                    .collect();
                pairs.join(", ")
            }),
            Self::Set(set) => write_nested(f, set, "set{", "}", || join_repr(set.borrow().iter())),
            Self::Range(start, end) => write!(f, "{}...{}", start, end),
            Self::Function(func) => write!(f, "{}", func),
            Self::Builtin(builtin) => write!(f, "builtin {}", builtin.name),
            Self::Struct(struct_type) => write!(f, "struct {}", struct_type.name),
            Self::Instance(instance) => match Visit::enter((address(instance), 0)) {
                Some(_visit) => write!(f, "{}", instance),
                None => write!(f, "{}{{...}}", instance.struct_type.name),
            },
            Self::Break(_) => write!(f, "break"),
            Self::Continue => write!(f, "continue"),
            Self::ReturnValue(obj) => write!(f, "{}", obj),
        }
    }
}

fn write_float(f: &mut Formatter, x: f64) -> fmt::Result {
    if x.is_finite() && x.fract() == 0.0 {
        write!(f, "{:.1}", x)
    } else {
        write!(f, "{}", x)
    }
}

thread_local! {
    /// Containers being displayed or compared right now, innermost last.
    static VISITING: RefCell<Vec<(usize, usize)>> = RefCell::new(Vec::new());
}

/// Marks a container, or a pair of containers under comparison, as being
/// walked until dropped. `enter` returns `None` when a value is reached
/// again through itself.
struct Visit((usize, usize));

impl Visit {
    fn enter(key: (usize, usize)) -> Option<Self> {
        VISITING.with(|visiting| {
            let mut visiting = visiting.borrow_mut();
            if visiting.contains(&key) {
                return None;
            }
            visiting.push(key);
            Some(Self(key))
        })
    }
}

impl Drop for Visit {
    fn drop(&mut self) {
        VISITING.with(|visiting| {
            let mut visiting = visiting.borrow_mut();
            if let Some(at) = visiting.iter().rposition(|key| *key == self.0) {
                visiting.remove(at);
            }
        });
    }
}

fn address<T>(rc: &Rc<T>) -> usize {
    Rc::as_ptr(rc) as *const () as usize
}

/// Writes a container between `open` and `close`. A container met again
/// inside itself is written as `...`.
fn write_nested<T>(
    f: &mut Formatter,
    container: &Rc<T>,
    open: &str,
    close: &str,
    body: impl FnOnce() -> String,
) -> fmt::Result {
    let body = match Visit::enter((address(container), 0)) {
        Some(_visit) => body(),
        None => "...".to_owned(),
    };
    write!(f, "{}{}{}", open, body, close)
}

/// Compares two containers structurally. A pair already under comparison
/// further up counts as equal.
fn eq_nested<T>(a: &Rc<T>, b: &Rc<T>, eq: impl FnOnce() -> bool) -> bool {
    Rc::ptr_eq(a, b) || Visit::enter((address(a), address(b))).map_or(true, |_visit| eq())
}

fn join_repr<'a>(values: impl Iterator<Item = &'a Object>) -> String {
    values.map(Object::repr).collect::<Vec<_>>().join(", ")
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Integer(a), Self::Float(b)) | (Self::Float(b), Self::Integer(a)) => {
                *a as f64 == *b
            }
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Nil, Self::Nil) => true,
            (Self::Error(a), Self::Error(b)) => a == b,
            (Self::Array(a), Self::Array(b)) | (Self::List(a), Self::List(b)) => {
                eq_nested(a, b, || *a.borrow() == *b.borrow())
            }
            (Self::Tuple(a), Self::Tuple(b)) => eq_nested(a, b, || a == b),
            (Self::Map(a), Self::Map(b)) => eq_nested(a, b, || *a.borrow() == *b.borrow()),
            (Self::Set(a), Self::Set(b)) => eq_nested(a, b, || *a.borrow() == *b.borrow()),
            (Self::Range(a1, a2), Self::Range(b1, b2)) => a1 == b1 && a2 == b2,
            (Self::Function(a), Self::Function(b)) => Rc::ptr_eq(a, b),
            (Self::Builtin(a), Self::Builtin(b)) => a == b,
            (Self::Struct(a), Self::Struct(b)) => Rc::ptr_eq(a, b),
            (Self::Instance(a), Self::Instance(b)) => Rc::ptr_eq(a, b),
            (Self::Break(a), Self::Break(b)) => a == b,
            (Self::Continue, Self::Continue) => true,
            (Self::ReturnValue(a), Self::ReturnValue(b)) => a == b,
            _ => false,
        }
    }
}

impl Default for Object {
    fn default() -> Self {
        Self::Nil
    }
}

impl From<i64> for Object {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<f64> for Object {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<bool> for Object {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<String> for Object {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for Object {
    fn from(s: &str) -> Self {
        s.to_owned().into()
    }
}

impl From<EvalError> for Object {
    fn from(err: EvalError) -> Self {
        Self::Error(err)
    }
}

impl From<Result<Object>> for Object {
    fn from(result: Result<Object>) -> Self {
        result.unwrap_or_else(Self::Error)
    }
}

impl Object {
    pub fn array(elements: Vec<Object>) -> Self {
        Self::Array(Rc::new(RefCell::new(elements)))
    }

    pub fn list(elements: Vec<Object>) -> Self {
        Self::List(Rc::new(RefCell::new(elements)))
    }

    pub fn tuple(elements: Vec<Object>) -> Self {
        Self::Tuple(Rc::new(elements))
    }

    pub fn map(map: OrderedMap) -> Self {
        Self::Map(Rc::new(RefCell::new(map)))
    }

    pub fn set(set: OrderedSet) -> Self {
        Self::Set(Rc::new(RefCell::new(set)))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// True for values that must stop the enclosing block.
    pub fn is_signal(&self) -> bool {
        matches!(self, Self::Break(_) | Self::Continue | Self::ReturnValue(_))
    }

    /// Moves an `Error` value onto the `Err` side so it can be propagated with `?`.
    pub fn into_result(self) -> Result<Object> {
        match self {
            Self::Error(err) => Err(err),
            obj => Ok(obj),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Boolean(_) => "bool",
            Self::Nil => "nil",
            Self::Error(_) => "error",
            Self::Array(_) => "array",
            Self::List(_) => "list",
            Self::Tuple(_) => "tuple",
            Self::Map(_) => "map",
            Self::Set(_) => "set",
            Self::Range(..) => "range",
            Self::Function(_) => "function",
            Self::Builtin(_) => "builtin",
            Self::Struct(_) => "struct",
            Self::Instance(_) => "object",
            Self::Break(_) => "break",
            Self::Continue => "continue",
            Self::ReturnValue(o) => o.type_name(),
        }
    }

    pub fn truth_value(&self) -> bool {
        match self {
            Self::Boolean(b) => *b,
            Self::Integer(n) => *n != 0,
            Self::Float(x) => *x != 0.0,
            Self::String(s) => !s.is_empty(),
            Self::Nil => false,
            _ => true,
        }
    }

    /// Display form used inside collections, where strings are quoted.
    pub fn repr(&self) -> String {
        match self {
            Self::String(s) => format!("{:?}", s),
            obj => obj.to_string(),
        }
    }

    /// The string a value is keyed by in maps and sets.
    pub fn key_string(&self) -> String {
        match self {
            Self::String(s) => s.clone(),
            obj => obj.to_string(),
        }
    }

    /// Identity comparison for reference values, equality for everything else.
    pub fn same_ref(&self, other: &Object) -> bool {
        match (self, other) {
            (Self::Array(a), Self::Array(b)) | (Self::List(a), Self::List(b)) => Rc::ptr_eq(a, b),
            (Self::Tuple(a), Self::Tuple(b)) => Rc::ptr_eq(a, b),
            (Self::Map(a), Self::Map(b)) => Rc::ptr_eq(a, b),
            (Self::Set(a), Self::Set(b)) => Rc::ptr_eq(a, b),
            (a, b) => a == b,
        }
    }

    /// The values iterating over this value yields, in order.
    pub fn elements(&self) -> Option<Vec<Object>> {
        match self {
            Self::Array(elements) | Self::List(elements) => Some(elements.borrow().clone()),
            Self::Tuple(elements) => Some(elements.as_ref().clone()),
            Self::Map(map) => Some(map.borrow().keys().map(|k| k.as_str().into()).collect()),
            Self::Set(set) => Some(set.borrow().iter().cloned().collect()),
            Self::Range(start, end) => Some(range_values(*start, *end).map(Object::Integer).collect()),
            Self::String(s) => Some(s.chars().map(|c| c.to_string().into()).collect()),
            _ => None,
        }
    }
}

/// Every integer of an inclusive range, descending when `start > end`.
pub fn range_values(start: i64, end: i64) -> Box<dyn Iterator<Item = i64>> {
    if start <= end {
        Box::new(start..=end)
    } else {
        Box::new((end..=start).rev())
    }
}

/// Number of integers in an inclusive range, as long as it fits in an integer.
pub fn range_len(start: i64, end: i64) -> Result<usize> {
    start
        .abs_diff(end)
        .checked_add(1)
        .filter(|len| *len <= i64::MAX as u64)
        .and_then(|len| usize::try_from(len).ok())
        .ok_or(EvalError::RangeTooLarge { start, end })
}

pub struct FunctionObject {
    pub name: Option<String>,
    pub parameters: Vec<ast::Identifier>,
    pub body: Rc<ast::BlockStatement>,
    pub env: Environment,
}

impl FunctionObject {
    pub fn new(literal: &ast::FunctionLiteral, env: Environment) -> Self {
        Self {
            name: literal.name.clone(),
            parameters: literal.parameters.clone(),
            body: Rc::clone(&literal.body),
            env,
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("<anonymous>")
    }
}

impl fmt::Debug for FunctionObject {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl Display for FunctionObject {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let identifier_names: Vec<String> = self
            .parameters
            .iter()
            .map(ast::Identifier::to_string)
            .collect();

        match &self.name {
            Some(name) => write!(f, "func {}({})", name, identifier_names.join(", ")),
            None => write!(f, "func({})", identifier_names.join(", ")),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_display() {
        let map: OrderedMap = vec![
            ("b".to_owned(), Object::from("x")),
            ("a".to_owned(), Object::Integer(1)),
        ]
        .into_iter()
        .collect();
        let cases = vec![
            (Object::Integer(-3), "-3"),
            (Object::Float(2.0), "2.0"),
            (Object::Float(0.25), "0.25"),
            (Object::from("plain"), "plain"),
            (Object::Nil, "nil"),
            (Object::array(vec![Object::Integer(1), "s".into()]), "[1, \"s\"]"),
            (Object::list(vec![Object::Integer(1), Object::Integer(2)]), "list(1, 2)"),
            (Object::tuple(vec![true.into()]), "tuple(true)"),
            (Object::map(map), "map{\"b\": \"x\", \"a\": 1}"),
            (Object::Range(5, 1), "5...1"),
            (EvalError::DivisionByZero.into(), "ERROR: division by zero"),
        ];

        for (obj, expected) in cases {
            assert_eq!(obj.to_string(), expected);
        }
    }

    #[test]
    fn test_truth_value() {
        let cases = vec![
            (Object::Boolean(false), false),
            (Object::Integer(0), false),
            (Object::Integer(-1), true),
            (Object::Float(0.0), false),
            (Object::from(""), false),
            (Object::from("a"), true),
            (Object::Nil, false),
            (Object::array(vec![]), true),
            (Object::Range(0, 0), true),
        ];

        for (obj, expected) in cases {
            assert_eq!(obj.truth_value(), expected, "{}", obj);
        }
    }

    #[test]
    fn test_equality() {
        assert_eq!(Object::Integer(2), Object::Float(2.0));
        assert_ne!(Object::Integer(2), Object::from("2"));
        assert_eq!(
            Object::list(vec![Object::Integer(1), Object::Integer(2)]),
            Object::list(vec![Object::Integer(1), Object::Integer(2)])
        );
        assert_ne!(
            Object::list(vec![Object::Integer(1)]),
            Object::array(vec![Object::Integer(1)])
        );

        let shared = Object::list(vec![]);
        let other = Object::list(vec![]);
        assert!(shared.same_ref(&shared.clone()));
        assert!(!shared.same_ref(&other));
    }

    #[test]
    fn test_cyclic_values() {
        let looped = |first: i64| {
            let list = Object::list(vec![Object::Integer(first)]);
            if let Object::List(elements) = &list {
                elements.borrow_mut().push(list.clone());
            }
            list
        };
        let a = looped(1);
        assert_eq!(a.to_string(), "list(1, list(...))");
        assert!(a == a.clone());
        assert!(a == looped(1));
        assert!(a != looped(2));

        let map = Object::map(OrderedMap::new());
        if let Object::Map(pairs) = &map {
            pairs.borrow_mut().insert("me".to_owned(), map.clone());
        }
        assert_eq!(map.to_string(), "map{\"me\": map{...}}");
    }
}
