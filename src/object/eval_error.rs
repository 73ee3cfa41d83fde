use crate::ast;
use custom_error::custom_error;

custom_error! {
    #[derive(Clone, PartialEq)]
    pub EvalError

    IdentifierNotFound{name: String} = "identifier not found: {name}",
    UnknownPrefixOperator{operator: ast::Operator, operand: &'static str} = "unknown operator: {operator}{operand}",
    UnknownInfixOperator{left: &'static str, operator: ast::Operator, right: &'static str} = "unknown operator: {left} {operator} {right}",
    TypeMismatch{left: &'static str, operator: ast::Operator, right: &'static str} = "type mismatch: {left} {operator} {right}",
    DivisionByZero = "division by zero",
    ShiftOutOfRange{amount: i64} = "shift amount out of range: {amount}",
    InvalidRange{start: &'static str, end: &'static str} = "range bounds must be integers, got {start}...{end}",
    NotAFunction{type_name: &'static str} = "not a function: {type_name}",
    UnsupportedArgType{fn_name: &'static str, type_name: &'static str} = "argument to `{fn_name}` not supported, got {type_name}",
    InvalidArgument{fn_name: &'static str, message: String} = "{fn_name}: {message}",
    IncorrectArity{got: usize, want: usize} = "wrong number of arguments. got={got}, want={want}",
    NotIndexable{type_name: &'static str} = "index operator not supported: {type_name}",
    InvalidIndex{type_name: &'static str} = "index must be an integer, got {type_name}",
    IndexOutOfRange{index: i64, length: usize} = "index out of range: {index} (length {length})",
    InvalidSlice{start: i64, end: i64, length: usize} = "invalid slice [{start}:{end}] of length {length}",
    RangeTooLarge{start: i64, end: i64} = "range {start}...{end} has too many values",
    RepeatTooLarge{length: usize, count: i64} = "cannot repeat a string of length {length} {count} times",
    NotIterable{type_name: &'static str} = "cannot iterate over {type_name}",
    ImmutableTuple = "tuples cannot be modified",
    ConstantAssignment{name: String} = "cannot assign to constant {name}",
    ConstantRedeclaration{name: String} = "cannot redeclare constant {name}",
    InvalidAssignmentTarget{target: String} = "cannot assign to {target}",
    UnknownStruct{name: String} = "unknown struct: {name}",
    UnknownMember{type_name: String, name: String} = "{type_name} has no member {name}",
    NoMembers{type_name: &'static str} = "member access not supported: {type_name}",
    ClassFieldThroughInstance{name: String} = "cannot assign class field {name} through an instance",
    UnknownPackage{name: String} = "unknown package: {name}",
    UnknownPackageFunction{package: String, name: String} = "package {package} has no function {name}",
    BreakOutsideLoop = "break outside of a loop",
    ContinueOutsideLoop = "continue outside of a loop",
    CallDepthExceeded{limit: usize} = "maximum call depth of {limit} exceeded",
    Io{message: String} = "i/o error: {message}",
    Custom{message: String} = "{message}",
}

impl EvalError {
    pub fn binary_op_error(
        left: &'static str,
        operator: ast::Operator,
        right: &'static str,
    ) -> Self {
        if left == right {
            Self::UnknownInfixOperator {
                left,
                operator,
                right,
            }
        } else {
            Self::TypeMismatch {
                left,
                operator,
                right,
            }
        }
    }
}

impl From<std::io::Error> for EvalError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
        }
    }
}
