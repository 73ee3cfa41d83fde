use crate::ast::Operator;
use crate::object::{EvalError, Object, Result};

pub fn eval_prefix(operator: Operator, right: Object) -> Result<Object> {
    match (operator, &right) {
        (Operator::Bang, _) => Ok(Object::Boolean(!right.truth_value())),
        (Operator::Minus, Object::Integer(n)) => Ok(Object::Integer(n.wrapping_neg())),
        (Operator::Minus, Object::Float(x)) => Ok(Object::Float(-x)),
        (Operator::Tilde, Object::Integer(n)) => Ok(Object::Integer(!n)),
        _ => Err(EvalError::UnknownPrefixOperator {
            operator,
            operand: right.type_name(),
        }),
    }
}

/// Applies a binary operator to two evaluated operands. `&&` and `||` are
/// expected to be short-circuited by the caller and only arrive here from
/// already evaluated values.
pub fn eval_infix(operator: Operator, left: Object, right: Object) -> Result<Object> {
    match operator {
        Operator::Eq => return Ok(Object::Boolean(left == right)),
        Operator::NotEq => return Ok(Object::Boolean(left != right)),
        Operator::And => return Ok(Object::Boolean(left.truth_value() && right.truth_value())),
        Operator::Or => return Ok(Object::Boolean(left.truth_value() || right.truth_value())),
        _ => {}
    }

    let result = match (&left, &right) {
        (Object::Integer(l), Object::Integer(r)) => integer_infix(operator, *l, *r)?,
        (Object::Float(l), Object::Float(r)) => float_infix(operator, *l, *r)?,
        (Object::Integer(l), Object::Float(r)) => float_infix(operator, *l as f64, *r)?,
        (Object::Float(l), Object::Integer(r)) => float_infix(operator, *l, *r as f64)?,
        (Object::String(l), Object::String(r)) => string_infix(operator, l, r),
        (Object::String(s), Object::Integer(n)) | (Object::Integer(n), Object::String(s))
            if operator == Operator::Asterisk =>
        {
            Some(Object::String(repeat(s, *n)?))
        }
        (Object::String(_), _) | (_, Object::String(_)) if operator == Operator::Plus => {
            Some(Object::String(format!("{}{}", left, right)))
        }
        (Object::Boolean(l), Object::Boolean(r)) => boolean_infix(operator, *l, *r),
        (Object::Array(l), Object::Array(r)) if operator == Operator::Plus => {
            Some(Object::array(concat(&l.borrow(), &r.borrow())))
        }
        (Object::List(l), Object::List(r)) if operator == Operator::Plus => {
            Some(Object::list(concat(&l.borrow(), &r.borrow())))
        }
        (Object::Tuple(l), Object::Tuple(r)) if operator == Operator::Plus => {
            Some(Object::tuple(concat(l, r)))
        }
        _ => None,
    };

    result.ok_or_else(|| EvalError::binary_op_error(left.type_name(), operator, right.type_name()))
}

/// `s` repeated `count` times; a negative count gives the empty string.
fn repeat(s: &str, count: i64) -> Result<String> {
    let too_large = || EvalError::RepeatTooLarge {
        length: s.len(),
        count,
    };
    let times = usize::try_from(count.max(0)).map_err(|_| too_large())?;
    match s.len().checked_mul(times) {
        Some(total) if total <= isize::MAX as usize => Ok(s.repeat(times)),
        _ => Err(too_large()),
    }
}

fn concat(left: &[Object], right: &[Object]) -> Vec<Object> {
    left.iter().chain(right.iter()).cloned().collect()
}

fn shift_amount(amount: i64) -> Result<u32> {
    if (0..64).contains(&amount) {
        Ok(amount as u32)
    } else {
        Err(EvalError::ShiftOutOfRange { amount })
    }
}

fn integer_infix(operator: Operator, left: i64, right: i64) -> Result<Option<Object>> {
    let value = match operator {
        Operator::Plus => Object::Integer(left.wrapping_add(right)),
        Operator::Minus => Object::Integer(left.wrapping_sub(right)),
        Operator::Asterisk => Object::Integer(left.wrapping_mul(right)),
        Operator::Slash | Operator::Percent if right == 0 => {
            return Err(EvalError::DivisionByZero)
        }
        Operator::Slash => Object::Integer(left.wrapping_div(right)),
        Operator::Percent => Object::Integer(left.wrapping_rem(right)),
        Operator::BitAnd => Object::Integer(left & right),
        Operator::BitOr => Object::Integer(left | right),
        Operator::BitXor => Object::Integer(left ^ right),
        Operator::ShiftLeft => Object::Integer(left.wrapping_shl(shift_amount(right)?)),
        Operator::ShiftRight => Object::Integer(left.wrapping_shr(shift_amount(right)?)),
        Operator::LT => Object::Boolean(left < right),
        Operator::LTEq => Object::Boolean(left <= right),
        Operator::GT => Object::Boolean(left > right),
        Operator::GTEq => Object::Boolean(left >= right),
        _ => return Ok(None),
    };
    Ok(Some(value))
}

fn float_infix(operator: Operator, left: f64, right: f64) -> Result<Option<Object>> {
    let value = match operator {
        Operator::Plus => Object::Float(left + right),
        Operator::Minus => Object::Float(left - right),
        Operator::Asterisk => Object::Float(left * right),
        Operator::Slash | Operator::Percent if right == 0.0 => {
            return Err(EvalError::DivisionByZero)
        }
        Operator::Slash => Object::Float(left / right),
        Operator::Percent => Object::Float(left % right),
        Operator::LT => Object::Boolean(left < right),
        Operator::LTEq => Object::Boolean(left <= right),
        Operator::GT => Object::Boolean(left > right),
        Operator::GTEq => Object::Boolean(left >= right),
        _ => return Ok(None),
    };
    Ok(Some(value))
}

fn string_infix(operator: Operator, left: &str, right: &str) -> Option<Object> {
    Some(match operator {
        Operator::Plus => Object::String(format!("{}{}", left, right)),
        Operator::LT => Object::Boolean(left < right),
        Operator::LTEq => Object::Boolean(left <= right),
        Operator::GT => Object::Boolean(left > right),
        Operator::GTEq => Object::Boolean(left >= right),
        _ => return None,
    })
}

fn boolean_infix(operator: Operator, left: bool, right: bool) -> Option<Object> {
    Some(Object::Boolean(match operator {
        Operator::BitAnd => left & right,
        Operator::BitOr => left | right,
        Operator::BitXor => left ^ right,
        _ => return None,
    }))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_integer_arithmetic() {
        let cases = vec![
            (Operator::Plus, 7, 3, Object::Integer(10)),
            (Operator::Slash, -7, 2, Object::Integer(-3)),
            (Operator::Percent, -7, 2, Object::Integer(-1)),
            (Operator::ShiftLeft, 1, 4, Object::Integer(16)),
            (Operator::ShiftRight, -16, 2, Object::Integer(-4)),
            (Operator::BitXor, 6, 3, Object::Integer(5)),
            (Operator::Plus, i64::MAX, 1, Object::Integer(i64::MIN)),
            (Operator::GTEq, 2, 2, Object::Boolean(true)),
        ];

        for (operator, left, right, expected) in cases {
            assert_eq!(
                eval_infix(operator, Object::Integer(left), Object::Integer(right)),
                Ok(expected),
                "{} {} {}",
                left,
                operator,
                right
            );
        }
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            eval_infix(Operator::Slash, Object::Integer(1), Object::Integer(0)),
            Err(EvalError::DivisionByZero)
        );
        assert_eq!(
            eval_infix(Operator::Asterisk, Object::from("ab"), Object::Integer(i64::MAX)),
            Err(EvalError::RepeatTooLarge {
                length: 2,
                count: i64::MAX
            })
        );
        assert_eq!(
            eval_infix(Operator::ShiftLeft, Object::Integer(1), Object::Integer(64)),
            Err(EvalError::ShiftOutOfRange { amount: 64 })
        );
        assert_eq!(
            eval_infix(Operator::Minus, Object::Integer(1), Object::Boolean(true)),
            Err(EvalError::TypeMismatch {
                left: "int",
                operator: Operator::Minus,
                right: "bool"
            })
        );
        assert_eq!(
            eval_infix(Operator::Minus, Object::from("a"), Object::from("b")),
            Err(EvalError::UnknownInfixOperator {
                left: "string",
                operator: Operator::Minus,
                right: "string"
            })
        );
        assert_eq!(
            eval_prefix(Operator::Minus, Object::from("a")),
            Err(EvalError::UnknownPrefixOperator {
                operator: Operator::Minus,
                operand: "string"
            })
        );
    }

    #[test]
    fn test_mixed_and_string_operands() {
        assert_eq!(
            eval_infix(Operator::Asterisk, Object::Integer(2), Object::Float(1.5)),
            Ok(Object::Float(3.0))
        );
        assert_eq!(
            eval_infix(Operator::Plus, Object::from("n="), Object::Integer(4)),
            Ok(Object::from("n=4"))
        );
        assert_eq!(
            eval_infix(Operator::Asterisk, Object::from("ab"), Object::Integer(3)),
            Ok(Object::from("ababab"))
        );
        assert_eq!(
            eval_infix(Operator::Eq, Object::Integer(1), Object::Float(1.0)),
            Ok(Object::Boolean(true))
        );
        assert_eq!(
            eval_infix(
                Operator::Plus,
                Object::list(vec![Object::Integer(1)]),
                Object::list(vec![Object::Integer(2)])
            )
            .map(|o| o.to_string()),
            Ok("list(1, 2)".to_owned())
        );
    }
}
