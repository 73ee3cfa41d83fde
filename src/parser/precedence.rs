use crate::token::TokenType;

/// Binding strength, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest,
    Assign,
    LogicalOr,
    LogicalAnd,
    BitOr,
    BitXor,
    BitAnd,
    Equals,
    LessGreater,
    Range,
    Shift,
    Sum,
    Product,
    Prefix,
    Postfix,
}

impl From<TokenType> for Precedence {
    fn from(token_type: TokenType) -> Self {
        match token_type {
            TokenType::Assign
            | TokenType::PlusAssign
            | TokenType::MinusAssign
            | TokenType::AsteriskAssign
            | TokenType::SlashAssign
            | TokenType::PercentAssign
            | TokenType::AmpersandAssign
            | TokenType::PipeAssign
            | TokenType::CaretAssign
            | TokenType::ShiftLeftAssign
            | TokenType::ShiftRightAssign => Self::Assign,
            TokenType::Or => Self::LogicalOr,
            TokenType::And => Self::LogicalAnd,
            TokenType::Pipe => Self::BitOr,
            TokenType::Caret => Self::BitXor,
            TokenType::Ampersand => Self::BitAnd,
            TokenType::Eq | TokenType::NotEq => Self::Equals,
            TokenType::LT | TokenType::LTEq | TokenType::GT | TokenType::GTEq => Self::LessGreater,
            TokenType::Ellipsis => Self::Range,
            TokenType::ShiftLeft | TokenType::ShiftRight => Self::Shift,
            TokenType::Plus | TokenType::Minus => Self::Sum,
            TokenType::Asterisk | TokenType::Slash | TokenType::Percent => Self::Product,
            TokenType::LParen | TokenType::LBracket | TokenType::Dot => Self::Postfix,
            _ => Self::Lowest,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_ordering() {
        let ascending = [
            TokenType::Assign,
            TokenType::Or,
            TokenType::And,
            TokenType::Pipe,
            TokenType::Caret,
            TokenType::Ampersand,
            TokenType::Eq,
            TokenType::LT,
            TokenType::Ellipsis,
            TokenType::ShiftLeft,
            TokenType::Plus,
            TokenType::Asterisk,
            TokenType::LParen,
        ];

        for pair in ascending.windows(2) {
            assert!(
                Precedence::from(pair[0]) < Precedence::from(pair[1]),
                "{} should bind looser than {}",
                pair[0],
                pair[1]
            );
        }
    }
}
