mod expression;
mod statement;
pub use expression::*;
pub use statement::*;

use crate::token::Token;
use std::fmt::{self, Display, Formatter};

pub trait Node: Display {
    fn position(&self) -> Position;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

impl From<&Token> for Position {
    fn from(token: &Token) -> Self {
        Self {
            line: token.line,
            column: token.column,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Display for Program {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let statements: Vec<String> = self.statements.iter().map(Statement::to_string).collect();
        write!(f, "{}", statements.join(" "))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub value: String,
    pub position: Position,
}

impl Display for Identifier {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl From<&Token> for Identifier {
    fn from(token: &Token) -> Self {
        Self {
            value: token.literal.clone(),
            position: token.into(),
        }
    }
}
