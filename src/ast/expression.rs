use super::{statement::BlockStatement, Identifier, Position};
use crate::token::TokenType;
use derive_more::Display;
use std::convert::TryFrom;
use std::fmt::{self, Display, Formatter};
use std::rc::Rc;

#[derive(Display, Debug, Clone, PartialEq)]
pub enum Expression {
    Identifier(Identifier),
    IntegerLiteral(i64),
    FloatLiteral(f64),
    #[display(fmt = "{:?}", _0)]
    String(String),
    Boolean(bool),
    #[display(fmt = "nil")]
    Nil,
    Prefix(PrefixExpression),
    Infix(InfixExpression),
    #[display(fmt = "({})", _0)]
    Grouped(Box<Expression>),
    Assign(AssignExpression),
    Function(FunctionLiteral),
    Call(CallExpression),
    Member(MemberExpression),
    Index(IndexExpression),
    Slice(SliceExpression),
    Array(ArrayLiteral),
    Map(MapLiteral),
    Set(SetLiteral),
    Range(RangeLiteral),
    New(NewExpression),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Operator {
    #[strum(to_string = "!")]
    Bang,
    #[strum(to_string = "~")]
    Tilde,
    #[strum(to_string = "-")]
    Minus,
    #[strum(to_string = "+")]
    Plus,
    #[strum(to_string = "*")]
    Asterisk,
    #[strum(to_string = "/")]
    Slash,
    #[strum(to_string = "%")]
    Percent,
    #[strum(to_string = "&")]
    BitAnd,
    #[strum(to_string = "|")]
    BitOr,
    #[strum(to_string = "^")]
    BitXor,
    #[strum(to_string = "<<")]
    ShiftLeft,
    #[strum(to_string = ">>")]
    ShiftRight,
    #[strum(to_string = "&&")]
    And,
    #[strum(to_string = "||")]
    Or,
    #[strum(to_string = "<")]
    LT,
    #[strum(to_string = "<=")]
    LTEq,
    #[strum(to_string = ">")]
    GT,
    #[strum(to_string = ">=")]
    GTEq,
    #[strum(to_string = "==")]
    Eq,
    #[strum(to_string = "!=")]
    NotEq,
}

impl TryFrom<TokenType> for Operator {
    type Error = TokenType;

    fn try_from(input: TokenType) -> Result<Self, Self::Error> {
        Ok(match input {
            TokenType::Bang => Self::Bang,
            TokenType::Tilde => Self::Tilde,
            TokenType::Minus => Self::Minus,
            TokenType::Plus => Self::Plus,
            TokenType::Asterisk => Self::Asterisk,
            TokenType::Slash => Self::Slash,
            TokenType::Percent => Self::Percent,
            TokenType::Ampersand => Self::BitAnd,
            TokenType::Pipe => Self::BitOr,
            TokenType::Caret => Self::BitXor,
            TokenType::ShiftLeft => Self::ShiftLeft,
            TokenType::ShiftRight => Self::ShiftRight,
            TokenType::And => Self::And,
            TokenType::Or => Self::Or,
            TokenType::LT => Self::LT,
            TokenType::LTEq => Self::LTEq,
            TokenType::GT => Self::GT,
            TokenType::GTEq => Self::GTEq,
            TokenType::Eq => Self::Eq,
            TokenType::NotEq => Self::NotEq,
            other => return Err(other),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrefixExpression {
    pub operator: Operator,
    pub right: Box<Expression>,
    pub position: Position,
}

impl Display for PrefixExpression {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "({}{})", self.operator, self.right)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InfixExpression {
    pub left: Box<Expression>,
    pub operator: Operator,
    pub right: Box<Expression>,
    pub position: Position,
}

impl Display for InfixExpression {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "({} {} {})", self.left, self.operator, self.right)
    }
}

/// Plain `=` when `operator` is `None`, otherwise a compound `op=`.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignExpression {
    pub target: Box<Expression>,
    pub operator: Option<Operator>,
    pub value: Box<Expression>,
    pub position: Position,
}

impl Display for AssignExpression {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self.operator {
            Some(op) => write!(f, "{} {}= {}", self.target, op, self.value),
            None => write!(f, "{} = {}", self.target, self.value),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionLiteral {
    pub name: Option<String>,
    pub parameters: Vec<Identifier>,
    pub body: Rc<BlockStatement>,
    pub position: Position,
}

impl Display for FunctionLiteral {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let identifier_names: Vec<String> =
            self.parameters.iter().map(Identifier::to_string).collect();

        let preamble = match &self.name {
            Some(name) => format!("func {}", name),
            None => "func".to_owned(),
        };

        write!(
            f,
            "{}({}) {}",
            preamble,
            identifier_names.join(", "),
            self.body
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpression {
    pub function: Box<Expression>,
    pub arguments: Vec<Expression>,
    pub position: Position,
}

impl Display for CallExpression {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}({})", self.function, join(&self.arguments))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemberExpression {
    pub object: Box<Expression>,
    pub property: Identifier,
    pub position: Position,
}

impl Display for MemberExpression {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}.{}", self.object, self.property)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexExpression {
    pub left: Box<Expression>,
    pub index: Box<Expression>,
    pub position: Position,
}

impl Display for IndexExpression {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "({}[{}])", self.left, self.index)
    }
}

/// `left[start:end]`, either bound may be omitted.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceExpression {
    pub left: Box<Expression>,
    pub start: Option<Box<Expression>>,
    pub end: Option<Box<Expression>>,
    pub position: Position,
}

impl Display for SliceExpression {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let bound = |b: &Option<Box<Expression>>| b.as_ref().map(|e| e.to_string()).unwrap_or_default();
        write!(f, "({}[{}:{}])", self.left, bound(&self.start), bound(&self.end))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayLiteral {
    pub elements: Vec<Expression>,
}

impl Display for ArrayLiteral {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "[{}]", join(&self.elements))
    }
}

impl From<Vec<Expression>> for ArrayLiteral {
    fn from(elements: Vec<Expression>) -> Self {
        Self { elements }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapLiteral {
    pub pairs: Vec<(Expression, Expression)>,
}

impl Display for MapLiteral {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let pairs: Vec<String> = self
            .pairs
            .iter()
            .map(|(key, value)| format!("{}: {}", key, value))
            .collect();
        write!(f, "map{{{}}}", pairs.join(", "))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetLiteral {
    pub elements: Vec<Expression>,
}

impl Display for SetLiteral {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "set{{{}}}", join(&self.elements))
    }
}

/// Inclusive on both ends.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeLiteral {
    pub start: Box<Expression>,
    pub end: Box<Expression>,
    pub position: Position,
}

impl Display for RangeLiteral {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "({}...{})", self.start, self.end)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewExpression {
    pub name: Identifier,
    pub arguments: Vec<Expression>,
    pub position: Position,
}

impl Display for NewExpression {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "new {}({})", self.name, join(&self.arguments))
    }
}

fn join(expressions: &[Expression]) -> String {
    let parts: Vec<String> = expressions.iter().map(Expression::to_string).collect();
    parts.join(", ")
}
