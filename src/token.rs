use std::fmt::{self, Display, Formatter};
use strum_macros::{Display, EnumIter};

#[derive(Debug, Display, EnumIter, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    Illegal,
    Eof,

    // Identifiers and literals
    Ident,
    Int,
    Float,
    String,

    // Operators
    #[strum(to_string = "=")]
    Assign,
    #[strum(to_string = "+")]
    Plus,
    #[strum(to_string = "-")]
    Minus,
    #[strum(to_string = "*")]
    Asterisk,
    #[strum(to_string = "/")]
    Slash,
    #[strum(to_string = "%")]
    Percent,
    #[strum(to_string = "!")]
    Bang,
    #[strum(to_string = "~")]
    Tilde,
    #[strum(to_string = "&")]
    Ampersand,
    #[strum(to_string = "|")]
    Pipe,
    #[strum(to_string = "^")]
    Caret,
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
    #[strum(to_string = "+=")]
    PlusAssign,
    #[strum(to_string = "-=")]
    MinusAssign,
    #[strum(to_string = "*=")]
    AsteriskAssign,
    #[strum(to_string = "/=")]
    SlashAssign,
    #[strum(to_string = "%=")]
    PercentAssign,
    #[strum(to_string = "&=")]
    AmpersandAssign,
    #[strum(to_string = "|=")]
    PipeAssign,
    #[strum(to_string = "^=")]
    CaretAssign,
    #[strum(to_string = "<<=")]
    ShiftLeftAssign,
    #[strum(to_string = ">>=")]
    ShiftRightAssign,
    #[strum(to_string = "...")]
    Ellipsis,

    // Delimiters
    #[strum(to_string = ",")]
    Comma,
    #[strum(to_string = ";")]
    Semicolon,
    #[strum(to_string = ":")]
    Colon,
    #[strum(to_string = ".")]
    Dot,

    #[strum(to_string = "(")]
    LParen,
    #[strum(to_string = ")")]
    RParen,
    #[strum(to_string = "{")]
    LBrace,
    #[strum(to_string = "}")]
    RBrace,
    #[strum(to_string = "[")]
    LBracket,
    #[strum(to_string = "]")]
    RBracket,

    // Keywords
    As,
    Break,
    Const,
    Continue,
    Else,
    False,
    For,
    Foreach,
    Function,
    If,
    Import,
    In,
    Let,
    Map,
    New,
    Nil,
    Return,
    Set,
    Struct,
    True,
    Var,
    While,
}

impl From<&str> for TokenType {
    fn from(text: &str) -> Self {
        match text {
            "as" => Self::As,
            "break" => Self::Break,
            "const" => Self::Const,
            "continue" => Self::Continue,
            "else" => Self::Else,
            "false" => Self::False,
            "for" => Self::For,
            "foreach" => Self::Foreach,
            "func" => Self::Function,
            "if" => Self::If,
            "import" => Self::Import,
            "in" => Self::In,
            "let" => Self::Let,
            "map" => Self::Map,
            "new" => Self::New,
            "nil" => Self::Nil,
            "return" => Self::Return,
            "set" => Self::Set,
            "struct" => Self::Struct,
            "true" => Self::True,
            "var" => Self::Var,
            "while" => Self::While,
            _ => Self::Ident,
        }
    }
}

impl TokenType {
    /// Tokens that may begin a statement; the parser resynchronizes on these.
    pub fn starts_statement(self) -> bool {
        matches!(
            self,
            Self::Var
                | Self::Let
                | Self::Const
                | Self::Return
                | Self::Break
                | Self::Continue
                | Self::If
                | Self::While
                | Self::For
                | Self::Foreach
                | Self::Struct
                | Self::Import
        )
    }

    /// The binary operator a compound assignment token stands for.
    pub fn compound_base(self) -> Option<TokenType> {
        Some(match self {
            Self::PlusAssign => Self::Plus,
            Self::MinusAssign => Self::Minus,
            Self::AsteriskAssign => Self::Asterisk,
            Self::SlashAssign => Self::Slash,
            Self::PercentAssign => Self::Percent,
            Self::AmpersandAssign => Self::Ampersand,
            Self::PipeAssign => Self::Pipe,
            Self::CaretAssign => Self::Caret,
            Self::ShiftLeftAssign => Self::ShiftLeft,
            Self::ShiftRightAssign => Self::ShiftRight,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub token_type: TokenType,
    pub literal: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(token_type: TokenType, literal: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            token_type,
            literal: literal.into(),
            line,
            column,
        }
    }

    pub fn is(&self, token_type: TokenType) -> bool {
        self.token_type == token_type
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self.token_type {
            TokenType::Eof => write!(f, "end of input"),
            TokenType::Ident | TokenType::Int | TokenType::Float | TokenType::Illegal => {
                write!(f, "{} `{}`", self.token_type, self.literal)
            }
            TokenType::String => write!(f, "string \"{}\"", self.literal),
            _ => write!(f, "`{}`", self.literal),
        }
    }
}
