use crate::token::{Token, TokenType};

pub struct Lexer {
    input: Vec<u8>,
    position: usize,
    read_position: usize,
    ch: u8,
    line: usize,
    column: usize,
}

fn is_letter(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_'
}

impl Iterator for Lexer {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_token())
    }
}

impl Lexer {
    pub fn new(input: impl Into<String>) -> Self {
        let mut lexer = Self {
            input: input.into().into_bytes(),
            position: 0,
            read_position: 0,
            ch: 0,
            line: 1,
            column: 0,
        };
        lexer.read_char();
        lexer
    }

    fn read_char(&mut self) {
        if self.ch == b'\n' {
            self.line += 1;
            self.column = 0;
        }
        self.ch = *self.input.get(self.read_position).unwrap_or(&0);
        self.position = self.read_position;
        self.read_position += 1;
        self.column += 1;
    }

    fn peek_char(&self) -> u8 {
        *self.input.get(self.read_position).unwrap_or(&0)
    }

    fn peek_char_at(&self, offset: usize) -> u8 {
        *self.input.get(self.read_position + offset).unwrap_or(&0)
    }

    fn at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();

        let (line, column) = (self.line, self.column);
        let single = |token_type: TokenType, ch: u8| Token::new(token_type, (ch as char).to_string(), line, column);

        if self.at_end() {
            return Token::new(TokenType::Eof, "", line, column);
        }

        let token = match self.ch {
            b'=' => self.either(b'=', TokenType::Eq, TokenType::Assign),
            b'!' => self.either(b'=', TokenType::NotEq, TokenType::Bang),
            b'+' => self.either(b'=', TokenType::PlusAssign, TokenType::Plus),
            b'-' => self.either(b'=', TokenType::MinusAssign, TokenType::Minus),
            b'*' => self.either(b'=', TokenType::AsteriskAssign, TokenType::Asterisk),
            b'/' => self.either(b'=', TokenType::SlashAssign, TokenType::Slash),
            b'%' => self.either(b'=', TokenType::PercentAssign, TokenType::Percent),
            b'^' => self.either(b'=', TokenType::CaretAssign, TokenType::Caret),
            b'&' => match self.peek_char() {
                b'&' => self.double(TokenType::And),
                b'=' => self.double(TokenType::AmpersandAssign),
                _ => single(TokenType::Ampersand, self.ch),
            },
            b'|' => match self.peek_char() {
                b'|' => self.double(TokenType::Or),
                b'=' => self.double(TokenType::PipeAssign),
                _ => single(TokenType::Pipe, self.ch),
            },
            b'<' => match (self.peek_char(), self.peek_char_at(1)) {
                (b'<', b'=') => self.triple(TokenType::ShiftLeftAssign),
                (b'<', _) => self.double(TokenType::ShiftLeft),
                (b'=', _) => self.double(TokenType::LTEq),
                _ => single(TokenType::LT, self.ch),
            },
            b'>' => match (self.peek_char(), self.peek_char_at(1)) {
                (b'>', b'=') => self.triple(TokenType::ShiftRightAssign),
                (b'>', _) => self.double(TokenType::ShiftRight),
                (b'=', _) => self.double(TokenType::GTEq),
                _ => single(TokenType::GT, self.ch),
            },
            b'.' => {
                if self.peek_char() == b'.' && self.peek_char_at(1) == b'.' {
                    self.triple(TokenType::Ellipsis)
                } else {
                    single(TokenType::Dot, self.ch)
                }
            }
            b'~' => single(TokenType::Tilde, self.ch),
            b';' => single(TokenType::Semicolon, self.ch),
            b':' => single(TokenType::Colon, self.ch),
            b',' => single(TokenType::Comma, self.ch),
            b'(' => single(TokenType::LParen, self.ch),
            b')' => single(TokenType::RParen, self.ch),
            b'{' => single(TokenType::LBrace, self.ch),
            b'}' => single(TokenType::RBrace, self.ch),
            b'[' => single(TokenType::LBracket, self.ch),
            b']' => single(TokenType::RBracket, self.ch),
            b'"' => return self.read_string(line, column),
            c => {
                if is_letter(c) {
                    let literal = self.read_identifier();
                    return Token::new(TokenType::from(literal.as_str()), literal, line, column);
                } else if c.is_ascii_digit() {
                    return self.read_number(line, column);
                } else {
                    single(TokenType::Illegal, c)
                }
            }
        };
        self.read_char();
        token
    }

    fn either(&mut self, second: u8, double: TokenType, single: TokenType) -> Token {
        if self.peek_char() == second {
            self.double(double)
        } else {
            Token::new(single, (self.ch as char).to_string(), self.line, self.column)
        }
    }

    fn double(&mut self, token_type: TokenType) -> Token {
        let (line, column) = (self.line, self.column);
        self.read_char();
        Token::new(token_type, token_type.to_string(), line, column)
    }

    fn triple(&mut self, token_type: TokenType) -> Token {
        let (line, column) = (self.line, self.column);
        self.read_char();
        self.read_char();
        Token::new(token_type, token_type.to_string(), line, column)
    }

    fn read_identifier(&mut self) -> String {
        let start = self.position;
        while is_letter(self.ch) || self.ch.is_ascii_digit() {
            self.read_char()
        }
        String::from_utf8_lossy(&self.input[start..self.position]).into_owned()
    }

    fn read_number(&mut self, line: usize, column: usize) -> Token {
        let start = self.position;
        while self.ch.is_ascii_digit() {
            self.read_char()
        }

        let mut token_type = TokenType::Int;
        // `1...5` is a range, `1.5` is a float
        if self.ch == b'.' && self.peek_char().is_ascii_digit() {
            token_type = TokenType::Float;
            self.read_char();
            while self.ch.is_ascii_digit() {
                self.read_char()
            }
        }

        let literal = String::from_utf8_lossy(&self.input[start..self.position]).into_owned();
        Token::new(token_type, literal, line, column)
    }

    fn read_string(&mut self, line: usize, column: usize) -> Token {
        let mut bytes = Vec::new();
        self.read_char();
        loop {
            match self.ch {
                b'"' => break,
                0 if self.at_end() => {
                    return Token::new(TokenType::Illegal, "unterminated string", line, column);
                }
                b'\\' => {
                    self.read_char();
                    bytes.push(match self.ch {
                        b'n' => b'\n',
                        b't' => b'\t',
                        b'r' => b'\r',
                        b'0' => 0,
                        other => other,
                    });
                }
                other => bytes.push(other),
            }
            self.read_char();
        }
        // closing quote
        self.read_char();
        Token::new(
            TokenType::String,
            String::from_utf8_lossy(&bytes).into_owned(),
            line,
            column,
        )
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while self.ch.is_ascii_whitespace() {
                self.read_char();
            }
            match (self.ch, self.peek_char()) {
                (b'/', b'/') => {
                    while self.ch != b'\n' && !self.at_end() {
                        self.read_char();
                    }
                }
                (b'/', b'*') => {
                    self.read_char();
                    self.read_char();
                    while !(self.ch == b'*' && self.peek_char() == b'/') && !self.at_end() {
                        self.read_char();
                    }
                    self.read_char();
                    self.read_char();
                }
                _ => return,
            }
        }
    }
}
