mod precedence;
#[cfg(test)]
mod tests;

use crate::ast::{self, Expression, Position, Statement};
use crate::lexer::Lexer;
use crate::token::{Token, TokenType};
pub use precedence::Precedence;
use std::convert::TryFrom;
use std::fmt::{self, Display, Formatter};
use std::rc::Rc;
use tracing::{debug, trace};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "[{}:{}] {}", self.line, self.column, self.message)
    }
}

pub struct Parser {
    lexer: Lexer,
    cur_token: Token,
    peek_token: Token,
    errors: Vec<ParseError>,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Self {
        let cur_token = lexer.next_token();
        let peek_token = lexer.next_token();

        Self {
            lexer,
            cur_token,
            peek_token,
            errors: vec![],
        }
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    fn next_token(&mut self) {
        self.cur_token = std::mem::replace(&mut self.peek_token, self.lexer.next_token());
    }

    /// Parses the whole stream. The program is returned even when errors were
    /// recorded; check [`Parser::has_errors`] before evaluating it.
    pub fn parse_program(&mut self) -> ast::Program {
        let mut program = ast::Program::default();

        while !self.cur_is(TokenType::Eof) {
            if let Some(stmt) = self.parse_statement() {
                program.statements.push(stmt)
            }
            self.next_token();
        }

        program
    }

    fn parse_statement(&mut self) -> Option<Statement> {
        trace!(token = %self.cur_token, "parse_statement");
        let parsed = match self.cur_token.token_type {
            TokenType::Var | TokenType::Let | TokenType::Const => self.parse_declaration(),
            TokenType::Return => self.parse_control().map(Statement::Return),
            TokenType::Break => self.parse_control().map(Statement::Break),
            TokenType::Continue => self.parse_control().map(Statement::Continue),
            TokenType::LBrace => self.parse_block_statement().map(Statement::Block),
            TokenType::If => self.parse_if_statement(),
            TokenType::While => self.parse_while_statement(),
            TokenType::For => self.parse_for_statement(),
            TokenType::Foreach => self.parse_foreach_statement(),
            TokenType::Function if self.peek_is(TokenType::Ident) => {
                self.parse_function_literal().map(Statement::Function)
            }
            TokenType::Struct => self.parse_struct_statement(),
            TokenType::Import => self.parse_import_statement(),
            TokenType::Semicolon => return None,
            _ => self.parse_expression_statement(),
        };

        if parsed.is_none() {
            self.synchronize();
        }
        parsed
    }

    /// Skips to the next statement boundary: just past a `;`, before a `}`
    /// closing the current block, or before a statement keyword. Blocks met
    /// on the way are skipped whole.
    fn synchronize(&mut self) {
        let mut depth = 0usize;
        loop {
            match self.peek_token.token_type {
                TokenType::Eof => break,
                TokenType::Semicolon if depth == 0 => {
                    self.next_token();
                    break;
                }
                TokenType::RBrace if depth == 0 => break,
                TokenType::RBrace => {
                    depth -= 1;
                    self.next_token();
                    if depth == 0 {
                        break;
                    }
                }
                TokenType::LBrace => {
                    depth += 1;
                    self.next_token();
                }
                t if depth == 0 && t.starts_statement() => break,
                _ => self.next_token(),
            }
        }
        debug!(resume = %self.peek_token, "parser resynchronized");
    }

    fn parse_declaration(&mut self) -> Option<Statement> {
        let kind = match self.cur_token.token_type {
            TokenType::Let => ast::DeclarationKind::Let,
            TokenType::Const => ast::DeclarationKind::Const,
            _ => ast::DeclarationKind::Var,
        };

        if !self.expect_peek(TokenType::Ident) {
            return None;
        }

        let declaration = self.parse_declaration_clause(kind)?;
        self.skip_semicolon();
        Some(Statement::Declaration(declaration))
    }

    /// Parses `name [= value]` with `cur_token` on the name.
    fn parse_declaration_clause(&mut self, kind: ast::DeclarationKind) -> Option<ast::Declaration> {
        let position = self.cur_position();
        let name = ast::Identifier::from(&self.cur_token);

        let value = if self.peek_is(TokenType::Assign) {
            self.next_token();
            self.next_token();
            Some(self.parse_expression(Precedence::Lowest)?)
        } else if kind == ast::DeclarationKind::Const {
            self.error_at_peek(format!("constant `{}` must be initialized", name));
            return None;
        } else if self.peek_token.line == self.cur_token.line
            && !matches!(
                self.peek_token.token_type,
                TokenType::Semicolon | TokenType::RBrace | TokenType::Comma | TokenType::Eof
            )
        {
            self.peek_error(TokenType::Assign);
            return None;
        } else {
            None
        };

        Some(ast::Declaration {
            kind,
            name,
            value,
            position,
        })
    }

    fn parse_control(&mut self) -> Option<ast::ControlStatement> {
        let position = self.cur_position();

        let ends_here = matches!(
            self.peek_token.token_type,
            TokenType::Semicolon | TokenType::RBrace | TokenType::Eof
        ) || self.peek_token.line != self.cur_token.line;

        let value = if ends_here {
            None
        } else {
            self.next_token();
            Some(self.parse_expression(Precedence::Lowest)?)
        };

        self.skip_semicolon();
        Some(ast::ControlStatement { value, position })
    }

    fn parse_expression_statement(&mut self) -> Option<Statement> {
        let position = self.cur_position();
        let expression = self.parse_expression(Precedence::Lowest)?;
        self.skip_semicolon();
        Some(Statement::Expr(ast::ExpressionStatement {
            expression,
            position,
        }))
    }

    /// Expects `cur_token` on `{` and leaves it on the matching `}`.
    fn parse_block_statement(&mut self) -> Option<ast::BlockStatement> {
        let position = self.cur_position();
        let mut statements = vec![];

        self.next_token();
        while !self.cur_is(TokenType::RBrace) {
            if self.cur_is(TokenType::Eof) {
                self.error_at_cur("expected `}` before end of input".to_owned());
                return None;
            }
            if let Some(stmt) = self.parse_statement() {
                statements.push(stmt);
            }
            self.next_token();
        }

        Some(ast::BlockStatement {
            statements,
            position,
        })
    }

    fn parse_if_statement(&mut self) -> Option<Statement> {
        let position = self.cur_position();
        let mut branches = vec![self.parse_conditional_branch()?];
        let mut alternative = None;

        while self.peek_is(TokenType::Else) {
            self.next_token();
            if self.peek_is(TokenType::If) {
                self.next_token();
                branches.push(self.parse_conditional_branch()?);
            } else {
                if !self.expect_peek(TokenType::LBrace) {
                    return None;
                }
                alternative = Some(self.parse_block_statement()?);
                break;
            }
        }

        Some(Statement::If(ast::IfStatement {
            branches,
            alternative,
            position,
        }))
    }

    /// `(condition) { consequence }` following an `if`.
    fn parse_conditional_branch(&mut self) -> Option<ast::ConditionalBranch> {
        if !self.expect_peek(TokenType::LParen) {
            return None;
        }
        self.next_token();
        let condition = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenType::RParen) || !self.expect_peek(TokenType::LBrace) {
            return None;
        }
        let consequence = self.parse_block_statement()?;

        Some(ast::ConditionalBranch {
            condition,
            consequence,
        })
    }

    fn parse_while_statement(&mut self) -> Option<Statement> {
        let position = self.cur_position();

        if !self.expect_peek(TokenType::LParen) {
            return None;
        }
        self.next_token();

        let mut conditions = vec![self.parse_expression(Precedence::Lowest)?];
        while self.peek_is(TokenType::Comma) {
            self.next_token();
            self.next_token();
            conditions.push(self.parse_expression(Precedence::Lowest)?);
        }

        if !self.expect_peek(TokenType::RParen) || !self.expect_peek(TokenType::LBrace) {
            return None;
        }
        let body = self.parse_block_statement()?;

        Some(Statement::While(ast::WhileStatement {
            conditions,
            body,
            position,
        }))
    }

    fn parse_for_statement(&mut self) -> Option<Statement> {
        let position = self.cur_position();

        if !self.expect_peek(TokenType::LParen) {
            return None;
        }
        self.next_token();

        let mut initializers = vec![];
        if !self.cur_is(TokenType::Semicolon) {
            let mut kind = None;
            loop {
                initializers.push(self.parse_for_initializer(&mut kind)?);
                if self.peek_is(TokenType::Comma) {
                    self.next_token();
                    self.next_token();
                } else if self.expect_peek(TokenType::Semicolon) {
                    break;
                } else {
                    return None;
                }
            }
        }

        let condition = if self.peek_is(TokenType::Semicolon) {
            self.next_token();
            None
        } else {
            self.next_token();
            let condition = self.parse_expression(Precedence::Lowest)?;
            if !self.expect_peek(TokenType::Semicolon) {
                return None;
            }
            Some(condition)
        };

        let mut updates = vec![];
        if !self.peek_is(TokenType::RParen) {
            self.next_token();
            updates.push(self.parse_expression(Precedence::Lowest)?);
            while self.peek_is(TokenType::Comma) {
                self.next_token();
                self.next_token();
                updates.push(self.parse_expression(Precedence::Lowest)?);
            }
        }

        if !self.expect_peek(TokenType::RParen) || !self.expect_peek(TokenType::LBrace) {
            return None;
        }
        let body = self.parse_block_statement()?;

        Some(Statement::For(ast::ForStatement {
            initializers,
            condition,
            updates,
            body,
            position,
        }))
    }

    /// One comma-separated `for` initializer. A declaration keyword carries
    /// over to later `name = value` clauses.
    fn parse_for_initializer(&mut self, kind: &mut Option<ast::DeclarationKind>) -> Option<Statement> {
        let declared = match self.cur_token.token_type {
            TokenType::Var => Some(ast::DeclarationKind::Var),
            TokenType::Let => Some(ast::DeclarationKind::Let),
            TokenType::Const => Some(ast::DeclarationKind::Const),
            _ => None,
        };

        if let Some(declared) = declared {
            *kind = Some(declared);
            if !self.expect_peek(TokenType::Ident) {
                return None;
            }
            return self
                .parse_declaration_clause(declared)
                .map(Statement::Declaration);
        }

        match kind {
            Some(kind) if self.cur_is(TokenType::Ident) && self.peek_is(TokenType::Assign) => self
                .parse_declaration_clause(*kind)
                .map(Statement::Declaration),
            _ => {
                let position = self.cur_position();
                let expression = self.parse_expression(Precedence::Lowest)?;
                Some(Statement::Expr(ast::ExpressionStatement {
                    expression,
                    position,
                }))
            }
        }
    }

    fn parse_foreach_statement(&mut self) -> Option<Statement> {
        let position = self.cur_position();

        if !self.expect_peek(TokenType::Ident) {
            return None;
        }
        let binding = ast::Identifier::from(&self.cur_token);

        if !self.expect_peek(TokenType::In) {
            return None;
        }
        self.next_token();
        let iterable = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenType::LBrace) {
            return None;
        }
        let body = self.parse_block_statement()?;

        Some(Statement::Foreach(ast::ForeachStatement {
            binding,
            iterable,
            body,
            position,
        }))
    }

    fn parse_struct_statement(&mut self) -> Option<Statement> {
        let position = self.cur_position();

        if !self.expect_peek(TokenType::Ident) {
            return None;
        }
        let name = ast::Identifier::from(&self.cur_token);

        if !self.expect_peek(TokenType::LBrace) {
            return None;
        }
        self.next_token();

        let mut fields = vec![];
        let mut methods = vec![];
        while !self.cur_is(TokenType::RBrace) {
            match self.cur_token.token_type {
                TokenType::Eof => {
                    self.error_at_cur(format!("expected `}}` to close struct {}", name));
                    return None;
                }
                TokenType::Function => {
                    if !self.peek_is(TokenType::Ident) {
                        self.error_at_peek(format!(
                            "expected method name in struct {}, got {} instead",
                            name, self.peek_token
                        ));
                        return None;
                    }
                    methods.push(self.parse_function_literal()?);
                }
                TokenType::Var | TokenType::Let | TokenType::Const => {
                    if let Statement::Declaration(decl) = self.parse_declaration()? {
                        fields.push(ast::FieldDeclaration {
                            kind: decl.kind,
                            name: decl.name,
                            value: decl.value,
                        });
                    }
                }
                TokenType::Semicolon => {}
                _ => {
                    self.error_at_cur(format!(
                        "unexpected {} in body of struct {}",
                        self.cur_token, name
                    ));
                    return None;
                }
            }
            self.next_token();
        }

        Some(Statement::Struct(ast::StructDeclaration {
            name,
            fields,
            methods,
            position,
        }))
    }

    fn parse_import_statement(&mut self) -> Option<Statement> {
        let position = self.cur_position();

        if !self.expect_peek(TokenType::String) {
            return None;
        }
        let package = self.cur_token.literal.clone();

        let alias = if self.peek_is(TokenType::As) {
            self.next_token();
            if !self.expect_peek(TokenType::Ident) {
                return None;
            }
            Some(self.cur_token.literal.clone())
        } else {
            None
        };

        self.skip_semicolon();
        Some(Statement::Import(ast::ImportStatement {
            package,
            alias,
            position,
        }))
    }

    fn parse_expression(&mut self, precedence: Precedence) -> Option<Expression> {
        let mut left = self.parse_prefix()?;

        while !self.peek_is(TokenType::Semicolon) && precedence < self.peek_precedence() {
            // a call or index on the next line starts a new statement
            if matches!(
                self.peek_token.token_type,
                TokenType::LParen | TokenType::LBracket
            ) && self.peek_token.line != self.cur_token.line
            {
                break;
            }
            self.next_token();
            left = self.parse_infix(left)?;
        }

        Some(left)
    }

    fn parse_prefix(&mut self) -> Option<Expression> {
        match self.cur_token.token_type {
            TokenType::Ident => Some(Expression::Identifier((&self.cur_token).into())),
            TokenType::Int => match self.cur_token.literal.parse() {
                Ok(value) => Some(Expression::IntegerLiteral(value)),
                Err(_) => {
                    self.error_at_cur(format!("could not parse {} as integer", self.cur_token.literal));
                    None
                }
            },
            TokenType::Float => match self.cur_token.literal.parse() {
                Ok(value) => Some(Expression::FloatLiteral(value)),
                Err(_) => {
                    self.error_at_cur(format!("could not parse {} as float", self.cur_token.literal));
                    None
                }
            },
            TokenType::String => Some(Expression::String(self.cur_token.literal.clone())),
            TokenType::True => Some(Expression::Boolean(true)),
            TokenType::False => Some(Expression::Boolean(false)),
            TokenType::Nil => Some(Expression::Nil),
            TokenType::Bang | TokenType::Minus | TokenType::Tilde => self.parse_prefix_expression(),
            TokenType::LParen => self.parse_grouped_expression(),
            TokenType::LBracket => {
                let elements = self.parse_expression_list(TokenType::RBracket)?;
                Some(Expression::Array(elements.into()))
            }
            TokenType::Map if self.peek_is(TokenType::LBrace) => self.parse_map_literal(),
            TokenType::Set if self.peek_is(TokenType::LBrace) => {
                self.next_token();
                let elements = self.parse_expression_list(TokenType::RBrace)?;
                Some(Expression::Set(ast::SetLiteral { elements }))
            }
            // without a brace these name the builtins of the same name
            TokenType::Map | TokenType::Set => Some(Expression::Identifier((&self.cur_token).into())),
            TokenType::Function => self.parse_function_literal().map(Expression::Function),
            TokenType::New => self.parse_new_expression(),
            TokenType::Illegal => {
                self.error_at_cur(format!("illegal token `{}`", self.cur_token.literal));
                None
            }
            _ => {
                self.error_at_cur(format!("unexpected {}", self.cur_token));
                None
            }
        }
    }

    fn parse_infix(&mut self, left: Expression) -> Option<Expression> {
        let token_type = self.cur_token.token_type;
        match token_type {
            TokenType::LParen => self.parse_call_expression(left),
            TokenType::LBracket => self.parse_index_expression(left),
            TokenType::Dot => self.parse_member_expression(left),
            TokenType::Ellipsis => {
                let position = self.cur_position();
                self.next_token();
                let end = self.parse_expression(Precedence::Range)?;
                Some(Expression::Range(ast::RangeLiteral {
                    start: Box::new(left),
                    end: Box::new(end),
                    position,
                }))
            }
            TokenType::Assign => self.parse_assign_expression(left, None),
            _ => {
                if let Some(base) = token_type.compound_base() {
                    let operator = ast::Operator::try_from(base).ok()?;
                    return self.parse_assign_expression(left, Some(operator));
                }
                self.parse_infix_expression(left)
            }
        }
    }

    fn parse_prefix_expression(&mut self) -> Option<Expression> {
        let position = self.cur_position();
        let operator = self.operator_at_cur()?;
        self.next_token();
        let right = self.parse_expression(Precedence::Prefix)?;

        Some(Expression::Prefix(ast::PrefixExpression {
            operator,
            right: Box::new(right),
            position,
        }))
    }

    fn parse_infix_expression(&mut self, left: Expression) -> Option<Expression> {
        let position = self.cur_position();
        let operator = self.operator_at_cur()?;
        let precedence = self.cur_precedence();
        self.next_token();
        let right = self.parse_expression(precedence)?;

        Some(Expression::Infix(ast::InfixExpression {
            left: Box::new(left),
            operator,
            right: Box::new(right),
            position,
        }))
    }

    fn parse_assign_expression(&mut self, target: Expression, operator: Option<ast::Operator>) -> Option<Expression> {
        let position = self.cur_position();
        self.next_token();
        // right associative: `a = b = c`
        let value = self.parse_expression(Precedence::Lowest)?;

        Some(Expression::Assign(ast::AssignExpression {
            target: Box::new(target),
            operator,
            value: Box::new(value),
            position,
        }))
    }

    fn parse_grouped_expression(&mut self) -> Option<Expression> {
        self.next_token();
        let expression = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenType::RParen) {
            return None;
        }
        Some(Expression::Grouped(Box::new(expression)))
    }

    fn parse_call_expression(&mut self, function: Expression) -> Option<Expression> {
        let position = self.cur_position();
        let arguments = self.parse_expression_list(TokenType::RParen)?;

        Some(Expression::Call(ast::CallExpression {
            function: Box::new(function),
            arguments,
            position,
        }))
    }

    fn parse_member_expression(&mut self, object: Expression) -> Option<Expression> {
        let position = self.cur_position();
        // keywords are allowed as member names, e.g. `pkg.map`
        let is_name = !self.peek_is(TokenType::String)
            && self
                .peek_token
                .literal
                .bytes()
                .next()
                .map_or(false, |c| c.is_ascii_alphabetic() || c == b'_');
        if !is_name {
            self.peek_error(TokenType::Ident);
            return None;
        }
        self.next_token();

        Some(Expression::Member(ast::MemberExpression {
            object: Box::new(object),
            property: (&self.cur_token).into(),
            position,
        }))
    }

    fn parse_index_expression(&mut self, left: Expression) -> Option<Expression> {
        let position = self.cur_position();
        self.next_token();

        let start = if self.cur_is(TokenType::Colon) {
            None
        } else {
            let index = self.parse_expression(Precedence::Lowest)?;
            if !self.peek_is(TokenType::Colon) {
                if !self.expect_peek(TokenType::RBracket) {
                    return None;
                }
                return Some(Expression::Index(ast::IndexExpression {
                    left: Box::new(left),
                    index: Box::new(index),
                    position,
                }));
            }
            self.next_token();
            Some(Box::new(index))
        };

        let end = if self.peek_is(TokenType::RBracket) {
            None
        } else {
            self.next_token();
            Some(Box::new(self.parse_expression(Precedence::Lowest)?))
        };

        if !self.expect_peek(TokenType::RBracket) {
            return None;
        }

        Some(Expression::Slice(ast::SliceExpression {
            left: Box::new(left),
            start,
            end,
            position,
        }))
    }

    fn parse_map_literal(&mut self) -> Option<Expression> {
        self.next_token();
        let mut pairs = vec![];

        while !self.peek_is(TokenType::RBrace) {
            self.next_token();
            let key = self.parse_expression(Precedence::Lowest)?;

            if !self.expect_peek(TokenType::Colon) {
                return None;
            }
            self.next_token();
            let value = self.parse_expression(Precedence::Lowest)?;
            pairs.push((key, value));

            if !self.peek_is(TokenType::RBrace) && !self.expect_peek(TokenType::Comma) {
                return None;
            }
        }
        self.next_token();

        Some(Expression::Map(ast::MapLiteral { pairs }))
    }

    /// Parses `func [name](params) { body }` with `cur_token` on `func`.
    fn parse_function_literal(&mut self) -> Option<ast::FunctionLiteral> {
        let position = self.cur_position();

        let name = if self.peek_is(TokenType::Ident) {
            self.next_token();
            Some(self.cur_token.literal.clone())
        } else {
            None
        };

        if !self.expect_peek(TokenType::LParen) {
            return None;
        }
        let parameters = self.parse_function_parameters()?;

        if !self.expect_peek(TokenType::LBrace) {
            return None;
        }
        let body = self.parse_block_statement()?;

        Some(ast::FunctionLiteral {
            name,
            parameters,
            body: Rc::new(body),
            position,
        })
    }

    fn parse_function_parameters(&mut self) -> Option<Vec<ast::Identifier>> {
        let mut identifiers = vec![];

        if self.peek_is(TokenType::RParen) {
            self.next_token();
            return Some(identifiers);
        }

        loop {
            if !self.expect_peek(TokenType::Ident) {
                return None;
            }
            identifiers.push((&self.cur_token).into());
            if !self.peek_is(TokenType::Comma) {
                break;
            }
            self.next_token();
        }

        if !self.expect_peek(TokenType::RParen) {
            return None;
        }
        Some(identifiers)
    }

    fn parse_new_expression(&mut self) -> Option<Expression> {
        let position = self.cur_position();

        if !self.expect_peek(TokenType::Ident) {
            return None;
        }
        let name = ast::Identifier::from(&self.cur_token);

        if !self.expect_peek(TokenType::LParen) {
            return None;
        }
        let arguments = self.parse_expression_list(TokenType::RParen)?;

        Some(Expression::New(ast::NewExpression {
            name,
            arguments,
            position,
        }))
    }

    /// Comma separated expressions up to `end`; a trailing comma is accepted.
    fn parse_expression_list(&mut self, end: TokenType) -> Option<Vec<Expression>> {
        let mut list = vec![];

        if self.peek_is(end) {
            self.next_token();
            return Some(list);
        }

        self.next_token();
        list.push(self.parse_expression(Precedence::Lowest)?);

        while self.peek_is(TokenType::Comma) {
            self.next_token();
            if self.peek_is(end) {
                break;
            }
            self.next_token();
            list.push(self.parse_expression(Precedence::Lowest)?);
        }

        if !self.expect_peek(end) {
            return None;
        }
        Some(list)
    }

    fn operator_at_cur(&mut self) -> Option<ast::Operator> {
        match ast::Operator::try_from(self.cur_token.token_type) {
            Ok(operator) => Some(operator),
            Err(token_type) => {
                self.error_at_cur(format!("{} is not an operator", token_type));
                None
            }
        }
    }

    fn skip_semicolon(&mut self) {
        if self.peek_is(TokenType::Semicolon) {
            self.next_token();
        }
    }

    fn cur_is(&self, token_type: TokenType) -> bool {
        self.cur_token.is(token_type)
    }

    fn peek_is(&self, token_type: TokenType) -> bool {
        self.peek_token.is(token_type)
    }

    fn cur_position(&self) -> Position {
        (&self.cur_token).into()
    }

    fn cur_precedence(&self) -> Precedence {
        self.cur_token.token_type.into()
    }

    fn peek_precedence(&self) -> Precedence {
        self.peek_token.token_type.into()
    }

    fn expect_peek(&mut self, expected: TokenType) -> bool {
        if self.peek_is(expected) {
            self.next_token();
            true
        } else {
            self.peek_error(expected);
            false
        }
    }

    fn peek_error(&mut self, expected: TokenType) {
        self.error_at_peek(format!(
            "expected next token to be {}, got {} instead",
            expected, self.peek_token
        ));
    }

    fn error_at_peek(&mut self, message: String) {
        let (line, column) = (self.peek_token.line, self.peek_token.column);
        self.record_error(line, column, message);
    }

    fn error_at_cur(&mut self, message: String) {
        let (line, column) = (self.cur_token.line, self.cur_token.column);
        self.record_error(line, column, message);
    }

    fn record_error(&mut self, line: usize, column: usize, message: String) {
        debug!(line, column, %message, "parse error");
        self.errors.push(ParseError {
            line,
            column,
            message,
        });
    }
}
