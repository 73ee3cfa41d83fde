use super::{Expression, FunctionLiteral, Identifier, Node, Position};
use std::fmt::{self, Display, Formatter};

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Declaration(Declaration),
    Expr(ExpressionStatement),
    Return(ControlStatement),
    Break(ControlStatement),
    Continue(ControlStatement),
    Block(BlockStatement),
    If(IfStatement),
    While(WhileStatement),
    For(ForStatement),
    Foreach(ForeachStatement),
    Function(FunctionLiteral),
    Struct(StructDeclaration),
    Import(ImportStatement),
}

impl Display for Statement {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Declaration(stmt) => write!(f, "{}", stmt),
            Self::Expr(stmt) => write!(f, "{}", stmt),
            Self::Return(stmt) => stmt.write_with(f, "return"),
            Self::Break(stmt) => stmt.write_with(f, "break"),
            Self::Continue(stmt) => stmt.write_with(f, "continue"),
            Self::Block(stmt) => write!(f, "{}", stmt),
            Self::If(stmt) => write!(f, "{}", stmt),
            Self::While(stmt) => write!(f, "{}", stmt),
            Self::For(stmt) => write!(f, "{}", stmt),
            Self::Foreach(stmt) => write!(f, "{}", stmt),
            Self::Function(stmt) => write!(f, "{}", stmt),
            Self::Struct(stmt) => write!(f, "{}", stmt),
            Self::Import(stmt) => write!(f, "{}", stmt),
        }
    }
}

impl Node for Statement {
    fn position(&self) -> Position {
        match self {
            Self::Declaration(stmt) => stmt.position,
            Self::Expr(stmt) => stmt.position,
            Self::Return(stmt) | Self::Break(stmt) | Self::Continue(stmt) => stmt.position,
            Self::Block(stmt) => stmt.position,
            Self::If(stmt) => stmt.position,
            Self::While(stmt) => stmt.position,
            Self::For(stmt) => stmt.position,
            Self::Foreach(stmt) => stmt.position,
            Self::Function(stmt) => stmt.position,
            Self::Struct(stmt) => stmt.position,
            Self::Import(stmt) => stmt.position,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum DeclarationKind {
    #[strum(to_string = "var")]
    Var,
    #[strum(to_string = "let")]
    Let,
    #[strum(to_string = "const")]
    Const,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub kind: DeclarationKind,
    pub name: Identifier,
    pub value: Option<Expression>,
    pub position: Position,
}

impl Display for Declaration {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{} {} = {};", self.kind, self.name, value),
            None => write!(f, "{} {};", self.kind, self.name),
        }
    }
}

/// Shared shape of `return`, `break` and `continue`.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlStatement {
    pub value: Option<Expression>,
    pub position: Position,
}

impl ControlStatement {
    fn write_with(&self, f: &mut Formatter, keyword: &str) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{} {};", keyword, value),
            None => write!(f, "{};", keyword),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStatement {
    pub expression: Expression,
    pub position: Position,
}

impl Display for ExpressionStatement {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{};", self.expression)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockStatement {
    pub statements: Vec<Statement>,
    pub position: Position,
}

impl Display for BlockStatement {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        if self.statements.is_empty() {
            return write!(f, "{{ }}");
        }
        let statements: Vec<String> = self.statements.iter().map(Statement::to_string).collect();
        write!(f, "{{ {} }}", statements.join(" "))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalBranch {
    pub condition: Expression,
    pub consequence: BlockStatement,
}

/// `if`, any number of `else if`, then an optional `else`.
#[derive(Debug, Clone, PartialEq)]
pub struct IfStatement {
    pub branches: Vec<ConditionalBranch>,
    pub alternative: Option<BlockStatement>,
    pub position: Position,
}

impl Display for IfStatement {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        for (i, branch) in self.branches.iter().enumerate() {
            if i > 0 {
                write!(f, " else ")?;
            }
            write!(f, "if ({}) {}", branch.condition, branch.consequence)?;
        }
        if let Some(alt) = &self.alternative {
            write!(f, " else {}", alt)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStatement {
    pub conditions: Vec<Expression>,
    pub body: BlockStatement,
    pub position: Position,
}

impl Display for WhileStatement {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let conditions: Vec<String> = self.conditions.iter().map(Expression::to_string).collect();
        write!(f, "while ({}) {}", conditions.join(", "), self.body)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForStatement {
    pub initializers: Vec<Statement>,
    pub condition: Option<Expression>,
    pub updates: Vec<Expression>,
    pub body: BlockStatement,
    pub position: Position,
}

impl Display for ForStatement {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let initializers: Vec<String> = self
            .initializers
            .iter()
            .map(|s| s.to_string().trim_end_matches(';').to_owned())
            .collect();
        let condition = self.condition.as_ref().map(Expression::to_string).unwrap_or_default();
        let updates: Vec<String> = self.updates.iter().map(Expression::to_string).collect();
        write!(
            f,
            "for ({}; {}; {}) {}",
            initializers.join(", "),
            condition,
            updates.join(", "),
            self.body
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForeachStatement {
    pub binding: Identifier,
    pub iterable: Expression,
    pub body: BlockStatement,
    pub position: Position,
}

impl Display for ForeachStatement {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "foreach {} in {} {}", self.binding, self.iterable, self.body)
    }
}

/// A field inside a struct body: `var` fields belong to each instance,
/// `let` and `const` fields to the struct type itself.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDeclaration {
    pub kind: DeclarationKind,
    pub name: Identifier,
    pub value: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructDeclaration {
    pub name: Identifier,
    pub fields: Vec<FieldDeclaration>,
    pub methods: Vec<FunctionLiteral>,
    pub position: Position,
}

impl Display for StructDeclaration {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let mut members: Vec<String> = self
            .fields
            .iter()
            .map(|field| match &field.value {
                Some(value) => format!("{} {} = {};", field.kind, field.name, value),
                None => format!("{} {};", field.kind, field.name),
            })
            .collect();
        members.extend(self.methods.iter().map(FunctionLiteral::to_string));
        write!(f, "struct {} {{ {} }}", self.name, members.join(" "))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportStatement {
    pub package: String,
    pub alias: Option<String>,
    pub position: Position,
}

impl ImportStatement {
    /// The name the package is bound to in scope.
    pub fn binding(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.package)
    }
}

impl Display for ImportStatement {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match &self.alias {
            Some(alias) => write!(f, "import {:?} as {};", self.package, alias),
            None => write!(f, "import {:?};", self.package),
        }
    }
}
