use crate::ast::{self, Expression, Node, Statement};
use crate::builtins;
use crate::config::Options;
use crate::environment::Environment;
use crate::object::{range_values, EvalError, FunctionObject, Object, OrderedMap, Result};
use crate::runtime::{InputReader, OutputSink, Runtime};
use std::collections::HashMap;
use std::rc::Rc;
use tracing::{debug, trace, warn};

mod index;
mod operators;
mod structs;

/// Grows the native stack before deep recursion instead of overflowing it.
#[inline]
fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    const RED_ZONE: usize = 100 * 1024;
    const STACK_PER_RECURSION: usize = 1024 * 1024;

    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// Decides whether a loop body result ends the loop, and with what value.
fn loop_exit(result: Object) -> Option<Object> {
    match result {
        Object::Break(payload) => Some(payload.map_or(Object::Nil, |value| *value)),
        Object::ReturnValue(_) => Some(result),
        _ => None,
    }
}

/// Tree-walking interpreter. One instance owns the global scope, so
/// consecutive programs (REPL lines) share their bindings.
pub struct Evaluator {
    globals: Environment,
    imports: HashMap<String, String>,
    output: OutputSink,
    input: InputReader,
    options: Options,
    depth: usize,
    error_position: Option<ast::Position>,
}

impl Evaluator {
    pub fn new(options: Options) -> Self {
        Self::with_io(options, OutputSink::stdout(), InputReader::stdin())
    }

    pub fn with_io(options: Options, output: OutputSink, input: InputReader) -> Self {
        Self {
            globals: Environment::new(),
            imports: HashMap::new(),
            output,
            input,
            options,
            depth: 0,
            error_position: None,
        }
    }

    pub fn globals(&self) -> &Environment {
        &self.globals
    }

    /// Where the top-level statement that produced the last error starts.
    pub fn error_position(&self) -> Option<ast::Position> {
        self.error_position
    }

    pub fn eval_program(&mut self, program: &ast::Program) -> Object {
        let globals = self.globals.clone();
        self.error_position = None;

        let mut result = Object::Nil;
        for statement in &program.statements {
            result = match self.eval_statement(statement, &globals) {
                Object::ReturnValue(value) => return *value,
                Object::Break(_) => EvalError::BreakOutsideLoop.into(),
                Object::Continue => EvalError::ContinueOutsideLoop.into(),
                value => value,
            };

            if result.is_error() {
                self.error_position = Some(statement.position());
                if self.options.stop_on_error {
                    debug!(position = %statement.position(), "stopping at error: {}", result);
                    return result;
                }
            }
        }
        result
    }

    fn eval_statements(&mut self, statements: &[Statement], env: &Environment) -> Object {
        let mut result = Object::Nil;
        for statement in statements {
            result = self.eval_statement(statement, env);
            if result.is_signal() {
                return result;
            }
        }
        result
    }

    fn eval_block(&mut self, block: &ast::BlockStatement, env: &Environment) -> Object {
        let scope = Environment::with_enclosed(env);
        self.eval_statements(&block.statements, &scope)
    }

    fn eval_statement(&mut self, statement: &Statement, env: &Environment) -> Object {
        match statement {
            Statement::Declaration(declaration) => self.eval_declaration(declaration, env).into(),
            Statement::Expr(stmt) => self.eval_expression(&stmt.expression, env),
            Statement::Return(stmt) => {
                let value = self.eval_optional(stmt.value.as_ref(), env);
                Object::ReturnValue(Box::new(value))
            }
            Statement::Break(stmt) => match &stmt.value {
                Some(value) => Object::Break(Some(Box::new(self.eval_expression(value, env)))),
                None => Object::Break(None),
            },
            Statement::Continue(stmt) => {
                self.eval_optional(stmt.value.as_ref(), env);
                Object::Continue
            }
            Statement::Block(block) => self.eval_block(block, env),
            Statement::If(stmt) => self.eval_if(stmt, env).into(),
            Statement::While(stmt) => self.eval_while(stmt, env).into(),
            Statement::For(stmt) => self.eval_for(stmt, env).into(),
            Statement::Foreach(stmt) => self.eval_foreach(stmt, env).into(),
            Statement::Function(literal) => self.eval_function_declaration(literal, env).into(),
            Statement::Struct(declaration) => self.eval_struct_declaration(declaration, env).into(),
            Statement::Import(import) => self.eval_import(import).into(),
        }
    }

    fn eval_optional(&mut self, expression: Option<&Expression>, env: &Environment) -> Object {
        expression.map_or(Object::Nil, |e| self.eval_expression(e, env))
    }

    fn check_redeclaration(name: &str, env: &Environment) -> Result<()> {
        if env.is_local_constant(name) {
            return Err(EvalError::ConstantRedeclaration {
                name: name.to_owned(),
            });
        }
        Ok(())
    }

    fn eval_declaration(&mut self, declaration: &ast::Declaration, env: &Environment) -> Result<Object> {
        let name = &declaration.name.value;
        Self::check_redeclaration(name, env)?;

        let value = self.eval_optional(declaration.value.as_ref(), env);
        match declaration.kind {
            ast::DeclarationKind::Const => env.bind_const(name, value),
            ast::DeclarationKind::Var | ast::DeclarationKind::Let => env.bind(name, value),
        };
        Ok(Object::Nil)
    }

    fn eval_function_declaration(
        &mut self,
        literal: &ast::FunctionLiteral,
        env: &Environment,
    ) -> Result<Object> {
        if let Some(name) = &literal.name {
            Self::check_redeclaration(name, env)?;
            let function = FunctionObject::new(literal, env.clone());
            env.bind(name, Object::Function(Rc::new(function)));
        }
        Ok(Object::Nil)
    }

    fn eval_if(&mut self, stmt: &ast::IfStatement, env: &Environment) -> Result<Object> {
        for branch in &stmt.branches {
            if self.eval(&branch.condition, env)?.truth_value() {
                return Ok(self.eval_block(&branch.consequence, env));
            }
        }
        Ok(match &stmt.alternative {
            Some(alternative) => self.eval_block(alternative, env),
            None => Object::Nil,
        })
    }

    fn conditions_hold(&mut self, conditions: &[Expression], env: &Environment) -> Result<bool> {
        for condition in conditions {
            if !self.eval(condition, env)?.truth_value() {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn eval_while(&mut self, stmt: &ast::WhileStatement, env: &Environment) -> Result<Object> {
        while self.conditions_hold(&stmt.conditions, env)? {
            if let Some(exit) = loop_exit(self.eval_block(&stmt.body, env)) {
                return Ok(exit);
            }
        }
        Ok(Object::Nil)
    }

    /// Loop variables live in their own scope, copied forward before the
    /// updates of every iteration, so closures made in an earlier iteration
    /// keep that iteration's values.
    fn eval_for(&mut self, stmt: &ast::ForStatement, env: &Environment) -> Result<Object> {
        let mut scope = Environment::with_enclosed(env);
        for initializer in &stmt.initializers {
            self.eval_statement(initializer, &scope).into_result()?;
        }

        loop {
            if let Some(condition) = &stmt.condition {
                if !self.eval(condition, &scope)?.truth_value() {
                    return Ok(Object::Nil);
                }
            }
            if let Some(exit) = loop_exit(self.eval_block(&stmt.body, &scope)) {
                return Ok(exit);
            }

            scope = scope.snapshot();
            for update in &stmt.updates {
                self.eval(update, &scope)?;
            }
        }
    }

    fn eval_foreach(&mut self, stmt: &ast::ForeachStatement, env: &Environment) -> Result<Object> {
        let iterable = self.eval(&stmt.iterable, env)?;
        let values: Box<dyn Iterator<Item = Object>> = match &iterable {
            Object::Range(start, end) => Box::new(range_values(*start, *end).map(Object::Integer)),
            other => Box::new(
                other
                    .elements()
                    .ok_or(EvalError::NotIterable {
                        type_name: other.type_name(),
                    })?
                    .into_iter(),
            ),
        };

        for value in values {
            let scope = Environment::with_enclosed(env);
            scope.bind(&stmt.binding.value, value);
            if let Some(exit) = loop_exit(self.eval_statements(&stmt.body.statements, &scope)) {
                return Ok(exit);
            }
        }
        Ok(Object::Nil)
    }

    fn eval_import(&mut self, import: &ast::ImportStatement) -> Result<Object> {
        if !builtins::has_package(&import.package) {
            return Err(EvalError::UnknownPackage {
                name: import.package.clone(),
            });
        }
        debug!(package = import.package.as_str(), alias = import.binding(), "import");
        self.imports
            .insert(import.binding().to_owned(), import.package.clone());
        Ok(Object::Nil)
    }

    fn eval_expression(&mut self, expression: &Expression, env: &Environment) -> Object {
        ensure_sufficient_stack(|| Object::from(self.eval_expression_inner(expression, env)))
    }

    /// Evaluates `expression`, moving an `Error` result to the `Err` side.
    fn eval(&mut self, expression: &Expression, env: &Environment) -> Result<Object> {
        self.eval_expression(expression, env).into_result()
    }

    fn eval_all(&mut self, expressions: &[Expression], env: &Environment) -> Result<Vec<Object>> {
        expressions.iter().map(|e| self.eval(e, env)).collect()
    }

    /// Call arguments keep `Error` values so builtins like `is_error` can see them.
    fn eval_arguments(&mut self, arguments: &[Expression], env: &Environment) -> Vec<Object> {
        arguments
            .iter()
            .map(|argument| self.eval_expression(argument, env))
            .collect()
    }

    fn eval_expression_inner(&mut self, expression: &Expression, env: &Environment) -> Result<Object> {
        match expression {
            Expression::Identifier(identifier) => Self::eval_identifier(identifier, env),
            Expression::IntegerLiteral(n) => Ok(Object::Integer(*n)),
            Expression::FloatLiteral(x) => Ok(Object::Float(*x)),
            Expression::String(s) => Ok(Object::String(s.clone())),
            Expression::Boolean(b) => Ok(Object::Boolean(*b)),
            Expression::Nil => Ok(Object::Nil),
            Expression::Prefix(prefix) => {
                let right = self.eval(&prefix.right, env)?;
                operators::eval_prefix(prefix.operator, right)
            }
            Expression::Infix(infix) => self.eval_infix(infix, env),
            Expression::Grouped(inner) => self.eval(inner, env),
            Expression::Assign(assign) => self.eval_assign(assign, env),
            Expression::Function(literal) => Ok(Self::eval_function_literal(literal, env)),
            Expression::Call(call) => self.eval_call(call, env),
            Expression::Member(member) => self.eval_member(member, env),
            Expression::Index(expr) => {
                let left = self.eval(&expr.left, env)?;
                let index = self.eval(&expr.index, env)?;
                index::index(&left, &index)
            }
            Expression::Slice(expr) => {
                let left = self.eval(&expr.left, env)?;
                let start = expr.start.as_ref().map(|e| self.eval(e, env)).transpose()?;
                let end = expr.end.as_ref().map(|e| self.eval(e, env)).transpose()?;
                index::slice(&left, start.as_ref(), end.as_ref())
            }
            Expression::Array(literal) => Ok(Object::array(self.eval_all(&literal.elements, env)?)),
            Expression::Map(literal) => {
                let mut map = OrderedMap::new();
                for (key, value) in &literal.pairs {
                    let key = self.eval(key, env)?;
                    let value = self.eval(value, env)?;
                    map.insert(key.key_string(), value);
                }
                Ok(Object::map(map))
            }
            Expression::Set(literal) => Ok(Object::set(
                self.eval_all(&literal.elements, env)?.into_iter().collect(),
            )),
            Expression::Range(literal) => {
                let start = self.eval(&literal.start, env)?;
                let end = self.eval(&literal.end, env)?;
                match (start, end) {
                    (Object::Integer(start), Object::Integer(end)) => Ok(Object::Range(start, end)),
                    (start, end) => Err(EvalError::InvalidRange {
                        start: start.type_name(),
                        end: end.type_name(),
                    }),
                }
            }
            Expression::New(new) => self.eval_new(new, env),
        }
    }

    fn eval_identifier(identifier: &ast::Identifier, env: &Environment) -> Result<Object> {
        env.lookup(&identifier.value)
            .or_else(|| builtins::lookup(&identifier.value).map(Object::Builtin))
            .ok_or_else(|| EvalError::IdentifierNotFound {
                name: identifier.value.clone(),
            })
    }

    fn eval_infix(&mut self, infix: &ast::InfixExpression, env: &Environment) -> Result<Object> {
        let left = self.eval(&infix.left, env)?;
        match infix.operator {
            ast::Operator::And if !left.truth_value() => return Ok(Object::Boolean(false)),
            ast::Operator::Or if left.truth_value() => return Ok(Object::Boolean(true)),
            _ => {}
        }
        let right = self.eval(&infix.right, env)?;
        operators::eval_infix(infix.operator, left, right)
    }

    /// Function expressions close over a snapshot of the defining scope. A
    /// named expression can also see itself, for recursion.
    fn eval_function_literal(literal: &ast::FunctionLiteral, env: &Environment) -> Object {
        let captured = env.snapshot();
        let function = Object::Function(Rc::new(FunctionObject::new(literal, captured.clone())));
        if let Some(name) = &literal.name {
            captured.bind(name, function.clone());
        }
        function
    }

    fn eval_assign(&mut self, assign: &ast::AssignExpression, env: &Environment) -> Result<Object> {
        match assign.target.as_ref() {
            Expression::Identifier(identifier) => {
                let name = &identifier.value;
                let not_found = || EvalError::IdentifierNotFound { name: name.clone() };
                if env.is_constant(name) {
                    return Err(EvalError::ConstantAssignment { name: name.clone() });
                }

                let current = match assign.operator {
                    Some(_) => Some(env.lookup(name).ok_or_else(not_found)?),
                    None => None,
                };
                let value = self.assigned_value(assign, current, env)?;
                env.assign(name, value.clone()).ok_or_else(not_found)?;
                Ok(value)
            }
            Expression::Index(target) => {
                let receiver = self.eval(&target.left, env)?;
                let index = self.eval(&target.index, env)?;

                let current = match assign.operator {
                    Some(_) => Some(index::index(&receiver, &index)?),
                    None => None,
                };
                let value = self.assigned_value(assign, current, env)?;
                index::assign_index(&receiver, &index, value.clone())?;
                Ok(value)
            }
            Expression::Member(target) => {
                let receiver = self.eval(&target.object, env)?;
                let name = &target.property.value;

                let current = match assign.operator {
                    Some(_) => Some(structs::member_value(&receiver, name)?),
                    None => None,
                };
                let value = self.assigned_value(assign, current, env)?;
                structs::assign_member(&receiver, name, value.clone())?;
                Ok(value)
            }
            target => Err(EvalError::InvalidAssignmentTarget {
                target: target.to_string(),
            }),
        }
    }

    /// The right-hand side, combined with `current` for compound assignment.
    fn assigned_value(
        &mut self,
        assign: &ast::AssignExpression,
        current: Option<Object>,
        env: &Environment,
    ) -> Result<Object> {
        let right = self.eval(&assign.value, env)?;
        match (assign.operator, current) {
            (Some(operator), Some(current)) => operators::eval_infix(operator, current, right),
            _ => Ok(right),
        }
    }

    fn eval_call(&mut self, call: &ast::CallExpression, env: &Environment) -> Result<Object> {
        if let Expression::Member(member) = call.function.as_ref() {
            return self.eval_method_call(member, &call.arguments, env);
        }

        let function = match call.function.as_ref() {
            Expression::Identifier(identifier) => Self::resolve_callee(identifier, env)?,
            callee => self.eval(callee, env)?,
        };
        let args = self.eval_arguments(&call.arguments, env);
        Ok(self.apply_function(function, args))
    }

    /// User functions in scope win; a non-callable binding does not hide a
    /// builtin of the same name.
    fn resolve_callee(identifier: &ast::Identifier, env: &Environment) -> Result<Object> {
        let name = &identifier.value;
        match env.lookup(name) {
            Some(value @ Object::Function(_)) | Some(value @ Object::Builtin(_)) => Ok(value),
            found => match (builtins::lookup(name), found) {
                (Some(builtin), _) => Ok(Object::Builtin(builtin)),
                (None, Some(value)) => Err(EvalError::NotAFunction {
                    type_name: value.type_name(),
                }),
                (None, None) => Err(EvalError::IdentifierNotFound { name: name.clone() }),
            },
        }
    }

    /// The package an identifier names, unless a binding shadows the alias.
    fn imported_package(&self, expression: &Expression, env: &Environment) -> Option<String> {
        match expression {
            Expression::Identifier(identifier) if env.lookup(&identifier.value).is_none() => {
                self.imports.get(&identifier.value).cloned()
            }
            _ => None,
        }
    }

    fn package_function(package: &str, name: &str) -> Result<Object> {
        builtins::package_function(package, name)
            .map(Object::Builtin)
            .ok_or_else(|| EvalError::UnknownPackageFunction {
                package: package.to_owned(),
                name: name.to_owned(),
            })
    }

    fn eval_member(&mut self, member: &ast::MemberExpression, env: &Environment) -> Result<Object> {
        if let Some(package) = self.imported_package(&member.object, env) {
            return Self::package_function(&package, &member.property.value);
        }
        let object = self.eval(&member.object, env)?;
        structs::member_value(&object, &member.property.value)
    }

    fn eval_method_call(
        &mut self,
        member: &ast::MemberExpression,
        arguments: &[Expression],
        env: &Environment,
    ) -> Result<Object> {
        let name = &member.property.value;
        if let Some(package) = self.imported_package(&member.object, env) {
            let function = Self::package_function(&package, name)?;
            let args = self.eval_arguments(arguments, env);
            return Ok(self.apply_function(function, args));
        }

        let receiver = self.eval(&member.object, env)?;
        if let Object::Instance(instance) = &receiver {
            if instance.field(name).is_none() {
                if let Some(method) = instance.struct_type.method(name) {
                    let args = self.eval_arguments(arguments, env);
                    return Ok(self.call_user_function(&method, args, Some(receiver.clone())));
                }
            }
        }

        let function = structs::member_value(&receiver, name)?;
        let args = self.eval_arguments(arguments, env);
        Ok(self.apply_function(function, args))
    }

    fn apply_function(&mut self, function: Object, args: Vec<Object>) -> Object {
        match function {
            Object::Function(function) => self.call_user_function(&function, args, None),
            Object::Builtin(builtin) => {
                let output = self.output.clone();
                builtin.call(self, &output, args)
            }
            other => EvalError::NotAFunction {
                type_name: other.type_name(),
            }
            .into(),
        }
    }

    /// Runs a user function in a fresh scope above its captured one. With a
    /// receiver, `this` and `self` are bound to it.
    fn call_user_function(
        &mut self,
        function: &Rc<FunctionObject>,
        args: Vec<Object>,
        receiver: Option<Object>,
    ) -> Object {
        if args.len() != function.parameters.len() {
            return EvalError::IncorrectArity {
                got: args.len(),
                want: function.parameters.len(),
            }
            .into();
        }

        let limit = self.options.max_call_depth;
        if self.depth >= limit {
            warn!(function = function.name(), limit, "call depth exceeded");
            return EvalError::CallDepthExceeded { limit }.into();
        }
        trace!(function = function.name(), depth = self.depth, "call");

        let scope = Environment::with_enclosed(&function.env);
        if let Some(receiver) = receiver {
            scope.bind("this", receiver.clone());
            scope.bind("self", receiver);
        }
        for (parameter, arg) in function.parameters.iter().zip(args) {
            scope.bind(&parameter.value, arg);
        }

        self.depth += 1;
        let result = self.eval_statements(&function.body.statements, &scope);
        self.depth -= 1;

        match result {
            Object::ReturnValue(value) => *value,
            Object::Break(_) => EvalError::BreakOutsideLoop.into(),
            Object::Continue => EvalError::ContinueOutsideLoop.into(),
            error @ Object::Error(_) => error,
            _ => Object::Nil,
        }
    }
}

impl Runtime for Evaluator {
    fn call_function(&mut self, function: &Object, args: Vec<Object>) -> Object {
        self.apply_function(function.clone(), args)
    }

    fn input_reader(&self) -> InputReader {
        self.input.clone()
    }
}
