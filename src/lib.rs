pub mod ast;
mod builtins;
pub mod config;
mod environment;
mod evaluator;
mod lexer;
pub mod object;
mod parser;
pub mod repl;
mod runtime;
mod token;

pub use config::Options;
pub use environment::Environment;
pub use evaluator::Evaluator;
pub use lexer::Lexer;
pub use object::{EvalError, Object};
pub use parser::{ParseError, Parser};
pub use runtime::{InputReader, OutputSink, Runtime, SharedBuffer};

/// Parses `source` into a program, or returns every parse error found.
pub fn parse(source: &str) -> Result<ast::Program, Vec<ParseError>> {
    let mut parser = Parser::new(Lexer::new(source));
    let program = parser.parse_program();
    if parser.has_errors() {
        return Err(parser.errors().to_vec());
    }
    Ok(program)
}
