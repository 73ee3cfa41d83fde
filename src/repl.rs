use crate::config::Options;
use crate::evaluator::Evaluator;
use crate::lexer::Lexer;
use crate::object::Object;
use crate::parser::Parser;
use crate::runtime::{InputReader, OutputSink};
use crate::token::TokenType;
use std::io::{self, Write};

static PROMPT: &str = ">> ";
static CONTINUATION: &str = ".. ";

/// Open brackets minus closed ones, counted on tokens so strings and
/// comments are ignored.
fn open_brackets(source: &str) -> i64 {
    let mut lexer = Lexer::new(source);
    let mut depth = 0;
    loop {
        match lexer.next_token().token_type {
            TokenType::Eof => return depth,
            TokenType::LParen | TokenType::LBrace | TokenType::LBracket => depth += 1,
            TokenType::RParen | TokenType::RBrace | TokenType::RBracket => depth -= 1,
            _ => {}
        }
    }
}

/// Reads one complete entry, continuing over lines while brackets are open.
/// `None` at end of input.
fn read_entry(input: &InputReader, output: &mut impl Write) -> io::Result<Option<String>> {
    let mut source = String::new();
    let mut prompt = PROMPT;
    loop {
        write!(output, "{}", prompt)?;
        output.flush()?;

        let line = match input.read_line()? {
            Some(line) => line,
            None => return Ok(if source.trim().is_empty() { None } else { Some(source) }),
        };
        source.push_str(&line);
        source.push('\n');
        if open_brackets(&source) <= 0 {
            return Ok(Some(source));
        }
        prompt = CONTINUATION;
    }
}

pub fn start(options: Options) -> io::Result<()> {
    let input = InputReader::stdin();
    let mut evaluator = Evaluator::with_io(options, OutputSink::stdout(), input.clone());
    run(&mut evaluator, &input, &mut io::stdout())
}

/// Evaluates entries until `input` runs out. Programs calling `read_line`
/// consume lines from the same reader, so `evaluator` must share it.
fn run(evaluator: &mut Evaluator, input: &InputReader, output: &mut impl Write) -> io::Result<()> {
    while let Some(source) = read_entry(input, output)? {
        let mut parser = Parser::new(Lexer::new(source));
        let program = parser.parse_program();
        if parser.has_errors() {
            for err in parser.errors() {
                writeln!(output, "\t{}", err)?;
            }
            continue;
        }

        match evaluator.eval_program(&program) {
            Object::Nil => {}
            value => writeln!(output, "{}", value)?,
        }
    }
    writeln!(output)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::runtime::SharedBuffer;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_open_brackets() {
        let cases = vec![
            ("1 + 2", 0),
            ("func f() {", 1),
            ("if (x) { [1, 2", 2),
            ("\"{\" + \"(\"", 0),
            ("// {\nvar x = 1", 0),
            ("})", -2),
        ];

        for (source, expected) in cases {
            assert_eq!(open_brackets(source), expected, "{}", source);
        }
    }

    #[test]
    fn test_read_entry_continues_until_balanced() {
        let input = InputReader::from_string("func f() {\n  return 1;\n}\nf()\n");
        let mut output = Vec::new();

        let first = read_entry(&input, &mut output).unwrap();
        assert_eq!(first.as_deref(), Some("func f() {\n  return 1;\n}\n"));
        let second = read_entry(&input, &mut output).unwrap();
        assert_eq!(second.as_deref(), Some("f()\n"));
        assert_eq!(read_entry(&input, &mut output).unwrap(), None);

        assert_eq!(String::from_utf8(output).unwrap(), ">> .. .. >> >> ");
    }

    #[test]
    fn test_programs_read_from_the_session_input() {
        let input = InputReader::from_string("var name = read_line()\nWorld\nname\n");
        let mut evaluator = Evaluator::with_io(
            Options::default(),
            OutputSink::new(SharedBuffer::new()),
            input.clone(),
        );
        let mut output = Vec::new();

        run(&mut evaluator, &input, &mut output).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), ">> >> World\n>> \n");
    }
}
