use super::*;
use crate::ast::{DeclarationKind, Program};
use pretty_assertions::assert_eq;

fn parse(input: &str) -> Program {
    let mut parser = Parser::new(Lexer::new(input));
    let program = parser.parse_program();
    assert!(!parser.has_errors(), "parse errors: {:?}", parser.errors());
    program
}

fn parse_with_errors(input: &str) -> (Program, Vec<ParseError>) {
    let mut parser = Parser::new(Lexer::new(input));
    let program = parser.parse_program();
    (program, parser.errors().to_vec())
}

fn single_statement(input: &str) -> Statement {
    let mut program = parse(input);
    assert_eq!(program.statements.len(), 1, "program: {}", program);
    program.statements.remove(0)
}

#[test]
fn test_operator_precedence() {
    let cases = vec![
        ("1 + 2 * 3", "(1 + (2 * 3));"),
        ("-a * b", "((-a) * b);"),
        ("!-a", "(!(-a));"),
        ("a + b - c", "((a + b) - c);"),
        ("a * b / c % d", "(((a * b) / c) % d);"),
        ("a || b && c", "(a || (b && c));"),
        ("a | b ^ c & d", "(a | (b ^ (c & d)));"),
        ("a == b < c", "(a == (b < c));"),
        ("1 << 2 + 3", "(1 << (2 + 3));"),
        ("x < 2...5", "(x < (2...5));"),
        ("1 + 1...5", "((1 + 1)...5);"),
        ("~x & 1", "((~x) & 1);"),
        ("(5 + 5) * 2", "(((5 + 5)) * 2);"),
        ("a += b * 2", "a += (b * 2);"),
        ("a = b = 3", "a = b = 3;"),
        ("x = y || z", "x = (y || z);"),
        ("add(a, b * c)[1].x", "(add(a, (b * c))[1]).x;"),
        ("a[1:]", "(a[1:]);"),
        ("a[:-1]", "(a[:(-1)]);"),
        ("a[2:4]", "(a[2:4]);"),
        ("-p.sum()", "(-p.sum());"),
    ];

    for (input, expected) in cases {
        assert_eq!(parse(input).to_string(), expected, "input: {}", input);
    }
}

#[test]
fn test_literals() {
    let cases = vec![
        ("5", Expression::IntegerLiteral(5)),
        ("2.5", Expression::FloatLiteral(2.5)),
        ("\"hi\"", Expression::String("hi".to_owned())),
        ("true", Expression::Boolean(true)),
        ("nil", Expression::Nil),
    ];

    for (input, expected) in cases {
        match single_statement(input) {
            Statement::Expr(stmt) => assert_eq!(stmt.expression, expected),
            other => panic!("expected expression statement, got {}", other),
        }
    }
}

#[test]
fn test_declarations() {
    let program = parse("var x = 5; let y; const z = x;");
    assert_eq!(program.to_string(), "var x = 5; let y; const z = x;");

    let kinds: Vec<DeclarationKind> = program
        .statements
        .iter()
        .map(|stmt| match stmt {
            Statement::Declaration(decl) => decl.kind,
            other => panic!("expected declaration, got {}", other),
        })
        .collect();
    assert_eq!(
        kinds,
        vec![DeclarationKind::Var, DeclarationKind::Let, DeclarationKind::Const]
    );
}

#[test]
fn test_if_chain() {
    match single_statement("if (a) { 1 } else if (b) { 2 } else { 3 }") {
        Statement::If(stmt) => {
            assert_eq!(stmt.branches.len(), 2);
            assert!(stmt.alternative.is_some());
            assert_eq!(
                stmt.to_string(),
                "if (a) { 1; } else if (b) { 2; } else { 3; }"
            );
        }
        other => panic!("expected if, got {}", other),
    }
}

#[test]
fn test_while_conditions() {
    match single_statement("while (a, b < 3) { a = a - 1 }") {
        Statement::While(stmt) => {
            assert_eq!(stmt.conditions.len(), 2);
            assert_eq!(stmt.body.statements.len(), 1);
        }
        other => panic!("expected while, got {}", other),
    }
}

#[test]
fn test_for_clauses() {
    match single_statement("for (var i = 0, j = 10; i < j; i += 1, j -= 1) { }") {
        Statement::For(stmt) => {
            assert_eq!(stmt.initializers.len(), 2);
            assert!(stmt
                .initializers
                .iter()
                .all(|s| matches!(s, Statement::Declaration(_))));
            assert!(stmt.condition.is_some());
            assert_eq!(stmt.updates.len(), 2);
        }
        other => panic!("expected for, got {}", other),
    }

    match single_statement("for (;;) { break }") {
        Statement::For(stmt) => {
            assert!(stmt.initializers.is_empty());
            assert!(stmt.condition.is_none());
            assert!(stmt.updates.is_empty());
            assert_eq!(stmt.to_string(), "for (; ; ) { break; }");
        }
        other => panic!("expected for, got {}", other),
    }
}

#[test]
fn test_foreach() {
    match single_statement("foreach n in 1...3 { print(n) }") {
        Statement::Foreach(stmt) => {
            assert_eq!(stmt.binding.value, "n");
            assert!(matches!(stmt.iterable, Expression::Range(_)));
        }
        other => panic!("expected foreach, got {}", other),
    }
}

#[test]
fn test_functions() {
    match single_statement("func add(a, b) { return a + b; }") {
        Statement::Function(func) => {
            assert_eq!(func.name.as_deref(), Some("add"));
            assert_eq!(func.parameters.len(), 2);
            assert_eq!(func.to_string(), "func add(a, b) { return (a + b); }");
        }
        other => panic!("expected function declaration, got {}", other),
    }

    match single_statement("var f = func(x) { x };") {
        Statement::Declaration(decl) => match decl.value {
            Some(Expression::Function(func)) => assert!(func.name.is_none()),
            other => panic!("expected function literal, got {:?}", other),
        },
        other => panic!("expected declaration, got {}", other),
    }

    assert_eq!(
        parse("func(x) { x }(5)").to_string(),
        "func(x) { x; }(5);"
    );
}

#[test]
fn test_struct_declaration() {
    let input = "struct P {
    var x = 1
    let count = 0;
    const ORIGIN = 0;
    func init(x) { this.x = x; }
    func get() { return this.x; }
}";
    match single_statement(input) {
        Statement::Struct(stmt) => {
            assert_eq!(stmt.name.value, "P");
            let fields: Vec<(DeclarationKind, &str)> = stmt
                .fields
                .iter()
                .map(|f| (f.kind, f.name.value.as_str()))
                .collect();
            assert_eq!(
                fields,
                vec![
                    (DeclarationKind::Var, "x"),
                    (DeclarationKind::Let, "count"),
                    (DeclarationKind::Const, "ORIGIN"),
                ]
            );
            let methods: Vec<Option<&str>> = stmt.methods.iter().map(|m| m.name.as_deref()).collect();
            assert_eq!(methods, vec![Some("init"), Some("get")]);
        }
        other => panic!("expected struct, got {}", other),
    }
}

#[test]
fn test_collection_literals() {
    match single_statement("map{\"a\": 1, \"b\": 2,}") {
        Statement::Expr(stmt) => match stmt.expression {
            Expression::Map(map) => assert_eq!(map.pairs.len(), 2),
            other => panic!("expected map literal, got {}", other),
        },
        other => panic!("expected expression, got {}", other),
    }

    assert_eq!(parse("set{1, 2, 2}").to_string(), "set{1, 2, 2};");
    assert_eq!(parse("[1, [2], map{}]").to_string(), "[1, [2], map{}];");
    assert_eq!(parse("map(xs, f)").to_string(), "map(xs, f);");
    assert_eq!(parse("new P(1, 2)").to_string(), "new P(1, 2);");
}

#[test]
fn test_import() {
    match single_statement("import \"math\" as m;") {
        Statement::Import(stmt) => {
            assert_eq!(stmt.package, "math");
            assert_eq!(stmt.binding(), "m");
        }
        other => panic!("expected import, got {}", other),
    }
}

#[test]
fn test_newline_separates_statements() {
    let program = parse("var a = 1\nvar b = 2\na\n(b)\nreturn\n");
    assert_eq!(program.statements.len(), 5);
    assert_eq!(program.statements[4].to_string(), "return;");
}

#[test]
fn test_error_recovery() {
    let (program, errors) = parse_with_errors("var = 5; var x 5; var y = 10;");
    assert_eq!(errors.len(), 2, "{:?}", errors);
    assert_eq!(program.to_string(), "var y = 10;");

    let (program, errors) = parse_with_errors("let a = ; let b = 2; foo(;\nlet c = 3;");
    assert_eq!(errors.len(), 2, "{:?}", errors);
    assert_eq!(errors[0].to_string(), "[1:9] unexpected `;`");
    assert_eq!(program.to_string(), "let b = 2; let c = 3;");
}

#[test]
fn test_error_inside_block_keeps_block() {
    let (program, errors) = parse_with_errors("func f() { var = 1; return 2; } f()");
    assert_eq!(errors.len(), 1, "{:?}", errors);
    assert_eq!(program.to_string(), "func f() { return 2; } f();");
}

#[test]
fn test_unterminated_block() {
    let (_, errors) = parse_with_errors("func f() { return 1;");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("expected `}`"), "{}", errors[0]);
}

#[test]
fn test_const_requires_value() {
    let (_, errors) = parse_with_errors("const x;");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("must be initialized"));
}
