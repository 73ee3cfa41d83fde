use kestrel::object::EvalError;
use kestrel::{Evaluator, InputReader, Object, Options, OutputSink, SharedBuffer};
use pretty_assertions::assert_eq;

fn run(source: &str) -> Object {
    let program = kestrel::parse(source).unwrap_or_else(|errors| panic!("{:?}", errors));
    let mut evaluator = Evaluator::with_io(
        Options::default(),
        OutputSink::new(SharedBuffer::new()),
        InputReader::from_string(""),
    );
    evaluator.eval_program(&program)
}

#[test]
fn precedence_is_respected() {
    let cases = vec![
        ("1 + 2 * 3", 7),
        ("10 - 4 - 3", 3),
        ("2 * 3 + 4 * 5", 26),
        ("1 + 12 / 4 % 2", 2),
        ("1 << 2 + 1", 8),
        ("-2 * 3", -6),
    ];

    for (source, expected) in cases {
        assert_eq!(run(source), Object::Integer(expected), "{}", source);
    }
}

#[test]
fn while_needs_every_condition() {
    let source = "
        var runs = 0
        var a = true
        var b = true
        while (a, b) {
            runs += 1
            b = false
        }
        runs
    ";
    assert_eq!(run(source), Object::Integer(1));
    assert_eq!(run("var n = 0; while (true, false) { n += 1; } n"), Object::Integer(0));
}

#[test]
fn negative_indices_count_from_the_end() {
    for collection in &["[4, 5, 6]", "list(4, 5, 6)", "tuple(4, 5, 6)"] {
        for k in 1..=3 {
            let source = format!("var a = {}; a[-{}] == a[{}]", collection, k, 3 - k);
            assert_eq!(run(&source), Object::Boolean(true), "{}", source);
        }
    }
}

#[test]
fn loop_closures_keep_their_iteration() {
    let source = "
        var fs = list()
        foreach i in 1...5 {
            pushback_list(fs, func() { return i; })
        }
        var out = list()
        foreach f in fs {
            pushback_list(out, f())
        }
        out
    ";
    assert_eq!(run(source).to_string(), "list(1, 2, 3, 4, 5)");
}

#[test]
fn constants_cannot_be_assigned() {
    let source = "
        const limit = 3
        func bump() { limit = limit + 1; }
        bump()
    ";
    assert_eq!(
        run(source),
        Object::Error(EvalError::ConstantAssignment {
            name: "limit".to_owned()
        })
    );
    assert_eq!(
        run("const limit = 3; func bump() { limit = 4; } var failed = bump(); limit"),
        Object::Integer(3)
    );
}

#[test]
fn return_leaves_the_whole_function() {
    let source = "func f(n){ if(n>0){ return n; } return 0; } f(5)";
    assert_eq!(run(source), Object::Integer(5));

    let nested = "
        func first_even(xs) {
            for (var i = 0; i < size_list(xs); i += 1) {
                while (true) {
                    if (xs[i] % 2 == 0) { return xs[i]; }
                    break
                }
            }
            return -1
        }
        first_even(list(3, 5, 8, 10))
    ";
    assert_eq!(run(nested), Object::Integer(8));
}

#[test]
fn tuples_are_immutable() {
    assert_eq!(run("var t = tuple(1,2,3); size_tuple(t)"), Object::Integer(3));

    let mutators = vec![
        "pushback_list(t, 4)",
        "pushfront_list(t, 0)",
        "popback_list(t)",
        "popfront_list(t)",
        "insert_list(t, 0, 9)",
        "t[0] = 9",
    ];
    for mutator in mutators {
        let tuple = run(&format!("var t = tuple(1, 2, 3); {}", mutator));
        assert!(tuple.is_error(), "{} on a tuple gave {}", mutator, tuple);

        let list = run(&format!("var t = list(1, 2, 3); {}", mutator));
        assert!(!list.is_error(), "{} on a list gave {}", mutator, list);
    }
}

#[test]
fn fibonacci() {
    let source = "func fib(n){ if(n==0){return 0;} else if(n==1){return 1;} else {return fib(n-1)+fib(n-2);}} fib(10);";
    assert_eq!(run(source), Object::Integer(55));
}

#[test]
fn list_builtins() {
    let source = "var a = list(1,2,3); pushback_list(a,4); popfront_list(a); a";
    assert_eq!(run(source).to_string(), "list(2, 3, 4)");
}

#[test]
fn struct_methods() {
    let source = "struct P{ func init(x,y){ this.x=x; this.y=y; } func sum(){ return this.x+this.y; } } var p = new P(10,20); p.sum();";
    assert_eq!(run(source), Object::Integer(30));
}

#[test]
fn parse_errors_are_collected() {
    let errors = kestrel::parse("var = 1;\nvar ok = 2;\nlet = 3;").unwrap_err();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0].line, 1);
    assert_eq!(errors[1].line, 3);
    assert!(errors[0].to_string().starts_with("[1:"));
}

#[test]
fn program_output_goes_to_the_sink() {
    let buffer = SharedBuffer::new();
    let mut evaluator = Evaluator::with_io(
        Options::default(),
        OutputSink::new(buffer.clone()),
        InputReader::from_string("World\n"),
    );
    let program = kestrel::parse(
        "import \"strings\" as s
         var name = read_line(\"name? \")
         foreach i in 1...2 { println(s.upper(name), i) }",
    )
    .unwrap();

    assert_eq!(evaluator.eval_program(&program), Object::Nil);
    assert_eq!(buffer.contents(), "name? WORLD 1\nWORLD 2\n");
}
