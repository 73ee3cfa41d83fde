use kestrel::{Evaluator, Options};
use std::env;
use std::time::Instant;

static INPUT: &str = "func fibonacci(x) {
    if (x == 0) {
        return 0;
    } else if (x == 1) {
        return 1;
    } else {
        return fibonacci(x - 1) + fibonacci(x - 2);
    }
}
fibonacci($N);";

fn main() {
    let n: u32 = env::args().nth(1).and_then(|arg| arg.parse().ok()).unwrap_or(25);
    let source = INPUT.replace("$N", &n.to_string());
    let program = match kestrel::parse(&source) {
        Ok(program) => program,
        Err(errors) => {
            for err in errors {
                eprintln!("{}", err);
            }
            std::process::exit(65);
        }
    };

    let mut evaluator = Evaluator::new(Options::default());
    let start = Instant::now();
    let result = evaluator.eval_program(&program);
    let duration = start.elapsed();

    println!(
        "engine=eval, n={}, result={}, duration={}",
        n,
        result,
        duration.as_secs_f64(),
    );
}
