use clap::Parser as ClapParser;
use custom_error::custom_error;
use kestrel::config::DEFAULT_MAX_CALL_DEPTH;
use kestrel::{repl, Evaluator, Object, Options};
use std::any::Any;
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;

#[derive(Debug, ClapParser)]
#[command(
    name = "kestrel",
    about = "Runs a kestrel script (.ks), or starts an interactive session without one.",
    version
)]
struct Cli {
    /// Script to run.
    file: Option<PathBuf>,

    /// Maximum nesting of user function calls.
    #[arg(long, default_value_t = DEFAULT_MAX_CALL_DEPTH)]
    max_depth: usize,

    /// Keep running after a top-level statement produces an error.
    #[arg(long)]
    keep_going: bool,

    /// Log evaluator activity to stderr (same as RUST_LOG=kestrel=debug).
    #[arg(short, long)]
    verbose: bool,
}

custom_error! {CliError
    Read{path: String, source: std::io::Error} = "cannot read {path}: {source}",
    Io{source: std::io::Error} = "i/o error: {source}",
    Parse{count: usize} = "aborted after {count} parse error(s)",
    Runtime{message: String} = "{message}",
    Fault{message: String} = "runtime fault: {message}",
}

impl CliError {
    fn exit_code(&self) -> u8 {
        match self {
            Self::Runtime { .. } => 1,
            Self::Parse { .. } => 65,
            Self::Read { .. } => 66,
            Self::Fault { .. } => 70,
            Self::Io { .. } => 74,
        }
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if !verbose && std::env::var_os("RUST_LOG").is_none() {
        return;
    }
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("kestrel=debug"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .with(filter)
        .init();
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_owned()
    }
}

fn run_file(path: &Path, options: Options) -> Result<(), CliError> {
    let source = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.display().to_string(),
        source,
    })?;

    let program = kestrel::parse(&source).map_err(|errors| {
        for err in &errors {
            eprintln!("{}", err);
        }
        CliError::Parse {
            count: errors.len(),
        }
    })?;
    debug!(path = %path.display(), statements = program.statements.len(), "parsed");

    let mut evaluator = Evaluator::new(options);
    match evaluator.eval_program(&program) {
        Object::Nil => Ok(()),
        error @ Object::Error(_) => Err(CliError::Runtime {
            message: match evaluator.error_position() {
                Some(position) => format!("[{}] {}", position, error),
                None => error.to_string(),
            },
        }),
        value => {
            println!("{}", value);
            Ok(())
        }
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let options = Options {
        max_call_depth: cli.max_depth,
        stop_on_error: !cli.keep_going,
    };
    match &cli.file {
        Some(path) => run_file(path, options),
        None => {
            println!("kestrel {}", env!("CARGO_PKG_VERSION"));
            repl::start(options).map_err(|source| CliError::Io { source })
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    panic::set_hook(Box::new(|info| debug!("{}", info)));

    let result = panic::catch_unwind(AssertUnwindSafe(|| run(&cli))).unwrap_or_else(|payload| {
        Err(CliError::Fault {
            message: panic_message(payload.as_ref()),
        })
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::from(err.exit_code())
        }
    }
}
