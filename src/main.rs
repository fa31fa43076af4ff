use std::{fs, io, path::PathBuf, process};

use clap::Parser;
use interpreter::{format_error, run};
use tracing_subscriber::EnvFilter;

/// Runs a script through the lexer, parser, semantic analyzer and interpreter.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path of the script to run.
    file: PathBuf,

    /// Print the global activation record after the program finishes.
    #[arg(short, long)]
    memory: bool,

    /// Print the global symbol table built by the analyzer.
    #[arg(short, long)]
    symbols: bool,

    /// Write the syntax tree as JSON to this file.
    #[arg(long, value_name = "FILE")]
    ast: Option<PathBuf>,

    /// Log scope and call stack transitions (same as RUST_LOG=debug).
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    let source = fs::read_to_string(&args.file).unwrap_or_else(|_| {
        eprintln!(
            "Failed to read the input file '{}'. Perhaps this file does not exist?",
            args.file.display()
        );
        process::exit(1);
    });

    let mut stdout = io::stdout();
    let execution = match run(&source, &mut stdout) {
        Ok(execution) => execution,
        Err(error) => {
            eprint!(
                "{}",
                format_error(&error, &source, &args.file.to_string_lossy())
            );
            process::exit(1);
        }
    };

    if args.symbols {
        if let Some(globals) = execution.globals() {
            print!("{}", globals);
        }
    }

    if args.memory {
        print!("{}", execution.memory);
    }

    if let Some(path) = &args.ast {
        let written = serde_json::to_string_pretty(&execution.program)
            .map_err(|err| err.to_string())
            .and_then(|json| fs::write(path, json).map_err(|err| err.to_string()));

        if let Err(err) = written {
            eprintln!("Failed to write the syntax tree to '{}': {}", path.display(), err);
            process::exit(1);
        }
    }
}
