//! vaq-make CLI

use std::path::PathBuf;
use std::process;

use vaq_diagnostic::{DiagnosticEmitter, TerminalEmitter};
use vaq_eval::Runtime;
use vaq_make::{generate, init_tracing, parse_args, Command, GenerateError};

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let cwd = match std::env::current_dir() {
        Ok(cwd) => cwd,
        Err(err) => {
            eprintln!("error: could not read the current directory: {err}");
            process::exit(1);
        }
    };

    let config = match parse_args(&args, &cwd) {
        Ok(Command::Generate(config)) => config,
        Ok(Command::Help) => {
            print_usage(&args);
            return;
        }
        Ok(Command::Version) => {
            println!("vaq-make {}", env!("CARGO_PKG_VERSION"));
            return;
        }
        Err(err) => {
            match err.diagnostic() {
                Some(diagnostic) => TerminalEmitter::stderr(&cwd).emit(&diagnostic),
                None => println!("{err}"),
            }
            process::exit(1);
        }
    };

    // Fall back to the bare name so the regeneration rule still resolves via PATH.
    let vmake = std::env::current_exe().unwrap_or_else(|_| PathBuf::from("vaq-make"));

    let mut rt = Runtime::new(&cwd);
    match generate(&mut rt, &config, &vmake) {
        Ok(_) => {}
        Err(GenerateError::Fatal(err)) => {
            rt.report_fatal(&err);
            process::exit(1);
        }
        Err(GenerateError::Emit(err)) => {
            rt.report(err.diagnostic());
            process::exit(1);
        }
        Err(GenerateError::Reported { .. }) => process::exit(1),
    }
}

fn print_usage(args: &[String]) {
    let program = args.first().map_or("vaq-make", String::as_str);
    println!("Usage: {program} [vmake_file] [source_directory] [build_directory]");
    println!();
    println!("Evaluates the build script and writes a Makefile into the build directory.");
    println!("With only a script, the build directory is the script's directory and the");
    println!("source directory is the current directory.");
    println!();
    println!("Options:");
    println!("  -h, --help       Print this message");
    println!("  -V, --version    Print the version");
    println!();
    println!("Set RUST_LOG (e.g. RUST_LOG=vaq_eval=debug) to trace evaluation on stderr.");
}
