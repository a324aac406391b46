//! # Surrealtest CLI Entry Point
//!
//! The main executable for the `surrealtest` tool. This file drives the application lifecycle:
//!
//! 1. **Initialization**: Parses command-line arguments using [`cli::Cli`] and installs the
//!    `tracing` subscriber (filtered through `RUST_LOG`).
//! 2. **Input**: Reads a SurrealDB response document from a file or stdin.
//! 3. **Execution**: Delegates decoding or checking to a `surrealtest_core::Decoder`.
//! 4. **Presentation**: Formats and prints the resulting records or errors to standard output/error.

mod cli;
mod formatter;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
use formatter::{FormattedString, PartialFailure, RecordList};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process;
use surrealtest_core::Decoder;
use tracing_subscriber::EnvFilter;

fn main() {
    init_tracing();

    let args = Cli::parse();
    let decoder = Decoder::new().with_success_status(args.success_status);

    match args.command {
        Commands::Decode {
            input,
            strict,
            compact,
        } => run_decode(&decoder, input, strict, compact),
        Commands::Check { input } => run_check(&decoder, input),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn read_or_exit(input: Option<PathBuf>) -> serde_json::Value {
    match read_document(input.as_deref()) {
        Ok(value) => value,
        Err(err) => {
            eprintln!("{}", FormattedString::from(err));
            process::exit(1);
        }
    }
}

fn read_document(input: Option<&Path>) -> anyhow::Result<serde_json::Value> {
    let (source, text) = match input {
        None => ("stdin".to_string(), read_stdin()?),
        Some(path) if path == Path::new("-") => ("stdin".to_string(), read_stdin()?),
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read file '{}'", path.display()))?;
            (path.display().to_string(), text)
        }
    };

    tracing::debug!(source = %source, bytes = text.len(), "read response document");

    serde_json::from_str(&text).with_context(|| format!("Invalid JSON in {source}"))
}

fn read_stdin() -> anyhow::Result<String> {
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .context("Failed to read stdin")?;
    Ok(text)
}

fn run_decode(decoder: &Decoder, input: Option<PathBuf>, strict: bool, compact: bool) {
    let document = read_or_exit(input);

    let (records, error) = decoder
        .decode_all::<serde_json::Value>(document)
        .into_parts();

    match error {
        Some(err) if strict => {
            eprintln!("{}", FormattedString::from(err));
            process::exit(1);
        }
        Some(err) => {
            println!("{}", FormattedString::from(RecordList { records, compact }));
            eprintln!("{}", FormattedString::from(PartialFailure(err)));
        }
        None => println!("{}", FormattedString::from(RecordList { records, compact })),
    }
}

fn run_check(decoder: &Decoder, input: Option<PathBuf>) {
    let document = read_or_exit(input);

    match decoder.check_response(document) {
        Ok(()) => println!("{}", FormattedString("All statements succeeded.".to_string())),
        Err(err) => {
            eprintln!("{}", FormattedString::from(err));
            process::exit(1);
        }
    }
}
