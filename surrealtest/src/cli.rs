//! # CLI
//!
//! This module defines the command-line interface of `surrealtest` using `clap`.
//!
//! It is responsible for parsing user input and performing validation (e.g., rejecting an empty
//! success token).
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use surrealtest_core::SUCCESS_STATUS;

#[derive(Parser, Debug)]
#[command(name = "surrealtest", version, about = "SurrealDB response decoder")]
pub struct Cli {
    /// Status token that marks a successful statement envelope
    #[arg(long, global = true, default_value = SUCCESS_STATUS, value_parser = parse_status)]
    pub success_status: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Decode a response into a flat list of records
    ///
    /// Envelopes are unwrapped at any depth and every record is printed as JSON.
    /// Failed statements are reported on stderr.
    ///
    /// ## Examples:
    ///
    /// ```bash
    /// echo '[{"status":"OK","result":[{"name":"John"}]}]' | surrealtest decode
    /// ```
    Decode {
        /// Response document to read ('-' or nothing for stdin)
        input: Option<PathBuf>,

        /// Fail without printing any record if any statement failed
        #[arg(long)]
        strict: bool,

        /// Print one record per line instead of pretty JSON
        #[arg(long)]
        compact: bool,
    },

    /// Check that every statement of a query response succeeded
    ///
    /// Useful to validate the output of a schema or fixture script.
    Check {
        /// Response document to read ('-' or nothing for stdin)
        input: Option<PathBuf>,
    },
}

fn parse_status(value: &str) -> Result<String, String> {
    let value = value.trim();
    if value.is_empty() {
        return Err("The success status cannot be empty".to_string());
    }
    Ok(value.to_string())
}
