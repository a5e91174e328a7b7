//! Command-line interface wiring for the `medq` binary.
//!
//! This module owns the clap definitions and delegates execution to
//! specialized submodules that encapsulate each command family.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use medq::Config;

pub mod audit;
pub mod bank;
pub mod common;
pub mod export;
pub mod format;
pub mod generate;
pub mod utils;

/// Parsed CLI entrypoint for the `medq` binary.
#[derive(Parser, Debug)]
#[command(
    name = "medq",
    version,
    about = "Generate medical MCQs and export them as Aiken, GIFT or Word"
)]
pub struct Cli {
    /// Settings file (defaults to ./medq.toml when present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level regardless of the configured filter.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Top-level command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// High-level command families made available to end users.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Review parameters and generate questions into a bank file.
    Generate(generate::GenerateArgs),
    /// Encode a bank or JSON question file into an interchange format.
    Export(export::ExportArgs),
    #[command(subcommand)]
    Bank(bank::BankCommand),
    #[command(subcommand)]
    Format(format::FormatCommand),
    #[command(subcommand)]
    Audit(audit::AuditCommand),
}

/// Execute the requested command.
pub async fn run(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Command::Generate(args) => generate::handle(args, &config).await,
        Command::Export(args) => export::handle(args, &config),
        Command::Bank(cmd) => bank::handle(cmd),
        Command::Format(cmd) => format::handle(cmd),
        Command::Audit(cmd) => audit::handle(cmd),
    }
}
