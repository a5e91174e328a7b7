//! Audit and hashing commands (`medq audit ...`).

use std::path::PathBuf;

use crate::cli::utils::load_bank;
use anyhow::Result;
use clap::{Args, Subcommand};

/// Audit subcommands.
#[derive(Subcommand, Debug)]
pub enum AuditCommand {
    /// Compute SHA-256 hash over bank content.
    Hash(AuditHashArgs),
    /// Show recorded history events.
    Log(AuditLogArgs),
}

/// Arguments for `medq audit hash`.
#[derive(Args, Debug)]
pub struct AuditHashArgs {
    /// Bank file to hash.
    pub bank: PathBuf,
}

/// Arguments for `medq audit log`.
#[derive(Args, Debug)]
pub struct AuditLogArgs {
    /// Bank file to inspect.
    pub bank: PathBuf,
}

/// Execute an audit command.
pub fn handle(command: AuditCommand) -> Result<()> {
    match command {
        AuditCommand::Hash(args) => hash(args),
        AuditCommand::Log(args) => log(args),
    }
}

fn hash(args: AuditHashArgs) -> Result<()> {
    let bank = load_bank(&args.bank)?;
    println!("{}", bank.hash()?);
    Ok(())
}

fn log(args: AuditLogArgs) -> Result<()> {
    let bank = load_bank(&args.bank)?;
    if bank.header.history.is_empty() {
        println!("No audit events recorded.");
        return Ok(());
    }
    for event in &bank.header.history {
        println!(
            "{} {} - {}",
            event.timestamp.format("%Y-%m-%d %H:%M:%S"),
            event.actor,
            event.action
        );
    }
    Ok(())
}
