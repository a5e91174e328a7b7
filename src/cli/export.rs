//! Interchange export (`medq export ...`).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Args;
use medq::{Config, ExportFormat};
use tracing::info;

use crate::cli::common::FormatArg;
use crate::cli::utils::{load_questions, parse_date, write_output};

/// Arguments for `medq export`.
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Bank file, or a `.json` file holding raw model output.
    pub source: PathBuf,
    /// Target interchange format.
    #[arg(short = 'f', long, default_value_t = FormatArg::Word, value_enum)]
    pub format: FormatArg,
    /// Output file, directory, or `-` for stdout (default: suggested name in the current directory).
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Filename prefix (overrides the configured one).
    #[arg(long)]
    pub prefix: Option<String>,
    /// Date used in the filename and the Word header (YYYY-MM-DD, default today).
    #[arg(long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,
}

/// Execute an export command.
pub fn handle(args: ExportArgs, config: &Config) -> Result<()> {
    let questions = load_questions(&args.source)?;
    let format: ExportFormat = args.format.into();
    let date = args.date.unwrap_or_else(|| Local::now().date_naive());
    let prefix = args.prefix.as_deref().unwrap_or(config.export_prefix.as_str());

    let artifact = format
        .artifact(&questions, prefix, date)
        .with_context(|| format!("failed to export {}", args.source.display()))?;
    info!(
        format = %format,
        questions = questions.len(),
        mime = artifact.mime_type,
        "encoded questions"
    );

    let target = resolve_target(args.output.as_deref(), &artifact.filename);
    write_output(&target, &artifact.content)?;
    if target.as_os_str() != "-" {
        println!(
            "Exported {} question(s) as {} -> {} ({})",
            questions.len(),
            format,
            target.display(),
            artifact.mime_type
        );
    }
    Ok(())
}

/// A directory (or no path) receives the suggested filename; anything else is used as is.
fn resolve_target(output: Option<&Path>, suggested: &str) -> PathBuf {
    match output {
        None => PathBuf::from(suggested),
        Some(path) if path.is_dir() => path.join(suggested),
        Some(path) => path.to_path_buf(),
    }
}
