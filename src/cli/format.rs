//! Export format discovery (`medq format ...`).

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use medq::export::DEFAULT_PREFIX;
use medq::{ExportFormat, Question};

/// Format subcommands.
#[derive(Subcommand, Debug)]
pub enum FormatCommand {
    /// List all export formats.
    List,
    /// Show details for one format, with a rendered sample.
    Show(FormatShowArgs),
}

/// Arguments for `medq format show`.
#[derive(Args, Debug)]
pub struct FormatShowArgs {
    /// Format name (word, aiken, gift; doc and moodle are accepted too).
    pub name: String,
    /// Skip the rendered sample question.
    #[arg(long)]
    pub no_sample: bool,
}

/// Execute a format command.
pub fn handle(command: FormatCommand) -> Result<()> {
    match command {
        FormatCommand::List => list(),
        FormatCommand::Show(args) => show(args),
    }
}

fn list() -> Result<()> {
    println!("Available formats:");
    for format in ExportFormat::ALL {
        println!(
            "  - {:<6} .{:<4} {}",
            format.name(),
            format.extension(),
            format.description()
        );
    }
    Ok(())
}

fn show(args: FormatShowArgs) -> Result<()> {
    let format: ExportFormat = args.name.parse()?;
    let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default();
    println!("Format: {}", format);
    println!("{}", format.description());
    println!("MIME type: {}", format.mime_type());
    println!("Example filename: {}", format.filename(DEFAULT_PREFIX, date));
    if !args.no_sample {
        println!();
        println!("{}", format.encode(&[sample_question()], date)?);
    }
    Ok(())
}

fn sample_question() -> Question {
    Question {
        question_text: "Which chamber of the heart receives oxygenated blood from the lungs?"
            .to_string(),
        options: vec![
            "Right atrium".to_string(),
            "Left atrium".to_string(),
            "Right ventricle".to_string(),
            "Left ventricle".to_string(),
        ],
        correct_answer_index: 1,
        explanation: "The pulmonary veins drain into the left atrium.".to_string(),
        predicted_angoff: 0.8,
        bloom_level: "Remembering".to_string(),
        topic_tag: "Anatomy".to_string(),
        sources: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_encodes_in_every_format() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        for format in ExportFormat::ALL {
            let out = format.encode(&[sample_question()], date).unwrap();
            assert!(out.contains("Left atrium"), "{format} output lacks the answer");
        }
    }
}
