//! Shared clap helper types for CLI commands.

use clap::ValueEnum;
use medq::{BloomLevel, ExportFormat, QuestionStyle};

/// Export formats accepted on the command line.
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum FormatArg {
    Word,
    Aiken,
    Gift,
}

impl From<FormatArg> for ExportFormat {
    fn from(value: FormatArg) -> ExportFormat {
        match value {
            FormatArg::Word => ExportFormat::Word,
            FormatArg::Aiken => ExportFormat::Aiken,
            FormatArg::Gift => ExportFormat::Gift,
        }
    }
}

/// Bloom level selector.
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum BloomArg {
    Remembering,
    Understanding,
    Applying,
    Analyzing,
    Evaluating,
    Creating,
}

impl From<BloomArg> for BloomLevel {
    fn from(value: BloomArg) -> BloomLevel {
        match value {
            BloomArg::Remembering => BloomLevel::Remembering,
            BloomArg::Understanding => BloomLevel::Understanding,
            BloomArg::Applying => BloomLevel::Applying,
            BloomArg::Analyzing => BloomLevel::Analyzing,
            BloomArg::Evaluating => BloomLevel::Evaluating,
            BloomArg::Creating => BloomLevel::Creating,
        }
    }
}

/// Stem length preference.
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum StyleArg {
    Concise,
    Detailed,
}

impl From<StyleArg> for QuestionStyle {
    fn from(value: StyleArg) -> QuestionStyle {
        match value {
            StyleArg::Concise => QuestionStyle::Concise,
            StyleArg::Detailed => QuestionStyle::Detailed,
        }
    }
}
