//! Exam-interchange encoders (Aiken, GIFT, Word HTML) and download artifacts.

mod aiken;
mod gift;
pub mod text;
mod word;

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::question::{Question, QuestionError};

pub use aiken::AikenEncoder;
pub use gift::GiftEncoder;
pub use word::{CORRECT_MARKER, CORRECT_STYLE, WordEncoder};

/// Filename prefix used when the caller does not pick one.
pub const DEFAULT_PREFIX: &str = "MedQ_Export";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Invalid(#[from] QuestionError),
    #[error("nothing to export: the question set is empty")]
    Empty,
    #[error("unknown export format '{0}' (expected word, aiken or gift)")]
    UnknownFormat(String),
}

/// A pure `questions -> text` encoder.
pub trait ExamEncoder {
    /// Encode one question. `position` is the 1-based place in the set.
    fn encode_question(&self, position: usize, question: &Question) -> Result<String, ExportError>;

    /// Encode a whole set: blocks separated by one blank line, no trailing separator.
    fn encode(&self, questions: &[Question]) -> Result<String, ExportError> {
        let blocks = questions
            .iter()
            .enumerate()
            .map(|(idx, q)| self.encode_question(idx + 1, q))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(blocks.join("\n\n"))
    }
}

/// Target interchange format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Word,
    Aiken,
    Gift,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Word, ExportFormat::Aiken, ExportFormat::Gift];

    pub fn name(&self) -> &'static str {
        match self {
            ExportFormat::Word => "word",
            ExportFormat::Aiken => "aiken",
            ExportFormat::Gift => "gift",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ExportFormat::Word => "Word document (.doc): HTML answer key with highlighted answers.",
            ExportFormat::Aiken => "Aiken format (.txt): one-line questions with an ANSWER line.",
            ExportFormat::Gift => "Moodle GIFT (.txt): escaped blocks with general feedback.",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Word => "doc",
            ExportFormat::Aiken | ExportFormat::Gift => "txt",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Word => "application/msword",
            ExportFormat::Aiken | ExportFormat::Gift => "text/plain",
        }
    }

    /// Suffix inserted between the date and the extension, if any.
    pub fn file_suffix(&self) -> Option<&'static str> {
        match self {
            ExportFormat::Word => None,
            ExportFormat::Aiken => Some("Aiken"),
            ExportFormat::Gift => Some("GIFT"),
        }
    }

    /// `<prefix>_<YYYY-MM-DD>[_<suffix>].<ext>`
    pub fn filename(&self, prefix: &str, date: NaiveDate) -> String {
        let mut name = format!("{}_{}", prefix, date.format("%Y-%m-%d"));
        if let Some(suffix) = self.file_suffix() {
            name.push('_');
            name.push_str(suffix);
        }
        name.push('.');
        name.push_str(self.extension());
        name
    }

    /// Encode with the matching encoder; `date` stamps the Word document.
    pub fn encode(&self, questions: &[Question], date: NaiveDate) -> Result<String, ExportError> {
        match self {
            ExportFormat::Word => WordEncoder::new(date).encode(questions),
            ExportFormat::Aiken => AikenEncoder.encode(questions),
            ExportFormat::Gift => GiftEncoder.encode(questions),
        }
    }

    /// Build the downloadable artifact. An empty set is refused.
    pub fn artifact(
        &self,
        questions: &[Question],
        prefix: &str,
        date: NaiveDate,
    ) -> Result<ExportArtifact, ExportError> {
        if questions.is_empty() {
            return Err(ExportError::Empty);
        }
        Ok(ExportArtifact {
            content: self.encode(questions, date)?,
            filename: self.filename(prefix, date),
            mime_type: self.mime_type(),
        })
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "word" | "doc" | "docx" => Ok(ExportFormat::Word),
            "aiken" => Ok(ExportFormat::Aiken),
            "gift" | "moodle" => Ok(ExportFormat::Gift),
            _ => Err(ExportError::UnknownFormat(s.to_string())),
        }
    }
}

/// Encoded text plus the suggested filename and MIME type for saving it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub content: String,
    pub filename: String,
    pub mime_type: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question::sample;
    use pretty_assertions::assert_eq;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 9).unwrap()
    }

    #[test]
    fn filenames_follow_prefix_date_suffix_pattern() {
        assert_eq!(
            ExportFormat::Word.filename(DEFAULT_PREFIX, date()),
            "MedQ_Export_2025-01-09.doc"
        );
        assert_eq!(
            ExportFormat::Aiken.filename(DEFAULT_PREFIX, date()),
            "MedQ_Export_2025-01-09_Aiken.txt"
        );
        assert_eq!(
            ExportFormat::Gift.filename("Cardio", date()),
            "Cardio_2025-01-09_GIFT.txt"
        );
    }

    #[test]
    fn artifact_carries_mime_type() {
        let qs = vec![sample("q", &["a", "b"], 0)];
        let word = ExportFormat::Word.artifact(&qs, DEFAULT_PREFIX, date()).unwrap();
        assert_eq!(word.mime_type, "application/msword");
        let gift = ExportFormat::Gift.artifact(&qs, DEFAULT_PREFIX, date()).unwrap();
        assert_eq!(gift.mime_type, "text/plain");
        assert_eq!(gift.content, GiftEncoder.encode(&qs).unwrap());
    }

    #[test]
    fn artifact_refuses_empty_set() {
        let err = ExportFormat::Aiken
            .artifact(&[], DEFAULT_PREFIX, date())
            .unwrap_err();
        assert!(matches!(err, ExportError::Empty));
    }

    #[test]
    fn encode_of_empty_set_is_empty_text() {
        assert_eq!(ExportFormat::Aiken.encode(&[], date()).unwrap(), "");
        assert_eq!(ExportFormat::Gift.encode(&[], date()).unwrap(), "");
    }

    #[test]
    fn parses_names_and_aliases() {
        assert_eq!("GIFT".parse::<ExportFormat>().unwrap(), ExportFormat::Gift);
        assert_eq!("docx".parse::<ExportFormat>().unwrap(), ExportFormat::Word);
        assert!("qti".parse::<ExportFormat>().is_err());
        for format in ExportFormat::ALL {
            assert_eq!(format.name().parse::<ExportFormat>().unwrap(), format);
        }
    }

    #[test]
    fn every_format_identifies_only_the_correct_option() {
        let opts = ["alpha", "beta", "gamma", "delta"];
        for idx in 0..opts.len() {
            let qs = vec![sample("q", &opts, idx)];
            let aiken = ExportFormat::Aiken.encode(&qs, date()).unwrap();
            assert!(aiken.ends_with(&format!("ANSWER: {}", (b'A' + idx as u8) as char)));
            let gift = ExportFormat::Gift.encode(&qs, date()).unwrap();
            assert_eq!(gift.matches("\t=").count(), 1);
            assert!(gift.contains(&format!("\t={}", opts[idx])));
            let word = ExportFormat::Word.encode(&qs, date()).unwrap();
            assert!(word.contains(&format!("{}{}</li>", opts[idx], CORRECT_MARKER)));
            assert_eq!(word.matches(CORRECT_MARKER).count(), 1);
        }
    }
}
