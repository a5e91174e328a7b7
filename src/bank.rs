//! Question bank file: one JSON header line, then one line per question.

use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::mcq::McqConfig;
use crate::question::Question;

const BANK_VERSION: u8 = 1;

/// Bank-level metadata stored as the first record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BankHeader {
    pub version: u8,
    pub created_at: DateTime<Utc>,
    /// Parameters the questions were generated from, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<McqConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default)]
    pub history: Vec<AuditEvent>,
}

impl BankHeader {
    pub fn new(config: Option<McqConfig>, model: Option<String>) -> Self {
        Self {
            version: BANK_VERSION,
            created_at: Utc::now(),
            config,
            model,
            history: Vec::new(),
        }
    }
}

/// Describes how the bank has changed over time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuditEvent {
    pub timestamp: DateTime<Utc>,
    pub actor: String,
    pub action: String,
}

impl AuditEvent {
    /// Create an audit entry using the OS user (if available).
    pub fn new<S: Into<String>>(action: S) -> Self {
        let actor = std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .unwrap_or_else(|_| "unknown".to_string());
        Self {
            timestamp: Utc::now(),
            actor,
            action: action.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum BankLine {
    Header(BankHeader),
    Question(Question),
}

/// Raw model output: either a bare array or `{"questions": [...]}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum QuestionList {
    Bare(Vec<Question>),
    Wrapped { questions: Vec<Question> },
}

/// In-memory representation of a bank file.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    pub header: BankHeader,
    pub questions: Vec<Question>,
    pub path: Option<PathBuf>,
}

impl QuestionBank {
    pub fn new(header: BankHeader) -> Self {
        Self {
            header,
            questions: Vec::new(),
            path: None,
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .open(path)
            .with_context(|| format!("failed to open bank file {}", path.display()))?;
        let mut lines = BufReader::new(file).lines();
        let header_line = lines
            .next()
            .ok_or_else(|| anyhow!("bank file {} is empty", path.display()))??;
        let header = match serde_json::from_str::<BankLine>(&header_line)
            .with_context(|| format!("failed to parse bank header in {}", path.display()))?
        {
            BankLine::Header(header) => header,
            BankLine::Question(_) => return Err(anyhow!("expected bank header as first line")),
        };

        let mut questions = Vec::new();
        for (idx, raw) in lines.enumerate() {
            let raw = raw?;
            if raw.trim().is_empty() {
                continue;
            }
            let line: BankLine = serde_json::from_str(&raw).with_context(|| {
                format!(
                    "failed to parse question record at line {} in {}",
                    idx + 2,
                    path.display()
                )
            })?;
            match line {
                BankLine::Header(_) => {
                    return Err(anyhow!(
                        "multiple bank headers found in {} at line {}",
                        path.display(),
                        idx + 2
                    ));
                }
                BankLine::Question(q) => questions.push(q),
            }
        }

        Ok(Self {
            header,
            questions,
            path: Some(path.to_path_buf()),
        })
    }

    pub fn save(&mut self, path: &Path) -> Result<()> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .with_context(|| format!("failed to write bank file {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, &BankLine::Header(self.header.clone()))
            .context("failed to serialize bank header")?;
        writer.write_all(b"\n")?;
        for q in &self.questions {
            serde_json::to_writer(&mut writer, &BankLine::Question(q.clone()))
                .context("failed to serialize question")?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    /// Append a question after checking the encoder preconditions.
    pub fn push(&mut self, question: Question) -> Result<()> {
        question.check(self.questions.len() + 1)?;
        self.questions.push(question);
        Ok(())
    }

    pub fn extend<I: IntoIterator<Item = Question>>(&mut self, questions: I) -> Result<()> {
        for q in questions {
            self.push(q)?;
        }
        Ok(())
    }

    /// Append questions and history from another bank.
    pub fn merge_from(&mut self, other: &QuestionBank) -> Result<()> {
        self.extend(other.questions.iter().cloned())?;
        self.header.history.extend_from_slice(&other.header.history);
        Ok(())
    }

    /// Construct a new bank from zero-based question indices.
    pub fn slice_indices(&self, indices: &[usize]) -> Result<Self> {
        let mut new = Self::new(self.header.clone());
        for &idx in indices {
            let q = self.questions.get(idx).ok_or_else(|| {
                anyhow!(
                    "question index {} out of range 0..{}",
                    idx,
                    self.questions.len().saturating_sub(1)
                )
            })?;
            new.questions.push(q.clone());
        }
        Ok(new)
    }

    /// SHA-256 over the serialized header and question records.
    pub fn hash(&self) -> Result<String> {
        let mut hasher = Sha256::new();
        let mut buffer = Vec::new();
        serde_json::to_writer(&mut buffer, &BankLine::Header(self.header.clone()))
            .context("failed to hash bank header")?;
        hasher.update(&buffer);
        for q in &self.questions {
            buffer.clear();
            serde_json::to_writer(&mut buffer, &BankLine::Question(q.clone()))?;
            hasher.update(&buffer);
        }
        Ok(format!("{:x}", hasher.finalize()))
    }

    pub fn log_action<S: Into<String>>(&mut self, action: S) {
        self.header.history.push(AuditEvent::new(action));
    }
}

/// Read questions from a plain JSON file holding the model's raw output.
pub fn load_questions_json(path: &Path) -> Result<Vec<Question>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_questions_json(&raw).with_context(|| format!("failed to parse questions in {}", path.display()))
}

pub fn parse_questions_json(raw: &str) -> Result<Vec<Question>> {
    let list: QuestionList = serde_json::from_str(raw)?;
    Ok(match list {
        QuestionList::Bare(qs) => qs,
        QuestionList::Wrapped { questions } => questions,
    })
}
