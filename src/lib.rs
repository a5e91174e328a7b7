//! Medical MCQ generation and exam-interchange export.
//!
//! Questions come from a hosted model (see [`generator`]) or from a bank
//! file, and are written out as Aiken, Moodle GIFT, or a Word-readable HTML
//! answer key by the encoders in [`export`].

pub mod bank;
pub mod config;
pub mod export;
pub mod generator;
pub mod logging;
pub mod mcq;
pub mod prompt;
pub mod question;

pub use bank::{AuditEvent, BankHeader, QuestionBank, load_questions_json};
pub use config::Config;
pub use export::{
    AikenEncoder, ExamEncoder, ExportArtifact, ExportError, ExportFormat, GiftEncoder,
    WordEncoder,
};
pub use generator::{
    GeminiClient, GenerateError, GenerationOutcome, QuestionGenerator, ValidationResult,
    run_generation,
};
pub use mcq::{BloomLevel, MainTopic, McqConfig, OrganSystem, QuestionStyle, SubTopic};
pub use question::{GroundingSource, Question, QuestionError};
