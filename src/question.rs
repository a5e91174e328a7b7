use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound on grounding citations attached to a single question.
pub const MAX_SOURCES: usize = 5;

/// Options beyond `Z` have no letter.
pub const MAX_OPTIONS: usize = 26;

/// Citation returned by a live-search grounded generation call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroundingSource {
    pub uri: String,
    pub title: String,
}

/// A generated multiple-choice question.
///
/// Field names follow the camelCase shape the model is asked to produce, so
/// the raw JSON output deserializes without any mapping layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub question_text: String,
    pub options: Vec<String>,
    pub correct_answer_index: usize,
    pub explanation: String,
    pub predicted_angoff: f64,
    pub bloom_level: String,
    pub topic_tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<GroundingSource>>,
}

/// Precondition violations found in a [`Question`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuestionError {
    #[error("question {position} has no options")]
    NoOptions { position: usize },
    #[error("question {position} has {len} options; at most 26 can be lettered")]
    TooManyOptions { position: usize, len: usize },
    #[error(
        "question {position}: correct answer index {index} is out of range for {len} option(s)"
    )]
    AnswerOutOfRange {
        position: usize,
        index: usize,
        len: usize,
    },
}

impl Question {
    /// Check the encoder preconditions. `position` is 1-based and only used for reporting.
    pub fn check(&self, position: usize) -> Result<(), QuestionError> {
        if self.options.is_empty() {
            return Err(QuestionError::NoOptions { position });
        }
        if self.options.len() > MAX_OPTIONS {
            return Err(QuestionError::TooManyOptions {
                position,
                len: self.options.len(),
            });
        }
        if self.correct_answer_index >= self.options.len() {
            return Err(QuestionError::AnswerOutOfRange {
                position,
                index: self.correct_answer_index,
                len: self.options.len(),
            });
        }
        Ok(())
    }

    /// Display letter of the correct option.
    pub fn correct_letter(&self) -> char {
        option_letter(self.correct_answer_index)
    }

    pub fn is_correct(&self, index: usize) -> bool {
        index == self.correct_answer_index
    }

    pub fn has_sources(&self) -> bool {
        self.sources.as_ref().is_some_and(|s| !s.is_empty())
    }
}

/// Letter shown for the option at zero-based `index` (`A` to `Z`).
///
/// Indices past `Z` map to `?`; [`Question::check`] rejects such questions
/// before any encoder asks for a letter.
pub fn option_letter(index: usize) -> char {
    (b'A'..=b'Z').nth(index).map(char::from).unwrap_or('?')
}

/// Check a whole question set, stopping at the first violation.
pub fn check_all(questions: &[Question]) -> Result<(), QuestionError> {
    questions
        .iter()
        .enumerate()
        .try_for_each(|(idx, q)| q.check(idx + 1))
}

#[cfg(test)]
pub(crate) fn sample(text: &str, options: &[&str], correct: usize) -> Question {
    Question {
        question_text: text.to_string(),
        options: options.iter().map(|o| o.to_string()).collect(),
        correct_answer_index: correct,
        explanation: String::new(),
        predicted_angoff: 0.6,
        bloom_level: "Applying".to_string(),
        topic_tag: "Anatomy".to_string(),
        sources: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn letters_follow_option_position() {
        assert_eq!(option_letter(0), 'A');
        assert_eq!(option_letter(4), 'E');
        assert_eq!(sample("q", &["a", "b", "c"], 2).correct_letter(), 'C');
    }

    #[test]
    fn rejects_out_of_range_answer() {
        let q = sample("q", &["a", "b"], 2);
        assert_eq!(
            q.check(3),
            Err(QuestionError::AnswerOutOfRange {
                position: 3,
                index: 2,
                len: 2
            })
        );
    }

    #[test]
    fn letters_stop_at_z() {
        assert_eq!(option_letter(25), 'Z');
        assert_ne!(option_letter(26), 'A');
    }

    #[test]
    fn rejects_options_past_z() {
        let labels: Vec<String> = (0..27).map(|i| format!("opt{i}")).collect();
        let refs: Vec<&str> = labels.iter().map(String::as_str).collect();
        assert_eq!(sample("q", &refs[..26], 25).check(1), Ok(()));
        assert_eq!(
            sample("q", &refs, 26).check(4),
            Err(QuestionError::TooManyOptions { position: 4, len: 27 })
        );
    }

    #[test]
    fn rejects_empty_options() {
        let q = sample("q", &[], 0);
        assert_eq!(q.check(1), Err(QuestionError::NoOptions { position: 1 }));
    }

    #[test]
    fn check_all_reports_first_bad_position() {
        let qs = vec![sample("ok", &["a", "b"], 1), sample("bad", &["a"], 5)];
        let err = check_all(&qs).unwrap_err();
        assert!(err.to_string().starts_with("question 2:"));
    }

    #[test]
    fn deserializes_model_shape() {
        let raw = r#"{
            "questionText": "What is X?",
            "options": ["A1", "A2", "A3", "A4"],
            "correctAnswerIndex": 1,
            "explanation": "because",
            "predictedAngoff": 0.55,
            "bloomLevel": "Applying",
            "topicTag": "Cardiology"
        }"#;
        let q: Question = serde_json::from_str(raw).unwrap();
        assert_eq!(q.correct_answer_index, 1);
        assert_eq!(q.sources, None);
        let back = serde_json::to_value(&q).unwrap();
        assert!(back.get("sources").is_none());
        assert_eq!(back["topicTag"], "Cardiology");
    }
}
