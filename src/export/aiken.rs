use crate::question::{Question, option_letter};

use super::text::{breaks_to_spaces, single_line};
use super::{ExamEncoder, ExportError};

/// Aiken single-line interchange.
///
/// ```text
/// What is X?
/// A) A1
/// B) A2
/// ANSWER: B
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct AikenEncoder;

impl ExamEncoder for AikenEncoder {
    fn encode_question(&self, position: usize, question: &Question) -> Result<String, ExportError> {
        question.check(position)?;
        let mut lines = Vec::with_capacity(question.options.len() + 2);
        lines.push(single_line(&question.question_text));
        for (idx, opt) in question.options.iter().enumerate() {
            lines.push(format!(
                "{}) {}",
                option_letter(idx),
                breaks_to_spaces(opt).trim()
            ));
        }
        lines.push(format!("ANSWER: {}", question.correct_letter()));
        Ok(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question::{QuestionError, sample};
    use pretty_assertions::assert_eq;

    #[test]
    fn encodes_reference_question() {
        let q = sample("What is X?", &["A1", "A2"], 1);
        assert_eq!(
            AikenEncoder.encode(&[q]).unwrap(),
            "What is X?\nA) A1\nB) A2\nANSWER: B"
        );
    }

    #[test]
    fn question_text_becomes_one_line() {
        let q = sample(" A 45-year-old man<br/>presents with\nchest pain.\n", &["a", "b"], 0);
        let out = AikenEncoder.encode_question(1, &q).unwrap();
        let first = out.lines().next().unwrap();
        assert_eq!(first, "A 45-year-old man presents with chest pain.");
        assert_eq!(out.lines().count(), 4);
    }

    #[test]
    fn option_markers_become_spaces_and_trim() {
        let q = sample("q", &["  left<br>right  ", "b"], 0);
        let out = AikenEncoder.encode_question(1, &q).unwrap();
        assert!(out.contains("\nA) left right\n"));
    }

    #[test]
    fn answer_line_tracks_each_index() {
        let opts = ["p", "q", "r", "s", "t"];
        for idx in 0..opts.len() {
            let out = AikenEncoder
                .encode_question(1, &sample("q", &opts, idx))
                .unwrap();
            let expected = format!("ANSWER: {}", option_letter(idx));
            assert_eq!(out.lines().last().unwrap(), expected);
            assert_eq!(out.matches("ANSWER:").count(), 1);
        }
    }

    #[test]
    fn joins_blocks_with_single_blank_line() {
        let qs = vec![sample("one", &["a", "b"], 0), sample("two", &["c", "d"], 1)];
        let out = AikenEncoder.encode(&qs).unwrap();
        assert_eq!(out, "one\nA) a\nB) b\nANSWER: A\n\ntwo\nA) c\nB) d\nANSWER: B");
        assert!(!out.ends_with('\n'));
    }

    #[test]
    fn refuses_more_options_than_letters() {
        let labels: Vec<String> = (0..27).map(|i| format!("opt{i}")).collect();
        let refs: Vec<&str> = labels.iter().map(String::as_str).collect();
        let err = AikenEncoder.encode(&[sample("q", &refs, 26)]).unwrap_err();
        assert!(matches!(
            err,
            ExportError::Invalid(QuestionError::TooManyOptions { len: 27, .. })
        ));
    }

    #[test]
    fn refuses_bad_index() {
        let err = AikenEncoder
            .encode(&[sample("q", &["a", "b"], 4)])
            .unwrap_err();
        assert!(matches!(err, ExportError::Invalid(_)));
    }
}
