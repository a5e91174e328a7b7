use crate::question::Question;

use super::text::gift_escape;
use super::{ExamEncoder, ExportError};

/// Moodle GIFT with general feedback.
///
/// Correctness is carried by the `=`/`~` prefix, not by option order.
#[derive(Debug, Default, Clone, Copy)]
pub struct GiftEncoder;

impl ExamEncoder for GiftEncoder {
    fn encode_question(&self, position: usize, question: &Question) -> Result<String, ExportError> {
        question.check(position)?;
        let mut out = format!(
            "::Q{} {}:: {} {{",
            position,
            question.topic_tag,
            gift_escape(&question.question_text)
        );
        for (idx, opt) in question.options.iter().enumerate() {
            let prefix = if question.is_correct(idx) { '=' } else { '~' };
            out.push_str(&format!("\n\t{}{}", prefix, gift_escape(opt)));
        }
        if !question.explanation.is_empty() {
            out.push_str(&format!("\n\t#### {}", gift_escape(&question.explanation)));
        }
        out.push_str("\n}");
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question::sample;
    use pretty_assertions::assert_eq;

    fn with_topic(mut q: Question, topic: &str, explanation: &str) -> Question {
        q.topic_tag = topic.to_string();
        q.explanation = explanation.to_string();
        q
    }

    #[test]
    fn encodes_reference_question() {
        let q = with_topic(sample("Define Y", &["p", "q"], 0), "Bio", "because");
        assert_eq!(
            GiftEncoder.encode(&[q]).unwrap(),
            "::Q1 Bio:: Define Y {\n\t=p\n\t~q\n\t#### because\n}"
        );
    }

    #[test]
    fn omits_feedback_when_explanation_empty() {
        let q = with_topic(sample("Define Y", &["p", "q"], 1), "Bio", "");
        assert_eq!(
            GiftEncoder.encode_question(1, &q).unwrap(),
            "::Q1 Bio:: Define Y {\n\t~p\n\t=q\n}"
        );
    }

    #[test]
    fn escapes_every_free_text_field() {
        let q = with_topic(
            sample("Ratio 1:2 = {x}?", &["a~b", "#c"], 0),
            "Phys",
            "see: #4",
        );
        let out = GiftEncoder.encode_question(1, &q).unwrap();
        assert_eq!(
            out,
            "::Q1 Phys:: Ratio 1\\:2 \\= \\{x\\}? {\n\t=a\\~b\n\t~\\#c\n\t#### see\\: \\#4\n}"
        );
    }

    #[test]
    fn exactly_one_option_marked_correct() {
        let opts = ["v", "w", "x", "y"];
        for idx in 0..opts.len() {
            let out = GiftEncoder
                .encode_question(1, &sample("q", &opts, idx))
                .unwrap();
            let marked: Vec<&str> = out.lines().filter(|l| l.starts_with("\t=")).collect();
            assert_eq!(marked, vec![format!("\t={}", opts[idx]).as_str()]);
        }
    }

    #[test]
    fn numbers_blocks_from_one_and_separates_with_blank_line() {
        let qs = vec![sample("one", &["a", "b"], 0), sample("two", &["c", "d"], 1)];
        let out = GiftEncoder.encode(&qs).unwrap();
        assert!(out.starts_with("::Q1 Anatomy:: one {"));
        assert!(out.contains("}\n\n::Q2 Anatomy:: two {"));
        assert_eq!(out.matches("\n\n").count(), 1);
        assert!(out.ends_with('}'));
    }

    #[test]
    fn multi_line_text_survives_as_newlines() {
        let q = sample("line one<br/>line two", &["a", "b"], 0);
        let out = GiftEncoder.encode_question(1, &q).unwrap();
        assert!(out.starts_with("::Q1 Anatomy:: line one\nline two {"));
    }
}
