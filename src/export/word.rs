use std::fmt::Write;

use chrono::NaiveDate;

use crate::question::{Question, check_all, option_letter};

use super::text::{html_escape, html_inline, html_multiline};
use super::{ExamEncoder, ExportError};

const DOCUMENT_HEAD: &str = r#"<html xmlns:o='urn:schemas-microsoft-com:office:office' xmlns:w='urn:schemas-microsoft-com:office:word'>
<head>
<meta charset="utf-8">
<title>MCQ Export</title>
<style>
  body { font-family: Calibri, Arial, sans-serif; line-height: 1.5; color: #1e293b; }
  .question-block { margin-bottom: 24px; page-break-inside: avoid; }
  .question-text { font-size: 1.1em; margin-bottom: 12px; }
  .options-list { list-style-type: none; padding-left: 0; }
  .options-list li { margin-bottom: 6px; padding-left: 12px; }
  .explanation { background-color: #f8fafc; padding: 12px; border-left: 4px solid #3b82f6; margin-top: 12px; }
  hr { border: 0; border-top: 1px solid #e2e8f0; margin: 24px 0; }
</style>
</head>
<body>
<h1 style="color: #1e40af; border-bottom: 2px solid #1e40af; padding-bottom: 8px;">Generated MCQs</h1>
"#;

const DOCUMENT_TAIL: &str = "</body>\n</html>\n";

/// Inline style of the correct option.
pub const CORRECT_STYLE: &str = "color: #166534; font-weight: bold;";

/// Suffix appended to the correct option.
pub const CORRECT_MARKER: &str = " (Correct)";

/// HTML answer key that word processors open directly as a `.doc`.
///
/// Always reveals the correct option: the output is an answer key, not a student sheet.
#[derive(Debug, Clone, Copy)]
pub struct WordEncoder {
    date: NaiveDate,
}

impl WordEncoder {
    pub fn new(date: NaiveDate) -> Self {
        Self { date }
    }
}

impl ExamEncoder for WordEncoder {
    fn encode_question(&self, position: usize, question: &Question) -> Result<String, ExportError> {
        question.check(position)?;
        let mut out = String::new();
        writeln!(&mut out, "<div class=\"question-block\">").ok();
        writeln!(
            &mut out,
            "  <p class=\"question-text\"><strong>Q{}. {}</strong></p>",
            position,
            html_multiline(&question.question_text)
        )
        .ok();
        writeln!(&mut out, "  <ul class=\"options-list\">").ok();
        for (idx, opt) in question.options.iter().enumerate() {
            let (style, marker) = if question.is_correct(idx) {
                (CORRECT_STYLE, CORRECT_MARKER)
            } else {
                ("", "")
            };
            writeln!(
                &mut out,
                "    <li style=\"{}\">{}. {}{}</li>",
                style,
                option_letter(idx),
                html_inline(opt),
                marker
            )
            .ok();
        }
        writeln!(&mut out, "  </ul>").ok();
        writeln!(&mut out, "  <div class=\"explanation\">").ok();
        writeln!(
            &mut out,
            "    <p><strong>Explanation:</strong> {}</p>",
            html_multiline(&question.explanation)
        )
        .ok();
        // Angoff is printed as stored; a 0.6 reads "0.6%".
        writeln!(
            &mut out,
            "    <p style=\"font-size: 0.85em; color: #666;\"><em>Topic: {} | Bloom: {} | Angoff: {}%</em></p>",
            html_escape(&question.topic_tag),
            html_escape(&question.bloom_level),
            question.predicted_angoff
        )
        .ok();
        writeln!(&mut out, "  </div>").ok();
        write!(&mut out, "</div>").ok();
        Ok(out)
    }

    fn encode(&self, questions: &[Question]) -> Result<String, ExportError> {
        check_all(questions)?;
        let mut doc = String::from(DOCUMENT_HEAD);
        writeln!(
            &mut doc,
            "<p><strong>Date:</strong> {}</p>",
            self.date.format("%Y-%m-%d")
        )
        .ok();
        // every block, the last one included, is followed by a rule
        for (idx, q) in questions.iter().enumerate() {
            doc.push_str(&self.encode_question(idx + 1, q)?);
            doc.push_str("\n<hr/>\n");
        }
        doc.push_str(DOCUMENT_TAIL);
        Ok(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question::sample;
    use pretty_assertions::assert_eq;

    fn encoder() -> WordEncoder {
        WordEncoder::new(NaiveDate::from_ymd_opt(2025, 3, 14).unwrap())
    }

    #[test]
    fn wraps_document_with_title_and_date() {
        let doc = encoder().encode(&[sample("q", &["a", "b"], 0)]).unwrap();
        assert!(doc.starts_with("<html xmlns:o='urn:schemas-microsoft-com:office:office'"));
        assert!(doc.contains("<title>MCQ Export</title>"));
        assert!(doc.contains("<style>"));
        assert!(doc.contains("<p><strong>Date:</strong> 2025-03-14</p>"));
        assert!(doc.trim_end().ends_with("</html>"));
    }

    #[test]
    fn exactly_one_correct_marker_per_question() {
        let opts = ["a", "b", "c", "d", "e"];
        for idx in 0..opts.len() {
            let block = encoder()
                .encode_question(1, &sample("q", &opts, idx))
                .unwrap();
            assert_eq!(block.matches(CORRECT_MARKER).count(), 1);
            assert_eq!(block.matches(CORRECT_STYLE).count(), 1);
            let expected = format!(
                "<li style=\"{}\">{}. {}{}</li>",
                CORRECT_STYLE,
                option_letter(idx),
                opts[idx],
                CORRECT_MARKER
            );
            assert!(block.contains(&expected), "missing {expected}");
        }
    }

    #[test]
    fn options_keep_source_order() {
        let block = encoder()
            .encode_question(1, &sample("q", &["first", "second", "third"], 2))
            .unwrap();
        let a = block.find("A. first").unwrap();
        let b = block.find("B. second").unwrap();
        let c = block.find("C. third (Correct)").unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn preserves_multi_line_question_and_explanation() {
        let mut q = sample("Vignette<br>Which drug?\nChoose one", &["a", "b"], 0);
        q.explanation = "Step one<BR/>Step two".to_string();
        let block = encoder().encode_question(4, &q).unwrap();
        assert!(block.contains("<strong>Q4. Vignette<br/>Which drug?<br/>Choose one</strong>"));
        assert!(block.contains("<strong>Explanation:</strong> Step one<br/>Step two</p>"));
    }

    #[test]
    fn metadata_emits_raw_angoff() {
        let mut q = sample("q", &["a", "b"], 0);
        q.predicted_angoff = 0.45;
        q.topic_tag = "Cardiology".to_string();
        let block = encoder().encode_question(1, &q).unwrap();
        assert!(block.contains("<em>Topic: Cardiology | Bloom: Applying | Angoff: 0.45%</em>"));
    }

    #[test]
    fn separates_questions_with_rules() {
        let qs = vec![sample("one", &["a", "b"], 0), sample("two", &["c", "d"], 1)];
        let doc = encoder().encode(&qs).unwrap();
        assert_eq!(doc.matches("<hr/>").count(), 2);
        assert_eq!(doc.matches("(Correct)").count(), 2);
        assert!(doc.find("Q1. one").unwrap() < doc.find("Q2. two").unwrap());
    }

    #[test]
    fn last_block_is_followed_by_rule() {
        let doc = encoder()
            .encode(&[sample("only", &["a", "b"], 1)])
            .unwrap();
        assert!(doc.ends_with("</div>\n<hr/>\n</body>\n</html>\n"));
    }

    #[test]
    fn empty_set_is_a_document_without_blocks() {
        let doc = encoder().encode(&[]).unwrap();
        assert!(!doc.contains("question-block\">"));
        assert!(doc.contains("Generated MCQs"));
    }

    #[test]
    fn refuses_malformed_question_anywhere_in_set() {
        let qs = vec![sample("ok", &["a", "b"], 0), sample("bad", &[], 0)];
        assert!(encoder().encode(&qs).is_err());
    }
}
