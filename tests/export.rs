use chrono::NaiveDate;
use medq::{
    AikenEncoder, BankHeader, ExamEncoder, ExportError, ExportFormat, GiftEncoder, Question,
    QuestionBank, WordEncoder,
};
use pretty_assertions::assert_eq;

fn question(text: &str, topic: &str, options: &[&str], correct: usize, explanation: &str) -> Question {
    Question {
        question_text: text.to_string(),
        options: options.iter().map(|o| o.to_string()).collect(),
        correct_answer_index: correct,
        explanation: explanation.to_string(),
        predicted_angoff: 0.5,
        bloom_level: "Applying".to_string(),
        topic_tag: topic.to_string(),
        sources: None,
    }
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
}

#[test]
fn aiken_reference_example() {
    let q = question("What is X?", "Any", &["A1", "A2"], 1, "");
    assert_eq!(
        AikenEncoder.encode(&[q]).unwrap(),
        "What is X?\nA) A1\nB) A2\nANSWER: B"
    );
}

#[test]
fn gift_reference_example() {
    let q = question("Define Y", "Bio", &["p", "q"], 0, "because");
    assert_eq!(
        GiftEncoder.encode(&[q]).unwrap(),
        "::Q1 Bio:: Define Y {\n\t=p\n\t~q\n\t#### because\n}"
    );
}

#[test]
fn blocks_are_separated_by_one_blank_line() {
    let questions = vec![
        question("First?", "T", &["a", "b"], 0, ""),
        question("Second?", "T", &["c", "d"], 1, ""),
    ];
    let aiken = AikenEncoder.encode(&questions).unwrap();
    assert_eq!(
        aiken,
        "First?\nA) a\nB) b\nANSWER: A\n\nSecond?\nA) c\nB) d\nANSWER: B"
    );

    let gift = GiftEncoder.encode(&questions).unwrap();
    assert_eq!(gift.matches("\n\n").count(), 1);
    assert!(gift.contains("::Q2 T:: Second? {"));
    assert!(!gift.ends_with('\n'));
}

#[test]
fn legacy_break_markup_never_splits_an_aiken_stem() {
    let q = question("Line one<br>line two<BR />three", "T", &["x", "y"], 0, "");
    let out = AikenEncoder.encode(&[q]).unwrap();
    assert_eq!(out.lines().next(), Some("Line one line two three"));
}

#[test]
fn gift_escapes_reserved_characters_once() {
    let q = question("ratio 1:2 {approx} ~ = #", "T", &["a=b", "c"], 1, "x:y");
    let out = GiftEncoder.encode(&[q]).unwrap();
    assert!(out.contains(r"ratio 1\:2 \{approx\} \~ \= \#"));
    assert!(out.contains("\t~a\\=b"));
    assert!(out.contains("\t#### x\\:y"));
}

#[test]
fn word_marks_only_the_correct_option() {
    let q = question("Pick", "T", &["one", "two", "three", "four"], 2, "why");
    let out = WordEncoder::new(date()).encode(&[q]).unwrap();
    assert_eq!(out.matches("(Correct)").count(), 1);
    let marked = out
        .lines()
        .find(|line| line.contains("(Correct)"))
        .unwrap();
    assert!(marked.contains("C. three"));
    assert!(out.contains("2025-03-14"));
}

#[test]
fn malformed_questions_are_refused_by_every_format() {
    let bad = question("Broken", "T", &["a", "b"], 2, "");
    for format in ExportFormat::ALL {
        let err = format.encode(std::slice::from_ref(&bad), date()).unwrap_err();
        assert!(matches!(err, ExportError::Invalid(_)), "{format}: {err}");
    }
    let empty = question("No options", "T", &[], 0, "");
    assert!(AikenEncoder.encode(&[empty]).is_err());
}

#[test]
fn bank_round_trip_then_export() {
    let path = std::env::temp_dir().join(format!("medq-it-{}.jsonl", std::process::id()));
    let mut bank = QuestionBank::new(BankHeader::new(None, Some("stub-model".to_string())));
    bank.push(question("Define Y", "Bio", &["p", "q"], 0, "because"))
        .unwrap();
    bank.save(&path).unwrap();

    let loaded = QuestionBank::load(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(loaded.header.model.as_deref(), Some("stub-model"));

    let artifact = ExportFormat::Gift
        .artifact(&loaded.questions, "Quiz", date())
        .unwrap();
    assert_eq!(artifact.filename, "Quiz_2025-03-14_GIFT.txt");
    assert_eq!(
        artifact.content,
        "::Q1 Bio:: Define Y {\n\t=p\n\t~q\n\t#### because\n}"
    );
}
