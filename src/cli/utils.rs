//! Convenience helpers shared across command handlers.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use chrono::NaiveDate;
use medq::{Question, QuestionBank, load_questions_json};

/// Persist a string either to a file or stdout when `-` is provided.
pub fn write_output(path: &Path, content: &str) -> Result<()> {
    if path.as_os_str() == "-" {
        io::stdout().write_all(content.as_bytes())?;
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create output directory {}", parent.display())
            })?;
        }
    }
    fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}

/// Load a bank file, attaching path context to any error.
pub fn load_bank(path: &Path) -> Result<QuestionBank> {
    QuestionBank::load(path).with_context(|| format!("failed to read bank {}", path.display()))
}

/// Load questions from a bank file, or from raw model JSON when the extension is `.json`.
pub fn load_questions(path: &Path) -> Result<Vec<Question>> {
    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if is_json {
        load_questions_json(path)
    } else {
        Ok(load_bank(path)?.questions)
    }
}

/// Clap-friendly `YYYY-MM-DD` parser.
pub fn parse_date(input: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| format!("'{}' is not a YYYY-MM-DD date", input))
}

/// Resolve a selection such as `1..3,5,4..$` over 1-based question numbers
/// into zero-based indices, in first-mention order with repeats dropped.
///
/// Every number is checked against `len` before a range is walked, so the
/// work is bounded by the bank size whatever the expression says.
pub fn parse_range_expression(expr: &str, len: usize) -> Result<Vec<usize>> {
    if expr.trim().is_empty() {
        bail!("range expression cannot be empty");
    }
    if len == 0 {
        bail!("bank has no questions to select");
    }
    let mut picked = vec![false; len];
    let mut selection = Vec::new();
    for part in expr.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (first, last) = match part.split_once("..") {
            Some((from, to)) => (question_number(from, len)?, question_number(to, len)?),
            None => {
                let number = question_number(part, len)?;
                (number, number)
            }
        };
        if first > last {
            bail!("range {}..{} runs backwards", first, last);
        }
        for idx in first - 1..last {
            if !picked[idx] {
                picked[idx] = true;
                selection.push(idx);
            }
        }
    }
    if selection.is_empty() {
        bail!("no questions selected by '{}'", expr);
    }
    Ok(selection)
}

/// One bound of a selection: a 1-based question number or `$` for the last one.
fn question_number(token: &str, len: usize) -> Result<usize> {
    let token = token.trim();
    let number = match token {
        "" => bail!("range bound cannot be empty"),
        "$" => len,
        _ => token
            .parse::<usize>()
            .map_err(|_| anyhow!("'{}' is not a question number", token))?,
    };
    if number == 0 || number > len {
        bail!("question {} out of range 1..{}", token, len);
    }
    Ok(number)
}

/// Shorten text for one-line listings.
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_expression_resolves_unique_indices() {
        assert_eq!(parse_range_expression("1..3,2,$", 5).unwrap(), vec![0, 1, 2, 4]);
        assert!(parse_range_expression("0", 5).is_err());
        assert!(parse_range_expression("4..2", 5).is_err());
        assert!(parse_range_expression("6", 5).is_err());
    }

    #[test]
    fn huge_upper_bound_fails_without_expanding() {
        let err = parse_range_expression("1..200000000", 3).unwrap_err();
        assert_eq!(err.to_string(), "question 200000000 out of range 1..3");
        assert!(parse_range_expression("2..99999999999999999999999", 3).is_err());
    }

    #[test]
    fn selections_on_an_empty_bank_fail() {
        assert!(parse_range_expression("$", 0).is_err());
        assert!(parse_range_expression("1", 0).is_err());
    }

    #[test]
    fn dates_parse_iso_only() {
        assert_eq!(
            parse_date("2025-02-03").unwrap(),
            NaiveDate::from_ymd_opt(2025, 2, 3).unwrap()
        );
        assert!(parse_date("03/02/2025").is_err());
    }

    #[test]
    fn truncates_on_char_boundaries() {
        assert_eq!(truncate_text("héllo world", 5), "héllo...");
        assert_eq!(truncate_text("short", 10), "short");
    }
}
