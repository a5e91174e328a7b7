//! Question bank lifecycle commands (`medq bank ...`).

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{Args, Subcommand};
use medq::export::text::{normalize_breaks, single_line};
use medq::mcq::angoff_label;
use medq::question::option_letter;
use medq::{BankHeader, Question, QuestionBank, load_questions_json};

use crate::cli::utils::{load_bank, parse_range_expression, truncate_text, write_output};

/// Supported `medq bank` subcommands.
#[derive(Subcommand, Debug)]
pub enum BankCommand {
    /// Create an empty bank file.
    Init(BankInitArgs),
    /// Import raw model JSON into a bank file.
    Import(BankImportArgs),
    /// Show bank metadata summary.
    Info(BankInfoArgs),
    /// Print the questions of a bank.
    Show(BankShowArgs),
    /// Merge multiple bank files into a new bank.
    Merge(BankMergeArgs),
    /// Slice a bank by question numbers or ranges.
    Slice(BankSliceArgs),
}

/// Arguments for `medq bank init`.
#[derive(Args, Debug)]
pub struct BankInitArgs {
    /// Output bank path (JSONL).
    pub path: PathBuf,
}

/// Arguments for `medq bank import`.
#[derive(Args, Debug)]
pub struct BankImportArgs {
    /// JSON file holding an array of questions (or `{"questions": [...]}`).
    pub source: PathBuf,
    /// Output bank file.
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,
}

/// Arguments for `medq bank info`.
#[derive(Args, Debug)]
pub struct BankInfoArgs {
    /// Bank file to inspect.
    pub bank: PathBuf,
}

/// Arguments for `medq bank show`.
#[derive(Args, Debug)]
pub struct BankShowArgs {
    /// Bank file to print.
    pub bank: PathBuf,
    /// Reveal the correct answer, explanation and sources.
    #[arg(short = 'a', long)]
    pub answers: bool,
    /// One line per question instead of full cards.
    #[arg(long)]
    pub brief: bool,
    /// Output file (`-` or omitted for stdout).
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

/// Arguments for `medq bank merge`.
#[derive(Args, Debug)]
pub struct BankMergeArgs {
    /// Input bank files to merge.
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,
    /// Output bank file.
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,
}

/// Arguments for `medq bank slice`.
#[derive(Args, Debug)]
pub struct BankSliceArgs {
    /// Source bank file.
    pub bank: PathBuf,
    /// Range expression over 1-based question numbers, e.g. 1..3,5,$
    #[arg(short = 'r', long = "range")]
    pub range: String,
    /// Output bank file.
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,
}

/// Execute a bank command.
pub fn handle(command: BankCommand) -> Result<()> {
    match command {
        BankCommand::Init(args) => init(args),
        BankCommand::Import(args) => import(args),
        BankCommand::Info(args) => info(args),
        BankCommand::Show(args) => show(args),
        BankCommand::Merge(args) => merge(args),
        BankCommand::Slice(args) => slice(args),
    }
}

fn init(args: BankInitArgs) -> Result<()> {
    let mut bank = QuestionBank::new(BankHeader::new(None, None));
    bank.log_action("bank init");
    bank.save(&args.path)?;
    println!("Created bank {}", args.path.display());
    Ok(())
}

fn import(args: BankImportArgs) -> Result<()> {
    let questions = load_questions_json(&args.source)?;
    let mut bank = QuestionBank::new(BankHeader::new(None, None));
    bank.extend(questions)
        .with_context(|| format!("invalid question in {}", args.source.display()))?;
    bank.log_action(format!("import from {}", args.source.display()));
    bank.save(&args.output)?;
    println!(
        "Imported {} question(s) into {}",
        bank.questions.len(),
        args.output.display()
    );
    Ok(())
}

fn info(args: BankInfoArgs) -> Result<()> {
    let bank = load_bank(&args.bank)?;
    println!("Bank: {}", args.bank.display());
    println!("Created: {}", bank.header.created_at);
    println!("Questions: {}", bank.questions.len());
    if let Some(model) = &bank.header.model {
        println!("Model: {}", model);
    }
    if let Some(cfg) = &bank.header.config {
        println!("Topics: {}", cfg.topics_label());
        if !cfg.sub_topics.is_empty() {
            println!("Competencies: {}", cfg.sub_topics_label());
        }
        println!("Organ system: {}", cfg.organ_system);
        println!("Bloom level: {}", cfg.bloom_level);
        println!(
            "Target Angoff: {:.1} ({})",
            cfg.angoff_index,
            angoff_label(cfg.angoff_index)
        );
        println!("Options per question: {}", cfg.number_of_options);
        println!("Live search: {}", if cfg.use_live_search { "on" } else { "off" });
    }
    let grounded = bank.questions.iter().filter(|q| q.has_sources()).count();
    if grounded > 0 {
        println!("Grounded questions: {}", grounded);
    }
    println!("History entries: {}", bank.header.history.len());
    Ok(())
}

fn show(args: BankShowArgs) -> Result<()> {
    let bank = load_bank(&args.bank)?;
    let output = if args.brief {
        bank.questions
            .iter()
            .enumerate()
            .map(|(idx, q)| brief_line(idx + 1, q, args.answers))
            .collect::<Vec<_>>()
            .join("\n")
            + "\n"
    } else {
        bank.questions
            .iter()
            .enumerate()
            .map(|(idx, q)| render_card(idx + 1, q, args.answers))
            .collect::<Vec<_>>()
            .join("\n")
    };
    match args.output {
        Some(path) => write_output(&path, &output)?,
        None => print!("{}", output),
    }
    Ok(())
}

fn merge(args: BankMergeArgs) -> Result<()> {
    let (first, rest) = args
        .inputs
        .split_first()
        .ok_or_else(|| anyhow!("merge requires at least one input bank"))?;
    let mut result = load_bank(first)?;
    for input in rest {
        let bank = load_bank(input)?;
        result
            .merge_from(&bank)
            .with_context(|| format!("failed to merge {}", input.display()))?;
    }
    result.log_action(format!(
        "merge {} banks into {}",
        args.inputs.len(),
        args.output.display()
    ));
    result.save(&args.output)?;
    println!(
        "Merged {} question(s) into {}",
        result.questions.len(),
        args.output.display()
    );
    Ok(())
}

fn slice(args: BankSliceArgs) -> Result<()> {
    let source = load_bank(&args.bank)?;
    let indexes = parse_range_expression(&args.range, source.questions.len())?;
    let mut sliced = source.slice_indices(&indexes)?;
    sliced.log_action(format!("slice {} -> {}", args.range, args.output.display()));
    sliced.save(&args.output)?;
    println!(
        "Sliced {} question(s) into {}",
        sliced.questions.len(),
        args.output.display()
    );
    Ok(())
}

fn brief_line(position: usize, q: &Question, reveal: bool) -> String {
    let mut line = format!(
        "Q{:<3} [{}] {}",
        position,
        q.topic_tag,
        truncate_text(&single_line(&q.question_text), 70)
    );
    if reveal {
        line.push_str(&format!(" => {}", q.correct_letter()));
    }
    line
}

/// Plain-text question card: header tags, stem, lettered options, and
/// optionally the answer block.
fn render_card(position: usize, q: &Question, reveal: bool) -> String {
    let mut out = String::new();
    let grounded = if q.has_sources() {
        " | verified via live search"
    } else {
        ""
    };
    writeln!(&mut out, "Q{} | {} | {}{}", position, q.topic_tag, q.bloom_level, grounded).ok();
    writeln!(&mut out, "{}", normalize_breaks(&q.question_text)).ok();
    writeln!(&mut out).ok();
    for (idx, opt) in q.options.iter().enumerate() {
        let mark = if reveal && q.is_correct(idx) { "*" } else { " " };
        writeln!(
            &mut out,
            "{} {}) {}",
            mark,
            option_letter(idx),
            normalize_breaks(opt)
        )
        .ok();
    }
    writeln!(&mut out, "Predicted Angoff: {:.2}", q.predicted_angoff).ok();
    if reveal {
        writeln!(&mut out, "Answer: {}", q.correct_letter()).ok();
        writeln!(
            &mut out,
            "Explanation: {}",
            normalize_breaks(&q.explanation)
        )
        .ok();
        if let Some(sources) = q.sources.as_ref().filter(|s| !s.is_empty()) {
            writeln!(&mut out, "Sources:").ok();
            for source in sources {
                writeln!(&mut out, "  - {} <{}>", source.title, source.uri).ok();
            }
        }
    }
    out
}
