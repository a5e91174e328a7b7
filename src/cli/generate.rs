//! Question generation (`medq generate ...`).

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;
use medq::export::text::single_line;
use medq::mcq::angoff_label;
use medq::{
    BankHeader, Config, GeminiClient, GenerationOutcome, MainTopic, McqConfig, OrganSystem,
    QuestionBank, QuestionGenerator, SubTopic, run_generation,
};
use tracing::info;

use crate::cli::common::{BloomArg, StyleArg};
use crate::cli::utils::{load_bank, truncate_text};

/// Arguments for `medq generate`.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Basic science topic; repeat for several (default: anatomy).
    #[arg(short = 't', long = "topic")]
    pub topics: Vec<MainTopic>,
    /// Professional competency to weave in; repeatable.
    #[arg(long = "subtopic")]
    pub sub_topics: Vec<SubTopic>,
    /// Organ system (`none` for general questions).
    #[arg(long, default_value = "cvs")]
    pub organ: OrganSystem,
    /// Options per question.
    #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u8).range(4..=5))]
    pub options: u8,
    /// Cognitive level targeted by the questions.
    #[arg(long, default_value_t = BloomArg::Applying, value_enum)]
    pub bloom: BloomArg,
    /// Target Angoff index (0.2 hard .. 0.8 easy).
    #[arg(long, default_value_t = 0.6)]
    pub angoff: f64,
    /// Ask for pure science stems instead of clinical vignettes.
    #[arg(long)]
    pub no_clinical_stem: bool,
    /// Stem length preference.
    #[arg(long, default_value_t = StyleArg::Detailed, value_enum)]
    pub style: StyleArg,
    /// Free-text learning objective.
    #[arg(long, default_value = "")]
    pub objective: String,
    /// Number of questions (1-5).
    #[arg(short = 'n', long, default_value_t = 3)]
    pub count: u8,
    /// Disable web-search grounding.
    #[arg(long)]
    pub no_live_search: bool,
    /// Skip the configuration review call.
    #[arg(long)]
    pub skip_validation: bool,
    /// Bank file receiving the questions.
    #[arg(short = 'o', long = "output", default_value = "questions.jsonl")]
    pub output: PathBuf,
    /// Append to an existing bank instead of replacing it.
    #[arg(long)]
    pub append: bool,
}

impl GenerateArgs {
    fn to_config(&self) -> McqConfig {
        let topics = if self.topics.is_empty() {
            McqConfig::default().topics
        } else {
            self.topics.clone()
        };
        McqConfig {
            topics,
            sub_topics: self.sub_topics.clone(),
            organ_system: self.organ,
            number_of_options: self.options,
            bloom_level: self.bloom.into(),
            angoff_index: self.angoff,
            has_clinical_stem: !self.no_clinical_stem,
            question_style: self.style.into(),
            objective: self.objective.clone(),
            number_of_questions: self.count,
            use_live_search: !self.no_live_search,
        }
    }
}

/// Execute a generate command.
pub async fn handle(args: GenerateArgs, config: &Config) -> Result<()> {
    let mcq = args.to_config();
    let client = GeminiClient::new(config)?;
    info!(
        model = client.model(),
        topics = %mcq.topics_label(),
        count = mcq.number_of_questions,
        live_search = mcq.use_live_search,
        "starting generation"
    );

    let questions = if args.skip_validation {
        mcq.validate()?;
        client.generate(&mcq).await?
    } else {
        match run_generation(&client, &mcq).await? {
            GenerationOutcome::Generated(questions) => questions,
            GenerationOutcome::Rejected(verdict) => {
                eprintln!("{}", verdict.title);
                eprintln!("Problem: {}", verdict.message);
                eprintln!("Recommendation: {}", verdict.advice);
                bail!("configuration rejected by review; adjust the parameters and retry");
            }
        }
    };

    let mut bank = if args.append && args.output.exists() {
        load_bank(&args.output)?
    } else {
        QuestionBank::new(BankHeader::new(
            Some(mcq.clone()),
            Some(client.model().to_string()),
        ))
    };
    let start = bank.questions.len();
    bank.extend(questions)
        .context("model returned a question the encoders cannot export")?;
    bank.log_action(format!(
        "generate {} question(s) with {}",
        bank.questions.len() - start,
        client.model()
    ));
    bank.save(&args.output)?;

    println!(
        "Generated {} question(s) into {} ({}, target Angoff {:.1} {})",
        bank.questions.len() - start,
        args.output.display(),
        mcq.bloom_level,
        mcq.angoff_index,
        angoff_label(mcq.angoff_index)
    );
    for (idx, q) in bank.questions.iter().enumerate().skip(start) {
        let grounded = if q.has_sources() { " [grounded]" } else { "" };
        println!(
            "  Q{} [{}] {}{}",
            idx + 1,
            q.topic_tag,
            truncate_text(&single_line(&q.question_text), 60),
            grounded
        );
    }
    Ok(())
}
