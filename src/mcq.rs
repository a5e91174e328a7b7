//! Pedagogical parameters for a generation request.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_QUESTIONS: u8 = 1;
pub const MAX_QUESTIONS: u8 = 5;
pub const MIN_ANGOFF: f64 = 0.2;
pub const MAX_ANGOFF: f64 = 0.8;

#[derive(Debug, Error, PartialEq)]
pub enum McqError {
    #[error("unknown {kind} '{value}'")]
    UnknownValue { kind: &'static str, value: String },
    #[error("at least one science topic is required")]
    NoTopics,
    #[error("number of options must be 4 or 5 (got {0})")]
    OptionCount(u8),
    #[error("number of questions must be between 1 and 5 (got {0})")]
    QuestionCount(u8),
    #[error("target Angoff index must be between 0.2 and 0.8 (got {0})")]
    Angoff(f64),
}

/// Enum whose serialized and displayed form is a human label, and which also
/// parses from a short kebab-case key.
macro_rules! labeled_enum {
    ($(#[$meta:meta])* $name:ident, $kind:literal { $($variant:ident => ($key:literal, $label:literal)),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $label)] $variant,)+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            pub fn key(&self) -> &'static str {
                match self {
                    $($name::$variant => $key,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = McqError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.key().eq_ignore_ascii_case(wanted) || v.label().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| McqError::UnknownValue {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }
    };
}

labeled_enum!(
    /// Bloom's taxonomy level.
    BloomLevel, "Bloom level" {
        Remembering => ("remembering", "Remembering"),
        Understanding => ("understanding", "Understanding"),
        Applying => ("applying", "Applying"),
        Analyzing => ("analyzing", "Analyzing"),
        Evaluating => ("evaluating", "Evaluating"),
        Creating => ("creating", "Creating"),
    }
);

labeled_enum!(
    /// Basic science discipline.
    MainTopic, "topic" {
        Anatomy => ("anatomy", "Anatomy"),
        Physiology => ("physiology", "Physiology"),
        Biochemistry => ("biochemistry", "Biochemistry"),
        Pathology => ("pathology", "Pathology"),
        Pharmacology => ("pharmacology", "Pharmacology"),
        Microbiology => ("microbiology", "Microbiology"),
        Genetics => ("genetics", "Genetics"),
        Immunology => ("immunology", "Immunology"),
        Embryology => ("embryology", "Embryology"),
    }
);

labeled_enum!(
    /// Applied professional competency woven into the stem or options.
    SubTopic, "sub-topic" {
        ClinicalCorrelation => ("clinical-correlation", "Clinical Correlation"),
        LabInterpretation => ("lab-interpretation", "Laboratory Interpretation"),
        LabSkill => ("lab-skill", "Laboratory Skill"),
        ProceduralSkill => ("procedural-skill", "Procedural Skill"),
        HealthPromotion => ("health-promotion", "Health Promotion"),
        RationalDrugUse => ("rational-drug-use", "Rational Drug Use"),
        PatientSafety => ("patient-safety", "Patient Safety"),
    }
);

labeled_enum!(
    OrganSystem, "organ system" {
        General => ("none", "None (General)"),
        Cvs => ("cvs", "Cardiovascular (CVS)"),
        Rs => ("rs", "Respiratory (RS)"),
        Git => ("git", "Gastrointestinal (GIT)"),
        Kub => ("kub", "Renal/Urinary (KUB)"),
        Msk => ("msk", "Musculoskeletal (MSK)"),
        Ns => ("ns", "Nervous System (NS)"),
        Endo => ("endo", "Endocrine"),
        Rep => ("rep", "Reproductive"),
        Hem => ("hem", "Hematology/Oncology"),
        Integ => ("integ", "Integumentary"),
    }
);

labeled_enum!(
    QuestionStyle, "question style" {
        Concise => ("concise", "Concise"),
        Detailed => ("detailed", "Detailed"),
    }
);

/// Everything the generator needs to know about a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McqConfig {
    pub topics: Vec<MainTopic>,
    #[serde(default)]
    pub sub_topics: Vec<SubTopic>,
    pub organ_system: OrganSystem,
    pub number_of_options: u8,
    pub bloom_level: BloomLevel,
    pub angoff_index: f64,
    pub has_clinical_stem: bool,
    pub question_style: QuestionStyle,
    #[serde(default)]
    pub objective: String,
    pub number_of_questions: u8,
    pub use_live_search: bool,
}

impl Default for McqConfig {
    fn default() -> Self {
        Self {
            topics: vec![MainTopic::Anatomy],
            sub_topics: Vec::new(),
            organ_system: OrganSystem::Cvs,
            number_of_options: 4,
            bloom_level: BloomLevel::Applying,
            angoff_index: 0.6,
            has_clinical_stem: true,
            question_style: QuestionStyle::Detailed,
            objective: String::new(),
            number_of_questions: 3,
            use_live_search: true,
        }
    }
}

impl McqConfig {
    /// Check the ranges the request form enforces.
    pub fn validate(&self) -> Result<(), McqError> {
        if self.topics.is_empty() {
            return Err(McqError::NoTopics);
        }
        if !matches!(self.number_of_options, 4 | 5) {
            return Err(McqError::OptionCount(self.number_of_options));
        }
        if !(MIN_QUESTIONS..=MAX_QUESTIONS).contains(&self.number_of_questions) {
            return Err(McqError::QuestionCount(self.number_of_questions));
        }
        // small tolerance so 0.2/0.8 typed by hand survive float rounding
        if !(MIN_ANGOFF - 1e-9..=MAX_ANGOFF + 1e-9).contains(&self.angoff_index) {
            return Err(McqError::Angoff(self.angoff_index));
        }
        Ok(())
    }

    pub fn topics_label(&self) -> String {
        join_labels(&self.topics)
    }

    pub fn sub_topics_label(&self) -> String {
        join_labels(&self.sub_topics)
    }

    pub fn has_objective(&self) -> bool {
        !self.objective.trim().is_empty()
    }

    /// Objective used when reviewing the request; falls back to a topic summary.
    pub fn objective_or_default(&self) -> String {
        if self.has_objective() {
            self.objective.clone()
        } else {
            format!(
                "General knowledge of {} related to {}",
                self.topics_label(),
                self.organ_system
            )
        }
    }
}

fn join_labels<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Difficulty wording for an Angoff value.
pub fn angoff_label(value: f64) -> &'static str {
    if value <= 0.3 {
        "Very Hard"
    } else if value <= 0.5 {
        "Hard"
    } else if value <= 0.7 {
        "Moderate"
    } else {
        "Easy"
    }
}
