//! Prompt text and declared response schemas for the generation provider.

use serde_json::{Value, json};

use crate::mcq::McqConfig;

/// Prompt asking the model to review the request for pedagogical alignment.
pub fn validation_prompt(config: &McqConfig) -> String {
    format!(
        "Act as a medical education consultant.\n\
         Review the following MCQ configuration parameters for pedagogical alignment:\n\
         1. **Learning Objective (LO)**: \"{}\"\n\
         2. **Bloom's Taxonomy Level**: {}\n\
         Decide whether the objective can be assessed at this Bloom level with a \
         multiple-choice item. If not, explain the problem and advise how to adjust it.\n\
         Return result strictly as JSON.",
        config.objective_or_default(),
        config.bloom_level
    )
}

/// Prompt asking the model to write the questions.
pub fn generation_prompt(config: &McqConfig) -> String {
    let sub_topics = if config.sub_topics.is_empty() {
        "3. **Professional Competencies**: Automatically select relevant medical concepts \
         (e.g., Clinical Correlation)."
            .to_string()
    } else {
        format!(
            "3. **Professional Competencies/Subtopics**: {}. Integrate these applied concepts \
             into the question stem or options.",
            config.sub_topics_label()
        )
    };

    let stem = if config.has_clinical_stem {
        "4. **Question Format**: Must use a Clinical Stem (Vignette). Present a patient case \
         with demographic data, symptoms, physical findings, and/or labs."
    } else {
        "4. **Question Format**: Direct science question. No clinical vignette required."
    };

    let objective = if config.has_objective() {
        config.objective.as_str()
    } else {
        "General knowledge"
    };

    let mut prompt = format!(
        "You are an expert medical education consultant.\n\
         Create {count} MCQs based on:\n\
         1. **Science Topics**: {topics}.\n\
         2. **Organ System**: {organ}.\n\
         {sub_topics}\n\
         {stem}\n\
         5. **Options**: {options}.\n\
         6. **Bloom Level**: {bloom}.\n\
         7. **Target Difficulty (Angoff Index)**: {angoff} (decimal probability scale: 0.8 is easy, 0.2 is very hard).\n\
         8. **Objective**: {objective}.\n\
         9. **Style**: {style}.\n",
        count = config.number_of_questions,
        topics = config.topics_label(),
        organ = config.organ_system,
        options = config.number_of_options,
        bloom = config.bloom_level,
        angoff = config.angoff_index,
        style = config.question_style,
    );
    if config.use_live_search {
        prompt.push_str(
            "IMPORTANT: Use Google Search to verify the latest clinical guidelines, diagnostic \
             criteria, and management protocols. Ensure the question reflects current EBM standards.\n",
        );
    }
    prompt.push_str(
        "\nRules:\n\
         - Use standard newlines (\\n).\n\
         - No HTML tags.\n\
         - Output must be a valid JSON array of objects.",
    );
    prompt
}

/// Schema of the generate call: an array of question objects.
pub fn question_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "questionText": { "type": "STRING" },
                "options": { "type": "ARRAY", "items": { "type": "STRING" } },
                "correctAnswerIndex": { "type": "INTEGER" },
                "explanation": { "type": "STRING" },
                "predictedAngoff": { "type": "NUMBER" },
                "bloomLevel": { "type": "STRING" },
                "topicTag": { "type": "STRING" }
            },
            "required": [
                "questionText",
                "options",
                "correctAnswerIndex",
                "explanation",
                "predictedAngoff",
                "bloomLevel",
                "topicTag"
            ]
        }
    })
}

/// Schema of the validate call.
pub fn validation_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "isValid": { "type": "BOOLEAN" },
            "title": { "type": "STRING" },
            "message": { "type": "STRING" },
            "advice": { "type": "STRING" }
        },
        "required": ["isValid", "title", "message", "advice"]
    })
}
