//! Attempt file parser.
//!
//! Loads `{questions, answers}` from JSON or TOML files and reports data
//! problems as warnings. Dirty rows are expected from spreadsheet imports,
//! so validation never rejects a file that parses.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};

use crate::model::AttemptData;

/// Parse an attempt file. The format is chosen by extension; anything other
/// than `.toml` is read as JSON.
pub fn parse_attempt(path: &Path) -> Result<AttemptData> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read attempt file: {}", path.display()))?;

    parse_attempt_str(&content, path)
}

/// Parse attempt content, using `source_path` for format and error context.
pub fn parse_attempt_str(content: &str, source_path: &Path) -> Result<AttemptData> {
    let is_toml = source_path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    if is_toml {
        toml::from_str(content)
            .with_context(|| format!("failed to parse TOML: {}", source_path.display()))
    } else {
        serde_json::from_str(content)
            .with_context(|| format!("failed to parse JSON: {}", source_path.display()))
    }
}

/// A warning from attempt validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationWarning {
    /// The question or answer the warning refers to, if any.
    pub question_id: Option<String>,
    pub message: String,
}

/// Check an attempt for rows that will be skipped or scored as zero.
pub fn validate_attempt(data: &AttemptData) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if data.answers.is_empty() {
        warnings.push(ValidationWarning {
            question_id: None,
            message: "attempt has no answers".into(),
        });
    }

    let mut seen_questions = HashSet::new();
    for q in &data.questions {
        if !seen_questions.insert(q.id.as_str()) {
            warnings.push(ValidationWarning {
                question_id: Some(q.id.clone()),
                message: "duplicate question id".into(),
            });
        }
        if !matches!(q.category_id.as_deref(), Some(c) if !c.trim().is_empty()) {
            warnings.push(ValidationWarning {
                question_id: Some(q.id.clone()),
                message: format!("question has no category, scored under '{}'", q.category_label()),
            });
        }
    }

    let mut answer_counts: HashMap<&str, u32> = HashMap::new();
    for a in &data.answers {
        let id = a.question_id.as_str();
        *answer_counts.entry(id).or_default() += 1;

        if !seen_questions.contains(id) {
            warnings.push(ValidationWarning {
                question_id: Some(a.question_id.clone()),
                message: "answer has no matching question and will be skipped".into(),
            });
        } else if !a.answer_label.is_recognized() {
            warnings.push(ValidationWarning {
                question_id: Some(a.question_id.clone()),
                message: format!(
                    "unrecognized answer label '{}', scored as 0",
                    a.answer_label
                ),
            });
        }
    }

    let mut duplicated: Vec<(&str, u32)> =
        answer_counts.into_iter().filter(|(_, n)| *n > 1).collect();
    duplicated.sort_unstable();
    for (id, n) in duplicated {
        warnings.push(ValidationWarning {
            question_id: Some(id.to_string()),
            message: format!("question answered {n} times, each answer is counted"),
        });
    }

    warnings
}
