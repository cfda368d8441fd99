//! The `riskscore validate` command.

use std::path::PathBuf;

use anyhow::Result;

use riskscore_core::parser::{parse_attempt, validate_attempt};

pub fn execute(attempt_path: PathBuf) -> Result<()> {
    let data = parse_attempt(&attempt_path)?;
    println!(
        "Attempt: {} ({} questions, {} answers)",
        attempt_path.display(),
        data.questions.len(),
        data.answers.len()
    );

    let warnings = validate_attempt(&data);
    for w in &warnings {
        let prefix = w
            .question_id
            .as_ref()
            .map(|id| format!("  [{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Attempt data valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
