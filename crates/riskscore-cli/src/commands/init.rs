//! The `riskscore init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("riskscore.toml").exists() {
        println!("riskscore.toml already exists, skipping.");
    } else {
        std::fs::write("riskscore.toml", SAMPLE_CONFIG)?;
        println!("Created riskscore.toml");
    }

    std::fs::create_dir_all("attempts")?;
    let example_path = std::path::Path::new("attempts/example.json");
    if example_path.exists() {
        println!("attempts/example.json already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_ATTEMPT)?;
        println!("Created attempts/example.json");
    }

    println!("\nNext steps:");
    println!("  1. Run: riskscore validate --attempt attempts/example.json");
    println!("  2. Run: riskscore analyze --attempt attempts/example.json --key example");
    println!("  3. Run: riskscore show --key example --format markdown");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# riskscore configuration

# One JSON snapshot per exam attempt is kept here.
cache_dir = "./riskscore-cache"

# text, json or markdown
default_format = "text"

# Attach the built-in narrative summary to fresh analyses.
narrative = false
"#;

const EXAMPLE_ATTEMPT: &str = r#"{
  "questions": [
    { "id": 1, "category_id": "hon", "category_name": "Honestidad", "text": "¿Ha tomado dinero o mercancía de un empleador sin autorización?" },
    { "id": 2, "category_id": "hon", "category_name": "Honestidad", "text": "¿Ha alterado registros para ocultar un error?" },
    { "id": 3, "category_id": "hon", "category_name": "Honestidad", "text": "¿Ha mentido para obtener un beneficio laboral?" },
    { "id": 4, "category_id": "sub", "category_name": "Consumo de sustancias", "text": "¿Ha llegado al trabajo bajo efectos del alcohol?" },
    { "id": 5, "category_id": "sub", "category_name": "Consumo de sustancias", "text": "¿Ha consumido sustancias prohibidas en el último año?" }
  ],
  "answers": [
    { "question_id": 1, "answer_label": "Nunca" },
    { "question_id": 2, "answer_label": "A veces" },
    { "question_id": 3, "answer_label": "Frecuentemente" },
    { "question_id": 4, "answer_label": "Nunca" },
    { "question_id": 5, "answer_label": "Rara vez" }
  ]
}
"#;
