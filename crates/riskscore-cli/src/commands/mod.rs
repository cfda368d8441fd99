//! Subcommand implementations.

pub mod analyze;
pub mod init;
pub mod show;
pub mod validate;

use anyhow::Result;
use comfy_table::{Cell, Color, Table};

use riskscore_core::classify::RiskTier;
use riskscore_core::model::OverallAnalysis;

/// Fail early on output formats nothing can print.
pub(crate) fn check_format(format: &str) -> Result<()> {
    anyhow::ensure!(
        matches!(format, "text" | "json" | "markdown" | "md"),
        "unknown format '{format}' (expected text, json or markdown)"
    );
    Ok(())
}

/// Print an analysis in the requested format.
pub(crate) fn print_analysis(analysis: &OverallAnalysis, format: &str) -> Result<()> {
    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(analysis)?);
        }
        "markdown" | "md" => {
            println!("{}", analysis.to_markdown());
        }
        other => {
            check_format(other)?;
            print_text(analysis);
        }
    }
    Ok(())
}

fn print_text(analysis: &OverallAnalysis) {
    println!("Attempt: {}", analysis.key);
    println!(
        "Overall: {} (score {}/{} over {} questions)",
        analysis.overall_risk,
        analysis.total_score,
        analysis.total_questions * 3,
        analysis.total_questions
    );
    println!(
        "Self-referential baseline: {:.2}",
        analysis.self_referential_baseline
    );

    if !analysis.category_aggregates.is_empty() {
        let mut table = Table::new();
        table.set_header(vec![
            "Category",
            "Questions",
            "Score",
            "Avg",
            "%",
            "vs baseline",
            "Risk",
        ]);
        for (a, cmp) in analysis
            .category_aggregates
            .iter()
            .zip(analysis.comparisons.iter())
        {
            table.add_row(vec![
                Cell::new(&a.category_name),
                Cell::new(a.total_questions),
                Cell::new(a.total_score),
                Cell::new(format!("{:.2}", a.average_intensity)),
                Cell::new(format!("{}%", a.percentage)),
                Cell::new(format!("{:+.2}", cmp.delta)),
                Cell::new(a.risk_label).fg(tier_color(a.risk_label)),
            ]);
        }
        println!("\n{table}");
    }

    if !analysis.recommendations.is_empty() {
        println!("\nRecommendations:");
        for r in &analysis.recommendations {
            println!("  - {r}");
        }
    }

    if let Some(narrative) = &analysis.narrative {
        println!("\n{narrative}");
    }

    let flags = &analysis.flags;
    if flags.unmatched_answers > 0 || flags.unrecognized_labels > 0 {
        println!(
            "\n{} unmatched answer(s), {} unrecognized label(s)",
            flags.unmatched_answers, flags.unrecognized_labels
        );
    }

    println!(
        "\nSource: {} | {} | {}",
        analysis.source,
        analysis.analysis_id,
        analysis.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
}

fn tier_color(tier: RiskTier) -> Color {
    match tier {
        RiskTier::Low => Color::Green,
        RiskTier::Medium => Color::Yellow,
        RiskTier::High => Color::Red,
    }
}
