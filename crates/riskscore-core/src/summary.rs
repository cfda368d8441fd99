//! Text renderings of an [`OverallAnalysis`] for summary views.
//!
//! These only format what the analysis already contains. Tier strings are
//! emitted verbatim.

use crate::model::OverallAnalysis;

impl OverallAnalysis {
    /// Format the analysis as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!("## Análisis de riesgo: {}\n\n", self.key));
        md.push_str(&format!(
            "**Resultado global:** {} ({} / {} puntos, {} preguntas)\n\n",
            self.overall_risk,
            self.total_score,
            self.total_questions * 3,
            self.total_questions
        ));
        md.push_str(&format!(
            "**Promedio de referencia (propio del intento):** {:.2}\n\n",
            self.self_referential_baseline
        ));

        if !self.category_aggregates.is_empty() {
            md.push_str("| Categoría | Preguntas | Puntaje | Promedio | % | Riesgo |\n");
            md.push_str("|-----------|-----------|---------|----------|---|--------|\n");
            for a in &self.category_aggregates {
                md.push_str(&format!(
                    "| {} | {} | {} | {:.2} | {}% | {} |\n",
                    a.category_name,
                    a.total_questions,
                    a.total_score,
                    a.average_intensity,
                    a.percentage,
                    a.risk_label
                ));
            }
            md.push('\n');
        }

        if !self.recommendations.is_empty() {
            md.push_str("### Recomendaciones\n\n");
            for r in &self.recommendations {
                md.push_str(&format!("- {r}\n"));
            }
            md.push('\n');
        }

        if let Some(narrative) = &self.narrative {
            md.push_str("### Interpretación\n\n");
            md.push_str(narrative);
            md.push_str("\n\n");
        }

        let flags = &self.flags;
        if flags.unmatched_answers > 0 || flags.unrecognized_labels > 0 {
            md.push_str(&format!(
                "_Datos: {} respuestas sin pregunta, {} etiquetas no reconocidas._\n\n",
                flags.unmatched_answers, flags.unrecognized_labels
            ));
        }

        md.push_str(&format!(
            "_Generado {} ({}, {})_\n",
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            self.source,
            self.analysis_id
        ));
        md
    }

    /// One line per category plus the overall tier, for terminals and logs.
    pub fn to_text(&self) -> String {
        let mut out = format!(
            "{}: {} (score {}/{}, baseline {:.2}, {})\n",
            self.key,
            self.overall_risk,
            self.total_score,
            self.total_questions * 3,
            self.self_referential_baseline,
            self.source
        );
        for a in &self.category_aggregates {
            out.push_str(&format!(
                "  {:<24} {:>3}%  {}\n",
                a.category_name, a.percentage, a.risk_label
            ));
        }
        out
    }
}
