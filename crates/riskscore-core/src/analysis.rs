//! Pure composition of scoring, baseline and classification into an
//! [`OverallAnalysis`].
//!
//! Nothing here touches the cache; see [`crate::assembler`] for that.

use chrono::Utc;
use uuid::Uuid;

use crate::aggregate::{aggregate_scored, score_answers};
use crate::baseline::{compare_to_baseline, self_referential_baseline};
use crate::classify::{classify_overall, RiskTier};
use crate::model::{
    AnalysisFlags, AnalysisSource, AttemptData, CacheKey, CategoryAggregate, OverallAnalysis,
};

/// Score an attempt from its raw data.
///
/// Never fails: dirty rows degrade to skipped answers or zero intensities,
/// which are counted in [`AnalysisFlags`].
pub fn analyze(key: &CacheKey, data: &AttemptData) -> OverallAnalysis {
    let pass = score_answers(&data.questions, &data.answers);
    let category_aggregates = aggregate_scored(&pass.scored);

    let total_score: u32 = category_aggregates.iter().map(|a| a.total_score).sum();
    let total_questions: u32 = category_aggregates.iter().map(|a| a.total_questions).sum();
    let overall_risk = classify_overall(total_score, total_questions);

    let baseline = self_referential_baseline(&category_aggregates);
    let comparisons = compare_to_baseline(&category_aggregates, baseline);

    let flags = AnalysisFlags {
        high_risk_categories: category_aggregates
            .iter()
            .filter(|a| a.risk_label == RiskTier::High)
            .map(|a| a.category_name.clone())
            .collect(),
        tiers_disagree: category_aggregates
            .iter()
            .any(|a| a.risk_label != overall_risk),
        unmatched_answers: pass.unmatched,
        unrecognized_labels: pass.unrecognized,
    };

    let recommendations = recommendations(&category_aggregates, overall_risk);

    OverallAnalysis {
        analysis_id: Uuid::new_v4(),
        key: key.clone(),
        overall_risk,
        category_aggregates,
        total_score,
        total_questions,
        self_referential_baseline: baseline,
        comparisons,
        recommendations,
        flags,
        narrative: None,
        generated_at: Utc::now(),
        source: AnalysisSource::Fresh,
    }
}

/// Follow-up recommendations, in category order, then one overall line.
pub fn recommendations(aggregates: &[CategoryAggregate], overall: RiskTier) -> Vec<String> {
    if aggregates.is_empty() {
        return vec!["No hay respuestas suficientes para emitir recomendaciones.".to_string()];
    }

    let mut out: Vec<String> = aggregates
        .iter()
        .filter_map(|a| match a.risk_label {
            RiskTier::High => Some(format!(
                "Profundizar en {} mediante entrevista focalizada ({}%, {}).",
                a.category_name, a.percentage, a.risk_label
            )),
            RiskTier::Medium => Some(format!(
                "Reforzar el seguimiento en {} ({}%, {}).",
                a.category_name, a.percentage, a.risk_label
            )),
            RiskTier::Low => None,
        })
        .collect();

    out.push(
        match overall {
            RiskTier::High => {
                "Resultado global de riesgo alto: se sugiere entrevista de seguimiento antes de continuar."
            }
            RiskTier::Medium => {
                "Resultado global de riesgo medio: verificar referencias en las áreas señaladas."
            }
            RiskTier::Low => "Resultado global de riesgo bajo: sin indicadores relevantes.",
        }
        .to_string(),
    );
    out
}
