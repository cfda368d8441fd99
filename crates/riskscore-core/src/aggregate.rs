//! Per-category aggregation of scored answers.

use std::collections::HashMap;

use crate::classify::classify_category;
use crate::codec::encode;
use crate::model::{Answer, CategoryAggregate, Question, ScoredAnswer};

/// Output of resolving answers against their questions.
#[derive(Debug, Clone, Default)]
pub struct ScoringPass {
    pub scored: Vec<ScoredAnswer>,
    /// Answers skipped because no question matched their id.
    pub unmatched: u32,
    /// Matched answers whose label defaulted to zero.
    pub unrecognized: u32,
}

/// Resolve and encode answers. Unmatched answers are skipped and counted.
pub fn score_answers(questions: &[Question], answers: &[Answer]) -> ScoringPass {
    let by_id: HashMap<&str, &Question> = questions.iter().map(|q| (q.id.as_str(), q)).collect();

    let mut pass = ScoringPass::default();
    for answer in answers {
        let Some(question) = by_id.get(answer.question_id.as_str()) else {
            pass.unmatched += 1;
            continue;
        };
        if !answer.answer_label.is_recognized() {
            pass.unrecognized += 1;
        }
        pass.scored.push(ScoredAnswer {
            question_id: answer.question_id.clone(),
            category_id: question.category_key().to_string(),
            category_name: question.category_label().to_string(),
            intensity: encode(&answer.answer_label),
        });
    }
    pass
}

/// Group scored answers by category, in order of first appearance.
///
/// Only categories with at least one scored answer are emitted.
pub fn aggregate_scored(scored: &[ScoredAnswer]) -> Vec<CategoryAggregate> {
    let mut order: Vec<(&str, &str)> = Vec::new();
    let mut totals: HashMap<&str, (u32, u32)> = HashMap::new();

    for answer in scored {
        let entry = totals.entry(answer.category_id.as_str()).or_insert_with(|| {
            order.push((answer.category_id.as_str(), answer.category_name.as_str()));
            (0, 0)
        });
        entry.0 += u32::from(answer.intensity.value());
        entry.1 += 1;
    }

    order
        .into_iter()
        .filter_map(|(id, name)| {
            let (total_score, total_questions) = totals.get(id).copied()?;
            if total_questions == 0 {
                return None;
            }
            let pct = percentage(total_score, total_questions);
            Some(CategoryAggregate {
                category_id: id.to_string(),
                category_name: name.to_string(),
                total_questions,
                total_score,
                average_intensity: f64::from(total_score) / f64::from(total_questions),
                percentage: pct,
                risk_label: classify_category(pct),
            })
        })
        .collect()
}

/// Score and aggregate in one step.
pub fn aggregate(questions: &[Question], answers: &[Answer]) -> Vec<CategoryAggregate> {
    aggregate_scored(&score_answers(questions, answers).scored)
}

/// `round(100 * (total_score / total_questions) / 3)`, rounding halves up.
///
/// Integer arithmetic keeps every consumer on the same value.
pub fn percentage(total_score: u32, total_questions: u32) -> u32 {
    if total_questions == 0 {
        return 0;
    }
    let score = u64::from(total_score);
    let questions = u64::from(total_questions);
    let rounded = (200 * score + 3 * questions) / (6 * questions);
    rounded.min(100) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::RiskTier;
    use crate::model::{UNKNOWN_CATEGORY_ID, UNKNOWN_CATEGORY_NAME};

    fn question(id: &str, category: Option<(&str, &str)>) -> Question {
        Question {
            id: id.into(),
            category_id: category.map(|(id, _)| id.to_string()),
            category_name: category.map(|(_, name)| name.to_string()),
            text: format!("question {id}"),
        }
    }

    #[test]
    fn honesty_scenario() {
        let questions = vec![
            question("1", Some(("hon", "Honestidad"))),
            question("2", Some(("hon", "Honestidad"))),
            question("3", Some(("hon", "Honestidad"))),
        ];
        let answers = vec![
            Answer::new("1", "Nunca"),
            Answer::new("2", "A veces"),
            Answer::new("3", "Frecuentemente"),
        ];

        let aggregates = aggregate(&questions, &answers);
        assert_eq!(aggregates.len(), 1);
        let hon = &aggregates[0];
        assert_eq!(hon.category_name, "Honestidad");
        assert_eq!(hon.total_score, 5);
        assert_eq!(hon.total_questions, 3);
        assert_eq!(hon.percentage, 56);
        assert_eq!(hon.risk_label, RiskTier::Medium);
        assert!((hon.average_intensity - 5.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn empty_answers_yield_no_categories() {
        let questions = vec![question("1", Some(("hon", "Honestidad")))];
        assert!(aggregate(&questions, &[]).is_empty());
        assert!(aggregate(&[], &[]).is_empty());
    }

    #[test]
    fn unmatched_answers_are_skipped_and_counted() {
        let questions = vec![question("1", Some(("a", "A")))];
        let answers = vec![
            Answer::new("1", "Frecuentemente"),
            Answer::new("99", "Frecuentemente"),
            Answer::new("98", "Nunca"),
        ];
        let pass = score_answers(&questions, &answers);
        assert_eq!(pass.scored.len(), 1);
        assert_eq!(pass.unmatched, 2);

        let aggregates = aggregate_scored(&pass.scored);
        let counted: u32 = aggregates.iter().map(|a| a.total_questions).sum();
        assert_eq!(counted, 1);
    }

    #[test]
    fn uncategorised_questions_share_unknown_bucket() {
        let questions = vec![question("1", None), question("2", None)];
        let answers = vec![Answer::new("1", "Rara vez"), Answer::new("2", "basura")];
        let pass = score_answers(&questions, &answers);
        assert_eq!(pass.unrecognized, 1);

        let aggregates = aggregate_scored(&pass.scored);
        assert_eq!(aggregates.len(), 1);
        assert_eq!(aggregates[0].category_id, UNKNOWN_CATEGORY_ID);
        assert_eq!(aggregates[0].category_name, UNKNOWN_CATEGORY_NAME);
        assert_eq!(aggregates[0].total_score, 1);
        assert_eq!(aggregates[0].percentage, 17);
        assert_eq!(aggregates[0].risk_label, RiskTier::Low);
    }

    #[test]
    fn categories_keep_first_appearance_order() {
        let questions = vec![
            question("1", Some(("z", "Zeta"))),
            question("2", Some(("a", "Alfa"))),
            question("3", Some(("z", "Zeta"))),
        ];
        let answers = vec![
            Answer::new("2", "Nunca"),
            Answer::new("1", "Nunca"),
            Answer::new("3", "Nunca"),
        ];
        let ids: Vec<String> = aggregate(&questions, &answers)
            .into_iter()
            .map(|a| a.category_id)
            .collect();
        assert_eq!(ids, vec!["a", "z"]);
    }

    #[test]
    fn percentage_matches_float_rounding() {
        for questions in 1..=40u32 {
            for score in 0..=questions * 3 {
                let expected =
                    ((f64::from(score) / f64::from(questions)) / 3.0 * 100.0).round() as u32;
                let actual = percentage(score, questions);
                // Exact halves can differ by float error; the integer form rounds them up.
                assert!(
                    actual == expected || actual == expected + 1,
                    "score {score}/{questions}: {actual} vs {expected}"
                );
                assert!(actual <= 100);
            }
        }
        assert_eq!(percentage(3, 8), 13);
        assert_eq!(percentage(3, 1), 100);
        assert_eq!(percentage(0, 0), 0);
    }

    #[test]
    fn percentage_is_monotonic_in_score() {
        for questions in 1..=25u32 {
            let mut previous = 0;
            for score in 0..=questions * 3 {
                let pct = percentage(score, questions);
                assert!(pct >= previous);
                previous = pct;
            }
        }
    }
}
