//! Core data model types for riskscore.
//!
//! Questions and answers come from the exam data store and are never
//! mutated here. Everything else is derived on demand or restored from the
//! analysis cache.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::classify::RiskTier;

/// Category id used for questions that carry no category.
pub const UNKNOWN_CATEGORY_ID: &str = "unknown";

/// Display name used for questions that carry no category.
pub const UNKNOWN_CATEGORY_NAME: &str = "Sin categoría";

/// A single exam question. Authored upstream, read-only here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    #[serde(deserialize_with = "id_from_any")]
    pub id: String,
    /// Category identifier, absent for uncategorised rows.
    #[serde(default, deserialize_with = "opt_text_from_any")]
    pub category_id: Option<String>,
    #[serde(default, deserialize_with = "opt_text_from_any")]
    pub category_name: Option<String>,
    #[serde(default, deserialize_with = "text_from_any")]
    pub text: String,
}

impl Question {
    /// Category id, falling back to [`UNKNOWN_CATEGORY_ID`].
    pub fn category_key(&self) -> &str {
        match self.category_id.as_deref() {
            Some(id) if !id.trim().is_empty() => id,
            _ => UNKNOWN_CATEGORY_ID,
        }
    }

    /// Category display name, falling back to [`UNKNOWN_CATEGORY_NAME`].
    pub fn category_label(&self) -> &str {
        match self.category_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => UNKNOWN_CATEGORY_NAME,
        }
    }
}

/// A submitted answer to one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    #[serde(deserialize_with = "id_from_any")]
    pub question_id: String,
    #[serde(default)]
    pub answer_label: AnswerLabel,
}

impl Answer {
    pub fn new(question_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            question_id: question_id.into(),
            answer_label: AnswerLabel::from(label.into()),
        }
    }
}

/// The four-level Likert scale, plus a fallback arm for anything else.
///
/// Spreadsheet imports are not guaranteed to be clean, so parsing never
/// fails: unrecognised text lands in [`AnswerLabel::Unrecognized`] and
/// scores as zero.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum AnswerLabel {
    Nunca,
    RaraVez,
    AVeces,
    Frecuentemente,
    Unrecognized(String),
}

impl AnswerLabel {
    pub fn is_recognized(&self) -> bool {
        !matches!(self, AnswerLabel::Unrecognized(_))
    }
}

impl Default for AnswerLabel {
    fn default() -> Self {
        AnswerLabel::Unrecognized(String::new())
    }
}

impl From<String> for AnswerLabel {
    fn from(raw: String) -> Self {
        match raw.trim() {
            "Nunca" => AnswerLabel::Nunca,
            "Rara vez" => AnswerLabel::RaraVez,
            "A veces" => AnswerLabel::AVeces,
            "Frecuentemente" => AnswerLabel::Frecuentemente,
            _ => AnswerLabel::Unrecognized(raw),
        }
    }
}

impl<'de> Deserialize<'de> for AnswerLabel {
    /// Null, numeric and boolean cells become [`AnswerLabel::Unrecognized`].
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawValue::deserialize(deserializer)?;
        Ok(match raw {
            RawValue::Text(s) => AnswerLabel::from(s),
            other => AnswerLabel::Unrecognized(other.into_text().unwrap_or_default()),
        })
    }
}

impl From<&str> for AnswerLabel {
    fn from(raw: &str) -> Self {
        AnswerLabel::from(raw.to_string())
    }
}

impl From<AnswerLabel> for String {
    fn from(label: AnswerLabel) -> Self {
        match label {
            AnswerLabel::Unrecognized(raw) => raw,
            other => other.to_string(),
        }
    }
}

impl fmt::Display for AnswerLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerLabel::Nunca => write!(f, "Nunca"),
            AnswerLabel::RaraVez => write!(f, "Rara vez"),
            AnswerLabel::AVeces => write!(f, "A veces"),
            AnswerLabel::Frecuentemente => write!(f, "Frecuentemente"),
            AnswerLabel::Unrecognized(raw) => write!(f, "{raw}"),
        }
    }
}

/// Encoded answer strength on the 0..=3 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Intensity(u8);

impl Intensity {
    pub const ZERO: Intensity = Intensity(0);
    pub const MAX: Intensity = Intensity(3);

    /// Build an intensity, clamping anything above the scale maximum.
    pub fn new(value: u8) -> Self {
        Intensity(value.min(Self::MAX.0))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

/// An answer resolved against its question and encoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredAnswer {
    pub question_id: String,
    pub category_id: String,
    pub category_name: String,
    pub intensity: Intensity,
}

/// Per-category totals and classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAggregate {
    pub category_id: String,
    pub category_name: String,
    pub total_questions: u32,
    pub total_score: u32,
    /// Mean intensity on the 0..=3 scale.
    pub average_intensity: f64,
    /// Rounded 0..=100 percentage of the maximum possible score.
    pub percentage: u32,
    pub risk_label: RiskTier,
}

/// Where an [`OverallAnalysis`] came from on this call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisSource {
    Cached,
    Fresh,
}

impl fmt::Display for AnalysisSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisSource::Cached => write!(f, "cached"),
            AnalysisSource::Fresh => write!(f, "fresh"),
        }
    }
}

/// Identifies the exam attempt an analysis belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    pub attempt_id: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

impl CacheKey {
    pub fn new(attempt_id: impl Into<String>) -> Self {
        Self {
            attempt_id: attempt_id.into(),
            session_id: None,
        }
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// A key with a blank attempt id cannot address the cache.
    pub fn is_blank(&self) -> bool {
        self.attempt_id.trim().is_empty()
    }

    /// Trimmed copy of the key. A blank session id is dropped.
    pub fn normalized(&self) -> CacheKey {
        CacheKey {
            attempt_id: self.attempt_id.trim().to_string(),
            session_id: self
                .session_id
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.session_id {
            Some(session) => write!(f, "{}@{}", self.attempt_id, session),
            None => write!(f, "{}", self.attempt_id),
        }
    }
}

/// One category's mean intensity measured against the attempt's own grand mean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineComparison {
    pub category_id: String,
    pub category_name: String,
    pub average_intensity: f64,
    pub delta: f64,
    pub above_baseline: bool,
}

/// Data-shape diagnostics collected while scoring. Never raised as errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisFlags {
    /// Names of categories classified `RIESGO ALTO`.
    pub high_risk_categories: Vec<String>,
    /// True when some category tier differs from the overall tier.
    pub tiers_disagree: bool,
    /// Answers whose question could not be resolved.
    pub unmatched_answers: u32,
    /// Resolved answers whose label fell back to intensity zero.
    pub unrecognized_labels: u32,
}

/// The assembled, cacheable result for one exam attempt.
///
/// Consumers (UI summary, report renderer) format this as-is and never
/// recompute risk from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallAnalysis {
    /// Snapshot identity, new for every fresh assembly.
    pub analysis_id: Uuid,
    pub key: CacheKey,
    pub overall_risk: RiskTier,
    pub category_aggregates: Vec<CategoryAggregate>,
    pub total_score: u32,
    pub total_questions: u32,
    /// Grand-mean intensity of this attempt (0..=3), used as the comparison
    /// reference in reports. Not an external normative dataset.
    pub self_referential_baseline: f64,
    pub comparisons: Vec<BaselineComparison>,
    pub recommendations: Vec<String>,
    pub flags: AnalysisFlags,
    #[serde(default)]
    pub narrative: Option<String>,
    pub generated_at: DateTime<Utc>,
    pub source: AnalysisSource,
}

/// Raw exam data for one attempt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttemptData {
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub answers: Vec<Answer>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Int(i64),
    Float(f64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => s,
            RawId::Int(n) => n.to_string(),
            RawId::Float(n) => number_text(n),
        }
    }
}

/// Any cell value. Arrays, objects and null land in `Other`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Other(IgnoredAny),
}

impl RawValue {
    fn into_text(self) -> Option<String> {
        match self {
            RawValue::Text(s) => Some(s),
            RawValue::Int(n) => Some(n.to_string()),
            RawValue::Float(n) => Some(number_text(n)),
            RawValue::Bool(b) => Some(b.to_string()),
            RawValue::Other(_) => None,
        }
    }
}

fn number_text(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{n:.0}")
    } else {
        n.to_string()
    }
}

/// Spreadsheet exports emit ids as strings or numbers; normalise to text.
fn id_from_any<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RawId::deserialize(deserializer).map(String::from)
}

fn opt_text_from_any<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    RawValue::deserialize(deserializer).map(RawValue::into_text)
}

fn text_from_any<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    opt_text_from_any(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answer_label_parse_and_display() {
        assert_eq!(AnswerLabel::from("Nunca"), AnswerLabel::Nunca);
        assert_eq!(AnswerLabel::from(" Rara vez "), AnswerLabel::RaraVez);
        assert_eq!(AnswerLabel::from("A veces"), AnswerLabel::AVeces);
        assert_eq!(
            AnswerLabel::from("Frecuentemente"),
            AnswerLabel::Frecuentemente
        );
        assert_eq!(
            AnswerLabel::from("siempre"),
            AnswerLabel::Unrecognized("siempre".into())
        );
        assert_eq!(AnswerLabel::RaraVez.to_string(), "Rara vez");
        assert!(!AnswerLabel::default().is_recognized());
    }

    #[test]
    fn question_category_fallbacks() {
        let q = Question {
            id: "1".into(),
            category_id: None,
            category_name: Some("  ".into()),
            text: String::new(),
        };
        assert_eq!(q.category_key(), UNKNOWN_CATEGORY_ID);
        assert_eq!(q.category_label(), UNKNOWN_CATEGORY_NAME);
    }

    #[test]
    fn ids_accept_numbers_and_strings() {
        let json = r#"{
            "questions": [
                {"id": 7, "category_id": 2, "category_name": "Honestidad", "text": "q"},
                {"id": "8", "text": "uncategorised"}
            ],
            "answers": [
                {"question_id": 7, "answer_label": "A veces"},
                {"question_id": "8"}
            ]
        }"#;
        let data: AttemptData = serde_json::from_str(json).unwrap();
        assert_eq!(data.questions[0].id, "7");
        assert_eq!(data.questions[0].category_id.as_deref(), Some("2"));
        assert_eq!(data.questions[1].category_id, None);
        assert_eq!(data.answers[0].question_id, "7");
        assert_eq!(data.answers[0].answer_label, AnswerLabel::AVeces);
        assert!(!data.answers[1].answer_label.is_recognized());
    }

    #[test]
    fn malformed_cells_default_instead_of_failing() {
        let json = r#"{
            "questions": [
                {"id": 1, "category_id": null, "category_name": 5, "text": null},
                {"id": 2, "category_id": "hon", "category_name": ["x"], "text": true}
            ],
            "answers": [
                {"question_id": 1, "answer_label": null},
                {"question_id": 2, "answer_label": 3},
                {"question_id": 2, "answer_label": false},
                {"question_id": 2, "answer_label": {"v": "Nunca"}}
            ]
        }"#;
        let data: AttemptData = serde_json::from_str(json).unwrap();
        assert_eq!(data.questions[0].text, "");
        assert_eq!(data.questions[0].category_id, None);
        assert_eq!(data.questions[0].category_name.as_deref(), Some("5"));
        assert_eq!(data.questions[1].category_name, None);
        assert_eq!(data.questions[1].text, "true");
        let labels: Vec<&AnswerLabel> = data.answers.iter().map(|a| &a.answer_label).collect();
        assert_eq!(labels[0], &AnswerLabel::Unrecognized(String::new()));
        assert_eq!(labels[1], &AnswerLabel::Unrecognized("3".into()));
        assert_eq!(labels[2], &AnswerLabel::Unrecognized("false".into()));
        assert!(!data.answers[3].answer_label.is_recognized());
    }

    #[test]
    fn unrecognized_label_serializes_verbatim() {
        let answer = Answer::new("1", "quizás");
        let json = serde_json::to_string(&answer).unwrap();
        assert!(json.contains("\"quizás\""));
    }

    #[test]
    fn intensity_clamps_to_scale() {
        assert_eq!(Intensity::new(9), Intensity::MAX);
        assert_eq!(Intensity::new(2).value(), 2);
    }

    #[test]
    fn cache_key_blank_and_display() {
        assert!(CacheKey::new("  ").is_blank());
        let key = CacheKey::new("a-1").with_session("s-9");
        assert!(!key.is_blank());
        assert_eq!(key.to_string(), "a-1@s-9");
    }

    #[test]
    fn cache_key_normalized_trims() {
        let key = CacheKey::new(" a ").with_session(" s ").normalized();
        assert_eq!(key, CacheKey::new("a").with_session("s"));
        assert_eq!(CacheKey::new("a").with_session("  ").normalized().session_id, None);
    }
}
