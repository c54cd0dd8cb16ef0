//! Rubric-based partial credit grading

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::extract::extract_key_elements;
use super::result::EvalResult;

/// Operator attached to a rubric criterion
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CriterionOperator {
    /// The answer must state the criterion's facts
    Correctness,
    /// Any operator this grader does not score
    Other(String),
}

impl From<String> for CriterionOperator {
    fn from(s: String) -> Self {
        match s.trim().to_lowercase().as_str() {
            "correctness" => CriterionOperator::Correctness,
            _ => CriterionOperator::Other(s),
        }
    }
}

impl From<CriterionOperator> for String {
    fn from(op: CriterionOperator) -> Self {
        match op {
            CriterionOperator::Correctness => "correctness".to_string(),
            CriterionOperator::Other(name) => name,
        }
    }
}

/// A single rubric criterion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RubricCriterion {
    pub operator: CriterionOperator,
    pub criteria: String,
}

impl RubricCriterion {
    pub fn correctness(criteria: impl Into<String>) -> Self {
        Self {
            operator: CriterionOperator::Correctness,
            criteria: criteria.into(),
        }
    }

    /// Whether the prediction covers this criterion.
    ///
    /// Every key element of the criterion must appear among the prediction's
    /// key elements (whole or as a substring) or in the lower-cased prediction
    /// text. A criterion without key elements needs its own lower-cased text
    /// to appear in the prediction.
    pub fn is_satisfied_by(
        &self,
        prediction_elements: &IndexSet<String>,
        prediction_lower: &str,
    ) -> bool {
        let required = extract_key_elements(&self.criteria);

        if required.is_empty() {
            let phrase = self.criteria.trim().to_lowercase();
            return !phrase.is_empty() && prediction_lower.contains(&phrase);
        }

        required.iter().all(|element| {
            prediction_elements.contains(element)
                || prediction_elements.iter().any(|p| p.contains(element.as_str()))
                || prediction_lower.contains(element.as_str())
        })
    }
}

/// Grader for free-text answers against a list of correctness criteria
#[derive(Debug, Clone, Copy, Default)]
pub struct RubricEvaluator;

impl RubricEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Score a prediction against a rubric, or against `expected` when no
    /// rubric is given
    pub fn evaluate(
        &self,
        prediction: &str,
        expected: Option<&str>,
        rubric: Option<&[RubricCriterion]>,
    ) -> EvalResult {
        if prediction.trim().is_empty() {
            return EvalResult::incorrect("Empty prediction");
        }

        match rubric {
            Some(criteria) if !criteria.is_empty() => self.evaluate_rubric(prediction, criteria),
            _ => self.evaluate_similarity(prediction, expected),
        }
    }

    fn evaluate_rubric(&self, prediction: &str, rubric: &[RubricCriterion]) -> EvalResult {
        let prediction_elements = extract_key_elements(prediction);
        let prediction_lower = prediction.to_lowercase();

        let mut met = Vec::new();
        let mut unmet = Vec::new();
        let mut skipped = Vec::new();

        for criterion in rubric {
            match &criterion.operator {
                CriterionOperator::Correctness => {
                    if criterion.is_satisfied_by(&prediction_elements, &prediction_lower) {
                        met.push(criterion.criteria.as_str());
                    } else {
                        unmet.push(criterion.criteria.as_str());
                    }
                }
                CriterionOperator::Other(name) => {
                    warn!(operator = %name, "Skipping rubric criterion with unsupported operator");
                    skipped.push(format!("{} ({})", criterion.criteria, name));
                }
            }
        }

        let scored = met.len() + unmet.len();
        let mut feedback = Vec::new();
        if !met.is_empty() {
            feedback.push(format!("Met: {}", met.join("; ")));
        }
        if !unmet.is_empty() {
            feedback.push(format!("Unmet: {}", unmet.join("; ")));
        }
        if !skipped.is_empty() {
            feedback.push(format!("Skipped: {}", skipped.join("; ")));
        }

        if scored == 0 {
            feedback.insert(0, "No scorable criteria".to_string());
            return EvalResult::incorrect(feedback.join(" | "));
        }

        let score = met.len() as f64 / scored as f64;
        debug!(met = met.len(), scored, score, "Rubric evaluation");

        feedback.insert(0, format!("{}/{} criteria met", met.len(), scored));
        EvalResult::scored(score, feedback.join(" | "))
    }

    fn evaluate_similarity(&self, prediction: &str, expected: Option<&str>) -> EvalResult {
        let Some(expected) = expected.map(str::trim).filter(|e| !e.is_empty()) else {
            return EvalResult::incorrect("No rubric and no expected answer to compare against");
        };

        let predicted = prediction.trim().to_lowercase();
        let target = expected.to_lowercase();

        if predicted == target || predicted.contains(&target) {
            return EvalResult::correct(format!(
                "Expected answer '{}' found in prediction",
                expected
            ));
        }

        let words: Vec<&str> = target.split_whitespace().collect();
        let found = words.iter().filter(|w| predicted.contains(*w)).count();
        let score = found as f64 / words.len() as f64;

        debug!(found, total = words.len(), score, "Text similarity fallback");

        EvalResult::scored(
            score,
            format!(
                "No rubric; {}/{} expected words found in prediction",
                found,
                words.len()
            ),
        )
    }
}
