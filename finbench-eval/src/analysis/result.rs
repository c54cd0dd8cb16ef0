//! Evaluation results and summary statistics

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Default maximum score for a single evaluation
pub const DEFAULT_MAX_SCORE: f64 = 1.0;

/// Outcome of scoring one prediction against its reference.
///
/// Values are immutable once built. Constructors clamp `score` into
/// `[0, max_score]` and replace a non-positive or non-finite `max_score`
/// with [`DEFAULT_MAX_SCORE`].
#[derive(Debug, Clone, PartialEq)]
pub struct EvalResult {
    score: f64,
    max_score: f64,
    feedback: String,
}

impl EvalResult {
    /// Create a result with an explicit maximum score
    pub fn new(score: f64, max_score: f64, feedback: impl Into<String>) -> Self {
        let max_score = if max_score.is_finite() && max_score > 0.0 {
            max_score
        } else {
            DEFAULT_MAX_SCORE
        };
        let score = if score.is_nan() {
            0.0
        } else {
            score.clamp(0.0, max_score)
        };

        Self {
            score,
            max_score,
            feedback: feedback.into(),
        }
    }

    /// Create a result scored out of [`DEFAULT_MAX_SCORE`]
    pub fn scored(score: f64, feedback: impl Into<String>) -> Self {
        Self::new(score, DEFAULT_MAX_SCORE, feedback)
    }

    /// Full marks
    pub fn correct(feedback: impl Into<String>) -> Self {
        Self::scored(DEFAULT_MAX_SCORE, feedback)
    }

    /// Zero marks
    pub fn incorrect(feedback: impl Into<String>) -> Self {
        Self::scored(0.0, feedback)
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn max_score(&self) -> f64 {
        self.max_score
    }

    pub fn feedback(&self) -> &str {
        &self.feedback
    }

    /// Score as a percentage of the maximum
    pub fn percentage(&self) -> f64 {
        100.0 * self.score / self.max_score
    }

    /// Exact comparison against the maximum; partial credit is never "correct"
    pub fn is_correct(&self) -> bool {
        self.score == self.max_score
    }
}

impl Serialize for EvalResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("EvalResult", 5)?;
        state.serialize_field("score", &self.score)?;
        state.serialize_field("max_score", &self.max_score)?;
        state.serialize_field("percentage", &self.percentage())?;
        state.serialize_field("is_correct", &self.is_correct())?;
        state.serialize_field("feedback", &self.feedback)?;
        state.end()
    }
}

/// Summary statistics over a set of results
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultSummary {
    pub count: usize,
    pub correct_count: usize,
    pub accuracy: f64,
    pub mean_score: f64,
}

/// Reduce results into count, correct count, accuracy and mean score
pub fn aggregate_results(results: &[EvalResult]) -> ResultSummary {
    let count = results.len();
    if count == 0 {
        return ResultSummary::default();
    }

    let correct_count = results.iter().filter(|r| r.is_correct()).count();
    let total_score: f64 = results.iter().map(|r| r.score()).sum();

    ResultSummary {
        count,
        correct_count,
        accuracy: correct_count as f64 / count as f64,
        mean_score: total_score / count as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage() {
        let result = EvalResult::new(0.8, 1.0, "");
        assert_eq!(result.percentage(), 80.0);

        let result = EvalResult::new(3.0, 4.0, "");
        assert_eq!(result.percentage(), 75.0);
    }

    #[test]
    fn test_is_correct() {
        assert!(EvalResult::new(1.0, 1.0, "").is_correct());
        assert!(!EvalResult::new(0.5, 1.0, "").is_correct());
        assert!(!EvalResult::new(0.999_999, 1.0, "").is_correct());
    }

    #[test]
    fn test_constructor_clamps() {
        let over = EvalResult::new(1.5, 1.0, "");
        assert_eq!(over.score(), 1.0);

        let under = EvalResult::new(-0.2, 1.0, "");
        assert_eq!(under.score(), 0.0);

        let bad_max = EvalResult::new(0.5, 0.0, "");
        assert_eq!(bad_max.max_score(), DEFAULT_MAX_SCORE);

        let nan = EvalResult::new(f64::NAN, 1.0, "");
        assert_eq!(nan.score(), 0.0);
    }

    #[test]
    fn test_aggregate_results() {
        let results = vec![
            EvalResult::correct("a"),
            EvalResult::correct("b"),
            EvalResult::incorrect("c"),
        ];

        let summary = aggregate_results(&results);
        assert_eq!(summary.count, 3);
        assert_eq!(summary.correct_count, 2);
        assert_eq!(summary.accuracy, 2.0 / 3.0);
        assert_eq!(summary.mean_score, 2.0 / 3.0);
    }

    #[test]
    fn test_aggregate_partial_credit() {
        let results = vec![EvalResult::scored(0.5, ""), EvalResult::correct("")];

        let summary = aggregate_results(&results);
        assert_eq!(summary.correct_count, 1);
        assert_eq!(summary.accuracy, 0.5);
        assert_eq!(summary.mean_score, 0.75);
    }

    #[test]
    fn test_aggregate_empty() {
        let summary = aggregate_results(&[]);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.accuracy, 0.0);
        assert_eq!(summary.mean_score, 0.0);
    }

    #[test]
    fn test_serialized_fields() {
        let json = serde_json::to_value(EvalResult::scored(0.5, "half")).unwrap();
        assert_eq!(json["score"], 0.5);
        assert_eq!(json["percentage"], 50.0);
        assert_eq!(json["is_correct"], false);
        assert_eq!(json["feedback"], "half");
    }
}
