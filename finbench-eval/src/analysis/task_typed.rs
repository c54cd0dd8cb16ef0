//! Task-typed evaluation: numeric, ordered-sequence and categorical matching

use std::collections::HashMap;

use tracing::debug;

use super::extract::{extract_first_number, is_well_formed_token, split_sequence};
use super::result::EvalResult;
use crate::tasks::{Strategy, TaskType};

/// Relative tolerance for numeric answers, as a fraction of the expected value
pub const NUMERIC_RELATIVE_TOLERANCE: f64 = 0.01;

/// Error raised by batch evaluation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvalError {
    #[error("Length mismatch: {predictions} predictions vs {expected} expected answers")]
    LengthMismatch { predictions: usize, expected: usize },
}

/// Evaluator that picks a comparison strategy from the task type.
///
/// The built-in table lives on [`TaskType::strategy`]. Extra identifiers can
/// be mapped with [`TaskTypedEvaluator::with_strategy`]; those entries win over
/// the built-in table.
#[derive(Debug, Clone, Default)]
pub struct TaskTypedEvaluator {
    overrides: HashMap<String, Strategy>,
}

impl TaskTypedEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a task type identifier to a strategy
    pub fn with_strategy(mut self, task_type: impl AsRef<str>, strategy: Strategy) -> Self {
        let key = TaskType::from(task_type.as_ref()).as_str().to_string();
        self.overrides.insert(key, strategy);
        self
    }

    /// Add several identifier mappings at once
    pub fn with_strategies<I, K>(mut self, mappings: I) -> Self
    where
        I: IntoIterator<Item = (K, Strategy)>,
        K: AsRef<str>,
    {
        for (task_type, strategy) in mappings {
            self = self.with_strategy(task_type, strategy);
        }
        self
    }

    /// Strategy used for a task type after applying overrides
    pub fn strategy_for(&self, task_type: &TaskType) -> Strategy {
        self.overrides
            .get(task_type.as_str())
            .copied()
            .unwrap_or_else(|| task_type.strategy())
    }

    /// Score a prediction against the expected answer for a task type identifier
    pub fn evaluate(&self, prediction: &str, expected: &str, task_type: &str) -> EvalResult {
        self.evaluate_typed(prediction, expected, &TaskType::from(task_type))
    }

    /// Score a prediction against the expected answer for a parsed task type
    pub fn evaluate_typed(
        &self,
        prediction: &str,
        expected: &str,
        task_type: &TaskType,
    ) -> EvalResult {
        if prediction.trim().is_empty() {
            return EvalResult::incorrect("Empty prediction");
        }
        if expected.trim().is_empty() {
            return EvalResult::incorrect("Empty expected answer");
        }

        let strategy = self.strategy_for(task_type);
        let result = match strategy {
            Strategy::Numeric => compare_numeric(prediction, expected),
            Strategy::Sequence => compare_sequence(prediction, expected),
            Strategy::Categorical => compare_categorical(prediction, expected),
        };

        debug!(
            task_type = %task_type,
            strategy = %strategy,
            score = result.score(),
            "Task-typed evaluation"
        );

        result
    }

    /// Score predictions against expected answers position by position
    pub fn evaluate_batch<P, E>(
        &self,
        predictions: &[P],
        expected: &[E],
        task_type: &str,
    ) -> Result<Vec<EvalResult>, EvalError>
    where
        P: AsRef<str>,
        E: AsRef<str>,
    {
        if predictions.len() != expected.len() {
            return Err(EvalError::LengthMismatch {
                predictions: predictions.len(),
                expected: expected.len(),
            });
        }

        let task_type = TaskType::from(task_type);
        Ok(predictions
            .iter()
            .zip(expected)
            .map(|(p, e)| self.evaluate_typed(p.as_ref(), e.as_ref(), &task_type))
            .collect())
    }
}

/// Compare the first number of each answer with a 1% relative tolerance
fn compare_numeric(prediction: &str, expected: &str) -> EvalResult {
    let Some(predicted) = extract_first_number(prediction) else {
        return EvalResult::incorrect("Could not extract a number from the prediction");
    };
    let Some(target) = extract_first_number(expected) else {
        return EvalResult::incorrect("Could not extract a number from the expected answer");
    };

    let diff = (predicted - target).abs();
    if target == 0.0 {
        return if predicted == 0.0 {
            EvalResult::correct(format!("Numeric match: {} == 0 (exact)", predicted))
        } else {
            EvalResult::incorrect(format!(
                "Numeric mismatch: {} != 0 (zero target requires exact match)",
                predicted
            ))
        };
    }

    let tolerance = NUMERIC_RELATIVE_TOLERANCE * target.abs();
    if diff <= tolerance {
        EvalResult::correct(format!(
            "Numeric match: {} vs {} (diff {:.6} <= tolerance {:.6})",
            predicted, target, diff, tolerance
        ))
    } else {
        EvalResult::incorrect(format!(
            "Numeric mismatch: {} vs {} (diff {:.6} > tolerance {:.6})",
            predicted, target, diff, tolerance
        ))
    }
}

/// Compare comma-separated sequences element by element
fn compare_sequence(prediction: &str, expected: &str) -> EvalResult {
    let predicted = split_sequence(prediction);
    let target = split_sequence(expected);

    if predicted.len() != target.len() {
        return EvalResult::incorrect(format!(
            "Sequence length mismatch: predicted [{}] ({} items) vs expected [{}] ({} items)",
            predicted.join(","),
            predicted.len(),
            target.join(","),
            target.len()
        ));
    }

    let mismatch = predicted.iter().zip(&target).position(|(p, t)| {
        !is_well_formed_token(p) || !is_well_formed_token(t) || p != t
    });

    match mismatch {
        None => EvalResult::correct(format!("Sequence match: [{}]", target.join(","))),
        Some(index) => EvalResult::incorrect(format!(
            "Sequence mismatch at position {}: predicted [{}] vs expected [{}]",
            index,
            predicted.join(","),
            target.join(",")
        )),
    }
}

/// Compare trimmed, lower-cased labels
fn compare_categorical(prediction: &str, expected: &str) -> EvalResult {
    let predicted = prediction.trim().to_lowercase();
    let target = expected.trim().to_lowercase();

    if predicted == target {
        EvalResult::correct(format!("Category match: '{}'", target))
    } else {
        EvalResult::incorrect(format!(
            "Category mismatch: predicted '{}' vs expected '{}'",
            predicted, target
        ))
    }
}
