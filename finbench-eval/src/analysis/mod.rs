//! Scoring framework
//!
//! Two graders share the [`Evaluator`] contract:
//!
//! - [`TaskTypedEvaluator`] dispatches on a task type to numeric,
//!   ordered-sequence or categorical matching.
//! - [`RubricEvaluator`] awards partial credit for covering the key elements
//!   of each correctness criterion.
//!
//! Every grader is pure and holds no per-call state, so items can be scored
//! from any number of threads.

pub mod extract;
pub mod result;
pub mod rubric;
pub mod task_typed;

pub use extract::{extract_first_number, extract_key_elements};
pub use result::{aggregate_results, EvalResult, ResultSummary, DEFAULT_MAX_SCORE};
pub use rubric::{CriterionOperator, RubricCriterion, RubricEvaluator};
pub use task_typed::{EvalError, TaskTypedEvaluator, NUMERIC_RELATIVE_TOLERANCE};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::tasks::EvalItem;

/// Common contract for all graders
pub trait Evaluator: Send + Sync {
    /// Benchmark name reported alongside results
    fn name(&self) -> &'static str;

    /// Score a single item
    fn evaluate_item(&self, item: &EvalItem) -> EvalResult;

    /// Score items in order
    fn evaluate_items(&self, items: &[EvalItem]) -> Vec<EvalResult> {
        items.iter().map(|item| self.evaluate_item(item)).collect()
    }

    fn aggregate_results(&self, results: &[EvalResult]) -> ResultSummary {
        aggregate_results(results)
    }
}

impl Evaluator for TaskTypedEvaluator {
    fn name(&self) -> &'static str {
        Benchmark::BizFinBench.as_str()
    }

    fn evaluate_item(&self, item: &EvalItem) -> EvalResult {
        self.evaluate(
            &item.prediction,
            item.expected.as_deref().unwrap_or_default(),
            item.task_type.as_deref().unwrap_or_default(),
        )
    }
}

impl Evaluator for RubricEvaluator {
    fn name(&self) -> &'static str {
        Benchmark::PublicCsv.as_str()
    }

    fn evaluate_item(&self, item: &EvalItem) -> EvalResult {
        self.evaluate(
            &item.prediction,
            item.expected.as_deref(),
            item.rubric.as_deref(),
        )
    }
}

/// Benchmark families and their graders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Benchmark {
    /// Task-typed numeric, sequence and classification items
    #[default]
    #[serde(rename = "bizfinbench")]
    BizFinBench,
    /// Free-text answers graded by correctness rubrics
    PublicCsv,
}

impl Benchmark {
    pub fn all() -> Vec<Benchmark> {
        vec![Benchmark::BizFinBench, Benchmark::PublicCsv]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Benchmark::BizFinBench => "bizfinbench",
            Benchmark::PublicCsv => "public-csv",
        }
    }

    /// Grader for this benchmark with the built-in strategy table
    pub fn evaluator(&self) -> Box<dyn Evaluator> {
        match self {
            Benchmark::BizFinBench => Box::new(TaskTypedEvaluator::new()),
            Benchmark::PublicCsv => Box::new(RubricEvaluator::new()),
        }
    }
}

impl std::str::FromStr for Benchmark {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "bizfinbench" | "biz-fin-bench" | "task-typed" => Ok(Benchmark::BizFinBench),
            "public-csv" | "publiccsv" | "rubric" => Ok(Benchmark::PublicCsv),
            _ => Err(format!("Unknown benchmark: {}", s)),
        }
    }
}

impl std::fmt::Display for Benchmark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Summaries grouped by each item's task type.
///
/// Items and results are paired by position; extra entries on either side
/// are ignored.
pub fn aggregate_by_task_type(
    items: &[EvalItem],
    results: &[EvalResult],
) -> BTreeMap<String, ResultSummary> {
    let mut grouped: BTreeMap<String, Vec<EvalResult>> = BTreeMap::new();

    for (item, result) in items.iter().zip(results) {
        grouped
            .entry(item.task_type_key())
            .or_default()
            .push(result.clone());
    }

    grouped
        .into_iter()
        .map(|(task_type, results)| (task_type, aggregate_results(&results)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_benchmark_parse() {
        assert_eq!("BizFinBench".parse::<Benchmark>(), Ok(Benchmark::BizFinBench));
        assert_eq!("public_csv".parse::<Benchmark>(), Ok(Benchmark::PublicCsv));
        assert!("mmlu".parse::<Benchmark>().is_err());

        for benchmark in Benchmark::all() {
            assert_eq!(benchmark.as_str().parse::<Benchmark>(), Ok(benchmark));
            assert_eq!(benchmark.evaluator().name(), benchmark.as_str());
        }
    }

    #[test]
    fn test_task_typed_item_without_expected() {
        let evaluator = TaskTypedEvaluator::new();
        let item = EvalItem {
            prediction: "1.0".to_string(),
            task_type: Some("financial_quantitative_computation".to_string()),
            ..Default::default()
        };

        let result = evaluator.evaluate_item(&item);
        assert_eq!(result.score(), 0.0);
        assert_eq!(result.feedback(), "Empty expected answer");
    }

    #[test]
    fn test_aggregate_by_task_type() {
        let items = vec![
            EvalItem::new("1.0", "1.0").with_task_type("financial_quantitative_computation"),
            EvalItem::new("2.0", "3.0").with_task_type("financial_quantitative_computation"),
            EvalItem::new("positive", "positive").with_task_type("user_sentiment_analysis"),
            EvalItem::new("up", "down"),
        ];

        let evaluator = Benchmark::BizFinBench.evaluator();
        let results = evaluator.evaluate_items(&items);
        let by_type = aggregate_by_task_type(&items, &results);

        assert_eq!(by_type.len(), 3);
        let quant = &by_type["financial_quantitative_computation"];
        assert_eq!(quant.count, 2);
        assert_eq!(quant.correct_count, 1);
        assert_eq!(by_type["user_sentiment_analysis"].accuracy, 1.0);
        assert_eq!(by_type["unspecified"].accuracy, 0.0);
    }

    #[test]
    fn test_aggregate_by_task_type_normalizes_identifiers() {
        let items = vec![
            EvalItem::new("1,2", "1,2").with_task_type("event_logic_reasoning"),
            EvalItem::new("2,1", "1,2").with_task_type("Event-Logic-Reasoning"),
        ];

        let results = TaskTypedEvaluator::new().evaluate_items(&items);
        let by_type = aggregate_by_task_type(&items, &results);

        assert_eq!(by_type.len(), 1);
        assert_eq!(by_type["event_logic_reasoning"].count, 2);
        assert_eq!(by_type["event_logic_reasoning"].correct_count, 1);
    }
}
