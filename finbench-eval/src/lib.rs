//! Scoring engine for financial question-answering benchmarks
//!
//! This crate grades model answers against reference answers without calling
//! a judge model. All matching is deterministic number and pattern extraction.
//!
//! # Features
//!
//! - Task-typed grading: numeric answers within 1% relative tolerance,
//!   ordered event sequences, and case-insensitive classification labels
//! - Rubric grading with partial credit from key elements (quantities,
//!   proper names, tickers)
//! - Batch evaluation and summary statistics
//! - JSON/JSONL item loading, TOML configuration and JSON run summaries
//!
//! # Example
//!
//! ```
//! use finbench_eval::{
//!     analysis::{aggregate_results, RubricCriterion, RubricEvaluator, TaskTypedEvaluator},
//! };
//!
//! let evaluator = TaskTypedEvaluator::new();
//! let result = evaluator.evaluate("The answer is 1.26", "1.2532", "financial_quantitative_computation");
//! assert!(result.is_correct());
//!
//! let rubric = vec![
//!     RubricCriterion::correctness("Q3 2024"),
//!     RubricCriterion::correctness("revenue growth"),
//! ];
//! let partial = RubricEvaluator::new().evaluate("Q3 2024 results", None, Some(&rubric));
//! assert_eq!(partial.score(), 0.5);
//!
//! let summary = aggregate_results(&[result, partial]);
//! assert_eq!(summary.correct_count, 1);
//! ```

pub mod analysis;
pub mod config;
pub mod reporting;
pub mod tasks;

pub use config::Config;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::analysis::{
        aggregate_by_task_type, aggregate_results, extract_key_elements, Benchmark,
        CriterionOperator, EvalError, EvalResult, Evaluator, ResultSummary, RubricCriterion,
        RubricEvaluator, TaskTypedEvaluator,
    };
    pub use crate::config::{Config, ConfigError};
    pub use crate::reporting::{print_console_report, JsonSummary};
    pub use crate::tasks::{
        load_items_from_file, EvalItem, ItemFormat, LoadError, Strategy, TaskType,
    };
}
