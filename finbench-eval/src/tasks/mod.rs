//! Evaluation items and loading

pub mod categories;
pub mod loader;

pub use categories::{Strategy, TaskType};
pub use loader::{
    load_items_from_directory, load_items_from_file, load_items_from_string, ItemFormat, LoadError,
};

use serde::{Deserialize, Serialize};

use crate::analysis::RubricCriterion;

/// Task type key used when an item does not declare one
pub const UNSPECIFIED_TASK_TYPE: &str = "unspecified";

/// One benchmark row: a model answer plus whatever the grader needs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvalItem {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(alias = "response", alias = "answer")]
    pub prediction: String,
    #[serde(default, alias = "reference", alias = "gold")]
    pub expected: Option<String>,
    #[serde(default)]
    pub task_type: Option<String>,
    #[serde(default)]
    pub rubric: Option<Vec<RubricCriterion>>,
}

impl EvalItem {
    /// Create an item with a reference answer
    pub fn new(prediction: impl Into<String>, expected: impl Into<String>) -> Self {
        Self {
            prediction: prediction.into(),
            expected: Some(expected.into()),
            ..Default::default()
        }
    }

    /// Create an item graded only by a rubric
    pub fn with_rubric_only(prediction: impl Into<String>, rubric: Vec<RubricCriterion>) -> Self {
        Self {
            prediction: prediction.into(),
            rubric: Some(rubric),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_task_type(mut self, task_type: impl Into<String>) -> Self {
        self.task_type = Some(task_type.into());
        self
    }

    /// Normalized task type used for grouping, or [`UNSPECIFIED_TASK_TYPE`]
    pub fn task_type_key(&self) -> String {
        match self.task_type.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => TaskType::from(t).as_str().to_string(),
            _ => UNSPECIFIED_TASK_TYPE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_builders() {
        let item = EvalItem::new("1.26", "1.2532")
            .with_id("q-1")
            .with_task_type("financial_quantitative_computation");

        assert_eq!(item.id.as_deref(), Some("q-1"));
        assert_eq!(item.expected.as_deref(), Some("1.2532"));
        assert_eq!(item.task_type_key(), "financial_quantitative_computation");
    }

    #[test]
    fn test_unspecified_task_type() {
        assert_eq!(EvalItem::new("a", "b").task_type_key(), UNSPECIFIED_TASK_TYPE);
        assert_eq!(
            EvalItem::new("a", "b").with_task_type("  ").task_type_key(),
            UNSPECIFIED_TASK_TYPE
        );
    }

    #[test]
    fn test_task_type_key_is_normalized() {
        let item = EvalItem::new("a", "b").with_task_type(" Event-Logic-Reasoning ");
        assert_eq!(item.task_type_key(), "event_logic_reasoning");
    }

    #[test]
    fn test_deserialize_aliases() {
        let item: EvalItem =
            serde_json::from_str(r#"{"response": "positive", "gold": "Positive"}"#).unwrap();
        assert_eq!(item.prediction, "positive");
        assert_eq!(item.expected.as_deref(), Some("Positive"));
        assert!(item.rubric.is_none());
    }
}
