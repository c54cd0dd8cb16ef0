//! Task type definitions and the strategy table

use std::convert::Infallible;

use serde::{Deserialize, Serialize};

/// Comparison strategy applied to a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// First number in each answer, compared with 1% relative tolerance
    Numeric,
    /// Comma-separated labels compared position by position
    Sequence,
    /// Trimmed, case-insensitive string equality
    Categorical,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Numeric => "numeric",
            Strategy::Sequence => "sequence",
            Strategy::Categorical => "categorical",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// BizFinBench task types
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TaskType {
    FinancialQuantitativeComputation,
    StockPricePredict,
    EventLogicReasoning,
    FinancialTimeReasoning,
    UserSentimentAnalysis,
    AnomalousEventAttribution,
    FinancialNamedEntityRecognition,
    FinancialDataDescription,
    FinancialToolUsage,
    /// Any identifier outside the known set
    Other(String),
}

impl TaskType {
    pub fn all() -> Vec<TaskType> {
        vec![
            TaskType::FinancialQuantitativeComputation,
            TaskType::StockPricePredict,
            TaskType::EventLogicReasoning,
            TaskType::FinancialTimeReasoning,
            TaskType::UserSentimentAnalysis,
            TaskType::AnomalousEventAttribution,
            TaskType::FinancialNamedEntityRecognition,
            TaskType::FinancialDataDescription,
            TaskType::FinancialToolUsage,
        ]
    }

    pub fn as_str(&self) -> &str {
        match self {
            TaskType::FinancialQuantitativeComputation => "financial_quantitative_computation",
            TaskType::StockPricePredict => "stock_price_predict",
            TaskType::EventLogicReasoning => "event_logic_reasoning",
            TaskType::FinancialTimeReasoning => "financial_time_reasoning",
            TaskType::UserSentimentAnalysis => "user_sentiment_analysis",
            TaskType::AnomalousEventAttribution => "anomalous_event_attribution",
            TaskType::FinancialNamedEntityRecognition => "financial_named_entity_recognition",
            TaskType::FinancialDataDescription => "financial_data_description",
            TaskType::FinancialToolUsage => "financial_tool_usage",
            TaskType::Other(name) => name,
        }
    }

    /// Built-in strategy for this task type; unknown types compare categorically
    pub fn strategy(&self) -> Strategy {
        match self {
            TaskType::FinancialQuantitativeComputation | TaskType::StockPricePredict => {
                Strategy::Numeric
            }
            TaskType::EventLogicReasoning | TaskType::FinancialTimeReasoning => Strategy::Sequence,
            TaskType::UserSentimentAnalysis
            | TaskType::AnomalousEventAttribution
            | TaskType::FinancialNamedEntityRecognition
            | TaskType::FinancialDataDescription
            | TaskType::FinancialToolUsage
            | TaskType::Other(_) => Strategy::Categorical,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, TaskType::Other(_))
    }
}

impl std::str::FromStr for TaskType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        Ok(match normalized.as_str() {
            "financial_quantitative_computation" | "quantitative_computation" => {
                TaskType::FinancialQuantitativeComputation
            }
            "stock_price_predict" | "stock_price_prediction" => TaskType::StockPricePredict,
            "event_logic_reasoning" => TaskType::EventLogicReasoning,
            "financial_time_reasoning" => TaskType::FinancialTimeReasoning,
            "user_sentiment_analysis" | "sentiment_analysis" => TaskType::UserSentimentAnalysis,
            "anomalous_event_attribution" => TaskType::AnomalousEventAttribution,
            "financial_named_entity_recognition" => TaskType::FinancialNamedEntityRecognition,
            "financial_data_description" => TaskType::FinancialDataDescription,
            "financial_tool_usage" => TaskType::FinancialToolUsage,
            _ => TaskType::Other(normalized),
        })
    }
}

impl From<&str> for TaskType {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(task_type) => task_type,
            Err(never) => match never {},
        }
    }
}

impl std::fmt::Display for TaskType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_task_types_round_trip() {
        for task_type in TaskType::all() {
            assert_eq!(TaskType::from(task_type.as_str()), task_type);
            assert!(task_type.is_known());
        }
    }

    #[test]
    fn test_strategy_table() {
        assert_eq!(
            TaskType::from("financial_quantitative_computation").strategy(),
            Strategy::Numeric
        );
        assert_eq!(TaskType::from("event_logic_reasoning").strategy(), Strategy::Sequence);
        assert_eq!(TaskType::from("user_sentiment_analysis").strategy(), Strategy::Categorical);
    }

    #[test]
    fn test_unknown_task_type_falls_back() {
        let task_type = TaskType::from("Brand-New Task");
        assert_eq!(task_type, TaskType::Other("brand_new_task".to_string()));
        assert_eq!(task_type.strategy(), Strategy::Categorical);
        assert!(!task_type.is_known());
    }

    #[test]
    fn test_task_type_normalization() {
        assert_eq!(
            TaskType::from("  Event-Logic-Reasoning "),
            TaskType::EventLogicReasoning
        );
    }
}
