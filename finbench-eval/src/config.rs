//! Configuration management for the scoring harness
//!
//! Loads evaluation settings from TOML files and builds graders from them.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::{Benchmark, Evaluator, RubricEvaluator, TaskTypedEvaluator};
use crate::tasks::Strategy;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub evaluation: EvaluationConfig,
    /// Extra task type identifiers mapped to a comparison strategy
    #[serde(default)]
    pub task_types: BTreeMap<String, Strategy>,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Grader selection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    #[serde(default)]
    pub benchmark: Benchmark,
    /// Task type applied to items that do not declare one
    #[serde(default)]
    pub default_task_type: Option<String>,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default = "default_true")]
    pub pretty_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            pretty_json: true,
        }
    }
}

fn default_true() -> bool { true }
fn default_output_dir() -> String { "results/runs".to_string() }

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load from default config location or return defaults
    pub fn load_or_default() -> Self {
        let config_paths = ["config/finbench.toml", "../config/finbench.toml"];

        for path in &config_paths {
            if !Path::new(path).exists() {
                continue;
            }
            match Self::from_file(path) {
                Ok(config) => {
                    tracing::info!("Loaded configuration from {}", path);
                    return config;
                }
                Err(e) => tracing::warn!("Ignoring invalid configuration {}: {}", path, e),
            }
        }

        tracing::info!("Using default configuration");
        Self::default()
    }

    /// Save configuration to a TOML file
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, content)?;
        Ok(())
    }

    /// Build the task-typed grader with the configured strategy mappings
    pub fn task_typed_evaluator(&self) -> TaskTypedEvaluator {
        TaskTypedEvaluator::new().with_strategies(
            self.task_types
                .iter()
                .map(|(task_type, strategy)| (task_type.as_str(), *strategy)),
        )
    }

    /// Build the grader for the configured benchmark
    pub fn evaluator(&self) -> Box<dyn Evaluator> {
        self.evaluator_for(self.evaluation.benchmark)
    }

    /// Build the grader for a specific benchmark, applying this configuration
    pub fn evaluator_for(&self, benchmark: Benchmark) -> Box<dyn Evaluator> {
        match benchmark {
            Benchmark::BizFinBench => Box::new(self.task_typed_evaluator()),
            Benchmark::PublicCsv => Box::new(RubricEvaluator::new()),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}
