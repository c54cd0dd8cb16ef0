//! Results reporting

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use crate::analysis::{aggregate_by_task_type, aggregate_results, EvalResult, ResultSummary};
use crate::tasks::EvalItem;

/// Per-item row in a run summary
#[derive(Debug, Clone, Serialize)]
pub struct ItemReport {
    pub index: usize,
    pub id: Option<String>,
    pub task_type: String,
    #[serde(flatten)]
    pub result: EvalResult,
}

/// JSON summary export
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    pub run_id: String,
    pub timestamp: String,
    pub benchmark: String,
    pub summary: ResultSummary,
    pub by_task_type: BTreeMap<String, ResultSummary>,
    pub results: Vec<ItemReport>,
}

impl JsonSummary {
    /// Build a summary from scored items
    pub fn from_results(
        run_id: impl Into<String>,
        benchmark: impl Into<String>,
        items: &[EvalItem],
        results: &[EvalResult],
    ) -> Self {
        let rows = items
            .iter()
            .zip(results)
            .enumerate()
            .map(|(index, (item, result))| ItemReport {
                index,
                id: item.id.clone(),
                task_type: item.task_type_key(),
                result: result.clone(),
            })
            .collect();

        Self {
            run_id: run_id.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            benchmark: benchmark.into(),
            summary: aggregate_results(results),
            by_task_type: aggregate_by_task_type(items, results),
            results: rows,
        }
    }

    /// Serialize to JSON
    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }

    /// Write to JSON file
    pub fn write_to_file(&self, path: impl AsRef<Path>, pretty: bool) -> std::io::Result<()> {
        let json = self
            .to_json(pretty)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, json)
    }
}

/// Generate a console report
pub fn print_console_report(summary: &JsonSummary) {
    println!("\n=== {} Evaluation Results ===\n", summary.benchmark);
    println!("Run ID: {}", summary.run_id);
    print_summary_line("Overall", &summary.summary);

    if !summary.by_task_type.is_empty() {
        println!("\nBy Task Type:");
        println!("{:-<72}", "");
        for (task_type, task_summary) in &summary.by_task_type {
            print_summary_line(task_type, task_summary);
        }
    }

    let misses: Vec<_> = summary
        .results
        .iter()
        .filter(|row| !row.result.is_correct())
        .collect();
    if !misses.is_empty() {
        println!("\nIncorrect Items:");
        println!("{:-<72}", "");
        for row in misses {
            let label = row.id.clone().unwrap_or_else(|| format!("#{}", row.index));
            println!(
                "  {} [{}] {:.3}: {}",
                label,
                row.task_type,
                row.result.score(),
                row.result.feedback()
            );
        }
    }

    println!("\n{:=<72}", "");
}

fn print_summary_line(label: &str, summary: &ResultSummary) {
    println!(
        "  {:<40} {:>3}/{:<3} accuracy {:.3}  mean {:.3}",
        label, summary.correct_count, summary.count, summary.accuracy, summary.mean_score
    );
}
