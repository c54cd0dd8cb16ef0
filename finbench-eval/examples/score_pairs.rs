//! Score prediction/expected pairs read from a JSON or JSONL file.
//!
//! Usage: cargo run -p finbench-eval --example score_pairs -- <items.jsonl> [task_type]

use finbench_eval::prelude::*;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <items.jsonl> [task_type]", args[0]);
        std::process::exit(1);
    }

    let mut items = load_items_from_file(&args[1])
        .unwrap_or_else(|e| panic!("Failed to load {}: {}", args[1], e));

    if let Some(task_type) = args.get(2) {
        for item in items.iter_mut().filter(|item| item.task_type.is_none()) {
            item.task_type = Some(task_type.clone());
        }
    }

    // Rubric items go through the rubric grader, everything else is task-typed
    let task_typed = TaskTypedEvaluator::new();
    let rubric = RubricEvaluator::new();
    let results: Vec<EvalResult> = items
        .iter()
        .map(|item| {
            if item.rubric.is_some() {
                rubric.evaluate_item(item)
            } else {
                task_typed.evaluate_item(item)
            }
        })
        .collect();

    for (item, result) in items.iter().zip(&results) {
        println!(
            "{:<36} {:>5.1}%  {}",
            item.task_type_key(),
            result.percentage(),
            result.feedback()
        );
    }

    let summary = aggregate_results(&results);
    println!(
        "\n{}/{} correct (accuracy {:.3}, mean score {:.3})",
        summary.correct_count, summary.count, summary.accuracy, summary.mean_score
    );

    for (task_type, by_type) in aggregate_by_task_type(&items, &results) {
        println!("  {:<34} {}/{}", task_type, by_type.correct_count, by_type.count);
    }
}
