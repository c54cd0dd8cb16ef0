//! FinBench evaluation CLI

use std::path::PathBuf;

use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use finbench_eval::{
    analysis::{extract_key_elements, Benchmark},
    config::Config,
    reporting::{print_console_report, JsonSummary},
    tasks::{load_items_from_directory, load_items_from_file, TaskType},
};

#[derive(Parser)]
#[command(name = "finbench-eval")]
#[command(about = "Deterministic scoring for financial question-answering benchmarks")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a file or directory of evaluation items
    Score {
        /// Path to a .json/.jsonl item file or a directory of them
        #[arg(short, long)]
        input: PathBuf,

        /// Benchmark grader (bizfinbench, public-csv); defaults to the config value
        #[arg(short, long)]
        benchmark: Option<Benchmark>,

        /// Task type for items that do not declare one
        #[arg(short, long)]
        task_type: Option<String>,

        /// Write the JSON summary to this path instead of <output_dir>/<run_id>.json
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Score a single prediction against an expected answer
    Compare {
        #[arg(short, long)]
        prediction: String,

        #[arg(short, long)]
        expected: String,

        #[arg(short, long)]
        task_type: String,
    },

    /// Print the key elements extracted from a text
    Extract {
        #[arg(short, long)]
        text: String,
    },

    /// List known task types and their comparison strategy
    ListTaskTypes,

    /// Generate sample configuration
    InitConfig {
        /// Output path for configuration file
        #[arg(short, long, default_value = "config/finbench.toml")]
        output: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("finbench_eval=debug,info")
    } else {
        EnvFilter::new("finbench_eval=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load_or_default(),
    };

    match cli.command {
        Commands::Score {
            input,
            benchmark,
            task_type,
            output,
        } => {
            score_items(&config, input, benchmark, task_type, output)?;
        }

        Commands::Compare {
            prediction,
            expected,
            task_type,
        } => {
            let result = config
                .task_typed_evaluator()
                .evaluate(&prediction, &expected, &task_type);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }

        Commands::Extract { text } => {
            for element in extract_key_elements(&text) {
                println!("{}", element);
            }
        }

        Commands::ListTaskTypes => {
            list_task_types(&config);
        }

        Commands::InitConfig { output } => {
            Config::default().save_toml(&output)?;
            println!("Configuration written to {}", output.display());
        }
    }

    Ok(())
}

fn score_items(
    config: &Config,
    input: PathBuf,
    benchmark: Option<Benchmark>,
    task_type: Option<String>,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let started_at = Utc::now();
    let run_id = started_at.format("%Y%m%d-%H%M%S").to_string();

    let mut items = if input.is_dir() {
        load_items_from_directory(&input)?
    } else {
        load_items_from_file(&input)?
    };

    if items.is_empty() {
        return Err(format!("No evaluation items found in {}", input.display()).into());
    }

    let fallback_task_type = task_type.or_else(|| config.evaluation.default_task_type.clone());
    if let Some(fallback) = &fallback_task_type {
        for item in items.iter_mut().filter(|item| item.task_type.is_none()) {
            item.task_type = Some(fallback.clone());
        }
    }

    let benchmark = benchmark.unwrap_or(config.evaluation.benchmark);
    let evaluator = config.evaluator_for(benchmark);

    tracing::info!(
        run_id = %run_id,
        benchmark = %benchmark,
        items = items.len(),
        "Scoring evaluation items"
    );

    let results = evaluator.evaluate_items(&items);
    let summary = JsonSummary::from_results(&run_id, evaluator.name(), &items, &results);

    print_console_report(&summary);

    let path = output.unwrap_or_else(|| {
        PathBuf::from(&config.output.output_dir).join(format!("{}.json", run_id))
    });
    summary.write_to_file(&path, config.output.pretty_json)?;
    println!("Summary written to {}", path.display());

    Ok(())
}

fn list_task_types(config: &Config) {
    let evaluator = config.task_typed_evaluator();

    println!("{:<40} {}", "Task Type", "Strategy");
    println!("{:-<52}", "");
    for task_type in TaskType::all() {
        println!(
            "{:<40} {}",
            task_type.as_str(),
            evaluator.strategy_for(&task_type).as_str()
        );
    }
    for name in config.task_types.keys() {
        let task_type = TaskType::from(name.as_str());
        if !task_type.is_known() {
            println!(
                "{:<40} {}",
                task_type.as_str(),
                evaluator.strategy_for(&task_type).as_str()
            );
        }
    }
    println!(
        "{:<40} {}",
        "(other)",
        TaskType::Other(String::new()).strategy().as_str()
    );
}
