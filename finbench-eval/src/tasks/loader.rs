//! Evaluation item loading from JSON and JSONL files

use std::path::Path;

use serde::Deserialize;

use super::EvalItem;

/// Error type for item loading
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Unsupported item file format: {0}")]
    UnsupportedFormat(String),
}

/// On-disk layout of an item file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemFormat {
    /// One JSON object per line
    JsonLines,
    /// A JSON array of items, or an object with an `items` array
    Json,
}

impl ItemFormat {
    /// Pick a format from a file extension
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("jsonl") | Some("ndjson") => Ok(ItemFormat::JsonLines),
            Some("json") => Ok(ItemFormat::Json),
            other => Err(LoadError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

/// Wrapped JSON form: `{ "items": [...] }`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ItemFile {
    Bare(Vec<EvalItem>),
    Wrapped { items: Vec<EvalItem> },
}

/// Load items from a `.json` or `.jsonl` file
pub fn load_items_from_file(path: impl AsRef<Path>) -> Result<Vec<EvalItem>, LoadError> {
    let path = path.as_ref();
    let format = ItemFormat::from_path(path)?;
    let content = std::fs::read_to_string(path)?;
    let items = load_items_from_string(&content, format)?;

    tracing::debug!("Loaded {} items from {:?}", items.len(), path);
    Ok(items)
}

/// Parse items from in-memory content
pub fn load_items_from_string(content: &str, format: ItemFormat) -> Result<Vec<EvalItem>, LoadError> {
    match format {
        ItemFormat::JsonLines => parse_json_lines(content),
        ItemFormat::Json => {
            let file: ItemFile = serde_json::from_str(content).map_err(|e| LoadError::Parse {
                line: e.line(),
                message: e.to_string(),
            })?;
            Ok(match file {
                ItemFile::Bare(items) => items,
                ItemFile::Wrapped { items } => items,
            })
        }
    }
}

fn parse_json_lines(content: &str) -> Result<Vec<EvalItem>, LoadError> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str(line).map_err(|e| LoadError::Parse {
                line: idx + 1,
                message: e.to_string(),
            })
        })
        .collect()
}

/// Load all item files from a directory, skipping files that fail to parse
pub fn load_items_from_directory(dir: impl AsRef<Path>) -> Result<Vec<EvalItem>, LoadError> {
    let mut paths: Vec<_> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| ItemFormat::from_path(path).is_ok())
        .collect();
    paths.sort();

    let mut all_items = Vec::new();
    for path in paths {
        match load_items_from_file(&path) {
            Ok(items) => all_items.extend(items),
            Err(e) => {
                tracing::warn!("Failed to load items from {:?}: {}", path, e);
            }
        }
    }

    Ok(all_items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::CriterionOperator;

    #[test]
    fn test_load_json_lines() {
        let content = r#"{"id": "q1", "prediction": "1.26", "expected": "1.2532", "task_type": "financial_quantitative_computation"}

{"id": "q2", "prediction": "2,1,4,3", "expected": "2,1,4,3", "task_type": "event_logic_reasoning"}
"#;

        let items = load_items_from_string(content, ItemFormat::JsonLines).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id.as_deref(), Some("q1"));
        assert_eq!(items[1].task_type.as_deref(), Some("event_logic_reasoning"));
    }

    #[test]
    fn test_json_lines_error_reports_line() {
        let content = "{\"prediction\": \"a\"}\n\n{not json}\n";
        match load_items_from_string(content, ItemFormat::JsonLines) {
            Err(LoadError::Parse { line, .. }) => assert_eq!(line, 3),
            other => panic!("Expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_wrapped_json_with_rubric() {
        let content = r#"{
            "items": [
                {
                    "prediction": "In Q3 2024, revenue growth was 15%",
                    "rubric": [
                        {"operator": "correctness", "criteria": "Q3 2024"},
                        {"operator": "contradiction", "criteria": "revenue fell"}
                    ]
                }
            ]
        }"#;

        let items = load_items_from_string(content, ItemFormat::Json).unwrap();
        let rubric = items[0].rubric.as_ref().unwrap();
        assert_eq!(rubric[0].operator, CriterionOperator::Correctness);
        assert_eq!(
            rubric[1].operator,
            CriterionOperator::Other("contradiction".to_string())
        );
    }

    #[test]
    fn test_load_bare_json_array() {
        let content = r#"[{"prediction": "positive", "expected": "positive"}]"#;
        let items = load_items_from_string(content, ItemFormat::Json).unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            ItemFormat::from_path(Path::new("items.jsonl")).unwrap(),
            ItemFormat::JsonLines
        );
        assert_eq!(
            ItemFormat::from_path(Path::new("items.json")).unwrap(),
            ItemFormat::Json
        );
        assert!(matches!(
            ItemFormat::from_path(Path::new("items.csv")),
            Err(LoadError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_load_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("a.jsonl"),
            "{\"prediction\": \"1\", \"expected\": \"1\"}\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("b.json"),
            r#"[{"prediction": "2", "expected": "2"}]"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("broken.jsonl"), "oops\n").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let items = load_items_from_directory(dir.path()).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].prediction, "1");
        assert_eq!(items[1].prediction, "2");
    }
}
