//! Pattern-based extraction of numbers, sequences and key elements

use indexmap::IndexSet;
use once_cell::sync::Lazy;
use regex::Regex;

/// Signed real number, optionally with thousands separators or a leading dot
static NUMBER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[-+]?(?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d+)?|[-+]?\.\d+")
        .expect("static regex is valid")
});

/// Monetary or numeric quantity with an optional unit suffix
static QUANTITY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\$?\d+(?:,\d{3})*(?:\.\d+)?(?:%|\s*(?:trillion|billion|million|thousand|percent|bn|mn)\b)?",
    )
    .expect("static regex is valid")
});

/// Two or more adjacent capitalized words
static PROPER_NAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Z][a-z]+(?:\s+[A-Z][a-z]+)+\b").expect("static regex is valid")
});

/// Standalone uppercase symbol of 2-5 letters
static TICKER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z]{2,5}\b").expect("static regex is valid"));

/// Extract the first parseable real number from free text.
///
/// Surrounding prose is ignored and thousands separators are dropped, so
/// `"Revenue was $1,234.5m"` yields `1234.5`.
pub fn extract_first_number(text: &str) -> Option<f64> {
    NUMBER_REGEX
        .find_iter(text)
        .find_map(|m| m.as_str().replace(',', "").parse::<f64>().ok())
}

/// Split a comma-separated answer into trimmed tokens
pub fn split_sequence(text: &str) -> Vec<&str> {
    text.split(',').map(str::trim).collect()
}

/// A sequence token is well formed when it is non-empty after trimming.
///
/// Tokens are compared as plain strings, so dates (`2024-03-15`), times
/// (`14:30`) and multi-word labels are all valid.
pub fn is_well_formed_token(token: &str) -> bool {
    !token.trim().is_empty()
}

/// Extract the normalized key elements of a text.
///
/// Three independent passes run in a fixed order: quantities, proper names,
/// tickers. Every element is lower-cased with internal whitespace collapsed.
/// Duplicates collapse into the first occurrence.
pub fn extract_key_elements(text: &str) -> IndexSet<String> {
    let mut elements = IndexSet::new();
    if text.trim().is_empty() {
        return elements;
    }

    for pattern in [&*QUANTITY_REGEX, &*PROPER_NAME_REGEX, &*TICKER_REGEX] {
        for m in pattern.find_iter(text) {
            elements.insert(normalize_element(m.as_str()));
        }
    }

    elements
}

fn normalize_element(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
