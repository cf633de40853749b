//! Passive pre-scan of the reference page for parameter names.
//!
//! Form fields, JavaScript variables and JSON-ish keys that also appear in the
//! wordlist are tested first. They get no other special treatment.

use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;

const FIELD_SELECTOR: &str = "input[name], select[name], textarea[name], button[name]";
const JS_VAR_PATTERN: &str = r"(?:var|let|const)\s+([A-Za-z_$][\w$]*)\s*=";
const JSON_KEY_PATTERN: &str = r#"["']([A-Za-z_][\w\-]*)["']\s*:"#;

/// Every candidate name found in `body`, in first-seen order.
pub fn extract_names(body: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();
    let mut push = |name: &str| {
        if !name.is_empty() && seen.insert(name.to_string()) {
            names.push(name.to_string());
        }
    };

    let document = Html::parse_document(body);
    if let Ok(selector) = Selector::parse(FIELD_SELECTOR) {
        for element in document.select(&selector) {
            if let Some(name) = element.value().attr("name") {
                push(name.trim());
            }
        }
    }

    for pattern in [JS_VAR_PATTERN, JSON_KEY_PATTERN] {
        if let Ok(re) = Regex::new(pattern) {
            for caps in re.captures_iter(body) {
                if let Some(m) = caps.get(1) {
                    push(m.as_str());
                }
            }
        }
    }

    names
}

/// Names from `body` that are also in `wordlist`.
pub fn heuristic(body: &str, wordlist: &[String]) -> Vec<String> {
    let known: HashSet<&str> = wordlist.iter().map(String::as_str).collect();
    extract_names(body)
        .into_iter()
        .filter(|n| known.contains(n.as_str()))
        .collect()
}

/// Wordlist reordered so `found` names come first.
pub fn prioritize(wordlist: &[String], found: &[String]) -> Vec<String> {
    let found_set: HashSet<&str> = found.iter().map(String::as_str).collect();
    let mut ordered: Vec<String> = found.to_vec();
    ordered.extend(
        wordlist
            .iter()
            .filter(|w| !found_set.contains(w.as_str()))
            .cloned(),
    );
    ordered
}
