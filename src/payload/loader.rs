use crate::error::{Error, Result};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Load candidate parameter names.
///
/// Blank lines are ignored and duplicates collapse to their first occurrence,
/// so the returned order is the file order.
pub fn load_wordlist<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| Error::WordlistUnreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let mut seen = HashSet::new();
    let words: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .filter(|l| seen.insert(l.to_string()))
        .map(|l| l.to_string())
        .collect();

    if words.is_empty() {
        return Err(Error::EmptyWordlist {
            path: path.to_path_buf(),
        });
    }

    tracing::debug!("Loaded wordlist with {} entries", words.len());
    Ok(words)
}
