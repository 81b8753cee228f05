// src/discover/mod.rs

use anyhow::{Context, Result};
use glob::glob;
use std::path::PathBuf;
use tracing::warn;

/// Resolve `pattern` to the files it matches. No match yields an empty vec,
/// not an error.
///
/// Paths come back in whatever order the underlying directory walk produces
/// them; callers that need reproducibility must impose their own sort (the
/// pipeline sorts lexicographically before processing).
pub fn matching_files(pattern: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let entries = glob(pattern).with_context(|| format!("invalid glob pattern {pattern:?}"))?;
    for entry in entries {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(err) => warn!(pattern, %err, "unreadable path while matching"),
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn matches_only_files_under_the_pattern() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("IBOVDia_02-01-24.csv"), "x").unwrap();
        fs::write(dir.path().join("IBOVDia_03-01-24.csv"), "x").unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();
        fs::create_dir(dir.path().join("sub.csv")).unwrap();

        let pattern = format!("{}/*.csv", dir.path().display());
        let mut found = matching_files(&pattern).unwrap();
        found.sort();

        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["IBOVDia_02-01-24.csv", "IBOVDia_03-01-24.csv"]);
    }

    #[test]
    fn no_match_is_an_empty_vec() {
        let dir = TempDir::new().unwrap();
        let pattern = format!("{}/*.csv", dir.path().display());
        assert!(matching_files(&pattern).unwrap().is_empty());
    }

    #[test]
    fn broken_pattern_is_an_error() {
        assert!(matching_files("[").is_err());
    }
}
