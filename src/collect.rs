//! Collect and fold the metadata files of a folder
//!
//! Every file below the folder matching `*_data.json` is parsed and its
//! providers are folded into one [`CombinedState`]. Files that cannot be
//! read or parsed are reported and skipped; they never abort the folder.

use std::fs;
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::PublishError;
use crate::merge::{CombinedState, FoldOutcome};
use crate::record::MetadataDocument;
use crate::vocab::METADATA_FILE_PATTERN;

/// A metadata file that was left out of the combined state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Counters from accumulating one folder
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AccumulateStats {
    /// Matching files discovered
    pub files_found: usize,
    /// Files whose providers were folded
    pub files_merged: usize,
    /// Well-formed files without a `Provider` key
    pub files_without_provider: usize,
    /// Unreadable or malformed files
    pub files_skipped: usize,
    /// Provider records folded
    pub provider_encounters: usize,
    /// Folds that hit an already known provider name
    pub collisions: usize,
}

/// Result of accumulating a folder
#[derive(Debug, Default)]
pub struct Accumulation {
    pub state: CombinedState,
    pub skipped: Vec<SkippedFile>,
    pub stats: AccumulateStats,
}

/// List metadata files below `folder`, recursively, sorted by file name
///
/// Names starting with a dot never match.
pub fn find_metadata_files(folder: &Path) -> Result<Vec<PathBuf>, PublishError> {
    let pattern = Pattern::new(METADATA_FILE_PATTERN).map_err(|e| PublishError::InvalidPattern {
        pattern: METADATA_FILE_PATTERN.to_string(),
        reason: e.to_string(),
    })?;
    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    };

    let mut files = Vec::new();
    for entry in WalkDir::new(folder).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(e.into()),
            Err(e) => {
                warn!("Skipping unreadable path: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let matches = entry
            .file_name()
            .to_str()
            .map(|name| pattern.matches_with(name, options))
            .unwrap_or(false);
        if matches {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Read and parse one metadata file
pub fn load_document(path: &Path) -> Result<MetadataDocument, PublishError> {
    let content = fs::read_to_string(path).map_err(|e| PublishError::ReadError {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    Ok(MetadataDocument::from_json(&content)?)
}

/// Fold every metadata file below `folder` into a combined state
pub fn accumulate(folder: &Path) -> Result<Accumulation, PublishError> {
    let files = find_metadata_files(folder)?;
    let mut result = Accumulation::default();
    result.stats.files_found = files.len();

    for path in files {
        let document = match load_document(&path) {
            Ok(document) => document,
            Err(e) => {
                let reason = match e {
                    PublishError::Json(json) => {
                        let reason = json.to_string();
                        warn!("Invalid JSON at {}: {}", path.display(), reason);
                        reason
                    }
                    PublishError::ReadError { reason, .. } => {
                        warn!("Unreadable file {}: {}", path.display(), reason);
                        reason
                    }
                    other => {
                        let reason = other.to_string();
                        warn!("Skipping {}: {}", path.display(), reason);
                        reason
                    }
                };
                result.stats.files_skipped += 1;
                result.skipped.push(SkippedFile { path, reason });
                continue;
            }
        };

        if document.provider.is_none() {
            debug!("No provider data in {}", path.display());
            result.stats.files_without_provider += 1;
            continue;
        }

        let outcomes = result.state.fold_document(document);
        result.stats.files_merged += 1;
        result.stats.provider_encounters += outcomes.len();
        result.stats.collisions += outcomes
            .iter()
            .filter(|o| !matches!(o, FoldOutcome::Inserted))
            .count();
        debug!("Folded {} providers from {}", outcomes.len(), path.display());
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_find_metadata_files_recursive_and_filtered() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a_data.json", "{}");
        write(dir.path(), "nested/deeper/b_data.json", "{}");
        write(dir.path(), "c.json", "{}");
        write(dir.path(), "d_data.txt", "{}");
        fs::create_dir_all(dir.path().join("dir_data.json")).unwrap();

        let files = find_metadata_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a_data.json", "b_data.json"]);
    }

    #[test]
    fn test_single_file_single_provider() {
        let dir = TempDir::new().unwrap();
        let alpha = json!({
            "Bibliographic Info": {"Title": "Annalen"},
            "List of Volumes": {"Annalen": [{"Volume": "1", "Year": "1850"}]}
        });
        write(
            dir.path(),
            "x_data.json",
            &json!({"Provider": {"Alpha": alpha.clone()}}).to_string(),
        );

        let result = accumulate(dir.path()).unwrap();
        assert_eq!(result.state.len(), 1);
        assert_eq!(result.state.to_value(), json!({"Provider": {"Alpha": alpha}}));
        assert_eq!(result.stats.files_merged, 1);
        assert!(result.skipped.is_empty());
    }

    #[test]
    fn test_counter_spans_files() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a_data.json", r#"{"Provider": {"Alpha": {"n": 1}}}"#);
        write(dir.path(), "b_data.json", r#"{"Provider": {"Alpha": {"n": 2}, "Beta": {}}}"#);
        write(dir.path(), "c_data.json", r#"{"Provider": {"Alpha": {"n": 3}}}"#);

        let result = accumulate(dir.path()).unwrap();
        assert_eq!(
            result.state.to_value(),
            json!({
                "Provider": {
                    "Alpha": {
                        "Resource-1": {"n": 1},
                        "Resource-2": {"n": 2},
                        "Resource-3": {"n": 3}
                    },
                    "Beta": {}
                }
            })
        );
        assert_eq!(result.stats.provider_encounters, 4);
        assert_eq!(result.stats.collisions, 2);
    }

    #[test]
    fn test_malformed_file_is_skipped() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "good_data.json", r#"{"Provider": {"Alpha": {"n": 1}}}"#);
        write(dir.path(), "bad_data.json", r#"{"Provider": {"Alpha": "#);

        let result = accumulate(dir.path()).unwrap();
        assert_eq!(
            result.state.to_value(),
            json!({"Provider": {"Alpha": {"n": 1}}})
        );
        assert_eq!(result.skipped.len(), 1);
        assert!(result.skipped[0].path.ends_with("bad_data.json"));
        assert!(!result.skipped[0].reason.is_empty());
        assert_eq!(result.stats.files_skipped, 1);
        assert_eq!(result.stats.files_found, 2);
    }

    #[test]
    fn test_missing_provider_is_ignored() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "meta_data.json", r#"{"Title": "no providers here"}"#);

        let result = accumulate(dir.path()).unwrap();
        assert!(result.state.is_empty());
        assert!(result.skipped.is_empty());
        assert_eq!(result.stats.files_without_provider, 1);
    }

    #[test]
    fn test_folder_with_glob_characters() {
        let dir = TempDir::new().unwrap();
        let odd = dir.path().join("vol [1]");
        write(&odd, "a_data.json", r#"{"Provider": {"Alpha": {}}}"#);

        let result = accumulate(&odd).unwrap();
        assert_eq!(result.state.len(), 1);
    }

    #[test]
    fn test_top_level_array_is_ignored() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "list_data.json",
            r#"[{"Alpha": {"Bibliographic Info": {"Title": "x"}}}]"#,
        );

        let result = accumulate(dir.path()).unwrap();
        assert!(result.state.is_empty());
        assert!(result.skipped.is_empty());
        assert_eq!(result.stats.files_without_provider, 1);
    }

    #[test]
    fn test_dotfiles_are_not_metadata() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "._x_data.json", "\u{0}\u{5}binary");
        write(dir.path(), "x_data.json", r#"{"Provider": {"Alpha": {}}}"#);

        let result = accumulate(dir.path()).unwrap();
        assert_eq!(result.stats.files_found, 1);
        assert!(result.skipped.is_empty());
        assert_eq!(result.state.len(), 1);
    }

    #[test]
    fn test_unreadable_file_is_skipped_with_read_reason() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("latin1_data.json"), [0x7b, 0xff, 0xfe, 0x7d]).unwrap();

        let result = accumulate(dir.path()).unwrap();
        assert_eq!(result.skipped.len(), 1);
        assert!(!result.skipped[0].reason.contains("Failed to read"));
        assert_eq!(result.stats.files_skipped, 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_folder_with_non_utf8_name() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = TempDir::new().unwrap();
        let odd = dir.path().join(OsStr::from_bytes(b"vol\xff"));
        write(&odd, "a_data.json", r#"{"Provider": {"Alpha": {}}}"#);

        let result = accumulate(&odd).unwrap();
        assert_eq!(result.stats.files_found, 1);
        assert_eq!(result.state.len(), 1);
    }
}
