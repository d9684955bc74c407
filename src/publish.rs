//! Page generation for a folder tree
//!
//! Every leaf folder below the root is accumulated, rendered and written as
//! its own page. Folders share no state; a failing folder is logged and the
//! walk moves on.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

use crate::collect::{accumulate, AccumulateStats, SkippedFile};
use crate::discover::find_leaf_folders;
use crate::error::PublishError;
use crate::render::{render, RenderOptions};
use crate::vocab::OUTPUT_FILE_NAME;

/// Options for page generation
#[derive(Debug, Clone)]
pub struct PublishOptions {
    /// File name of the page written into each leaf folder
    pub output_file_name: String,
    /// Render settings
    pub render: RenderOptions,
    /// Render pages without writing them
    pub dry_run: bool,
}

impl Default for PublishOptions {
    fn default() -> Self {
        Self {
            output_file_name: OUTPUT_FILE_NAME.to_string(),
            render: RenderOptions::default(),
            dry_run: false,
        }
    }
}

/// What happened to a single leaf folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderOutcome {
    /// Page written to this path
    Written(PathBuf),
    /// Page rendered but not written (dry run)
    Rendered(PathBuf),
    /// No provider data, nothing written
    Empty,
}

/// Result of processing one leaf folder
#[derive(Debug)]
pub struct FolderReport {
    pub outcome: FolderOutcome,
    pub skipped: Vec<SkippedFile>,
    pub stats: AccumulateStats,
}

/// Totals of a whole run
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Leaf folders visited
    pub leaf_folders: usize,
    /// Pages written (or rendered, in a dry run)
    pub written: usize,
    /// Leaf folders without provider data
    pub empty: usize,
    /// Leaf folders that failed
    pub failed: usize,
    /// Metadata files skipped as unreadable or malformed
    pub skipped_files: Vec<SkippedFile>,
}

/// Accumulate, render and write the page of one folder
pub fn process_folder(folder: &Path, options: &PublishOptions) -> Result<FolderReport, PublishError> {
    let accumulation = accumulate(folder)?;

    if accumulation.state.is_empty() {
        debug!("No provider data in {}", folder.display());
        return Ok(FolderReport {
            outcome: FolderOutcome::Empty,
            skipped: accumulation.skipped,
            stats: accumulation.stats,
        });
    }

    let html = render(&accumulation.state, &options.render).to_html();
    let output_path = folder.join(&options.output_file_name);

    let outcome = if options.dry_run {
        info!("Would generate HTML file in: {}", output_path.display());
        FolderOutcome::Rendered(output_path)
    } else {
        fs::write(&output_path, html).map_err(|e| PublishError::WriteError {
            path: output_path.display().to_string(),
            reason: e.to_string(),
        })?;
        info!("HTML file generated in: {}", output_path.display());
        FolderOutcome::Written(output_path)
    };

    Ok(FolderReport {
        outcome,
        skipped: accumulation.skipped,
        stats: accumulation.stats,
    })
}

/// Generate pages for every leaf folder below `root`
pub fn run(root: &Path, options: &PublishOptions) -> RunSummary {
    let leaves = find_leaf_folders(root);
    let mut summary = RunSummary {
        leaf_folders: leaves.len(),
        ..RunSummary::default()
    };

    for folder in leaves {
        match process_folder(&folder, options) {
            Ok(report) => {
                match report.outcome {
                    FolderOutcome::Written(_) | FolderOutcome::Rendered(_) => summary.written += 1,
                    FolderOutcome::Empty => summary.empty += 1,
                }
                summary.skipped_files.extend(report.skipped);
            }
            Err(e) => {
                error!("Failed to process {}: {}", folder.display(), e);
                summary.failed += 1;
            }
        }
    }

    summary
}
