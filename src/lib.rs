//! Volume Metadata Page Library
//!
//! This library merges the per-resource metadata files of digitized library
//! volumes and renders the result as a static page of collapsible sections.
//!
//! # Overview
//!
//! A publishing pipeline leaves `*_data.json` files scattered over a folder
//! tree. For every leaf folder (a directory without subdirectories) this
//! library:
//!
//! 1. Collects all metadata files below the folder
//! 2. Folds their providers into one combined state, layering records of
//!    providers that occur more than once as `Resource-1`, `Resource-2`, ...
//! 3. Renders providers, bibliographic information and volume lists as HTML
//! 4. Writes the page as `data.html` into the folder
//!
//! # Input format
//!
//! ```json
//! {
//!   "Provider": {
//!     "Some Library": {
//!       "Bibliographic Info": { "Title": "Annalen", "Place": "Leipzig" },
//!       "List of Volumes": {
//!         "Annalen": [
//!           { "Volume": "1", "Year": "1850", "URL": "https://...", "METS": "https://..." }
//!         ]
//!       }
//!     }
//!   }
//! }
//! ```
//!
//! # Usage
//!
//! ## Render a single folder
//!
//! ```ignore
//! use volume_html::{accumulate, render, RenderOptions};
//!
//! let accumulation = accumulate(Path::new("volumes/annalen"))?;
//! for skipped in &accumulation.skipped {
//!     eprintln!("{}: {}", skipped.path.display(), skipped.reason);
//! }
//! let html = render(&accumulation.state, &RenderOptions::default()).to_html();
//! ```
//!
//! ## Process a whole tree
//!
//! ```ignore
//! use volume_html::{run, PublishOptions};
//!
//! let summary = run(Path::new("volumes"), &PublishOptions::default());
//! println!("{} pages written", summary.written);
//! ```

pub mod collect;
pub mod discover;
pub mod error;
pub mod html;
pub mod merge;
pub mod publish;
pub mod record;
pub mod render;
pub mod vocab;

// Re-export main types for convenience
pub use crate::collect::{accumulate, AccumulateStats, Accumulation, SkippedFile};
pub use crate::discover::find_leaf_folders;
pub use crate::error::PublishError;
pub use crate::merge::{CombinedState, FoldOutcome, ProviderEntry};
pub use crate::publish::{process_folder, run, FolderOutcome, FolderReport, PublishOptions, RunSummary};
pub use crate::record::{MetadataDocument, ProviderRecord, VolumeRecord};
pub use crate::render::{render, Document, RenderOptions};
pub use crate::vocab::{METADATA_FILE_PATTERN, OCR_VIEWER_BASE_URL, OUTPUT_FILE_NAME};
