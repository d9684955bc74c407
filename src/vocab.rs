//! Vocabulary of the volume metadata files
//!
//! Key names and fixed values shared by the accumulator and the renderer.

/// Top-level key holding the provider mapping
pub const PROVIDER_KEY: &str = "Provider";

/// Provider field holding bibliographic key/value pairs
pub const BIBLIOGRAPHIC_INFO_KEY: &str = "Bibliographic Info";

/// Provider field holding volume lists grouped by title
pub const LIST_OF_VOLUMES_KEY: &str = "List of Volumes";

/// Prefix of collision layer keys (`Resource-1`, `Resource-2`, ...)
pub const RESOURCE_PREFIX: &str = "Resource-";

/// Volume label field
pub const VOLUME_FIELD: &str = "Volume";

/// Volume year field
pub const YEAR_FIELD: &str = "Year";

/// Link to the digitized source
pub const URL_FIELD: &str = "URL";

/// METS identifier, used as a link and as the viewer parameter
pub const METS_FIELD: &str = "METS";

/// Rendered in place of a missing volume label or year
pub const MISSING_PLACEHOLDER: &str = "NA";

/// Glob pattern of metadata files, matched recursively below a folder
pub const METADATA_FILE_PATTERN: &str = "*_data.json";

/// Name of the page written into each leaf folder
pub const OUTPUT_FILE_NAME: &str = "data.html";

/// OCR viewer base; the METS identifier is appended verbatim
pub const OCR_VIEWER_BASE_URL: &str = "https://ocr.berd-nfdi.de/viewer?tx_dlf%5Bid%5D=";

/// Heading placed above every provider section
pub const PROVIDER_HEADING: &str = "Digital Volumes";

/// Build the collision layer key for the n-th encounter of a provider
pub fn resource_key(n: usize) -> String {
    format!("{}{}", RESOURCE_PREFIX, n)
}

/// Check whether a record key is a collision layer key
pub fn is_resource_key(key: &str) -> bool {
    key.starts_with(RESOURCE_PREFIX)
}
