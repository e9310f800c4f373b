//! Source detection and URL helpers for external catalog records.
//!
//! The importer accepts URLs pasted by admins as well as URLs returned
//! by the catalog APIs themselves. These helpers classify a URL by
//! provider, extract a sensible filename, and produce a masked display
//! hint for stored API tokens.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Which external catalog a URL or record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogSource {
    Civitai,
    Huggingface,
    ComfyRegistry,
    /// A plain download URL with no known catalog behind it.
    Direct,
}

impl CatalogSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogSource::Civitai => "civitai",
            CatalogSource::Huggingface => "huggingface",
            CatalogSource::ComfyRegistry => "comfy_registry",
            CatalogSource::Direct => "direct",
        }
    }
}

impl std::fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a URL by its host.
pub fn detect_source(url: &str) -> CatalogSource {
    if url.contains("civitai.com") {
        CatalogSource::Civitai
    } else if url.contains("huggingface.co") || url.contains("hf.co") {
        CatalogSource::Huggingface
    } else if url.contains("comfy.org") {
        CatalogSource::ComfyRegistry
    } else {
        CatalogSource::Direct
    }
}

/// Require a non-empty http(s) URL.
pub fn validate_download_url(url: &str) -> Result<(), CoreError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(CoreError::Validation(
            "Download URL must not be empty".to_string(),
        ));
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(CoreError::Validation(format!(
            "Download URL must use http or https, got: '{url}'"
        )));
    }
    Ok(())
}

/// Best-effort filename from a download URL.
///
/// Takes the last non-empty path segment after stripping the query
/// string and fragment. Returns `"download"` when the URL has no
/// usable path.
pub fn extract_filename_from_url(url: &str) -> String {
    let without_query = url.split(['?', '#']).next().unwrap_or(url);

    let path = without_query
        .strip_prefix("https://")
        .or_else(|| without_query.strip_prefix("http://"))
        .map(|rest| rest.find('/').map(|i| &rest[i..]).unwrap_or(""))
        .unwrap_or(without_query);

    path.rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or("download")
        .to_string()
}

/// Masked display hint for a stored API token: `"...XXXX"`, or
/// `"****"` when the token is too short to reveal anything.
///
/// Counts characters rather than bytes, so tokens containing
/// multi-byte characters cannot split a character mid-boundary.
pub fn token_hint(token: &str) -> String {
    let char_count = token.chars().count();
    if char_count >= 4 {
        let suffix: String = token.chars().skip(char_count - 4).collect();
        format!("...{suffix}")
    } else {
        "****".to_string()
    }
}
