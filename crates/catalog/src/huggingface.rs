//! HuggingFace Hub API client.
//!
//! Wraps the `huggingface.co/api` model endpoints: offset/limit
//! search and repo lookup, plus download-URL construction for the
//! `resolve/main` file endpoint. Search results and repo records use
//! the same [`HfModel`] shape; search results just arrive with fewer
//! fields populated.

use serde::Deserialize;

use crate::config::ProviderConfig;
use crate::error::CatalogError;
use crate::http::CatalogHttp;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// A model repo as returned by the Hub API. Immutable once fetched.
///
/// The Hub serves these fields in snake_case (`pipeline_tag`), so the
/// field names are the wire names verbatim.
#[derive(Debug, Clone, Deserialize)]
pub struct HfModel {
    /// Repo identifier, e.g. `stabilityai/sdxl-vae`.
    pub id: String,
    #[serde(default)]
    pub pipeline_tag: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub gated: HfGated,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub downloads: u64,
    #[serde(default)]
    pub likes: u64,
    /// Files in the repo. Only populated on full lookups
    /// (`full=true` searches and single-repo fetches).
    #[serde(default)]
    pub siblings: Vec<HfSibling>,
}

/// The Hub reports `gated` as `false`, `"auto"`, or `"manual"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum HfGated {
    Flag(bool),
    Mode(String),
}

impl Default for HfGated {
    fn default() -> Self {
        HfGated::Flag(false)
    }
}

impl HfGated {
    /// Whether downloading requires accepting the repo's terms.
    pub fn is_gated(&self) -> bool {
        match self {
            HfGated::Flag(flag) => *flag,
            // Any gating mode string ("auto", "manual") means gated.
            HfGated::Mode(_) => true,
        }
    }
}

/// One file in a repo.
#[derive(Debug, Clone, Deserialize)]
pub struct HfSibling {
    pub rfilename: String,
    #[serde(default)]
    pub size: Option<u64>,
}

// ---------------------------------------------------------------------------
// Query construction
// ---------------------------------------------------------------------------

/// Build the offset/limit search query for `GET /api/models`.
///
/// `full=true` asks the Hub to include sibling file listings so the
/// normalizer can pick a weight file without a second round trip.
pub fn search_query(query: &str, limit: u32, offset: u32) -> Vec<(&'static str, String)> {
    vec![
        ("search", query.to_string()),
        ("limit", limit.to_string()),
        ("offset", offset.to_string()),
        ("full", "true".to_string()),
    ]
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Client for the HuggingFace Hub API. Construct one per request with
/// the admin's stored token injected via [`ProviderConfig`].
pub struct HuggingFaceClient {
    http: CatalogHttp,
}

impl HuggingFaceClient {
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            http: CatalogHttp::new("huggingface", config),
        }
    }

    /// Search model repos. `GET /api/models` with offset/limit paging.
    pub async fn search_models(
        &self,
        query: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<HfModel>, CatalogError> {
        self.http
            .get_json("/api/models", &search_query(query, limit, offset))
            .await
    }

    /// Fetch one repo with its file listing. `GET /api/models/{repo_id}`.
    pub async fn get_model(&self, repo_id: &str) -> Result<HfModel, CatalogError> {
        self.http
            .get_json(&format!("/api/models/{repo_id}"), &[])
            .await
    }

    /// Direct download URL for a file in a repo, via the
    /// `resolve/main` endpoint.
    pub fn resolve_download_url(&self, repo_id: &str, filename: &str) -> String {
        format!("{}/{repo_id}/resolve/main/{filename}", self.http.base_url())
    }
}
