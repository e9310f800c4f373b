//! CivitAI API client.
//!
//! Wraps the `civitai.com/api/v1` endpoints the importer needs:
//! model search, model lookup, version lookup, and version-by-hash
//! resolution (used to identify local files by AutoV2 hash).
//!
//! CivitAI paginates two ways. Plain listings accept a `page` number,
//! but text search only works with cursor pagination — sending `page`
//! together with `query` is rejected upstream. [`SearchParams`]
//! encodes the policy: a cursor always wins over a page, and a search
//! with a `query` switches to cursor mode automatically.

use serde::Deserialize;

use comfyforge_core::AssetType;

use crate::config::ProviderConfig;
use crate::error::CatalogError;
use crate::http::CatalogHttp;

// ---------------------------------------------------------------------------
// Search parameters / pagination policy
// ---------------------------------------------------------------------------

/// Parameters for `GET /models`.
#[derive(Debug, Clone, Default)]
pub struct SearchParams {
    /// Full-text search query. Forces cursor mode.
    pub query: Option<String>,
    /// Restrict results to one asset type.
    pub asset_type: Option<AssetType>,
    /// Page number (1-based). Ignored whenever a cursor or query is set.
    pub page: Option<u32>,
    /// Opaque continuation cursor from a previous response.
    pub cursor: Option<String>,
    /// Page size.
    pub limit: Option<u32>,
    /// Include NSFW-flagged models.
    pub nsfw: Option<bool>,
}

impl SearchParams {
    /// Build the query string pairs, applying the pagination policy:
    /// cursor beats page, and a `query` without a cursor suppresses
    /// `page` (first cursor page is implicit).
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if let Some(query) = &self.query {
            pairs.push(("query", query.clone()));
        }
        if let Some(t) = self.asset_type {
            if let Some(provider_type) = civitai_type_param(t) {
                pairs.push(("types", provider_type.to_string()));
            }
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(nsfw) = self.nsfw {
            pairs.push(("nsfw", nsfw.to_string()));
        }

        if let Some(cursor) = &self.cursor {
            pairs.push(("cursor", cursor.clone()));
        } else if self.query.is_none() {
            if let Some(page) = self.page {
                pairs.push(("page", page.to_string()));
            }
        }

        pairs
    }

    /// Parameters for the next page, given the metadata of the
    /// response this request produced. Returns `None` when the
    /// listing is exhausted.
    pub fn next(&self, meta: &CivitaiPageMeta) -> Option<SearchParams> {
        if let Some(cursor) = &meta.next_cursor {
            let mut next = self.clone();
            next.cursor = Some(cursor.clone());
            next.page = None;
            return Some(next);
        }

        // Page mode: continue while the server reports more pages.
        match (meta.current_page, meta.total_pages) {
            (Some(current), Some(total)) if current < total => {
                let mut next = self.clone();
                next.page = Some(current + 1);
                Some(next)
            }
            _ => None,
        }
    }
}

/// Map an internal [`AssetType`] to CivitAI's `types` filter value.
///
/// Returns `None` for types CivitAI has no equivalent for; the filter
/// is then simply omitted.
pub fn civitai_type_param(t: AssetType) -> Option<&'static str> {
    match t {
        AssetType::Checkpoint => Some("Checkpoint"),
        AssetType::Lora => Some("LORA"),
        AssetType::Controlnet => Some("Controlnet"),
        AssetType::Vae => Some("VAE"),
        AssetType::Embedding => Some("TextualInversion"),
        AssetType::Upscaler => Some("Upscaler"),
        AssetType::MotionModule => Some("MotionModule"),
        AssetType::CustomNode | AssetType::Other => None,
    }
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Response envelope for `GET /models`.
#[derive(Debug, Clone, Deserialize)]
pub struct CivitaiSearchResponse {
    pub items: Vec<CivitaiModel>,
    #[serde(default)]
    pub metadata: CivitaiPageMeta,
}

/// Pagination metadata. CivitAI fills different subsets of these
/// fields depending on whether the request was page- or cursor-based.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CivitaiPageMeta {
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub current_page: Option<u32>,
    #[serde(default)]
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub total_items: Option<u64>,
}

/// A model record as returned by CivitAI. Immutable once fetched.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CivitaiModel {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub model_type: String,
    #[serde(default)]
    pub nsfw: bool,
    /// Depicts a real person of interest.
    #[serde(default)]
    pub poi: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub allow_commercial_use: Option<CommercialUse>,
    #[serde(default)]
    pub model_versions: Vec<CivitaiModelVersion>,
}

/// CivitAI has shipped `allowCommercialUse` both as a single string
/// and as a list of permission strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CommercialUse {
    Single(String),
    Multiple(Vec<String>),
}

impl CommercialUse {
    /// Flatten to a normalized permission list.
    pub fn permissions(&self) -> Vec<&str> {
        match self {
            CommercialUse::Single(s) => vec![s.as_str()],
            CommercialUse::Multiple(v) => v.iter().map(String::as_str).collect(),
        }
    }
}

/// One published version of a model.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CivitaiModelVersion {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub base_model: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub files: Vec<CivitaiFile>,
    #[serde(default)]
    pub images: Vec<CivitaiImage>,
}

/// A downloadable file attached to a model version.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CivitaiFile {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "sizeKB")]
    pub size_kb: Option<f64>,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub primary: bool,
    #[serde(default)]
    pub virus_scan_result: Option<String>,
    #[serde(default)]
    pub pickle_scan_result: Option<String>,
}

/// A preview image attached to a model version.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CivitaiImage {
    pub url: String,
    /// NSFW level bitmask; 0/1 means safe-for-work.
    #[serde(default)]
    pub nsfw_level: Option<u32>,
}

impl CivitaiImage {
    pub fn is_sfw(&self) -> bool {
        self.nsfw_level.unwrap_or(0) <= 1
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Client for the CivitAI API. Construct one per request with the
/// admin's stored token injected via [`ProviderConfig`].
pub struct CivitaiClient {
    http: CatalogHttp,
}

impl CivitaiClient {
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            http: CatalogHttp::new("civitai", config),
        }
    }

    /// Search models. `GET /models`.
    pub async fn search_models(
        &self,
        params: &SearchParams,
    ) -> Result<CivitaiSearchResponse, CatalogError> {
        self.http.get_json("/models", &params.to_query()).await
    }

    /// Fetch one model with all its versions. `GET /models/{id}`.
    pub async fn get_model(&self, model_id: i64) -> Result<CivitaiModel, CatalogError> {
        self.http
            .get_json(&format!("/models/{model_id}"), &[])
            .await
    }

    /// Fetch one model version. `GET /model-versions/{id}`.
    pub async fn get_model_version(
        &self,
        version_id: i64,
    ) -> Result<CivitaiModelVersion, CatalogError> {
        self.http
            .get_json(&format!("/model-versions/{version_id}"), &[])
            .await
    }

    /// Resolve a model version from a file hash (AutoV2 or SHA256).
    /// `GET /model-versions/by-hash/{hash}`.
    pub async fn get_model_version_by_hash(
        &self,
        hash: &str,
    ) -> Result<CivitaiModelVersion, CatalogError> {
        self.http
            .get_json(&format!("/model-versions/by-hash/{hash}"), &[])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(pairs: &[(&'static str, String)]) -> Vec<&'static str> {
        pairs.iter().map(|(k, _)| *k).collect()
    }

    #[test]
    fn plain_listing_uses_page() {
        let params = SearchParams {
            page: Some(3),
            limit: Some(20),
            ..Default::default()
        };
        let pairs = params.to_query();
        assert!(pairs.contains(&("page", "3".to_string())));
        assert!(!keys(&pairs).contains(&"cursor"));
    }

    #[test]
    fn cursor_suppresses_page() {
        let params = SearchParams {
            page: Some(3),
            cursor: Some("abc123".to_string()),
            ..Default::default()
        };
        let pairs = params.to_query();
        assert!(pairs.contains(&("cursor", "abc123".to_string())));
        assert!(!keys(&pairs).contains(&"page"));
    }

    #[test]
    fn query_switches_to_cursor_mode() {
        let params = SearchParams {
            query: Some("sdxl lightning".to_string()),
            page: Some(2),
            ..Default::default()
        };
        let pairs = params.to_query();
        assert!(pairs.contains(&("query", "sdxl lightning".to_string())));
        assert!(!keys(&pairs).contains(&"page"));
        assert!(!keys(&pairs).contains(&"cursor"));
    }

    #[test]
    fn asset_type_maps_to_provider_filter() {
        let params = SearchParams {
            asset_type: Some(AssetType::Embedding),
            ..Default::default()
        };
        assert!(params
            .to_query()
            .contains(&("types", "TextualInversion".to_string())));

        // No CivitAI equivalent: filter omitted entirely.
        let params = SearchParams {
            asset_type: Some(AssetType::CustomNode),
            ..Default::default()
        };
        assert!(!keys(&params.to_query()).contains(&"types"));
    }

    #[test]
    fn next_prefers_cursor_over_page_counters() {
        let params = SearchParams {
            query: Some("flux".to_string()),
            ..Default::default()
        };
        let meta = CivitaiPageMeta {
            next_cursor: Some("cur-2".to_string()),
            current_page: Some(1),
            total_pages: Some(10),
            ..Default::default()
        };
        let next = params.next(&meta).unwrap();
        assert_eq!(next.cursor.as_deref(), Some("cur-2"));
        assert!(next.page.is_none());
        // And the built query must not carry `page`.
        assert!(!next.to_query().iter().any(|(k, _)| *k == "page"));
    }

    #[test]
    fn next_increments_page_in_page_mode() {
        let params = SearchParams {
            page: Some(2),
            ..Default::default()
        };
        let meta = CivitaiPageMeta {
            current_page: Some(2),
            total_pages: Some(5),
            ..Default::default()
        };
        assert_eq!(params.next(&meta).unwrap().page, Some(3));
    }

    #[test]
    fn next_stops_at_last_page() {
        let params = SearchParams::default();
        let meta = CivitaiPageMeta {
            current_page: Some(5),
            total_pages: Some(5),
            ..Default::default()
        };
        assert!(params.next(&meta).is_none());
    }

    #[test]
    fn commercial_use_accepts_both_shapes() {
        let single: CommercialUse = serde_json::from_str("\"Sell\"").unwrap();
        assert_eq!(single.permissions(), vec!["Sell"]);

        let multi: CommercialUse = serde_json::from_str("[\"Image\",\"RentCivit\"]").unwrap();
        assert_eq!(multi.permissions(), vec!["Image", "RentCivit"]);
    }
}
