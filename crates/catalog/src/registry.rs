//! ComfyUI Registry API client.
//!
//! Wraps the `api.comfy.org` custom-node endpoints: page-based node
//! listing and search, node lookup, and version lookup for install
//! metadata.

use serde::Deserialize;

use crate::config::ProviderConfig;
use crate::error::CatalogError;
use crate::http::CatalogHttp;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Response envelope for node listings.
///
/// The registry mixes naming styles on the wire (`totalPages` but
/// `latest_version`), so renames are pinned per field rather than via
/// a blanket rule.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryNodeList {
    #[serde(default)]
    pub nodes: Vec<RegistryNode>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default, rename = "totalPages")]
    pub total_pages: Option<u32>,
}

/// A custom-node package as returned by the registry. Immutable once
/// fetched.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryNode {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub repository: Option<String>,
    #[serde(default)]
    pub license: Option<String>,
    #[serde(default)]
    pub downloads: u64,
    #[serde(default)]
    pub icon: Option<String>,
    /// Served in snake_case, unlike the list envelope's `totalPages`.
    #[serde(default)]
    pub latest_version: Option<RegistryNodeVersion>,
}

/// One published version of a node package.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryNodeVersion {
    pub version: String,
    #[serde(default, rename = "downloadUrl")]
    pub download_url: Option<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub changelog: Option<String>,
}

// ---------------------------------------------------------------------------
// Query construction
// ---------------------------------------------------------------------------

/// Page-based listing query for `GET /nodes`.
pub fn page_query(page: u32, limit: u32) -> Vec<(&'static str, String)> {
    vec![("page", page.to_string()), ("limit", limit.to_string())]
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Client for the ComfyUI Registry. The registry needs no credential
/// for reads, but [`ProviderConfig`] still carries one for parity with
/// the other providers (and for future write endpoints).
pub struct RegistryClient {
    http: CatalogHttp,
}

impl RegistryClient {
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            http: CatalogHttp::new("registry", config),
        }
    }

    /// List node packages. `GET /nodes`, page-based.
    pub async fn list_nodes(
        &self,
        page: u32,
        limit: u32,
    ) -> Result<RegistryNodeList, CatalogError> {
        self.http.get_json("/nodes", &page_query(page, limit)).await
    }

    /// Search node packages. `GET /nodes/search`, page-based.
    pub async fn search_nodes(
        &self,
        query: &str,
        page: u32,
        limit: u32,
    ) -> Result<RegistryNodeList, CatalogError> {
        let mut pairs = page_query(page, limit);
        pairs.push(("search", query.to_string()));
        self.http.get_json("/nodes/search", &pairs).await
    }

    /// Fetch one node package. `GET /nodes/{node_id}`.
    pub async fn get_node(&self, node_id: &str) -> Result<RegistryNode, CatalogError> {
        self.http.get_json(&format!("/nodes/{node_id}"), &[]).await
    }

    /// Fetch install metadata for a specific version.
    /// `GET /nodes/{node_id}/versions/{version}`.
    pub async fn get_node_version(
        &self,
        node_id: &str,
        version: &str,
    ) -> Result<RegistryNodeVersion, CatalogError> {
        self.http
            .get_json(&format!("/nodes/{node_id}/versions/{version}"), &[])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_is_page_based() {
        let pairs = page_query(2, 50);
        assert_eq!(
            pairs,
            vec![("page", "2".to_string()), ("limit", "50".to_string())]
        );
    }

    #[test]
    fn node_with_minimal_fields_deserializes() {
        let node: RegistryNode = serde_json::from_str(
            "{\"id\": \"comfyui-impact-pack\", \"name\": \"Impact Pack\"}",
        )
        .unwrap();
        assert_eq!(node.id, "comfyui-impact-pack");
        assert_eq!(node.downloads, 0);
        assert!(node.latest_version.is_none());
    }

    #[test]
    fn node_wire_shape_keeps_version_and_dependencies() {
        // Field casing as the registry actually serves it:
        // `latest_version`/`dependencies` in snake_case, `downloadUrl`
        // camel.
        let node: RegistryNode = serde_json::from_str(
            r#"{
                "id": "comfyui-impact-pack",
                "name": "Impact Pack",
                "latest_version": {
                    "version": "4.85.1",
                    "downloadUrl": "https://storage.example/impact-4.85.1.zip",
                    "dependencies": ["segment-anything"]
                }
            }"#,
        )
        .unwrap();

        let version = node.latest_version.unwrap();
        assert_eq!(
            version.download_url.as_deref(),
            Some("https://storage.example/impact-4.85.1.zip")
        );
        assert_eq!(version.dependencies, vec!["segment-anything"]);
    }
}
