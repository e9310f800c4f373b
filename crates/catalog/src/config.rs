//! Per-provider client configuration.
//!
//! Clients are built per request from an explicit [`ProviderConfig`]
//! carrying the injected credential — there are no global singleton
//! clients and no environment reads in this crate. The admin API layer
//! decrypts the stored token and passes it in.

use std::time::Duration;

/// CivitAI public API base URL.
pub const CIVITAI_BASE_URL: &str = "https://civitai.com/api/v1";
/// HuggingFace Hub API base URL.
pub const HUGGINGFACE_BASE_URL: &str = "https://huggingface.co";
/// ComfyUI Registry API base URL.
pub const REGISTRY_BASE_URL: &str = "https://api.comfy.org";

/// Configuration for one provider client instance.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// API base URL, without a trailing slash.
    pub base_url: String,
    /// Bearer token, when the admin has stored one for this provider.
    pub token: Option<String>,
    /// Maximum requests admitted per sliding window.
    pub max_requests: usize,
    /// Length of the sliding window.
    pub window: Duration,
}

impl ProviderConfig {
    /// Defaults for CivitAI. The public API is aggressive about
    /// throttling unauthenticated traffic, so the window is conservative.
    pub fn civitai() -> Self {
        Self {
            base_url: CIVITAI_BASE_URL.to_string(),
            token: None,
            max_requests: 10,
            window: Duration::from_secs(60),
        }
    }

    /// Defaults for the HuggingFace Hub API.
    pub fn huggingface() -> Self {
        Self {
            base_url: HUGGINGFACE_BASE_URL.to_string(),
            token: None,
            max_requests: 30,
            window: Duration::from_secs(60),
        }
    }

    /// Defaults for the ComfyUI Registry.
    pub fn registry() -> Self {
        Self {
            base_url: REGISTRY_BASE_URL.to_string(),
            token: None,
            max_requests: 30,
            window: Duration::from_secs(60),
        }
    }

    /// Attach a bearer token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Override the API base URL (used by tests to point at a mock
    /// server, and by self-hosted registry deployments).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the rate-limit knobs.
    pub fn with_rate_limit(mut self, max_requests: usize, window: Duration) -> Self {
        self.max_requests = max_requests;
        self.window = window;
        self
    }
}
