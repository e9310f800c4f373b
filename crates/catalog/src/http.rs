//! Shared HTTP transport for catalog clients.
//!
//! [`CatalogHttp`] performs rate-limited GET requests against one
//! provider's API: admit through the sliding window, attach the bearer
//! token when present, classify non-2xx statuses into the
//! [`CatalogError`] taxonomy, and decode the JSON body.
//!
//! There is no timeout or cancellation propagation from the caller to
//! an in-flight fetch — a hung upstream blocks that request until the
//! socket gives up.

use serde::de::DeserializeOwned;

use crate::config::ProviderConfig;
use crate::error::CatalogError;
use crate::rate_limit::RateLimiter;

/// Rate-limited HTTP transport bound to one provider.
pub struct CatalogHttp {
    provider: &'static str,
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
    limiter: RateLimiter,
}

impl CatalogHttp {
    /// Build a transport from a provider config.
    ///
    /// `provider` is the short name used in errors and logs
    /// (`"civitai"`, `"huggingface"`, `"registry"`).
    pub fn new(provider: &'static str, config: &ProviderConfig) -> Self {
        Self {
            provider,
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            limiter: RateLimiter::new(config.max_requests, config.window),
        }
    }

    /// The provider short name this transport is bound to.
    pub fn provider(&self) -> &'static str {
        self.provider
    }

    /// The configured base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `{base_url}{path}` with the given query pairs and decode
    /// the JSON response body into `T`.
    ///
    /// Waits on the rate limiter before the request goes out. Non-2xx
    /// responses become typed [`CatalogError`]s carrying the status
    /// and body text; nothing is retried.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, CatalogError> {
        self.limiter.admit().await;

        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.get(&url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        tracing::debug!(provider = self.provider, %url, "Catalog GET");

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let retry_after = parse_retry_after(&response);
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::warn!(
                provider = self.provider,
                status = status.as_u16(),
                path,
                "Catalog request failed",
            );
            return Err(classify_status(
                self.provider,
                status.as_u16(),
                path,
                body,
                retry_after,
            ));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|source| CatalogError::Decode {
            provider: self.provider,
            source,
        })
    }
}

/// Map a non-2xx status into the error taxonomy.
pub fn classify_status(
    provider: &'static str,
    status: u16,
    resource: &str,
    body: String,
    retry_after_secs: Option<u64>,
) -> CatalogError {
    match status {
        401 | 403 => CatalogError::Auth {
            provider,
            message: body,
        },
        404 => CatalogError::NotFound {
            provider,
            resource: resource.to_string(),
        },
        429 => CatalogError::RateLimited {
            provider,
            retry_after_secs,
        },
        _ => CatalogError::Upstream {
            provider,
            status,
            body,
        },
    }
}

/// Parse a `Retry-After` header as whole seconds. The HTTP-date form
/// is ignored — the providers we talk to all send seconds.
fn parse_retry_after(response: &reqwest::Response) -> Option<u64> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}
