//! Error taxonomy for catalog requests.
//!
//! Every failure mode of an outbound catalog call maps to exactly one
//! variant so route handlers can translate them into stable HTTP
//! responses. None of these trigger an automatic retry — the rate
//! limiter's self-throttling wait is the only delay this crate ever
//! inserts.

/// Errors from the catalog client layer.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The provider rejected our credentials (401 or 403).
    #[error("Catalog auth failed for {provider}: {message}")]
    Auth {
        provider: &'static str,
        message: String,
    },

    /// The requested record does not exist upstream (404).
    #[error("Not found on {provider}: {resource}")]
    NotFound {
        provider: &'static str,
        resource: String,
    },

    /// The provider throttled us (429). `retry_after_secs` is the
    /// parsed `Retry-After` header when the provider sent one.
    #[error("Rate limited by {provider}")]
    RateLimited {
        provider: &'static str,
        retry_after_secs: Option<u64>,
    },

    /// Any other non-2xx response. The body text is kept verbatim for
    /// debugging.
    #[error("Upstream error from {provider} ({status}): {body}")]
    Upstream {
        provider: &'static str,
        status: u16,
        body: String,
    },

    /// The HTTP request itself failed (DNS, TLS, connect, read).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A 2xx response whose body did not match the expected shape.
    #[error("Failed to decode {provider} response: {source}")]
    Decode {
        provider: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
