//! External catalog clients for the ComfyForge admin backend.
//!
//! This crate provides the building blocks the importer integrations
//! share:
//!
//! - [`RateLimiter`] — sliding-window request admission, one limiter
//!   per client instance.
//! - [`CatalogHttp`] — GET + bearer auth + error classification over
//!   [`reqwest`], used by all three provider clients.
//! - [`CivitaiClient`], [`HuggingFaceClient`], [`RegistryClient`] —
//!   typed wrappers over the CivitAI, HuggingFace, and ComfyUI
//!   Registry APIs, each preserving its provider's pagination policy.
//! - [`normalize`] — pure functions mapping provider records into the
//!   internal [`NormalizedEntry`] shape.
//!
//! Clients are constructed per request with injected credentials;
//! nothing in this crate holds global state. Normalized entries are
//! recomputed on every fetch and never persisted here — storage is the
//! repository layer's concern.

pub mod civitai;
pub mod config;
pub mod error;
pub mod http;
pub mod huggingface;
pub mod normalize;
pub mod rate_limit;
pub mod registry;

pub use civitai::CivitaiClient;
pub use config::ProviderConfig;
pub use error::CatalogError;
pub use http::CatalogHttp;
pub use huggingface::HuggingFaceClient;
pub use normalize::{NormalizedEntry, SafetyFlags};
pub use rate_limit::RateLimiter;
pub use registry::RegistryClient;
