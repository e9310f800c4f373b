//! Shared foundation for the ComfyForge admin backend.
//!
//! Zero-internal-dependency building blocks used by the catalog
//! integrations and (eventually) the API/repository layer: the core
//! error type, the closed asset-type taxonomy, source-URL detection,
//! and display formatting helpers.

pub mod display;
pub mod error;
pub mod source;
pub mod taxonomy;

pub use error::CoreError;
pub use taxonomy::AssetType;
