//! Closed asset-type taxonomy for catalog entries.
//!
//! Every record imported from an external catalog (CivitAI,
//! HuggingFace, ComfyUI Registry) is classified into exactly one
//! [`AssetType`]. Provider-specific type strings are mapped into this
//! enum at the normalization boundary; nothing downstream ever sees a
//! raw provider taxonomy string.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Internal classification for an importable asset.
///
/// Serialized as `snake_case` strings, matching the values stored in
/// the `models.model_type` and `custom_nodes.kind` columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetType {
    /// Full diffusion model checkpoint.
    Checkpoint,
    /// Low-rank adaptation weights (includes LoCon/LyCORIS/DoRA variants).
    Lora,
    /// ControlNet conditioning model.
    Controlnet,
    /// Variational autoencoder.
    Vae,
    /// Textual-inversion embedding.
    Embedding,
    /// Image upscaling model (ESRGAN and friends).
    Upscaler,
    /// AnimateDiff-style motion module.
    MotionModule,
    /// ComfyUI custom node package.
    CustomNode,
    /// Anything the taxonomy does not cover.
    Other,
}

/// All taxonomy values, in display order.
pub const ALL_ASSET_TYPES: &[AssetType] = &[
    AssetType::Checkpoint,
    AssetType::Lora,
    AssetType::Controlnet,
    AssetType::Vae,
    AssetType::Embedding,
    AssetType::Upscaler,
    AssetType::MotionModule,
    AssetType::CustomNode,
    AssetType::Other,
];

impl AssetType {
    /// The canonical string form, identical to the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Checkpoint => "checkpoint",
            AssetType::Lora => "lora",
            AssetType::Controlnet => "controlnet",
            AssetType::Vae => "vae",
            AssetType::Embedding => "embedding",
            AssetType::Upscaler => "upscaler",
            AssetType::MotionModule => "motion_module",
            AssetType::CustomNode => "custom_node",
            AssetType::Other => "other",
        }
    }

    /// Whether this type describes model weights (as opposed to a
    /// custom node package).
    pub fn is_model(&self) -> bool {
        !matches!(self, AssetType::CustomNode)
    }
}

impl std::fmt::Display for AssetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a canonical taxonomy string back into an [`AssetType`].
///
/// Used when reading rows written by earlier versions of the importer.
/// Unknown strings are rejected rather than folded into
/// [`AssetType::Other`] so that schema drift is caught loudly.
pub fn parse_asset_type(s: &str) -> Result<AssetType, CoreError> {
    ALL_ASSET_TYPES
        .iter()
        .copied()
        .find(|t| t.as_str() == s)
        .ok_or_else(|| {
            CoreError::Validation(format!(
                "Unknown asset type: '{s}'. Valid types: {}",
                ALL_ASSET_TYPES
                    .iter()
                    .map(|t| t.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_canonical_string() {
        for &t in ALL_ASSET_TYPES {
            assert_eq!(parse_asset_type(t.as_str()).unwrap(), t);
        }
    }

    #[test]
    fn unknown_string_rejected() {
        assert!(parse_asset_type("hypernetwork-v9").is_err());
        assert!(parse_asset_type("").is_err());
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&AssetType::MotionModule).unwrap();
        assert_eq!(json, "\"motion_module\"");
        let back: AssetType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, AssetType::MotionModule);
    }

    #[test]
    fn custom_node_is_not_a_model() {
        assert!(!AssetType::CustomNode.is_model());
        assert!(AssetType::Checkpoint.is_model());
    }
}
