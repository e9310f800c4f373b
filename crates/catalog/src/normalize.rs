//! Normalization of provider records into the internal entry shape.
//!
//! Pure functions only: given the same raw record, every function here
//! returns the same output, with no side effects. This is the single
//! boundary where provider taxonomy strings, safety signals, and file
//! metadata get folded into [`NormalizedEntry`]; downstream code never
//! inspects raw provider fields.
//!
//! Entries are derived, recomputed on every fetch, and never persisted
//! by this crate.

use serde::Serialize;

use comfyforge_core::display::format_file_size;
use comfyforge_core::AssetType;

use crate::civitai::{CivitaiFile, CivitaiImage, CivitaiModel, CivitaiModelVersion};
use crate::config::HUGGINGFACE_BASE_URL;
use crate::huggingface::{HfModel, HfSibling};
use crate::registry::RegistryNode;

// ---------------------------------------------------------------------------
// Normalized shapes
// ---------------------------------------------------------------------------

/// Safety signals extracted from a catalog record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SafetyFlags {
    /// Flagged as not-safe-for-work by the provider.
    pub nsfw: bool,
    /// Depicts a real person of interest (CivitAI only).
    pub poi: bool,
    /// Malware/pickle scan verdict for the primary file: `Some(true)`
    /// when every reported scan passed, `Some(false)` when any scan
    /// did not, `None` when the provider reported no scans.
    pub scan_passed: Option<bool>,
}

/// A catalog record reduced to the fields the admin UI and importer
/// actually consume.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedEntry {
    /// Provider-scoped identifier (numeric for CivitAI, repo id for
    /// HuggingFace, package id for the registry).
    pub id: String,
    pub name: String,
    pub asset_type: AssetType,
    pub base_model: Option<String>,
    pub download_url: Option<String>,
    pub file_size_bytes: Option<u64>,
    /// Human-readable size; `"Unknown"` when the provider did not
    /// report one.
    pub formatted_size: String,
    pub thumbnail_url: Option<String>,
    pub safety: SafetyFlags,
    pub license: Option<String>,
}

// ---------------------------------------------------------------------------
// Taxonomy mapping
// ---------------------------------------------------------------------------

/// Map a CivitAI model type string to the internal taxonomy.
/// Case-insensitive; unrecognized strings fold into
/// [`AssetType::Other`].
pub fn map_civitai_type(provider_type: &str) -> AssetType {
    match provider_type.to_ascii_lowercase().as_str() {
        "checkpoint" => AssetType::Checkpoint,
        "lora" | "locon" | "lycoris" | "dora" => AssetType::Lora,
        "textualinversion" => AssetType::Embedding,
        "controlnet" => AssetType::Controlnet,
        "vae" => AssetType::Vae,
        "upscaler" => AssetType::Upscaler,
        "motionmodule" => AssetType::MotionModule,
        _ => AssetType::Other,
    }
}

/// Classify a HuggingFace repo from its tags and pipeline.
///
/// The Hub has no model-type field, so this is heuristic: explicit
/// component tags win, then the text-to-image pipeline implies a
/// checkpoint.
pub fn map_hf_model(model: &HfModel) -> AssetType {
    let has_tag = |needle: &str| model.tags.iter().any(|t| t.eq_ignore_ascii_case(needle));

    if has_tag("lora") {
        AssetType::Lora
    } else if has_tag("controlnet") {
        AssetType::Controlnet
    } else if has_tag("vae") {
        AssetType::Vae
    } else if has_tag("textual-inversion") || has_tag("embedding") {
        AssetType::Embedding
    } else if model.tags.iter().any(|t| t.to_ascii_lowercase().contains("upscal"))
        || has_tag("esrgan")
    {
        AssetType::Upscaler
    } else if model.pipeline_tag.as_deref() == Some("text-to-image")
        || has_tag("stable-diffusion")
        || has_tag("diffusers")
    {
        AssetType::Checkpoint
    } else {
        AssetType::Other
    }
}

// ---------------------------------------------------------------------------
// CivitAI
// ---------------------------------------------------------------------------

/// Select a version's primary file: the one flagged `primary`, else
/// the first file.
pub fn primary_file(version: &CivitaiModelVersion) -> Option<&CivitaiFile> {
    version
        .files
        .iter()
        .find(|f| f.primary)
        .or_else(|| version.files.first())
}

/// Pick a thumbnail: first safe-for-work image, falling back to the
/// first image of any rating.
pub fn pick_thumbnail(images: &[CivitaiImage]) -> Option<&str> {
    images
        .iter()
        .find(|img| img.is_sfw())
        .or_else(|| images.first())
        .map(|img| img.url.as_str())
}

/// Combine a file's scan verdicts. `None` when the provider reported
/// no scans at all.
pub fn file_scan_passed(file: &CivitaiFile) -> Option<bool> {
    if file.virus_scan_result.is_none() && file.pickle_scan_result.is_none() {
        return None;
    }
    let virus_ok = file
        .virus_scan_result
        .as_deref()
        .map_or(true, |v| v.eq_ignore_ascii_case("success"));
    let pickle_ok = file
        .pickle_scan_result
        .as_deref()
        .map_or(true, |v| v.eq_ignore_ascii_case("success"));
    Some(virus_ok && pickle_ok)
}

/// Normalize a CivitAI model, taking its latest (first-listed)
/// version as the representative one.
pub fn normalize_civitai_model(model: &CivitaiModel) -> NormalizedEntry {
    let version = model.model_versions.first();
    let file = version.and_then(primary_file);

    let file_size_bytes = file
        .and_then(|f| f.size_kb)
        .map(|kb| (kb * 1024.0) as u64)
        .filter(|&b| b > 0);

    let download_url = file
        .and_then(|f| f.download_url.clone())
        .or_else(|| version.and_then(|v| v.download_url.clone()));

    let license = model
        .allow_commercial_use
        .as_ref()
        .map(|c| format!("commercial-use: {}", c.permissions().join(", ")));

    NormalizedEntry {
        id: model.id.to_string(),
        name: model.name.clone(),
        asset_type: map_civitai_type(&model.model_type),
        base_model: version.and_then(|v| v.base_model.clone()),
        download_url,
        file_size_bytes,
        formatted_size: format_file_size(file_size_bytes.unwrap_or(0)),
        thumbnail_url: version
            .and_then(|v| pick_thumbnail(&v.images))
            .map(str::to_string),
        safety: SafetyFlags {
            nsfw: model.nsfw,
            poi: model.poi,
            scan_passed: file.and_then(file_scan_passed),
        },
        license: license.filter(|l| !l.is_empty()),
    }
}

// ---------------------------------------------------------------------------
// HuggingFace
// ---------------------------------------------------------------------------

/// File-extension preference for weight files, best first.
const WEIGHT_EXTENSIONS: &[&str] = &[".safetensors", ".ckpt", ".pt", ".bin"];

/// Pick the weight file to download from a repo's siblings, preferring
/// safetensors over pickled formats.
pub fn preferred_weight_file(siblings: &[HfSibling]) -> Option<&HfSibling> {
    for ext in WEIGHT_EXTENSIONS {
        if let Some(sibling) = siblings.iter().find(|s| s.rfilename.ends_with(ext)) {
            return Some(sibling);
        }
    }
    None
}

/// Extract the license from Hub tags of the form `license:mit`.
pub fn hf_license(tags: &[String]) -> Option<String> {
    tags.iter()
        .find_map(|t| t.strip_prefix("license:"))
        .map(str::to_string)
}

/// Normalize a HuggingFace repo record.
pub fn normalize_hf_model(model: &HfModel) -> NormalizedEntry {
    let weight = preferred_weight_file(&model.siblings);

    let download_url = weight.map(|w| {
        format!(
            "{HUGGINGFACE_BASE_URL}/{}/resolve/main/{}",
            model.id, w.rfilename
        )
    });
    let file_size_bytes = weight.and_then(|w| w.size).filter(|&b| b > 0);

    NormalizedEntry {
        id: model.id.clone(),
        name: model.id.clone(),
        asset_type: map_hf_model(model),
        base_model: None,
        download_url,
        file_size_bytes,
        formatted_size: format_file_size(file_size_bytes.unwrap_or(0)),
        thumbnail_url: None,
        safety: SafetyFlags {
            nsfw: model
                .tags
                .iter()
                .any(|t| t == "not-for-all-audiences"),
            poi: false,
            scan_passed: None,
        },
        license: hf_license(&model.tags),
    }
}

// ---------------------------------------------------------------------------
// ComfyUI Registry
// ---------------------------------------------------------------------------

/// Normalize a registry node package. Nodes carry no weight files, so
/// size comes back `"Unknown"` and safety flags stay clear.
pub fn normalize_registry_node(node: &RegistryNode) -> NormalizedEntry {
    NormalizedEntry {
        id: node.id.clone(),
        name: node.name.clone(),
        asset_type: AssetType::CustomNode,
        base_model: None,
        download_url: node
            .latest_version
            .as_ref()
            .and_then(|v| v.download_url.clone()),
        file_size_bytes: None,
        formatted_size: format_file_size(0),
        thumbnail_url: node.icon.clone(),
        safety: SafetyFlags::default(),
        license: node.license.clone(),
    }
}
