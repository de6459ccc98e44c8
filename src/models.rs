//! Core data models for iconforge
//!
//! Defines the fundamental data structures used throughout the pipeline:
//! - `AssetMetadata`: immutable snapshot of one file at scan time
//! - `AssetManifest`: the pipeline's only durable state
//! - `AssetChange` / `ChangeAnalysis`: per-run change classification

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Version written into every generated manifest
pub const MANIFEST_VERSION: &str = "1.0";

/// Coarse classification of an asset, derived from its path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    /// SVG icon under `icons/`
    Icon,
    /// Theme descriptor (JSON)
    Theme,
    /// Raster or vector image outside `icons/`
    Image,
    /// Anything unmatched
    #[default]
    Other,
}

/// Immutable snapshot of one file at scan time
///
/// `path` is relative to the source root, forward-slash separated, and is the
/// unique key for the asset everywhere in the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetMetadata {
    pub path: String,

    /// File size in bytes
    pub size: u64,

    /// Modification time, epoch milliseconds
    #[serde(rename = "modifiedTime")]
    pub modified_ms: i64,

    /// Content digest, `sha256:<hex>`
    pub hash: String,

    #[serde(rename = "type")]
    pub asset_type: AssetType,

    /// Category derived from fixed path markers, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Asset paths this asset's content appears to reference
    #[serde(default)]
    pub dependencies: Vec<String>,
}

/// Persisted snapshot of all assets' metadata and dependency edges
///
/// Invariant: `dependencies` has an entry for every asset path (default
/// empty), and asset paths are unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetManifest {
    pub version: String,
    pub generated_at: DateTime<Utc>,
    pub assets: Vec<AssetMetadata>,
    pub categories: BTreeMap<String, Vec<String>>,
    pub dependencies: BTreeMap<String, Vec<String>>,
}

impl AssetManifest {
    /// Look up an asset by its relative path
    pub fn asset(&self, path: &str) -> Option<&AssetMetadata> {
        self.assets.iter().find(|a| a.path == path)
    }

    /// Whether the manifest tracks the given path
    pub fn contains(&self, path: &str) -> bool {
        self.asset(path).is_some()
    }

    /// Number of tracked assets
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Reverse dependency lookup: which assets list `path` as a dependency
    pub fn dependents_of(&self, path: &str) -> Vec<&str> {
        self.dependencies
            .iter()
            .filter(|(_, deps)| deps.iter().any(|d| d == path))
            .map(|(dependent, _)| dependent.as_str())
            .collect()
    }
}

/// Normalize a relative path to forward slashes for use as a manifest key
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

/// How an asset changed between two manifests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Added,
    Modified,
    Deleted,
    Unchanged,
}

/// One asset's classification between the previous and current manifest
///
/// Produced transiently per run; never persisted (a fresh `AssetManifest` is
/// persisted instead).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetChange {
    #[serde(rename = "type")]
    pub change_type: ChangeType,
    pub asset_path: String,
    pub previous_hash: Option<String>,
    pub current_hash: Option<String>,
    pub previous_modified_ms: Option<i64>,
    pub current_modified_ms: Option<i64>,
    pub size: Option<u64>,
}

/// Counts per change type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ChangeSummary {
    pub added: usize,
    pub modified: usize,
    pub deleted: usize,
    pub unchanged: usize,
}

impl ChangeSummary {
    /// Total paths classified
    pub fn total(&self) -> usize {
        self.added + self.modified + self.deleted + self.unchanged
    }

    /// Paths requiring processing
    pub fn changed(&self) -> usize {
        self.added + self.modified + self.deleted
    }
}

/// Exhaustive partition of current ∪ previous paths into change buckets
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeAnalysis {
    pub changes: Vec<AssetChange>,
    pub summary: ChangeSummary,
    /// All non-unchanged paths
    pub affected_assets: Vec<String>,
    pub processing_required: bool,
}
