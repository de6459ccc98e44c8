//! Change detection between manifests
//!
//! Classifies every asset path as added, modified, deleted, or unchanged by
//! comparing the previous persisted manifest against a freshly generated one.
//! The classification is deterministic and total: every path in either
//! manifest lands in exactly one bucket.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::PipelineConfig;
use crate::error::ForgeResult;
use crate::manifest::{load_manifest, ManifestGenerator};
use crate::models::{
    AssetChange, AssetManifest, AssetMetadata, ChangeAnalysis, ChangeSummary, ChangeType,
    MANIFEST_VERSION,
};
use crate::report::Reporter;

/// Compares the current source tree against the last persisted manifest
pub struct ChangeDetector {
    config: PipelineConfig,
}

impl ChangeDetector {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Generate the current manifest and classify changes against the
    /// previous one
    pub fn analyze(&self, reporter: &dyn Reporter) -> ForgeResult<ChangeAnalysis> {
        let (analysis, _) = self.analyze_with_manifest(reporter)?;
        Ok(analysis)
    }

    /// Like `analyze`, but also returns the freshly generated manifest so
    /// callers can process against it without a second scan
    pub fn analyze_with_manifest(
        &self,
        reporter: &dyn Reporter,
    ) -> ForgeResult<(ChangeAnalysis, AssetManifest)> {
        let generator = ManifestGenerator::new(&self.config);
        let current = generator.generate(reporter)?;

        let previous = load_manifest(&self.config.manifest_path)?;
        if let Some(prev) = &previous {
            if prev.version != MANIFEST_VERSION {
                reporter.warning(&format!(
                    "previous manifest has version {} (current is {}); comparing anyway",
                    prev.version, MANIFEST_VERSION
                ));
            }
        }

        let analysis = diff_manifests(previous.as_ref(), &current);
        Ok((analysis, current))
    }
}

/// Classify every path in `previous` ∪ `current` into exactly one bucket
///
/// With no previous manifest, every current asset is `Added`. A path present
/// in both is `Modified` when hash, size, or modified time differ. Output is
/// sorted by path for stable reporting.
pub fn diff_manifests(previous: Option<&AssetManifest>, current: &AssetManifest) -> ChangeAnalysis {
    let current_by_path: BTreeMap<&str, &AssetMetadata> =
        current.assets.iter().map(|a| (a.path.as_str(), a)).collect();
    let previous_by_path: BTreeMap<&str, &AssetMetadata> = previous
        .map(|m| m.assets.iter().map(|a| (a.path.as_str(), a)).collect())
        .unwrap_or_default();

    let paths: BTreeSet<&str> = current_by_path
        .keys()
        .chain(previous_by_path.keys())
        .copied()
        .collect();

    let mut changes = Vec::with_capacity(paths.len());
    let mut summary = ChangeSummary::default();

    for path in paths {
        let change = match (previous_by_path.get(path), current_by_path.get(path)) {
            (None, Some(cur)) => {
                summary.added += 1;
                change_entry(ChangeType::Added, path, None, Some(cur))
            }
            (Some(prev), None) => {
                summary.deleted += 1;
                change_entry(ChangeType::Deleted, path, Some(prev), None)
            }
            (Some(prev), Some(cur)) => {
                let modified = prev.hash != cur.hash
                    || prev.size != cur.size
                    || prev.modified_ms != cur.modified_ms;
                if modified {
                    summary.modified += 1;
                    change_entry(ChangeType::Modified, path, Some(prev), Some(cur))
                } else {
                    summary.unchanged += 1;
                    change_entry(ChangeType::Unchanged, path, Some(prev), Some(cur))
                }
            }
            (None, None) => unreachable!("path came from one of the two maps"),
        };
        changes.push(change);
    }

    let affected_assets: Vec<String> = changes
        .iter()
        .filter(|c| c.change_type != ChangeType::Unchanged)
        .map(|c| c.asset_path.clone())
        .collect();
    let processing_required = summary.changed() > 0;

    ChangeAnalysis {
        changes,
        summary,
        affected_assets,
        processing_required,
    }
}

fn change_entry(
    change_type: ChangeType,
    path: &str,
    previous: Option<&AssetMetadata>,
    current: Option<&AssetMetadata>,
) -> AssetChange {
    AssetChange {
        change_type,
        asset_path: path.to_string(),
        previous_hash: previous.map(|m| m.hash.clone()),
        current_hash: current.map(|m| m.hash.clone()),
        previous_modified_ms: previous.map(|m| m.modified_ms),
        current_modified_ms: current.map(|m| m.modified_ms),
        size: current.or(previous).map(|m| m.size),
    }
}
