//! Asset processing
//!
//! Mirrors changed assets into the output tree, applies per-type post-copy
//! hooks, and propagates reprocessing to dependents of changed assets. The
//! per-asset loop is fail-soft: failures become entries in the result's
//! `errors` list and processing continues. Only a failure to create the
//! output root aborts the call, and even that is returned as a result with a
//! single error rather than raised.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;

use crate::config::PipelineConfig;
use crate::error::ForgeResult;
use crate::manifest::classify_type;
use crate::models::{AssetManifest, AssetType, ChangeAnalysis, ChangeType};
use crate::report::Reporter;
use crate::theme::strip_line_comments;

/// Counts for one processing run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessSummary {
    pub total: usize,
    pub processed: usize,
    pub skipped: usize,
    pub errors: usize,
    pub duration_ms: u64,
}

/// Result of one processing run
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProcessResult {
    /// Paths written to (or removed from) the output tree
    pub processed: Vec<String>,
    /// Paths skipped as unchanged
    pub skipped: Vec<String>,
    /// Per-asset failures, as `path: message` strings
    pub errors: Vec<String>,
    pub summary: ProcessSummary,
}

impl ProcessResult {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    fn finish(mut self, started: Instant) -> Self {
        self.summary = ProcessSummary {
            total: self.processed.len() + self.skipped.len() + self.errors.len(),
            processed: self.processed.len(),
            skipped: self.skipped.len(),
            errors: self.errors.len(),
            duration_ms: started.elapsed().as_millis() as u64,
        };
        self
    }
}

/// Mirrors changed assets into the output tree
pub struct AssetProcessor {
    config: PipelineConfig,
}

impl AssetProcessor {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Process a change set against the current manifest
    pub fn process(
        &self,
        analysis: &ChangeAnalysis,
        manifest: &AssetManifest,
        reporter: &dyn Reporter,
    ) -> ProcessResult {
        let started = Instant::now();
        let mut result = ProcessResult::default();

        if let Err(e) = std::fs::create_dir_all(&self.config.output_dir) {
            result.errors.push(format!(
                "cannot create output root {}: {e}",
                self.config.output_dir.display()
            ));
            return result.finish(started);
        }

        let mut mirrored: BTreeSet<String> = BTreeSet::new();

        for change in &analysis.changes {
            let path = change.asset_path.as_str();
            match change.change_type {
                ChangeType::Unchanged if self.config.skip_unchanged => {
                    result.skipped.push(path.to_string());
                }
                ChangeType::Added | ChangeType::Modified | ChangeType::Unchanged => {
                    self.mirror_into(path, manifest, reporter, &mut result, &mut mirrored);
                }
                ChangeType::Deleted => {
                    let out = self.config.output_dir.join(path);
                    match remove_if_present(&out) {
                        Ok(()) => result.processed.push(path.to_string()),
                        Err(e) => result.errors.push(format!("{path}: {e}")),
                    }
                }
            }
        }

        if self.config.process_dependencies {
            self.propagate(analysis, manifest, reporter, &mut result, &mut mirrored);
        }

        if self.config.validate_output {
            self.validate_outputs(manifest, &mut result);
        }

        result.finish(started)
    }

    /// Reprocess every asset that lists a changed asset as a dependency
    ///
    /// Reverse edges come from the manifest's dependency map; a dependent is
    /// reprocessed even when its own entry is unchanged, so a theme stays
    /// fresh in the output tree when an icon it references changes.
    fn propagate(
        &self,
        analysis: &ChangeAnalysis,
        manifest: &AssetManifest,
        reporter: &dyn Reporter,
        result: &mut ProcessResult,
        mirrored: &mut BTreeSet<String>,
    ) {
        for changed in &analysis.affected_assets {
            for dependent in manifest.dependents_of(changed) {
                if mirrored.contains(dependent) || !manifest.contains(dependent) {
                    continue;
                }
                reporter.debug(&format!("reprocessing {dependent}: depends on {changed}"));
                result.skipped.retain(|p| p != dependent);
                self.mirror_into(dependent, manifest, reporter, result, mirrored);
            }
        }
    }

    fn mirror_into(
        &self,
        path: &str,
        manifest: &AssetManifest,
        reporter: &dyn Reporter,
        result: &mut ProcessResult,
        mirrored: &mut BTreeSet<String>,
    ) {
        match self.mirror(path, manifest, reporter) {
            Ok(()) => {
                mirrored.insert(path.to_string());
                result.processed.push(path.to_string());
            }
            Err(e) => result.errors.push(format!("{path}: {e}")),
        }
    }

    /// Copy one asset to its mirrored output path and run the type hook
    fn mirror(
        &self,
        path: &str,
        manifest: &AssetManifest,
        reporter: &dyn Reporter,
    ) -> ForgeResult<()> {
        let source = self.config.source_dir.join(path);
        let output = self.config.output_dir.join(path);
        if let Some(parent) = output.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::copy(&source, &output)?;

        let asset_type = manifest
            .asset(path)
            .map(|a| a.asset_type)
            .unwrap_or_else(|| classify_type(path));
        match asset_type {
            AssetType::Theme => self.post_process_theme(path, &output, reporter)?,
            // Optimization hooks, currently pass-through
            AssetType::Icon | AssetType::Image | AssetType::Other => {}
        }
        Ok(())
    }

    /// Theme hook: strip comments, parse-validate, write the stripped text
    ///
    /// A parse failure is a warning, not an error; the raw copy stands.
    fn post_process_theme(
        &self,
        path: &str,
        output: &Path,
        reporter: &dyn Reporter,
    ) -> ForgeResult<()> {
        let text = std::fs::read_to_string(output)?;
        let stripped = strip_line_comments(&text);
        match serde_json::from_str::<serde_json::Value>(&stripped) {
            Ok(_) => {
                if stripped != text {
                    std::fs::write(output, stripped)?;
                }
            }
            Err(e) => reporter.warning(&format!("{path}: theme JSON did not parse: {e}")),
        }
        Ok(())
    }

    /// Confirm every manifest asset has a non-empty mirrored output file
    fn validate_outputs(&self, manifest: &AssetManifest, result: &mut ProcessResult) {
        for asset in &manifest.assets {
            let out = self.config.output_dir.join(&asset.path);
            let ok = std::fs::metadata(&out).map(|m| m.len() > 0).unwrap_or(false);
            if !ok {
                result
                    .errors
                    .push(format!("output:{}: missing or empty output file", asset.path));
            }
        }
    }
}

fn remove_if_present(path: &PathBuf) -> std::io::Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}
