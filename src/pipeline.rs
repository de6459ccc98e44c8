//! Pipeline orchestration
//!
//! Sequences the components into four independent, idempotent operations:
//! manifest, detect, process, validate. The pipeline computes what to report
//! and hands it to the injected `Reporter`; it never renders output itself.
//! Fatal errors are reported, then propagated to the caller.

use anyhow::{Context, Result};

use crate::config::PipelineConfig;
use crate::detect::ChangeDetector;
use crate::manifest::{save_manifest, ManifestGenerator};
use crate::models::{AssetManifest, ChangeAnalysis, ChangeType};
use crate::process::{AssetProcessor, ProcessResult};
use crate::report::Reporter;
use crate::validate::{AssetValidator, ValidationResult};

/// Drives the asset pipeline; the only component invoked externally
pub struct Pipeline {
    config: PipelineConfig,
    reporter: Box<dyn Reporter>,
}

impl Pipeline {
    pub fn new(config: PipelineConfig, reporter: Box<dyn Reporter>) -> Self {
        Self { config, reporter }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Generate and persist a manifest; no other mutation
    pub fn run_manifest(&self) -> Result<AssetManifest> {
        let manifest = self.generate().context("manifest generation failed")?;
        save_manifest(&manifest, &self.config.manifest_path)
            .with_context(|| {
                self.reporter.critical("failed to persist manifest");
                format!("cannot write {}", self.config.manifest_path.display())
            })?;
        self.say(&format!(
            "manifest written: {} assets, {} categories",
            manifest.len(),
            manifest.categories.len()
        ));
        Ok(manifest)
    }

    /// Run change analysis and report it; no mutation
    pub fn run_detect(&self) -> Result<ChangeAnalysis> {
        let detector = ChangeDetector::new(&self.config);
        let analysis = detector
            .analyze(self.reporter.as_ref())
            .context("change detection failed")?;
        self.report_changes(&analysis);
        Ok(analysis)
    }

    /// Detect, then process changed assets and persist a fresh manifest
    ///
    /// When nothing changed this reports "up to date" and returns without
    /// invoking the processor or rewriting the manifest.
    pub fn run_process(&self) -> Result<ProcessResult> {
        let detector = ChangeDetector::new(&self.config);
        let (analysis, manifest) = detector
            .analyze_with_manifest(self.reporter.as_ref())
            .context("change detection failed")?;

        if !analysis.processing_required {
            self.say(&format!(
                "assets are up to date ({} unchanged)",
                analysis.summary.unchanged
            ));
            let mut result = ProcessResult::default();
            result.skipped = analysis
                .changes
                .iter()
                .filter(|c| c.change_type == ChangeType::Unchanged)
                .map(|c| c.asset_path.clone())
                .collect();
            result.summary.skipped = result.skipped.len();
            result.summary.total = result.skipped.len();
            return Ok(result);
        }

        self.report_changes(&analysis);
        let processor = AssetProcessor::new(&self.config);
        let result = processor.process(&analysis, &manifest, self.reporter.as_ref());

        // The processed tree is the new baseline
        let fresh = self.generate().context("manifest regeneration failed")?;
        save_manifest(&fresh, &self.config.manifest_path)
            .with_context(|| format!("cannot write {}", self.config.manifest_path.display()))?;

        self.report_process(&result);
        Ok(result)
    }

    /// Generate a manifest in memory and validate it; no mutation
    pub fn run_validate(&self) -> Result<ValidationResult> {
        let manifest = self.generate().context("manifest generation failed")?;
        let validator = AssetValidator::new(&self.config);
        let result = validator.validate(&manifest);
        self.report_validation(&result);
        Ok(result)
    }

    fn generate(&self) -> crate::error::ForgeResult<AssetManifest> {
        let generator = ManifestGenerator::new(&self.config);
        match generator.generate(self.reporter.as_ref()) {
            Ok(manifest) => Ok(manifest),
            Err(e) => {
                self.reporter.critical(&e.to_string());
                Err(e)
            }
        }
    }

    fn say(&self, message: &str) {
        if !self.config.silent {
            self.reporter.info(message);
        }
    }

    fn report_changes(&self, analysis: &ChangeAnalysis) {
        let s = &analysis.summary;
        self.say(&format!(
            "changes: {} added, {} modified, {} deleted, {} unchanged",
            s.added, s.modified, s.deleted, s.unchanged
        ));
        if self.config.verbose && !analysis.affected_assets.is_empty() {
            self.reporter
                .list("Affected assets", &analysis.affected_assets);
        }
    }

    fn report_process(&self, result: &ProcessResult) {
        let s = &result.summary;
        if result.is_success() {
            if !self.config.silent {
                self.reporter.success(&format!(
                    "processed {} assets ({} skipped) in {}ms",
                    s.processed, s.skipped, s.duration_ms
                ));
            }
        } else {
            self.reporter.error(&format!(
                "processed {} assets with {} errors ({} skipped) in {}ms",
                s.processed, s.errors, s.skipped, s.duration_ms
            ));
            self.reporter.list("Processing errors", &result.errors);
        }
        if self.config.verbose {
            self.reporter.list("Processed", &result.processed);
        }
    }

    fn report_validation(&self, result: &ValidationResult) {
        let s = &result.summary;
        if result.valid {
            if !self.config.silent {
                self.reporter.success(&format!(
                    "validation passed: {} assets checked, {} warnings",
                    s.checked_assets, s.warnings
                ));
            }
        } else {
            self.reporter.error(&format!(
                "validation failed: {} errors, {} warnings across {} assets",
                s.errors, s.warnings, s.checked_assets
            ));
        }

        if self.config.verbose {
            let render = |issues: &[crate::validate::Issue]| -> Vec<String> {
                issues
                    .iter()
                    .map(|i| format!("[{}] {} {}", i.code, i.subject(), i.message))
                    .collect()
            };
            if !result.errors.is_empty() {
                self.reporter.list("Errors", &render(&result.errors));
            }
            if !result.warnings.is_empty() {
                self.reporter.list("Warnings", &render(&result.warnings));
            }
        } else if let Some(concise) = &result.concise {
            for (title, groups) in [
                ("Errors", &concise.error_groups),
                ("Warnings", &concise.warning_groups),
            ] {
                for group in groups {
                    let mut items = group.examples.clone();
                    if group.count > items.len() {
                        items.push(format!("... and {} more", group.count - items.len()));
                    }
                    self.reporter
                        .list(&format!("{title}: {} ({})", group.code, group.count), &items);
                }
            }
        }
    }
}
