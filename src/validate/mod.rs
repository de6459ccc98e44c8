//! Asset validation engine
//!
//! Runs independent structural and semantic checks over the manifest, the
//! icon model descriptors, and the theme descriptors. Checks collect issues,
//! never throw, and a failure in one check does not skip the others. The one
//! exception: if a required model descriptor cannot be loaded at all, the
//! whole validation short-circuits with a single `MODEL_LOAD_FAILED` error.
//!
//! Errors are blocking (they decide `valid`); warnings are advisory.

mod hygiene;
mod integrity;
mod model_checks;
mod theme_checks;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::PipelineConfig;
use crate::model::IconModel;
use crate::models::AssetManifest;

/// Stable issue codes
pub mod codes {
    pub const MISSING_ASSET_FILE: &str = "MISSING_ASSET_FILE";
    pub const EMPTY_ASSET_FILE: &str = "EMPTY_ASSET_FILE";
    pub const UNREADABLE_ASSET_FILE: &str = "UNREADABLE_ASSET_FILE";
    pub const MALFORMED_SVG: &str = "MALFORMED_SVG";
    pub const INVALID_THEME_JSON: &str = "INVALID_THEME_JSON";
    pub const UNRECOGNIZED_THEME_SHAPE: &str = "UNRECOGNIZED_THEME_SHAPE";
    pub const MODEL_LOAD_FAILED: &str = "MODEL_LOAD_FAILED";
    pub const ICON_WITHOUT_ASSOCIATIONS: &str = "ICON_WITHOUT_ASSOCIATIONS";
    pub const EXTENSION_MISSING_DOT: &str = "EXTENSION_MISSING_DOT";
    pub const ORPHANED_FILE_ICON: &str = "ORPHANED_FILE_ICON";
    pub const ORPHANED_FOLDER_ICON: &str = "ORPHANED_FOLDER_ICON";
    pub const DUPLICATE_ICON_NAME: &str = "DUPLICATE_ICON_NAME";
    pub const MISSING_ICON_DEFINITIONS: &str = "MISSING_ICON_DEFINITIONS";
    pub const INVALID_FILE_EXTENSION_REFERENCE: &str = "INVALID_FILE_EXTENSION_REFERENCE";
    pub const INVALID_FILE_NAME_REFERENCE: &str = "INVALID_FILE_NAME_REFERENCE";
    pub const INVALID_FOLDER_NAME_REFERENCE: &str = "INVALID_FOLDER_NAME_REFERENCE";
    pub const MISSING_ICON_FILE: &str = "MISSING_ICON_FILE";
    pub const ABSOLUTE_ICON_PATH: &str = "ABSOLUTE_ICON_PATH";
    pub const PATH_TRAVERSAL: &str = "PATH_TRAVERSAL";
    pub const ABSOLUTE_PATH: &str = "ABSOLUTE_PATH";
}

/// One validation finding (error or warning, decided by which list holds it)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// Stable string id from [`codes`]
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl Issue {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            asset_path: None,
            context: None,
        }
    }

    pub fn with_asset(mut self, path: impl Into<String>) -> Self {
        self.asset_path = Some(path.into());
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Preferred display form for example lists
    pub fn subject(&self) -> &str {
        self.asset_path.as_deref().unwrap_or(&self.message)
    }
}

/// Errors and warnings produced by one check
#[derive(Debug, Clone, Default)]
pub struct CheckOutcome {
    pub errors: Vec<Issue>,
    pub warnings: Vec<Issue>,
}

impl CheckOutcome {
    pub fn error(&mut self, issue: Issue) {
        self.errors.push(issue);
    }

    pub fn warning(&mut self, issue: Issue) {
        self.warnings.push(issue);
    }

    pub fn merge(&mut self, other: CheckOutcome) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}

/// Issue totals for a validation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSummary {
    pub errors: usize,
    pub warnings: usize,
    pub checked_assets: usize,
}

/// Examples shown per code in the concise summary
pub const CONCISE_EXAMPLE_CAP: usize = 3;

/// Issues for one code, with at most [`CONCISE_EXAMPLE_CAP`] examples
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConciseGroup {
    pub code: String,
    pub count: usize,
    pub examples: Vec<String>,
}

/// Code-grouped, bounded view of a validation run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConciseSummary {
    pub error_groups: Vec<ConciseGroup>,
    pub warning_groups: Vec<ConciseGroup>,
}

impl ConciseSummary {
    fn from_outcome(outcome: &CheckOutcome) -> Self {
        Self {
            error_groups: group_by_code(&outcome.errors),
            warning_groups: group_by_code(&outcome.warnings),
        }
    }
}

fn group_by_code(issues: &[Issue]) -> Vec<ConciseGroup> {
    let mut groups: BTreeMap<&str, ConciseGroup> = BTreeMap::new();
    for issue in issues {
        let group = groups.entry(&issue.code).or_insert_with(|| ConciseGroup {
            code: issue.code.clone(),
            count: 0,
            examples: Vec::new(),
        });
        group.count += 1;
        if group.examples.len() < CONCISE_EXAMPLE_CAP {
            group.examples.push(issue.subject().to_string());
        }
    }
    groups.into_values().collect()
}

/// Result of a full validation run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<Issue>,
    pub warnings: Vec<Issue>,
    pub summary: ValidationSummary,
    /// Present only in non-verbose mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concise: Option<ConciseSummary>,
}

/// Runs every check over a manifest
pub struct AssetValidator {
    config: PipelineConfig,
}

impl AssetValidator {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Run all checks and aggregate their outcomes
    pub fn validate(&self, manifest: &AssetManifest) -> ValidationResult {
        let models = IconModel::load(&self.config.file_icon_model)
            .and_then(|f| IconModel::load(&self.config.folder_icon_model).map(|d| (f, d)));
        let (file_model, folder_model) = match models {
            Ok(pair) => pair,
            Err(e) => {
                let mut outcome = CheckOutcome::default();
                outcome.error(Issue::new(codes::MODEL_LOAD_FAILED, e.to_string()));
                return self.finish(outcome, manifest);
            }
        };

        let source = &self.config.source_dir;
        let mut outcome = CheckOutcome::default();
        outcome.merge(integrity::check(manifest, source));
        outcome.merge(model_checks::check_consistency(&file_model, &folder_model));
        outcome.merge(model_checks::check_orphans(manifest, &file_model, &folder_model));
        outcome.merge(model_checks::check_duplicates(&file_model, &folder_model));
        outcome.merge(theme_checks::check_structure(manifest, source));
        outcome.merge(theme_checks::check_icon_references(manifest, source));
        outcome.merge(hygiene::check(manifest));
        self.finish(outcome, manifest)
    }

    fn finish(&self, outcome: CheckOutcome, manifest: &AssetManifest) -> ValidationResult {
        let concise = if self.config.verbose {
            None
        } else {
            Some(ConciseSummary::from_outcome(&outcome))
        };
        ValidationResult {
            valid: outcome.errors.is_empty(),
            summary: ValidationSummary {
                errors: outcome.errors.len(),
                warnings: outcome.warnings.len(),
                checked_assets: manifest.len(),
            },
            errors: outcome.errors,
            warnings: outcome.warnings,
            concise,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::ManifestGenerator;
    use crate::report::NullReporter;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    pub(crate) fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    pub(crate) fn config_for(root: &Path) -> PipelineConfig {
        PipelineConfig {
            source_dir: root.join("assets"),
            output_dir: root.join("dist"),
            manifest_path: root.join("asset-manifest.json"),
            file_icon_model: root.join("assets/icons/file_icons.model.json"),
            folder_icon_model: root.join("assets/icons/folder_icons.model.json"),
            ..PipelineConfig::default()
        }
    }

    pub(crate) fn write_default_models(root: &Path) {
        write(
            root,
            "assets/icons/file_icons.model.json",
            r#"{ "icons": [ { "name": "foo", "fileExtensions": [".foo"] } ], "orphans": [] }"#,
        );
        write(
            root,
            "assets/icons/folder_icons.model.json",
            r#"{ "icons": [ { "name": "src", "folderNames": ["src"] } ], "orphans": [] }"#,
        );
    }

    pub(crate) fn scan(config: &PipelineConfig) -> AssetManifest {
        ManifestGenerator::new(config).generate(&NullReporter).unwrap()
    }

    #[test]
    fn unloadable_models_short_circuit_with_single_error() {
        let dir = tempdir().unwrap();
        // An asset that would normally fail integrity checks
        write(dir.path(), "assets/icons/file_icons/broken.svg", "not svg");
        let config = config_for(dir.path());

        let manifest = scan(&config);
        let result = AssetValidator::new(&config).validate(&manifest);

        assert!(!result.valid);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].code, codes::MODEL_LOAD_FAILED);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn clean_tree_is_valid() {
        let dir = tempdir().unwrap();
        write_default_models(dir.path());
        write(dir.path(), "assets/icons/file_icons/foo.svg", "<svg></svg>");
        write(
            dir.path(),
            "assets/themes/base.theme.json",
            r#"{ "iconDefinitions": { "foo": { "iconPath": "../icons/file_icons/foo.svg" } },
                "fileExtensions": { ".foo": "foo" } }"#,
        );
        let config = config_for(dir.path());

        let manifest = scan(&config);
        let result = AssetValidator::new(&config).validate(&manifest);

        assert!(result.valid, "unexpected errors: {:?}", result.errors);
        assert!(result.warnings.is_empty(), "unexpected warnings: {:?}", result.warnings);
    }

    #[test]
    fn concise_summary_caps_examples_at_three_per_code() {
        let mut outcome = CheckOutcome::default();
        for i in 0..5 {
            outcome.error(
                Issue::new(codes::MISSING_ASSET_FILE, "file missing")
                    .with_asset(format!("icons/file_icons/{i}.svg")),
            );
        }
        let concise = ConciseSummary::from_outcome(&outcome);

        assert_eq!(concise.error_groups.len(), 1);
        let group = &concise.error_groups[0];
        assert_eq!(group.count, 5);
        assert_eq!(group.examples.len(), CONCISE_EXAMPLE_CAP);
        assert_eq!(group.examples[0], "icons/file_icons/0.svg");
    }

    #[test]
    fn verbose_mode_has_no_concise_summary() {
        let dir = tempdir().unwrap();
        write_default_models(dir.path());
        write(dir.path(), "assets/icons/file_icons/foo.svg", "<svg></svg>");
        let mut config = config_for(dir.path());

        let manifest = scan(&config);
        config.verbose = true;
        let verbose = AssetValidator::new(&config).validate(&manifest);
        assert!(verbose.concise.is_none());

        config.verbose = false;
        let concise = AssetValidator::new(&config).validate(&manifest);
        assert!(concise.concise.is_some());
    }

    #[test]
    fn a_failing_check_does_not_skip_the_others() {
        let dir = tempdir().unwrap();
        write_default_models(dir.path());
        // Malformed SVG (integrity) AND an orphan icon (model check)
        write(dir.path(), "assets/icons/file_icons/stray.svg", "not svg");
        let config = config_for(dir.path());

        let manifest = scan(&config);
        let result = AssetValidator::new(&config).validate(&manifest);

        assert!(result.errors.iter().any(|e| e.code == codes::MALFORMED_SVG));
        assert!(result
            .warnings
            .iter()
            .any(|w| w.code == codes::ORPHANED_FILE_ICON));
    }
}
