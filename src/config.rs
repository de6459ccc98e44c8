//! Pipeline configuration
//!
//! One immutable `PipelineConfig` value is built by the caller (the CLI layer
//! lives outside this crate) and handed to every component at construction.
//! Defaults are resolved here, once; no component resolves its own defaults
//! at call time.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration for a single pipeline invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Root of the source asset tree
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,

    /// Root of the mirrored output tree
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Location of the persisted manifest file
    #[serde(default = "default_manifest_path")]
    pub manifest_path: PathBuf,

    /// File-icon model descriptor (JSON with line comments)
    #[serde(default = "default_file_icon_model")]
    pub file_icon_model: PathBuf,

    /// Folder-icon model descriptor (JSON with line comments)
    #[serde(default = "default_folder_icon_model")]
    pub folder_icon_model: PathBuf,

    /// Skip assets whose content did not change (true by default)
    #[serde(default = "default_true")]
    pub skip_unchanged: bool,

    /// Reprocess assets that depend on changed assets (true by default)
    #[serde(default = "default_true")]
    pub process_dependencies: bool,

    /// After processing, confirm every asset has a non-empty output file
    #[serde(default)]
    pub validate_output: bool,

    /// Report per-item detail instead of the concise summary
    #[serde(default)]
    pub verbose: bool,

    /// Suppress informational reporting (errors are always reported)
    #[serde(default)]
    pub silent: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            output_dir: default_output_dir(),
            manifest_path: default_manifest_path(),
            file_icon_model: default_file_icon_model(),
            folder_icon_model: default_folder_icon_model(),
            skip_unchanged: true,
            process_dependencies: true,
            validate_output: false,
            verbose: false,
            silent: false,
        }
    }
}

fn default_source_dir() -> PathBuf {
    PathBuf::from("assets")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("dist")
}

fn default_manifest_path() -> PathBuf {
    PathBuf::from("asset-manifest.json")
}

fn default_file_icon_model() -> PathBuf {
    PathBuf::from("assets/icons/file_icons.model.json")
}

fn default_folder_icon_model() -> PathBuf {
    PathBuf::from("assets/icons/folder_icons.model.json")
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_skips_unchanged_and_follows_dependencies() {
        let config = PipelineConfig::default();
        assert!(config.skip_unchanged);
        assert!(config.process_dependencies);
        assert!(!config.validate_output);
        assert!(!config.verbose);
        assert!(!config.silent);
    }

    #[test]
    fn default_paths() {
        let config = PipelineConfig::default();
        assert_eq!(config.source_dir, PathBuf::from("assets"));
        assert_eq!(config.output_dir, PathBuf::from("dist"));
        assert_eq!(config.manifest_path, PathBuf::from("asset-manifest.json"));
    }

    #[test]
    fn deserialize_fills_defaults() {
        let config: PipelineConfig = serde_json::from_str(r#"{"verbose": true}"#).unwrap();
        assert!(config.verbose);
        assert!(config.skip_unchanged);
        assert_eq!(config.source_dir, PathBuf::from("assets"));
    }
}
