//! Icon model descriptors
//!
//! `file_icons.model.json` and `folder_icons.model.json` declare the icon set
//! and its associations. Both are JSON-with-line-comments; unloadable models
//! are a fatal configuration error for validation.

use std::collections::BTreeSet;
use std::path::Path;

use serde::Deserialize;

use crate::error::{ForgeError, ForgeResult};
use crate::theme::strip_line_comments;

/// One declared icon and its associations
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconEntry {
    pub name: String,
    #[serde(default)]
    pub file_extensions: Vec<String>,
    #[serde(default)]
    pub file_names: Vec<String>,
    #[serde(default)]
    pub folder_names: Vec<String>,
}

impl IconEntry {
    /// Whether the icon declares no association at all
    pub fn has_no_associations(&self) -> bool {
        self.file_extensions.is_empty()
            && self.file_names.is_empty()
            && self.folder_names.is_empty()
    }
}

/// An icon model descriptor
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct IconModel {
    #[serde(default)]
    pub icons: Vec<IconEntry>,
    /// Explicit allow-list of icon files intentionally not declared
    #[serde(default)]
    pub orphans: Vec<String>,
}

impl IconModel {
    /// Load a model descriptor from disk
    pub fn load(path: &Path) -> ForgeResult<IconModel> {
        let text = std::fs::read_to_string(path).map_err(|e| ForgeError::ModelLoad {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&strip_line_comments(&text)).map_err(|e| ForgeError::ModelLoad {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Set of declared icon names
    pub fn icon_names(&self) -> BTreeSet<&str> {
        self.icons.iter().map(|i| i.name.as_str()).collect()
    }

    /// Whether a disk icon name is accounted for (declared or allow-listed)
    pub fn accounts_for(&self, name: &str) -> bool {
        self.icons.iter().any(|i| i.name == name) || self.orphans.iter().any(|o| o == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_model_with_line_comments() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("file_icons.model.json");
        std::fs::write(
            &path,
            r#"{
                // declared icons
                "icons": [
                    { "name": "rust", "fileExtensions": [".rs"] },
                    { "name": "readme", "fileNames": ["README.md"] }
                ],
                "orphans": ["legacy"]
            }"#,
        )
        .unwrap();

        let model = IconModel::load(&path).unwrap();
        assert_eq!(model.icons.len(), 2);
        assert!(model.accounts_for("rust"));
        assert!(model.accounts_for("legacy"));
        assert!(!model.accounts_for("python"));
    }

    #[test]
    fn load_missing_model_is_model_load_error() {
        let result = IconModel::load(Path::new("/nonexistent/model.json"));
        assert!(matches!(result, Err(ForgeError::ModelLoad { .. })));
    }

    #[test]
    fn load_invalid_json_is_model_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.model.json");
        std::fs::write(&path, "{ icons: oops").unwrap();

        assert!(matches!(
            IconModel::load(&path),
            Err(ForgeError::ModelLoad { .. })
        ));
    }

    #[test]
    fn icon_without_associations_is_detected() {
        let entry = IconEntry {
            name: "bare".to_string(),
            file_extensions: Vec::new(),
            file_names: Vec::new(),
            folder_names: Vec::new(),
        };
        assert!(entry.has_no_associations());
    }
}
