//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use iconforge::PipelineConfig;
use tempfile::TempDir;

/// A temporary project tree with an `assets/` source root
pub struct Fixture {
    dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create tempdir"),
        }
    }

    /// A fixture with minimal valid model descriptors already in place
    pub fn with_models() -> Self {
        let fixture = Self::new();
        fixture.write(
            "assets/icons/file_icons.model.json",
            r#"{
                // file icon declarations
                "icons": [
                    { "name": "foo", "fileExtensions": [".foo"] }
                ],
                "orphans": []
            }"#,
        );
        fixture.write(
            "assets/icons/folder_icons.model.json",
            r#"{ "icons": [ { "name": "src", "folderNames": ["src"] } ], "orphans": [] }"#,
        );
        fixture
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    pub fn write(&self, rel: &str, content: &str) {
        let path = self.path(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    pub fn remove(&self, rel: &str) {
        fs::remove_file(self.path(rel)).unwrap();
    }

    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.path(rel)).unwrap()
    }

    pub fn config(&self) -> PipelineConfig {
        PipelineConfig {
            source_dir: self.path("assets"),
            output_dir: self.path("dist"),
            manifest_path: self.path("asset-manifest.json"),
            file_icon_model: self.path("assets/icons/file_icons.model.json"),
            folder_icon_model: self.path("assets/icons/folder_icons.model.json"),
            ..PipelineConfig::default()
        }
    }
}
