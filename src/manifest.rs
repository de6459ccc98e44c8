//! Manifest generation and persistence
//!
//! `ManifestGenerator` walks the source tree with an explicit queue (no
//! recursion), snapshots every file into `AssetMetadata`, and derives a
//! coarse dependency map behind the `DependencyResolver` seam. The persisted
//! manifest is the pipeline's only durable state; a missing or unparseable
//! manifest on load means "no previous state", never an error.

use std::collections::{BTreeMap, VecDeque};
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::config::PipelineConfig;
use crate::error::{ForgeError, ForgeResult};
use crate::hash::hash_bytes;
use crate::models::{normalize_path, AssetManifest, AssetMetadata, AssetType, MANIFEST_VERSION};
use crate::report::Reporter;

/// Derives dependency edges between assets
///
/// The default implementation is a substring heuristic; this trait exists so
/// a structural parser can replace it without touching callers.
pub trait DependencyResolver {
    /// Map of asset path → referenced asset paths
    ///
    /// The returned map need not be total over `assets`; the generator fills
    /// in empty entries for every asset afterwards.
    fn resolve(
        &self,
        assets: &[AssetMetadata],
        source_root: &Path,
    ) -> BTreeMap<String, Vec<String>>;
}

/// Substring-based dependency heuristic
///
/// For every theme asset, the raw text is scanned for each icon asset's
/// basename (extension stripped); a match records a theme→icon edge. This is
/// intentionally coarse and cheap: substring collisions produce false
/// positives, indirection produces false negatives. Over-approximation is
/// harmless here since extra edges only cause extra reprocessing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringResolver;

impl DependencyResolver for SubstringResolver {
    fn resolve(
        &self,
        assets: &[AssetMetadata],
        source_root: &Path,
    ) -> BTreeMap<String, Vec<String>> {
        let icons: Vec<(&str, String)> = assets
            .iter()
            .filter(|a| a.asset_type == AssetType::Icon && a.path.ends_with(".svg"))
            .filter_map(|a| icon_stem(&a.path).map(|stem| (a.path.as_str(), stem)))
            .collect();

        let mut edges = BTreeMap::new();
        for asset in assets.iter().filter(|a| a.asset_type == AssetType::Theme) {
            // Unreadable theme text yields no edges; the integrity check
            // reports the file itself.
            let Ok(text) = std::fs::read_to_string(source_root.join(&asset.path)) else {
                continue;
            };
            let deps: Vec<String> = icons
                .iter()
                .filter(|(_, stem)| text.contains(stem.as_str()))
                .map(|(path, _)| (*path).to_string())
                .collect();
            if !deps.is_empty() {
                edges.insert(asset.path.clone(), deps);
            }
        }
        edges
    }
}

/// Basename of an icon path with the extension stripped
fn icon_stem(path: &str) -> Option<String> {
    Path::new(path)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
}

/// Walks the source tree and builds the current manifest
pub struct ManifestGenerator {
    source_dir: PathBuf,
    resolver: Box<dyn DependencyResolver>,
}

impl ManifestGenerator {
    /// Create a generator with the default substring dependency resolver
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            source_dir: config.source_dir.clone(),
            resolver: Box::new(SubstringResolver),
        }
    }

    /// Replace the dependency resolver
    pub fn with_resolver(mut self, resolver: Box<dyn DependencyResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Scan the source tree into a fresh manifest
    ///
    /// Files only; per-file read failures are reported as warnings and the
    /// file is skipped. Discovery order is made deterministic by sorting each
    /// directory's entries by name.
    pub fn generate(&self, reporter: &dyn Reporter) -> ForgeResult<AssetManifest> {
        if !self.source_dir.is_dir() {
            return Err(ForgeError::SourceMissing {
                path: self.source_dir.clone(),
            });
        }

        let mut assets = Vec::new();
        let mut queue: VecDeque<PathBuf> = VecDeque::new();
        queue.push_back(self.source_dir.clone());

        while let Some(dir) = queue.pop_front() {
            let mut entries: Vec<PathBuf> = match std::fs::read_dir(&dir) {
                Ok(rd) => rd.filter_map(|e| e.ok()).map(|e| e.path()).collect(),
                Err(e) => {
                    reporter.warning(&format!("cannot read directory {}: {e}", dir.display()));
                    continue;
                }
            };
            entries.sort();

            for entry in entries {
                if entry.is_dir() {
                    queue.push_back(entry);
                    continue;
                }
                match self.snapshot(&entry) {
                    Ok(meta) => assets.push(meta),
                    Err(e) => {
                        reporter.warning(&format!("skipping {}: {e}", entry.display()));
                    }
                }
            }
        }

        let mut dependencies = self.resolver.resolve(&assets, &self.source_dir);
        for asset in &mut assets {
            let deps = dependencies.entry(asset.path.clone()).or_default();
            asset.dependencies = deps.clone();
        }

        let mut categories: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for asset in &assets {
            if let Some(category) = &asset.category {
                categories
                    .entry(category.clone())
                    .or_default()
                    .push(asset.path.clone());
            }
        }

        Ok(AssetManifest {
            version: MANIFEST_VERSION.to_string(),
            generated_at: Utc::now(),
            assets,
            categories,
            dependencies,
        })
    }

    /// Snapshot one file: relative key, size, mtime, hash, classification
    fn snapshot(&self, path: &Path) -> ForgeResult<AssetMetadata> {
        let rel = path
            .strip_prefix(&self.source_dir)
            .map_err(|_| ForgeError::PathEscape {
                path: path.to_path_buf(),
            })?;
        let rel = normalize_path(&rel.to_string_lossy());

        let metadata = std::fs::metadata(path)?;
        let bytes = std::fs::read(path)?;

        Ok(AssetMetadata {
            asset_type: classify_type(&rel),
            category: classify_category(&rel),
            size: metadata.len(),
            modified_ms: epoch_ms(&metadata),
            hash: hash_bytes(&bytes),
            dependencies: Vec::new(),
            path: rel,
        })
    }
}

fn epoch_ms(metadata: &std::fs::Metadata) -> i64 {
    metadata
        .modified()
        .ok()
        .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// Classify an asset by path. Path-segment markers take precedence over the
/// extension fallback.
pub fn classify_type(rel_path: &str) -> AssetType {
    let segments: Vec<&str> = rel_path.split('/').collect();
    if segments.contains(&"icons") {
        return AssetType::Icon;
    }
    if segments.contains(&"themes") {
        return AssetType::Theme;
    }
    if segments.contains(&"images") {
        return AssetType::Image;
    }

    let lower = rel_path.to_ascii_lowercase();
    if [".svg", ".png", ".jpg", ".jpeg", ".gif", ".ico"]
        .iter()
        .any(|ext| lower.ends_with(ext))
    {
        return AssetType::Image;
    }
    if lower.ends_with(".json") {
        return AssetType::Theme;
    }
    AssetType::Other
}

/// Category from fixed path markers, or `logos` for a `logo` file prefix
pub fn classify_category(rel_path: &str) -> Option<String> {
    let segments: Vec<&str> = rel_path.split('/').collect();
    for marker in ["file_icons", "folder_icons", "themes", "images"] {
        if segments.contains(&marker) {
            return Some(marker.to_string());
        }
    }
    let file_name = segments.last()?;
    if file_name.starts_with("logo") {
        return Some("logos".to_string());
    }
    None
}

/// Persist a manifest as pretty JSON, creating parent directories as needed
pub fn save_manifest(manifest: &AssetManifest, path: &Path) -> ForgeResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(manifest)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Load the previously persisted manifest
///
/// Missing or unparseable files are "no previous state" (`Ok(None)`), not an
/// error: the next run simply treats every asset as added.
pub fn load_manifest(path: &Path) -> ForgeResult<Option<AssetManifest>> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(_) => return Ok(None),
    };
    Ok(serde_json::from_str(&text).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::NullReporter;
    use std::fs;
    use tempfile::tempdir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn config_for(root: &Path) -> PipelineConfig {
        PipelineConfig {
            source_dir: root.join("assets"),
            output_dir: root.join("dist"),
            manifest_path: root.join("asset-manifest.json"),
            ..PipelineConfig::default()
        }
    }

    #[test]
    fn generate_includes_files_not_directories() {
        let dir = tempdir().unwrap();
        write(dir.path(), "assets/icons/file_icons/rust.svg", "<svg></svg>");
        write(dir.path(), "assets/themes/base.theme.json", "{}");

        let generator = ManifestGenerator::new(&config_for(dir.path()));
        let manifest = generator.generate(&NullReporter).unwrap();

        assert_eq!(manifest.len(), 2);
        assert!(manifest.contains("icons/file_icons/rust.svg"));
        assert!(manifest.contains("themes/base.theme.json"));
    }

    #[test]
    fn generate_on_missing_source_is_error() {
        let dir = tempdir().unwrap();
        let generator = ManifestGenerator::new(&config_for(dir.path()));
        assert!(matches!(
            generator.generate(&NullReporter),
            Err(ForgeError::SourceMissing { .. })
        ));
    }

    #[test]
    fn classify_type_markers_take_precedence_over_extension() {
        // .svg would fall back to Image, but the icons/ marker wins
        assert_eq!(classify_type("icons/file_icons/rust.svg"), AssetType::Icon);
        assert_eq!(classify_type("themes/base.theme.json"), AssetType::Theme);
        assert_eq!(classify_type("images/banner.svg"), AssetType::Image);
    }

    #[test]
    fn classify_type_extension_fallback() {
        assert_eq!(classify_type("misc/banner.png"), AssetType::Image);
        assert_eq!(classify_type("misc/loose.svg"), AssetType::Image);
        assert_eq!(classify_type("misc/settings.json"), AssetType::Theme);
        assert_eq!(classify_type("misc/readme.txt"), AssetType::Other);
    }

    #[test]
    fn classify_category_from_markers_and_logo_prefix() {
        assert_eq!(
            classify_category("icons/file_icons/rust.svg").as_deref(),
            Some("file_icons")
        );
        assert_eq!(
            classify_category("icons/folder_icons/folder-src.svg").as_deref(),
            Some("folder_icons")
        );
        assert_eq!(
            classify_category("themes/base.theme.json").as_deref(),
            Some("themes")
        );
        assert_eq!(classify_category("logo-dark.png").as_deref(), Some("logos"));
        assert_eq!(classify_category("misc/readme.txt"), None);
    }

    #[test]
    fn dependency_map_is_total_over_assets() {
        let dir = tempdir().unwrap();
        write(dir.path(), "assets/icons/file_icons/foo.svg", "<svg>1</svg>");
        write(dir.path(), "assets/images/banner.png", "png-bytes");

        let generator = ManifestGenerator::new(&config_for(dir.path()));
        let manifest = generator.generate(&NullReporter).unwrap();

        for asset in &manifest.assets {
            assert!(manifest.dependencies.contains_key(&asset.path));
        }
    }

    #[test]
    fn substring_resolver_links_theme_to_referenced_icon() {
        let dir = tempdir().unwrap();
        write(dir.path(), "assets/icons/file_icons/foo.svg", "<svg>1</svg>");
        write(dir.path(), "assets/icons/file_icons/bar.svg", "<svg>2</svg>");
        write(
            dir.path(),
            "assets/themes/base.theme.json",
            r#"{ "iconDefinitions": { "foo": { "iconPath": "../icons/file_icons/foo.svg" } } }"#,
        );

        let generator = ManifestGenerator::new(&config_for(dir.path()));
        let manifest = generator.generate(&NullReporter).unwrap();

        let deps = &manifest.dependencies["themes/base.theme.json"];
        assert!(deps.contains(&"icons/file_icons/foo.svg".to_string()));
        assert!(!deps.contains(&"icons/file_icons/bar.svg".to_string()));
    }

    #[test]
    fn regenerating_unchanged_tree_is_idempotent_except_timestamp() {
        let dir = tempdir().unwrap();
        write(dir.path(), "assets/icons/file_icons/foo.svg", "<svg>1</svg>");
        write(dir.path(), "assets/themes/base.theme.json", r#"{"a":"foo"}"#);

        let generator = ManifestGenerator::new(&config_for(dir.path()));
        let first = generator.generate(&NullReporter).unwrap();
        let second = generator.generate(&NullReporter).unwrap();

        assert_eq!(first.assets, second.assets);
        assert_eq!(first.categories, second.categories);
        assert_eq!(first.dependencies, second.dependencies);
    }

    #[test]
    fn identical_content_at_different_paths_hashes_identically() {
        let dir = tempdir().unwrap();
        write(dir.path(), "assets/icons/file_icons/a.svg", "<svg>same</svg>");
        write(dir.path(), "assets/icons/file_icons/b.svg", "<svg>same</svg>");

        let generator = ManifestGenerator::new(&config_for(dir.path()));
        let manifest = generator.generate(&NullReporter).unwrap();

        let a = manifest.asset("icons/file_icons/a.svg").unwrap();
        let b = manifest.asset("icons/file_icons/b.svg").unwrap();
        assert_eq!(a.hash, b.hash);
    }

    #[test]
    fn save_then_load_round_trips_every_field() {
        let dir = tempdir().unwrap();
        write(dir.path(), "assets/icons/file_icons/foo.svg", "<svg>1</svg>");
        write(dir.path(), "assets/themes/base.theme.json", r#"{"a":"foo"}"#);

        let config = config_for(dir.path());
        let generator = ManifestGenerator::new(&config);
        let manifest = generator.generate(&NullReporter).unwrap();

        save_manifest(&manifest, &config.manifest_path).unwrap();
        let loaded = load_manifest(&config.manifest_path).unwrap().unwrap();

        assert_eq!(loaded, manifest);
    }

    #[test]
    fn load_missing_manifest_is_none() {
        let dir = tempdir().unwrap();
        let loaded = load_manifest(&dir.path().join("missing.json")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn load_unparseable_manifest_is_none() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("asset-manifest.json");
        fs::write(&path, "{ truncated").unwrap();
        assert!(load_manifest(&path).unwrap().is_none());
    }

    #[test]
    fn custom_resolver_still_yields_total_dependency_map() {
        let dir = tempdir().unwrap();
        write(dir.path(), "assets/icons/file_icons/ok.svg", "<svg></svg>");

        struct FailingResolver;
        impl DependencyResolver for FailingResolver {
            fn resolve(
                &self,
                _assets: &[AssetMetadata],
                _source_root: &Path,
            ) -> BTreeMap<String, Vec<String>> {
                BTreeMap::new()
            }
        }

        let generator =
            ManifestGenerator::new(&config_for(dir.path())).with_resolver(Box::new(FailingResolver));
        let manifest = generator.generate(&NullReporter).unwrap();
        assert_eq!(manifest.len(), 1);
        assert!(manifest.dependencies.contains_key("icons/file_icons/ok.svg"));
    }
}
