//! Theme structure and icon reference checks
//!
//! Every icon theme must declare an `iconDefinitions` map, every association
//! table must resolve into that map, and every icon definition's path must
//! resolve (relative to the theme file's directory) to an existing file.

use std::path::Path;

use super::{codes, CheckOutcome, Issue};
use crate::models::AssetManifest;
use crate::theme::{IconTheme, ThemeDocument};

/// Association tables must reference keys present in `iconDefinitions`
pub(super) fn check_structure(manifest: &AssetManifest, source_root: &Path) -> CheckOutcome {
    let mut outcome = CheckOutcome::default();

    for_each_theme(manifest, source_root, |path, parsed| match parsed {
        Ok(ThemeDocument::Icon(theme)) => {
            check_references(path, &theme, &mut outcome);
        }
        Ok(ThemeDocument::Color(_)) => {}
        Err(crate::theme::ThemeParseError::UnrecognizedShape) => {
            outcome.error(
                Issue::new(
                    codes::MISSING_ICON_DEFINITIONS,
                    "theme declares no iconDefinitions map",
                )
                .with_asset(path),
            );
        }
        // Unparseable JSON is reported by the integrity check
        Err(crate::theme::ThemeParseError::Json(_)) => {}
    });

    outcome
}

fn check_references(path: &str, theme: &IconTheme, outcome: &mut CheckOutcome) {
    let tables = [
        (codes::INVALID_FILE_EXTENSION_REFERENCE, "fileExtensions", &theme.file_extensions),
        (codes::INVALID_FILE_NAME_REFERENCE, "fileNames", &theme.file_names),
        (codes::INVALID_FOLDER_NAME_REFERENCE, "folderNames", &theme.folder_names),
    ];
    for (code, table, entries) in tables {
        for (association, key) in entries {
            if !theme.icon_definitions.contains_key(key) {
                outcome.error(
                    Issue::new(
                        code,
                        format!("{table} entry '{association}' references undefined icon '{key}'"),
                    )
                    .with_asset(path)
                    .with_context(key.clone()),
                );
            }
        }
    }
}

/// Every icon definition path must resolve to an existing file
pub(super) fn check_icon_references(manifest: &AssetManifest, source_root: &Path) -> CheckOutcome {
    let mut outcome = CheckOutcome::default();

    for_each_theme(manifest, source_root, |path, parsed| {
        let Ok(ThemeDocument::Icon(theme)) = parsed else {
            return;
        };
        let theme_dir = source_root
            .join(path)
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| source_root.to_path_buf());

        for (key, definition) in &theme.icon_definitions {
            let icon_path = &definition.icon_path;
            if looks_absolute(icon_path) {
                outcome.warning(
                    Issue::new(
                        codes::ABSOLUTE_ICON_PATH,
                        format!("icon '{key}' uses absolute path '{icon_path}'"),
                    )
                    .with_asset(path)
                    .with_context(key.clone()),
                );
                continue;
            }
            if !theme_dir.join(icon_path).exists() {
                outcome.error(
                    Issue::new(
                        codes::MISSING_ICON_FILE,
                        format!("icon '{key}' resolves to missing file '{icon_path}'"),
                    )
                    .with_asset(path)
                    .with_context(key.clone()),
                );
            }
        }
    });

    outcome
}

/// Parse each `.theme.json` asset once and hand it to `f`
fn for_each_theme<F>(manifest: &AssetManifest, source_root: &Path, mut f: F)
where
    F: FnMut(&str, Result<ThemeDocument, crate::theme::ThemeParseError>),
{
    for asset in &manifest.assets {
        if !asset.path.ends_with(".theme.json") {
            continue;
        }
        // Unreadable files are reported by the integrity check
        let Ok(text) = std::fs::read_to_string(source_root.join(&asset.path)) else {
            continue;
        };
        f(&asset.path, ThemeDocument::parse(&text));
    }
}

fn looks_absolute(path: &str) -> bool {
    path.starts_with('/')
        || path.starts_with('\\')
        || (path.len() >= 2 && path.as_bytes()[1] == b':' && path.as_bytes()[0].is_ascii_alphabetic())
}
