//! Icon model checks: consistency, orphans, duplicates
//!
//! Consistency inspects the two model descriptors themselves. Orphan
//! detection compares icon files on disk against what the models declare (or
//! explicitly allow-list). Duplicate detection flags repeated icon names
//! within a single model.

use std::collections::BTreeMap;

use super::{codes, CheckOutcome, Issue};
use crate::model::IconModel;
use crate::models::AssetManifest;

/// Named icons must declare at least one association, and declared
/// extensions must start with `.`
pub(super) fn check_consistency(file_model: &IconModel, folder_model: &IconModel) -> CheckOutcome {
    let mut outcome = CheckOutcome::default();
    for (model_name, model) in [("file_icons", file_model), ("folder_icons", folder_model)] {
        for icon in &model.icons {
            if icon.has_no_associations() {
                outcome.warning(
                    Issue::new(
                        codes::ICON_WITHOUT_ASSOCIATIONS,
                        format!("icon '{}' declares no associations", icon.name),
                    )
                    .with_context(model_name),
                );
            }
            for ext in &icon.file_extensions {
                if !ext.starts_with('.') {
                    outcome.warning(
                        Issue::new(
                            codes::EXTENSION_MISSING_DOT,
                            format!("extension '{ext}' on icon '{}' does not start with '.'", icon.name),
                        )
                        .with_context(model_name),
                    );
                }
            }
        }
    }
    outcome
}

/// Icon files on disk that no model declares or allow-lists
///
/// Folder icon basenames are matched after stripping their `folder-` prefix.
pub(super) fn check_orphans(
    manifest: &AssetManifest,
    file_model: &IconModel,
    folder_model: &IconModel,
) -> CheckOutcome {
    let mut outcome = CheckOutcome::default();

    for asset in &manifest.assets {
        if !asset.path.ends_with(".svg") {
            continue;
        }
        match asset.category.as_deref() {
            Some("file_icons") => {
                let name = icon_basename(&asset.path);
                if !file_model.accounts_for(&name) {
                    outcome.warning(
                        Issue::new(
                            codes::ORPHANED_FILE_ICON,
                            format!("file icon '{name}' is not declared by the file-icon model"),
                        )
                        .with_asset(&asset.path),
                    );
                }
            }
            Some("folder_icons") => {
                let name = icon_basename(&asset.path);
                let name = name.strip_prefix("folder-").unwrap_or(&name);
                if !folder_model.accounts_for(name) {
                    outcome.warning(
                        Issue::new(
                            codes::ORPHANED_FOLDER_ICON,
                            format!("folder icon '{name}' is not declared by the folder-icon model"),
                        )
                        .with_asset(&asset.path),
                    );
                }
            }
            _ => {}
        }
    }

    outcome
}

/// Repeated icon names within one model
pub(super) fn check_duplicates(file_model: &IconModel, folder_model: &IconModel) -> CheckOutcome {
    let mut outcome = CheckOutcome::default();
    for (model_name, model) in [("file_icons", file_model), ("folder_icons", folder_model)] {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for icon in &model.icons {
            *counts.entry(icon.name.as_str()).or_default() += 1;
        }
        for (name, count) in counts {
            if count > 1 {
                outcome.error(
                    Issue::new(
                        codes::DUPLICATE_ICON_NAME,
                        format!("icon '{name}' is declared {count} times"),
                    )
                    .with_context(model_name),
                );
            }
        }
    }
    outcome
}

fn icon_basename(path: &str) -> String {
    std::path::Path::new(path)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
