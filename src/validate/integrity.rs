//! Asset integrity check
//!
//! Every manifest asset must exist on disk and be non-empty. SVG files must
//! carry matching `<svg>`/`</svg>` tags; `.theme.json` files must parse and
//! match one of the two recognized theme shapes; other theme-typed JSON files
//! only need to parse (after comment stripping).

use std::path::Path;

use super::{codes, CheckOutcome, Issue};
use crate::models::{AssetManifest, AssetType};
use crate::theme::{strip_line_comments, ThemeDocument, ThemeParseError};

pub(super) fn check(manifest: &AssetManifest, source_root: &Path) -> CheckOutcome {
    let mut outcome = CheckOutcome::default();

    for asset in &manifest.assets {
        let full = source_root.join(&asset.path);

        let metadata = match std::fs::metadata(&full) {
            Ok(m) => m,
            Err(_) => {
                outcome.error(
                    Issue::new(codes::MISSING_ASSET_FILE, "asset file does not exist")
                        .with_asset(&asset.path),
                );
                continue;
            }
        };
        if metadata.len() == 0 {
            outcome.error(
                Issue::new(codes::EMPTY_ASSET_FILE, "asset file is empty").with_asset(&asset.path),
            );
            continue;
        }

        if asset.path.ends_with(".svg") {
            check_svg(&asset.path, &full, &mut outcome);
        } else if asset.path.ends_with(".theme.json") {
            check_theme(&asset.path, &full, &mut outcome);
        } else if asset.asset_type == AssetType::Theme && asset.path.ends_with(".json") {
            check_plain_json(&asset.path, &full, &mut outcome);
        }
    }

    outcome
}

fn check_svg(path: &str, full: &Path, outcome: &mut CheckOutcome) {
    let Ok(text) = std::fs::read_to_string(full) else {
        outcome.error(
            Issue::new(codes::UNREADABLE_ASSET_FILE, "asset file could not be read")
                .with_asset(path),
        );
        return;
    };
    if !(text.contains("<svg") && text.contains("</svg>")) {
        outcome.error(
            Issue::new(codes::MALFORMED_SVG, "missing matching <svg>/</svg> tags")
                .with_asset(path),
        );
    }
}

fn check_theme(path: &str, full: &Path, outcome: &mut CheckOutcome) {
    let Ok(text) = std::fs::read_to_string(full) else {
        outcome.error(
            Issue::new(codes::UNREADABLE_ASSET_FILE, "asset file could not be read")
                .with_asset(path),
        );
        return;
    };
    match ThemeDocument::parse(&text) {
        Ok(_) => {}
        Err(ThemeParseError::Json(e)) => outcome.error(
            Issue::new(codes::INVALID_THEME_JSON, "theme JSON did not parse")
                .with_asset(path)
                .with_context(e.to_string()),
        ),
        Err(ThemeParseError::UnrecognizedShape) => outcome.error(
            Issue::new(
                codes::UNRECOGNIZED_THEME_SHAPE,
                "theme is neither an icon theme nor a color theme",
            )
            .with_asset(path),
        ),
    }
}

fn check_plain_json(path: &str, full: &Path, outcome: &mut CheckOutcome) {
    let Ok(text) = std::fs::read_to_string(full) else {
        outcome.error(
            Issue::new(codes::UNREADABLE_ASSET_FILE, "asset file could not be read")
                .with_asset(path),
        );
        return;
    };
    if let Err(e) = serde_json::from_str::<serde_json::Value>(&strip_line_comments(&text)) {
        outcome.error(
            Issue::new(codes::INVALID_THEME_JSON, "JSON did not parse")
                .with_asset(path)
                .with_context(e.to_string()),
        );
    }
}
