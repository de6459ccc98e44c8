//! Path hygiene check
//!
//! Manifest keys are relative forward-slash paths; anything absolute or
//! containing traversal segments would escape the mirrored output tree when
//! joined to a root.

use super::{codes, CheckOutcome, Issue};
use crate::models::AssetManifest;

pub(super) fn check(manifest: &AssetManifest) -> CheckOutcome {
    let mut outcome = CheckOutcome::default();

    for asset in &manifest.assets {
        let path = asset.path.as_str();
        if path.split('/').any(|segment| segment == "..") {
            outcome.error(
                Issue::new(codes::PATH_TRAVERSAL, "asset path contains traversal segments")
                    .with_asset(path),
            );
        }
        if std::path::Path::new(path).is_absolute() || path.starts_with('/') {
            outcome.error(
                Issue::new(codes::ABSOLUTE_PATH, "asset path is absolute").with_asset(path),
            );
        }
    }

    outcome
}
