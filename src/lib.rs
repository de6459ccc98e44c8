//! iconforge - incremental asset pipeline for icon theme packages
//!
//! iconforge tracks a tree of icon/theme assets (SVGs, JSON theme
//! descriptors, icon-model descriptors) in a content-hashed manifest,
//! classifies what changed since the last run, mirrors changed assets into an
//! output tree (propagating reprocessing along dependency edges), and runs a
//! multi-rule validation engine over the whole set.
//!
//! The crate is the pipeline core only: CLI parsing and output rendering are
//! owned by the caller, which injects a [`report::Reporter`].

pub mod config;
pub mod detect;
pub mod error;
pub mod hash;
pub mod manifest;
pub mod model;
pub mod models;
pub mod pipeline;
pub mod process;
pub mod report;
pub mod theme;
pub mod validate;

// Re-exports for convenience
pub use config::PipelineConfig;
pub use detect::{diff_manifests, ChangeDetector};
pub use error::{ForgeError, ForgeResult};
pub use manifest::{
    load_manifest, save_manifest, DependencyResolver, ManifestGenerator, SubstringResolver,
};
pub use model::{IconEntry, IconModel};
pub use models::{
    AssetChange, AssetManifest, AssetMetadata, AssetType, ChangeAnalysis, ChangeSummary,
    ChangeType, MANIFEST_VERSION,
};
pub use pipeline::Pipeline;
pub use process::{AssetProcessor, ProcessResult, ProcessSummary};
pub use report::{Level, NullReporter, RecordingReporter, Reporter};
pub use theme::{ThemeDocument, ThemeParseError};
pub use validate::{
    AssetValidator, ConciseGroup, ConciseSummary, Issue, ValidationResult, ValidationSummary,
};
