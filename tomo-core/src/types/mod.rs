//! Core types for a single book build

mod chapter;
mod metadata;
mod package;

pub use chapter::Chapter;
pub(crate) use chapter::first_illegal_char;
pub use metadata::{BookMetadata, DEFAULT_LANGUAGE};
pub use package::{
    chapter_href, chapter_id, media_type, paths, ArtifactKind, BuildPlan, ManifestEntry, Package,
    SpineEntry,
};
