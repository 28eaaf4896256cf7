//! Tomo Core Library
//!
//! This crate assembles an ordered list of translated chapters into a single
//! EPUB 3 archive: package document, navigation document, one XHTML document
//! per chapter and an optional cover, packaged from a private scratch
//! directory that is always cleaned up.

pub mod assembler;
pub mod config;
pub mod cover;
pub mod error;
pub mod inspect;
pub mod naming;
pub mod packager;
pub mod render;
pub mod selection;
pub mod types;
pub mod workdir;

pub use assembler::{CancellationFlag, EpubAssembler};
pub use config::AssemblerConfig;
pub use cover::{CoverSource, HttpCoverSource};
pub use error::{
    ConfigError, InputError, InspectError, PackagingError, ResourceError, Result, TomoError,
};
pub use inspect::{inspect_archive, ArchiveReport};
pub use selection::{book_title, chapter_range_label, ChapterWindow};
pub use types::{BookMetadata, BuildPlan, Chapter, ManifestEntry, Package, SpineEntry};
