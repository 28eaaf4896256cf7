//! The book-archive assembler
//!
//! [`EpubAssembler::generate`] validates its input, fetches the cover (when
//! one is requested), lays out manifest and spine once from a [`BuildPlan`],
//! renders every document into a private working directory and packages the
//! result. The working directory is removed on every exit path.

use crate::config::AssemblerConfig;
use crate::cover::{CoverSource, HttpCoverSource};
use crate::error::{InputError, PackagingError, ResourceError, Result, TomoError};
use crate::naming::output_file_name;
use crate::packager::package_archive;
use crate::render;
use crate::types::{
    first_illegal_char, media_type, paths, ArtifactKind, BookMetadata, BuildPlan, Chapter, Package,
};
use crate::workdir::WorkingDirectory;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared flag a caller sets to abandon a running build
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; the build stops at its next checkpoint
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn checkpoint(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(TomoError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Assembles translated chapters into EPUB archives
pub struct EpubAssembler {
    config: AssemblerConfig,
    cover_source: Box<dyn CoverSource>,
}

impl EpubAssembler {
    /// Create an assembler that downloads covers over HTTP
    pub fn new(config: AssemblerConfig) -> Self {
        let cover_source =
            HttpCoverSource::new(config.cover_connect_timeout(), config.cover_timeout());
        Self {
            config,
            cover_source: Box::new(cover_source),
        }
    }

    /// Replace the cover source
    pub fn with_cover_source(mut self, source: impl CoverSource + 'static) -> Self {
        self.cover_source = Box::new(source);
        self
    }

    pub fn config(&self) -> &AssemblerConfig {
        &self.config
    }

    /// Build the archive for `chapters` and return its path.
    ///
    /// # Errors
    ///
    /// - [`TomoError::Input`] for a blank or XML-illegal title or range label,
    ///   or a malformed chapter, before anything is written
    /// - [`TomoError::Resource`] when the cover cannot be fetched or the
    ///   scratch/output directories cannot be managed
    /// - [`TomoError::Packaging`] when a document cannot be rendered or the
    ///   archive cannot be written
    pub fn generate(
        &self,
        title: &str,
        chapters: &[Chapter],
        chapter_range: Option<&str>,
        cover_url: Option<&str>,
    ) -> Result<PathBuf> {
        self.generate_with_cancel(
            title,
            chapters,
            chapter_range,
            cover_url,
            &CancellationFlag::new(),
        )
    }

    /// [`generate`](Self::generate), checking `cancel` between steps
    pub fn generate_with_cancel(
        &self,
        title: &str,
        chapters: &[Chapter],
        chapter_range: Option<&str>,
        cover_url: Option<&str>,
        cancel: &CancellationFlag,
    ) -> Result<PathBuf> {
        let title = title.trim();
        if title.is_empty() {
            return Err(InputError::EmptyTitle.into());
        }
        if let Some(c) = first_illegal_char(title) {
            return Err(InputError::InvalidTitle(illegal_char_reason(c)).into());
        }
        if let Some(c) = chapter_range.and_then(first_illegal_char) {
            return Err(InputError::InvalidRangeLabel(illegal_char_reason(c)).into());
        }
        let file_name =
            output_file_name(title).ok_or_else(|| InputError::UnsafeTitle(title.to_string()))?;
        for (index, chapter) in chapters.iter().enumerate() {
            chapter.validate(index)?;
        }

        tracing::info!("Assembling '{}' with {} chapters", title, chapters.len());

        let mut metadata = BookMetadata::new(title, self.config.language.as_str());
        if let Some(range) = chapter_range {
            metadata = metadata.with_chapter_range(range);
        }

        // Cover presence is settled here, before any manifest entry exists
        cancel.checkpoint()?;
        let cover = match cover_url {
            Some(url) => Some(self.cover_source.fetch(url)?),
            None => None,
        };

        let plan = BuildPlan::new(cover.is_some(), self.config.include_toc);
        let package = plan.layout(chapters.len());

        std::fs::create_dir_all(&self.config.output_dir).map_err(ResourceError::OutputDir)?;
        let output = self.config.output_dir.join(file_name);

        let mut workdir = WorkingDirectory::create(&self.config.scratch_root())?;
        match self.populate_and_package(
            &mut workdir,
            &metadata,
            &package,
            chapters,
            cover.as_deref(),
            &output,
            cancel,
        ) {
            Ok(()) => {
                if let Err(e) = workdir.close() {
                    // Scratch space could not be released, so the build fails as a whole
                    discard(&output);
                    return Err(e.into());
                }
            }
            Err(e) => {
                workdir.mark_failed();
                tracing::error!("Failed to assemble '{}': {}", title, e);
                return Err(e);
            }
        }

        tracing::info!("Wrote {:?}", output);
        Ok(output)
    }

    #[allow(clippy::too_many_arguments)]
    fn populate_and_package(
        &self,
        workdir: &mut WorkingDirectory,
        metadata: &BookMetadata,
        package: &Package,
        chapters: &[Chapter],
        cover: Option<&[u8]>,
        output: &Path,
        cancel: &CancellationFlag,
    ) -> Result<()> {
        workdir.write(paths::MIMETYPE, media_type::EPUB.as_bytes())?;
        workdir.write(paths::CONTAINER, &render::render_container().map_err(PackagingError::from)?)?;

        for entry in &package.manifest {
            cancel.checkpoint()?;
            let bytes = match entry.kind {
                ArtifactKind::Navigation => render::render_navigation(metadata, chapters),
                ArtifactKind::CoverPage => render::render_cover(metadata),
                ArtifactKind::CoverImage => Ok(cover.unwrap_or_default().to_vec()),
                ArtifactKind::Chapter(number) => {
                    render::render_chapter(&chapters[number - 1], &metadata.language)
                }
            }
            .map_err(PackagingError::from)?;
            workdir.write(&entry.href, &bytes)?;
        }

        let opf = render::render_package(metadata, package).map_err(PackagingError::from)?;
        workdir.write(paths::PACKAGE, &opf)?;

        cancel.checkpoint()?;
        package_archive(workdir, package, output)?;
        workdir.mark_packaged();
        Ok(())
    }
}

fn illegal_char_reason(c: char) -> String {
    format!("contains U+{:04X}", c as u32)
}

/// Remove an archive that must not be surfaced
fn discard(output: &Path) {
    if let Err(e) = std::fs::remove_file(output) {
        tracing::warn!("Failed to remove {:?}: {}", output, e);
    }
}
