//! Zip packaging of a populated working directory
//!
//! The archive is written to a temporary file next to its final path and
//! renamed into place only once the zip is complete, so a failed build never
//! leaves a partial archive behind.

use crate::error::PackagingError;
use crate::types::{paths, Package};
use crate::workdir::WorkingDirectory;
use std::io::Write;
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Write the archive for `package` from the artifacts in `workdir` to `output`.
///
/// Entry order: `mimetype` (stored), container, package document, then every
/// manifest entry in manifest order.
pub fn package_archive(
    workdir: &WorkingDirectory,
    package: &Package,
    output: &Path,
) -> Result<(), PackagingError> {
    let parent = output
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut temp = tempfile::Builder::new()
        .prefix(".tomo-")
        .suffix(".epub.part")
        .tempfile_in(parent)?;

    {
        let mut zip = ZipWriter::new(temp.as_file_mut());
        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        add_entry(&mut zip, workdir, paths::MIMETYPE, stored)?;
        add_entry(&mut zip, workdir, paths::CONTAINER, deflated)?;
        add_entry(&mut zip, workdir, paths::PACKAGE, deflated)?;
        for entry in &package.manifest {
            add_entry(&mut zip, workdir, &entry.href, deflated)?;
        }

        zip.finish()?;
    }
    temp.as_file().sync_all()?;

    temp.persist(output)
        .map_err(|e| PackagingError::Persist {
            path: output.to_path_buf(),
            source: e.error,
        })?;

    tracing::debug!(
        "Packaged {} entries into {:?}",
        package.manifest.len() + 3,
        output
    );
    Ok(())
}

fn add_entry<W: Write + std::io::Seek>(
    zip: &mut ZipWriter<W>,
    workdir: &WorkingDirectory,
    name: &str,
    options: SimpleFileOptions,
) -> Result<(), PackagingError> {
    let bytes = workdir.read(name)?;
    zip.start_file(name, options)?;
    zip.write_all(&bytes)?;
    Ok(())
}
