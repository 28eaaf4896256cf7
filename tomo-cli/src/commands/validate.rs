//! Validate command implementation

use anyhow::{bail, Context, Result};
use std::path::Path;
use tomo_core::inspect_archive;

/// Check the packaging invariants of a generated EPUB
pub fn validate(input: &Path) -> Result<()> {
    let report = inspect_archive(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let problems = report.violations();
    if problems.is_empty() {
        println!("Valid EPUB file");
        println!("  Title: {}", report.title.as_deref().unwrap_or("(none)"));
        println!("  Manifest items: {}", report.manifest.len());
        println!("  Spine entries: {}", report.spine.len());
        return Ok(());
    }

    eprintln!("Invalid EPUB file: {}", input.display());
    for problem in &problems {
        eprintln!("  - {}", problem);
    }
    tracing::debug!("{} packaging problems found", problems.len());
    bail!("Validation failed for {}", input.display());
}
