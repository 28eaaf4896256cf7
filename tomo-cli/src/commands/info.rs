//! Info command implementation

use anyhow::{Context, Result};
use std::path::Path;
use tomo_core::inspect_archive;
use tomo_core::naming::attachment_file_name;

/// Display information about a generated EPUB
pub fn info(input: &Path, json: bool) -> Result<()> {
    let report = inspect_archive(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let unknown = "(none)";
    println!("Title:       {}", report.title.as_deref().unwrap_or(unknown));
    println!("Language:    {}", report.language.as_deref().unwrap_or(unknown));
    println!("Identifier:  {}", report.identifier.as_deref().unwrap_or(unknown));
    if let Some(title) = &report.title {
        println!("Attachment:  {}", attachment_file_name(title));
    }
    println!("Entries:     {}", report.entries.len());

    println!("Manifest:");
    for item in &report.manifest {
        let properties = item
            .properties
            .as_deref()
            .map(|p| format!(" [{}]", p))
            .unwrap_or_default();
        println!(
            "  {:<14} {} ({}){}",
            item.id, item.href, item.media_type, properties
        );
    }

    println!("Spine:");
    for (position, (idref, href)) in report.spine.iter().zip(report.spine_hrefs()).enumerate() {
        println!("  {:>3}. {} -> {}", position + 1, idref, href.unwrap_or("?"));
    }

    Ok(())
}
