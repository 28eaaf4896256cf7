//! XHTML content documents: chapters, navigation and cover

use super::{RenderResult, XmlDocument};
use crate::types::{chapter_href, paths, BookMetadata, Chapter};

/// Render one chapter document.
///
/// The title is used both as the document title and as the heading; every
/// newline in the body becomes a `<br/>`.
pub fn render_chapter(chapter: &Chapter, language: &str) -> RenderResult<Vec<u8>> {
    let mut doc = XmlDocument::xhtml(&chapter.title, language)?;
    doc.start("body", &[])?;
    doc.text_element("h1", &[], &chapter.title)?;
    doc.empty("hr", &[])?;
    doc.start("section", &[])?;
    doc.text_with_breaks(&chapter.content)?;
    doc.end("section")?;
    doc.finish_xhtml()
}

/// Render the EPUB 3 navigation document listing every chapter
pub fn render_navigation(metadata: &BookMetadata, chapters: &[Chapter]) -> RenderResult<Vec<u8>> {
    let mut doc = XmlDocument::xhtml(&metadata.title, &metadata.language)?;
    doc.start("body", &[])?;
    doc.start("nav", &[("epub:type", "toc"), ("id", "toc")])?;
    doc.text_element("h1", &[], &metadata.title)?;
    doc.start("ol", &[])?;
    for (i, chapter) in chapters.iter().enumerate() {
        let href = chapter_href(i + 1);
        doc.start("li", &[])?;
        doc.text_element("a", &[("href", href.as_str())], &chapter.title)?;
        doc.end("li")?;
    }
    doc.end("ol")?;
    doc.end("nav")?;
    doc.finish_xhtml()
}

/// Render the cover page around the fixed-name cover image
pub fn render_cover(metadata: &BookMetadata) -> RenderResult<Vec<u8>> {
    let mut doc = XmlDocument::xhtml(&metadata.title, &metadata.language)?;
    doc.start("body", &[])?;
    doc.start("section", &[("epub:type", "cover"), ("class", "cover")])?;
    doc.empty(
        "img",
        &[("src", paths::COVER_IMAGE), ("alt", metadata.title.as_str())],
    )?;
    doc.text_element("h1", &[], &metadata.title)?;
    if let Some(range) = &metadata.chapter_range {
        doc.text_element("h2", &[], range)?;
    }
    doc.end("section")?;
    doc.finish_xhtml()
}
