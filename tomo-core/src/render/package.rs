//! OCF container and OPF package documents

use super::{RenderResult, XmlDocument, NS_CONTAINER, NS_DC, NS_OPF};
use crate::types::{media_type, paths, BookMetadata, Package};

const PACKAGE_ID: &str = "BookID";

/// Render `META-INF/container.xml`, pointing readers at the package document
pub fn render_container() -> RenderResult<Vec<u8>> {
    let mut doc = XmlDocument::new()?;
    doc.start("container", &[("version", "1.0"), ("xmlns", NS_CONTAINER)])?;
    doc.start("rootfiles", &[])?;
    doc.empty(
        "rootfile",
        &[("full-path", paths::PACKAGE), ("media-type", media_type::OPF)],
    )?;
    doc.end("rootfiles")?;
    doc.end("container")?;
    Ok(doc.finish())
}

/// Render `content.opf`: metadata, manifest and spine
pub fn render_package(metadata: &BookMetadata, package: &Package) -> RenderResult<Vec<u8>> {
    let mut doc = XmlDocument::new()?;
    doc.start(
        "package",
        &[
            ("xmlns", NS_OPF),
            ("version", "3.0"),
            ("unique-identifier", PACKAGE_ID),
            ("xml:lang", metadata.language.as_str()),
        ],
    )?;

    doc.start("metadata", &[("xmlns:dc", NS_DC)])?;
    doc.text_element("dc:identifier", &[("id", PACKAGE_ID)], &metadata.identifier)?;
    doc.text_element("dc:title", &[], &metadata.title)?;
    doc.text_element("dc:language", &[], &metadata.language)?;
    doc.text_element(
        "meta",
        &[("property", "dcterms:modified")],
        &metadata.modified_timestamp(),
    )?;
    // EPUB 2 readers look the cover up through this meta
    if let Some(cover) = package.entry("cover-image") {
        doc.empty("meta", &[("name", "cover"), ("content", cover.id.as_str())])?;
    }
    doc.end("metadata")?;

    doc.start("manifest", &[])?;
    for entry in &package.manifest {
        let mut attrs = vec![
            ("id", entry.id.as_str()),
            ("href", entry.href.as_str()),
            ("media-type", entry.media_type.as_str()),
        ];
        if let Some(properties) = entry.kind.properties() {
            attrs.push(("properties", properties));
        }
        doc.empty("item", &attrs)?;
    }
    doc.end("manifest")?;

    doc.start("spine", &[])?;
    for itemref in &package.spine {
        doc.empty("itemref", &[("idref", itemref.idref.as_str())])?;
    }
    doc.end("spine")?;

    doc.end("package")?;
    Ok(doc.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BuildPlan;

    #[test]
    fn test_container_points_at_package() {
        let xml = String::from_utf8(render_container().unwrap()).unwrap();
        assert!(xml.contains(r#"full-path="content.opf""#));
        assert!(xml.contains(r#"media-type="application/oebps-package+xml""#));
    }

    #[test]
    fn test_package_lists_manifest_and_spine() {
        let metadata = BookMetadata::new("Livro", "pt");
        let package = BuildPlan::new(false, true).layout(2);
        let xml = String::from_utf8(render_package(&metadata, &package).unwrap()).unwrap();

        assert!(xml.contains(r#"<item id="toc" href="toc.xhtml" media-type="application/xhtml+xml" properties="nav"/>"#));
        assert!(xml.contains(r#"<item id="chapter2" href="chapter2.xhtml" media-type="application/xhtml+xml"/>"#));
        assert!(xml.contains(r#"<itemref idref="chapter1"/>"#));
        assert!(xml.contains(&format!(">{}</dc:identifier>", metadata.identifier)));
        assert!(xml.contains("<dc:language>pt</dc:language>"));
        assert!(!xml.contains(r#"name="cover""#));
    }

    #[test]
    fn test_package_cover_meta() {
        let metadata = BookMetadata::new("Livro", "pt");
        let package = BuildPlan::new(true, true).layout(0);
        let xml = String::from_utf8(render_package(&metadata, &package).unwrap()).unwrap();
        assert!(xml.contains(r#"<meta name="cover" content="cover-image"/>"#));
        assert!(xml.contains(r#"properties="cover-image""#));
    }

    #[test]
    fn test_package_escapes_title() {
        let metadata = BookMetadata::new(r#"Fish & "Chips" <2>"#, "pt");
        let package = BuildPlan::default().layout(0);
        let xml = String::from_utf8(render_package(&metadata, &package).unwrap()).unwrap();
        assert!(xml.contains("<dc:title>Fish &amp; &quot;Chips&quot; &lt;2&gt;</dc:title>"));
    }
}
