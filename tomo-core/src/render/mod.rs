//! Document rendering
//!
//! Every document in the archive is produced through [`XmlDocument`], a thin
//! wrapper over the quick-xml writer. Text and attribute values are escaped
//! by the writer, so no user-supplied string is ever spliced into markup.

mod package;
mod xhtml;

pub use package::{render_container, render_package};
pub use xhtml::{render_chapter, render_cover, render_navigation};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Cursor;

/// Result type for rendering
pub type RenderResult<T> = std::result::Result<T, quick_xml::Error>;

// XML Namespaces
pub(crate) const NS_CONTAINER: &str = "urn:oasis:names:tc:opendocument:xmlns:container";
pub(crate) const NS_OPF: &str = "http://www.idpf.org/2007/opf";
pub(crate) const NS_DC: &str = "http://purl.org/dc/elements/1.1/";
pub(crate) const NS_XHTML: &str = "http://www.w3.org/1999/xhtml";
pub(crate) const NS_OPS: &str = "http://www.idpf.org/2007/ops";

/// An XML document under construction
pub(crate) struct XmlDocument {
    writer: Writer<Cursor<Vec<u8>>>,
}

impl XmlDocument {
    /// Start a document with the UTF-8 XML declaration
    pub fn new() -> RenderResult<Self> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        Ok(Self { writer })
    }

    /// Start an XHTML document: declaration, doctype, `<html>` and `<head>`
    pub fn xhtml(title: &str, language: &str) -> RenderResult<Self> {
        let mut doc = Self::new()?;
        doc.writer
            .write_event(Event::DocType(BytesText::from_escaped("html")))?;
        doc.start(
            "html",
            &[
                ("xmlns", NS_XHTML),
                ("xmlns:epub", NS_OPS),
                ("xml:lang", language),
                ("lang", language),
            ],
        )?;
        doc.start("head", &[])?;
        doc.empty("meta", &[("charset", "UTF-8")])?;
        doc.text_element("title", &[], title)?;
        doc.end("head")?;
        Ok(doc)
    }

    /// Write an opening tag
    pub fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> RenderResult<()> {
        let elem = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.writer.write_event(Event::Start(elem))?;
        Ok(())
    }

    /// Write a closing tag
    pub fn end(&mut self, name: &str) -> RenderResult<()> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    /// Write a self-closing element
    pub fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> RenderResult<()> {
        let elem = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.writer.write_event(Event::Empty(elem))?;
        Ok(())
    }

    /// Write escaped character data.
    ///
    /// An empty string still counts as text, keeping the surrounding tags
    /// on one line.
    pub fn text(&mut self, content: &str) -> RenderResult<()> {
        self.writer.write_event(Event::Text(BytesText::new(content)))?;
        Ok(())
    }

    /// Write a simple text element
    pub fn text_element(
        &mut self,
        name: &str,
        attrs: &[(&str, &str)],
        content: &str,
    ) -> RenderResult<()> {
        self.start(name, attrs)?;
        self.text(content)?;
        self.end(name)
    }

    /// Write text with every line break turned into `<br/>`.
    ///
    /// `\r\n` counts as a single break.
    pub fn text_with_breaks(&mut self, content: &str) -> RenderResult<()> {
        let normalized = content.replace("\r\n", "\n");
        for (i, line) in normalized.split('\n').enumerate() {
            if i > 0 {
                self.empty("br", &[])?;
            }
            self.text(line)?;
        }
        Ok(())
    }

    /// Close `<body>` and `<html>` of an XHTML document and finish it
    pub fn finish_xhtml(mut self) -> RenderResult<Vec<u8>> {
        self.end("body")?;
        self.end("html")?;
        Ok(self.finish())
    }

    /// Take the rendered bytes
    pub fn finish(self) -> Vec<u8> {
        self.writer.into_inner().into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(f: impl FnOnce(&mut XmlDocument) -> RenderResult<()>) -> String {
        let mut doc = XmlDocument::new().unwrap();
        f(&mut doc).unwrap();
        String::from_utf8(doc.finish()).unwrap()
    }

    #[test]
    fn test_declaration() {
        let xml = render(|_| Ok(()));
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    }

    #[test]
    fn test_text_is_escaped() {
        let xml = render(|doc| doc.text_element("p", &[], r#"<b> & "quoted""#));
        assert!(xml.contains("&lt;b&gt; &amp; &quot;quoted&quot;"));
        assert!(!xml.contains("<b>"));
    }

    #[test]
    fn test_attributes_are_escaped() {
        let xml = render(|doc| doc.empty("img", &[("alt", r#"a "b" & <c>"#)]));
        assert!(xml.contains("&quot;b&quot;"));
        assert!(xml.contains("&amp;"));
        assert!(!xml.contains("<c>"));
    }

    #[test]
    fn test_breaks() {
        let xml = render(|doc| {
            doc.start("section", &[])?;
            doc.text_with_breaks("one\ntwo\r\nthree\n")?;
            doc.end("section")
        });
        assert_eq!(xml.matches("<br/>").count(), 3);
        assert!(xml.contains("one<br/>two<br/>three<br/>"));
    }

    #[test]
    fn test_empty_text_element() {
        let xml = render(|doc| doc.text_element("section", &[], ""));
        assert!(xml.contains("<section></section>"));
    }

    #[test]
    fn test_consecutive_breaks_stay_inline() {
        let xml = render(|doc| doc.text_with_breaks("a\n\nb"));
        assert!(xml.contains("a<br/><br/>b"));
    }
}
