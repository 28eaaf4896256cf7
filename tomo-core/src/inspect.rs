//! Reading a generated archive back
//!
//! Used by the `info` and `validate` commands and by the round-trip tests.

use crate::error::InspectError;
use crate::types::{media_type, paths};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::Serialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;
use zip::{CompressionMethod, ZipArchive};

/// One physical zip entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveEntry {
    pub name: String,
    pub stored: bool,
}

/// One `<item>` read from the package document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestItem {
    pub id: String,
    pub href: String,
    pub media_type: String,
    pub properties: Option<String>,
}

/// What an archive contains and what its package document declares
#[derive(Debug, Clone, Default, Serialize)]
pub struct ArchiveReport {
    /// Entries in physical order
    pub entries: Vec<ArchiveEntry>,
    pub mimetype: Option<String>,
    /// Package document path named by `META-INF/container.xml`
    pub rootfile: Option<String>,
    pub title: Option<String>,
    pub language: Option<String>,
    pub identifier: Option<String>,
    pub manifest: Vec<ManifestItem>,
    /// Spine idrefs in reading order
    pub spine: Vec<String>,
}

impl ArchiveReport {
    /// Archive entries that belong in the manifest (everything but the
    /// mimetype marker, the container and the package document)
    pub fn content_entries(&self) -> Vec<&str> {
        let package = self.rootfile.as_deref().unwrap_or(paths::PACKAGE);
        self.entries
            .iter()
            .map(|e| e.name.as_str())
            .filter(|name| {
                *name != paths::MIMETYPE
                    && *name != package
                    && !name.starts_with("META-INF/")
                    && !name.ends_with('/')
            })
            .collect()
    }

    /// Spine entries resolved to manifest hrefs
    pub fn spine_hrefs(&self) -> Vec<Option<&str>> {
        self.spine
            .iter()
            .map(|idref| {
                self.manifest
                    .iter()
                    .find(|item| &item.id == idref)
                    .map(|item| item.href.as_str())
            })
            .collect()
    }

    /// Every violated packaging invariant, as a human-readable message
    pub fn violations(&self) -> Vec<String> {
        let mut problems = Vec::new();

        match self.entries.first() {
            Some(first) if first.name == paths::MIMETYPE => {
                if !first.stored {
                    problems.push("mimetype entry is compressed".to_string());
                }
            }
            _ => problems.push("first entry is not mimetype".to_string()),
        }
        if self.mimetype.as_deref() != Some(media_type::EPUB) {
            problems.push(format!("unexpected mimetype {:?}", self.mimetype));
        }
        if self.rootfile.is_none() {
            problems.push("container does not name a package document".to_string());
        }

        let mut ids = HashSet::new();
        for item in &self.manifest {
            if !ids.insert(item.id.as_str()) {
                problems.push(format!("duplicate manifest id {}", item.id));
            }
        }

        let content: HashSet<&str> = self.content_entries().into_iter().collect();
        let declared: HashSet<&str> = self.manifest.iter().map(|i| i.href.as_str()).collect();
        for href in &declared {
            if !content.contains(href) {
                problems.push(format!("manifest item {href} is missing from the archive"));
            }
        }
        for name in &content {
            if !declared.contains(name) {
                problems.push(format!("archive entry {name} is not in the manifest"));
            }
        }

        for idref in &self.spine {
            if !ids.contains(idref.as_str()) {
                problems.push(format!("spine references unknown id {idref}"));
            }
        }

        problems
    }

    pub fn is_consistent(&self) -> bool {
        self.violations().is_empty()
    }
}

/// Open and inspect the archive at `path`
pub fn inspect_archive(path: impl AsRef<Path>) -> Result<ArchiveReport, InspectError> {
    let file = File::open(path)?;
    inspect_reader(file)
}

/// Inspect an archive from any seekable reader
pub fn inspect_reader<R: Read + Seek>(reader: R) -> Result<ArchiveReport, InspectError> {
    let mut archive = ZipArchive::new(reader)?;
    let mut report = ArchiveReport::default();

    for i in 0..archive.len() {
        let entry = archive.by_index(i)?;
        report.entries.push(ArchiveEntry {
            name: entry.name().to_string(),
            stored: entry.compression() == CompressionMethod::Stored,
        });
    }

    if let Some(mimetype) = read_optional(&mut archive, paths::MIMETYPE)? {
        report.mimetype = Some(mimetype);
    }

    let container = read_optional(&mut archive, paths::CONTAINER)?
        .ok_or_else(|| InspectError::MissingEntry(paths::CONTAINER.to_string()))?;
    report.rootfile = parse_rootfile(&container)?;

    let package_path = report.rootfile.clone().unwrap_or_else(|| paths::PACKAGE.to_string());
    let opf = read_optional(&mut archive, &package_path)?
        .ok_or_else(|| InspectError::MissingEntry(package_path.clone()))?;
    parse_package(&opf, &package_path, &mut report)?;

    Ok(report)
}

fn read_optional<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<Option<String>, InspectError> {
    let mut entry = match archive.by_name(name) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut content = String::new();
    entry.read_to_string(&mut content)?;
    Ok(Some(content))
}

fn xml_error(entry: &str, e: impl std::fmt::Display) -> InspectError {
    InspectError::Xml {
        entry: entry.to_string(),
        reason: e.to_string(),
    }
}

fn attribute(elem: &BytesStart, entry: &str, key: &str) -> Result<Option<String>, InspectError> {
    for attr in elem.attributes() {
        let attr = attr.map_err(|e| xml_error(entry, e))?;
        if attr.key.as_ref() == key.as_bytes() {
            let value = attr.unescape_value().map_err(|e| xml_error(entry, e))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn parse_rootfile(xml: &str) -> Result<Option<String>, InspectError> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event().map_err(|e| xml_error(paths::CONTAINER, e))? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"rootfile" => {
                return attribute(&e, paths::CONTAINER, "full-path");
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

/// Element whose text is being collected
#[derive(Clone, Copy)]
enum Field {
    Title,
    Language,
    Identifier,
}

fn parse_package(xml: &str, entry: &str, report: &mut ArchiveReport) -> Result<(), InspectError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut field: Option<Field> = None;

    loop {
        match reader.read_event().map_err(|e| xml_error(entry, e))? {
            Event::Start(e) | Event::Empty(e) => match e.name().as_ref() {
                b"item" => {
                    let id = attribute(&e, entry, "id")?.unwrap_or_default();
                    let href = attribute(&e, entry, "href")?.unwrap_or_default();
                    let media_type = attribute(&e, entry, "media-type")?.unwrap_or_default();
                    let properties = attribute(&e, entry, "properties")?;
                    report.manifest.push(ManifestItem {
                        id,
                        href,
                        media_type,
                        properties,
                    });
                }
                b"itemref" => {
                    if let Some(idref) = attribute(&e, entry, "idref")? {
                        report.spine.push(idref);
                    }
                }
                b"dc:title" => field = Some(Field::Title),
                b"dc:language" => field = Some(Field::Language),
                b"dc:identifier" => field = Some(Field::Identifier),
                _ => field = None,
            },
            Event::Text(t) => {
                if let Some(current) = field {
                    let text = t.unescape().map_err(|e| xml_error(entry, e))?.into_owned();
                    match current {
                        Field::Title => report.title = Some(text),
                        Field::Language => report.language = Some(text),
                        Field::Identifier => report.identifier = Some(text),
                    }
                }
            }
            Event::End(_) => field = None,
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    const CONTAINER: &str = r#"<?xml version="1.0"?>
<container><rootfiles><rootfile full-path="content.opf"/></rootfiles></container>"#;

    const OPF: &str = r#"<?xml version="1.0"?>
<package>
  <metadata>
    <dc:title>A &amp; B</dc:title>
    <dc:language>pt</dc:language>
  </metadata>
  <manifest>
    <item id="toc" href="toc.xhtml" media-type="application/xhtml+xml" properties="nav"/>
    <item id="chapter1" href="chapter1.xhtml" media-type="application/xhtml+xml"/>
  </manifest>
  <spine>
    <itemref idref="toc"/>
    <itemref idref="chapter1"/>
  </spine>
</package>"#;

    fn archive(entries: &[(&str, &str, CompressionMethod)]) -> Cursor<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content, method) in entries {
            let options = SimpleFileOptions::default().compression_method(*method);
            zip.start_file(*name, options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        let mut cursor = zip.finish().unwrap();
        cursor.set_position(0);
        cursor
    }

    #[test]
    fn test_consistent_archive() {
        let reader = archive(&[
            ("mimetype", media_type::EPUB, CompressionMethod::Stored),
            ("META-INF/container.xml", CONTAINER, CompressionMethod::Deflated),
            ("content.opf", OPF, CompressionMethod::Deflated),
            ("toc.xhtml", "<html/>", CompressionMethod::Deflated),
            ("chapter1.xhtml", "<html/>", CompressionMethod::Deflated),
        ]);
        let report = inspect_reader(reader).unwrap();

        assert_eq!(report.title.as_deref(), Some("A & B"));
        assert_eq!(report.language.as_deref(), Some("pt"));
        assert_eq!(report.rootfile.as_deref(), Some("content.opf"));
        assert_eq!(report.manifest[0].properties.as_deref(), Some("nav"));
        assert_eq!(report.content_entries(), vec!["toc.xhtml", "chapter1.xhtml"]);
        assert_eq!(
            report.spine_hrefs(),
            vec![Some("toc.xhtml"), Some("chapter1.xhtml")]
        );
        assert!(report.is_consistent(), "{:?}", report.violations());
    }

    #[test]
    fn test_reports_violations() {
        let reader = archive(&[
            ("META-INF/container.xml", CONTAINER, CompressionMethod::Deflated),
            ("mimetype", media_type::EPUB, CompressionMethod::Deflated),
            ("content.opf", OPF, CompressionMethod::Deflated),
            ("toc.xhtml", "<html/>", CompressionMethod::Deflated),
            ("extra.xhtml", "<html/>", CompressionMethod::Deflated),
        ]);
        let violations = inspect_reader(reader).unwrap().violations();

        assert!(violations.contains(&"first entry is not mimetype".to_string()));
        assert!(violations
            .contains(&"manifest item chapter1.xhtml is missing from the archive".to_string()));
        assert!(violations.contains(&"archive entry extra.xhtml is not in the manifest".to_string()));
    }

    #[test]
    fn test_missing_container() {
        let reader = archive(&[("mimetype", media_type::EPUB, CompressionMethod::Stored)]);
        let err = inspect_reader(reader).unwrap_err();
        assert!(matches!(err, InspectError::MissingEntry(name) if name == paths::CONTAINER));
    }
}
