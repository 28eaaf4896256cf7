//! Manifest and spine layout derived from a build plan

use serde::{Deserialize, Serialize};

/// Media types used inside the archive
pub mod media_type {
    pub const EPUB: &str = "application/epub+zip";
    pub const OPF: &str = "application/oebps-package+xml";
    pub const XHTML: &str = "application/xhtml+xml";
    pub const JPEG: &str = "image/jpeg";
}

/// Fixed archive paths
pub mod paths {
    pub const MIMETYPE: &str = "mimetype";
    pub const CONTAINER: &str = "META-INF/container.xml";
    pub const PACKAGE: &str = "content.opf";
    pub const NAVIGATION: &str = "toc.xhtml";
    pub const COVER_PAGE: &str = "cover.xhtml";
    pub const COVER_IMAGE: &str = "cover.jpg";
}

/// Which optional artifacts a build produces.
///
/// The navigation document is always in the manifest; `include_toc` only
/// decides whether it is part of the reading order.
///
/// Resolved once, before any manifest or spine entry is computed, so that
/// the manifest, the spine and the packager never disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildPlan {
    pub include_cover: bool,
    pub include_toc: bool,
}

impl BuildPlan {
    pub fn new(include_cover: bool, include_toc: bool) -> Self {
        Self {
            include_cover,
            include_toc,
        }
    }

    /// Lay out manifest and spine for `chapter_count` chapters
    pub fn layout(&self, chapter_count: usize) -> Package {
        let mut manifest = Vec::with_capacity(chapter_count + 3);
        let mut spine = Vec::with_capacity(chapter_count + 2);

        // EPUB 3 requires a navigation document even when it is not read
        manifest.push(ManifestEntry::new(
            ArtifactKind::Navigation,
            "toc",
            paths::NAVIGATION,
            media_type::XHTML,
        ));
        if self.include_cover {
            manifest.push(ManifestEntry::new(
                ArtifactKind::CoverPage,
                "cover",
                paths::COVER_PAGE,
                media_type::XHTML,
            ));
            manifest.push(ManifestEntry::new(
                ArtifactKind::CoverImage,
                "cover-image",
                paths::COVER_IMAGE,
                media_type::JPEG,
            ));
            spine.push(SpineEntry::new("cover"));
        }
        if self.include_toc {
            spine.push(SpineEntry::new("toc"));
        }

        for number in 1..=chapter_count {
            let id = chapter_id(number);
            manifest.push(ManifestEntry::new(
                ArtifactKind::Chapter(number),
                &id,
                &chapter_href(number),
                media_type::XHTML,
            ));
            spine.push(SpineEntry::new(id));
        }

        Package { manifest, spine }
    }
}

impl Default for BuildPlan {
    fn default() -> Self {
        Self::new(false, true)
    }
}

/// The generated artifact a manifest entry stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArtifactKind {
    Navigation,
    CoverPage,
    CoverImage,
    /// 1-based chapter number
    Chapter(usize),
}

impl ArtifactKind {
    /// OPF `properties` attribute for this artifact, if any
    pub fn properties(&self) -> Option<&'static str> {
        match self {
            ArtifactKind::Navigation => Some("nav"),
            ArtifactKind::CoverImage => Some("cover-image"),
            ArtifactKind::CoverPage | ArtifactKind::Chapter(_) => None,
        }
    }
}

/// One `<item>` of the package manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub kind: ArtifactKind,
    pub id: String,
    pub href: String,
    pub media_type: String,
}

impl ManifestEntry {
    fn new(kind: ArtifactKind, id: &str, href: &str, media_type: &str) -> Self {
        Self {
            kind,
            id: id.to_string(),
            href: href.to_string(),
            media_type: media_type.to_string(),
        }
    }
}

/// One `<itemref>` of the spine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpineEntry {
    pub idref: String,
}

impl SpineEntry {
    pub fn new(idref: impl Into<String>) -> Self {
        Self {
            idref: idref.into(),
        }
    }
}

/// Manifest in archive order plus spine in reading order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub manifest: Vec<ManifestEntry>,
    pub spine: Vec<SpineEntry>,
}

impl Package {
    /// Look up a manifest entry by id
    pub fn entry(&self, id: &str) -> Option<&ManifestEntry> {
        self.manifest.iter().find(|entry| entry.id == id)
    }
}

/// Manifest id of the 1-based chapter `number`
pub fn chapter_id(number: usize) -> String {
    format!("chapter{number}")
}

/// Archive path of the 1-based chapter `number`
pub fn chapter_href(number: usize) -> String {
    format!("chapter{number}.xhtml")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idrefs(package: &Package) -> Vec<&str> {
        package.spine.iter().map(|s| s.idref.as_str()).collect()
    }

    #[test]
    fn test_spine_order_with_cover() {
        let package = BuildPlan::new(true, true).layout(2);
        assert_eq!(idrefs(&package), ["cover", "toc", "chapter1", "chapter2"]);
    }

    #[test]
    fn test_spine_order_without_cover() {
        let package = BuildPlan::new(false, true).layout(3);
        assert_eq!(idrefs(&package), ["toc", "chapter1", "chapter2", "chapter3"]);
    }

    #[test]
    fn test_no_chapters() {
        let package = BuildPlan::default().layout(0);
        assert_eq!(idrefs(&package), ["toc"]);
        assert_eq!(package.manifest.len(), 1);
    }

    #[test]
    fn test_without_toc() {
        let package = BuildPlan::new(false, false).layout(1);
        assert_eq!(idrefs(&package), ["chapter1"]);
        let nav = package.entry("toc").unwrap();
        assert_eq!(nav.kind.properties(), Some("nav"));
        assert_eq!(nav.href, "toc.xhtml");
    }

    #[test]
    fn test_manifest_ids_are_unique() {
        let package = BuildPlan::new(true, true).layout(12);
        let mut ids: Vec<_> = package.manifest.iter().map(|e| e.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), package.manifest.len());
    }

    #[test]
    fn test_every_spine_entry_is_in_manifest() {
        let package = BuildPlan::new(true, true).layout(4);
        for itemref in &package.spine {
            assert!(package.entry(&itemref.idref).is_some(), "{}", itemref.idref);
        }
    }

    #[test]
    fn test_properties() {
        let package = BuildPlan::new(true, true).layout(1);
        assert_eq!(package.entry("toc").unwrap().kind.properties(), Some("nav"));
        assert_eq!(
            package.entry("cover-image").unwrap().kind.properties(),
            Some("cover-image")
        );
        assert_eq!(package.entry("chapter1").unwrap().kind.properties(), None);
        assert_eq!(package.entry("chapter1").unwrap().href, "chapter1.xhtml");
    }
}
