//! Book metadata for a single build

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Language written into the package document when none is configured
pub const DEFAULT_LANGUAGE: &str = "pt";

/// Book metadata, fixed for the duration of one build
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookMetadata {
    /// Book title
    pub title: String,

    /// Language code (BCP 47)
    pub language: String,

    /// URN identifier, generated per build
    pub identifier: String,

    /// Free-text label shown on the cover, e.g. "Capítulo 1 a Capítulo 5"
    pub chapter_range: Option<String>,

    /// Build timestamp, written as `dcterms:modified`
    pub modified: DateTime<Utc>,
}

impl BookMetadata {
    /// Create metadata with a fresh `urn:uuid:` identifier
    pub fn new(title: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            language: language.into(),
            identifier: format!("urn:uuid:{}", uuid::Uuid::new_v4()),
            chapter_range: None,
            modified: Utc::now(),
        }
    }

    /// Set the chapter range label
    pub fn with_chapter_range(mut self, label: impl Into<String>) -> Self {
        self.chapter_range = Some(label.into());
        self
    }

    /// `dcterms:modified` value (seconds precision, UTC)
    pub fn modified_timestamp(&self) -> String {
        self.modified.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_identifier_is_fresh_urn() {
        let a = BookMetadata::new("Livro", DEFAULT_LANGUAGE);
        let b = BookMetadata::new("Livro", DEFAULT_LANGUAGE);
        assert!(a.identifier.starts_with("urn:uuid:"));
        assert_ne!(a.identifier, b.identifier);
    }

    #[test]
    fn test_modified_timestamp_format() {
        let mut metadata = BookMetadata::new("Livro", "pt");
        metadata.modified = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(metadata.modified_timestamp(), "2024-03-09T07:05:01Z");
    }
}
