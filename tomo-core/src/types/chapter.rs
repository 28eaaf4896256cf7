//! Chapter type representing a single translated chapter of a novel

use crate::error::InputError;
use serde::{Deserialize, Serialize};

/// A single chapter of a book
///
/// Chapters carry no identity of their own: the position in the input
/// sequence is the reading order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chapter {
    /// Chapter title
    pub title: String,

    /// Plain-text body; newlines are rendered as line breaks
    #[serde(default)]
    pub content: String,
}

impl Chapter {
    /// Create a new chapter
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// Whether the chapter has no body text
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Check that the chapter can be embedded in an XHTML document.
    ///
    /// `index` is the zero-based position, reported 1-based in the error.
    pub fn validate(&self, index: usize) -> Result<(), InputError> {
        let invalid = |reason: String| InputError::InvalidChapter {
            index: index + 1,
            reason,
        };

        if self.title.trim().is_empty() {
            return Err(invalid("title is blank".to_string()));
        }
        if let Some(c) = first_illegal_char(&self.title) {
            return Err(invalid(format!("title contains U+{:04X}", c as u32)));
        }
        if let Some(c) = first_illegal_char(&self.content) {
            return Err(invalid(format!("content contains U+{:04X}", c as u32)));
        }
        Ok(())
    }
}

/// First character that XML 1.0 cannot represent, even escaped
pub(crate) fn first_illegal_char(s: &str) -> Option<char> {
    s.chars().find(|&c| {
        (c.is_control() && !matches!(c, '\t' | '\n' | '\r')) || c == '\u{FFFE}' || c == '\u{FFFF}'
    })
}
