//! Choosing which chapters go into a book and how the range is labelled

use crate::error::InputError;
use crate::types::Chapter;
use regex::Regex;
use std::ops::Range;
use std::sync::OnceLock;

/// Label used when the first chapter carries no number
pub const PROLOGUE: &str = "Prólogo";

/// Label used when the last chapter carries no number
pub const EPILOGUE: &str = "Epílogo";

/// A window of consecutive chapters, 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChapterWindow {
    from: usize,
    amount: usize,
}

impl ChapterWindow {
    /// `amount` chapters starting at the 1-based position `from`
    pub fn new(from: usize, amount: usize) -> Result<Self, InputError> {
        if from == 0 {
            return Err(InputError::InvalidWindow(
                "chapters are numbered from 1".to_string(),
            ));
        }
        if amount == 0 {
            return Err(InputError::InvalidWindow(
                "amount must be at least 1".to_string(),
            ));
        }
        Ok(Self { from, amount })
    }

    /// 1-based position of the first chapter
    pub fn first(&self) -> usize {
        self.from
    }

    pub fn amount(&self) -> usize {
        self.amount
    }

    /// Zero-based index range of the window over `available` chapters,
    /// clamped so it never reaches past the end
    pub fn range(&self, available: usize) -> Range<usize> {
        let start = (self.from - 1).min(available);
        let end = start.saturating_add(self.amount).min(available);
        start..end
    }

    /// The chapters inside the window
    pub fn select<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[self.range(items.len())]
    }
}

fn chapter_number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)cap[íi]tulo\s*(\d+)").expect("chapter number pattern is valid")
    })
}

/// `Capítulo N` when `title` names a chapter number
pub fn chapter_number_label(title: &str) -> Option<String> {
    chapter_number_pattern()
        .captures(title)
        .and_then(|caps| caps.get(1))
        .map(|number| format!("Capítulo {}", number.as_str()))
}

/// Human-readable range such as `Capítulo 3 a Capítulo 7`.
///
/// Unnumbered first and last chapters are labelled as prologue and
/// epilogue. Returns `None` for an empty list.
pub fn chapter_range_label(chapters: &[Chapter]) -> Option<String> {
    let first = chapters.first()?;
    let last = chapters.last()?;

    let start = chapter_number_label(&first.title).unwrap_or_else(|| PROLOGUE.to_string());
    let end = chapter_number_label(&last.title).unwrap_or_else(|| EPILOGUE.to_string());
    Some(format!("{start} a {end}"))
}

/// Title given to a generated book: upper-cased novel title plus range label
pub fn book_title(novel_title: &str, range_label: Option<&str>) -> String {
    let upper = novel_title.trim().to_uppercase();
    match range_label {
        Some(label) => format!("{upper}__{label}"),
        None => upper,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chapters(titles: &[&str]) -> Vec<Chapter> {
        titles.iter().map(|t| Chapter::new(*t, "")).collect()
    }

    #[test]
    fn test_window_rejects_zero() {
        assert!(ChapterWindow::new(0, 5).is_err());
        assert!(ChapterWindow::new(1, 0).is_err());
    }

    #[test]
    fn test_window_selects_from_start() {
        let items: Vec<u32> = (1..=10).collect();
        let window = ChapterWindow::new(1, 5).unwrap();
        assert_eq!(window.select(&items), &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_window_in_the_middle() {
        let items: Vec<u32> = (1..=10).collect();
        let window = ChapterWindow::new(4, 3).unwrap();
        assert_eq!(window.range(items.len()), 3..6);
        assert_eq!(window.select(&items), &[4, 5, 6]);
    }

    #[test]
    fn test_window_clamped_at_end() {
        let items: Vec<u32> = (1..=10).collect();
        assert_eq!(ChapterWindow::new(8, 50).unwrap().select(&items), &[8, 9, 10]);
        assert!(ChapterWindow::new(11, 2).unwrap().select(&items).is_empty());
        assert!(ChapterWindow::new(usize::MAX, usize::MAX)
            .unwrap()
            .select(&items)
            .is_empty());
    }

    #[test]
    fn test_chapter_number_label() {
        assert_eq!(
            chapter_number_label("Capítulo 12: O retorno").as_deref(),
            Some("Capítulo 12")
        );
        assert_eq!(chapter_number_label("CAPITULO7").as_deref(), Some("Capítulo 7"));
        assert_eq!(chapter_number_label("Prefácio"), None);
    }

    #[test]
    fn test_range_label() {
        let list = chapters(&["Capítulo 1 - Início", "Capítulo 2", "Capítulo 3 - Fim"]);
        assert_eq!(
            chapter_range_label(&list).as_deref(),
            Some("Capítulo 1 a Capítulo 3")
        );
    }

    #[test]
    fn test_range_label_unnumbered() {
        let list = chapters(&["Prefácio", "Capítulo 1", "Posfácio"]);
        assert_eq!(chapter_range_label(&list).as_deref(), Some("Prólogo a Epílogo"));
    }

    #[test]
    fn test_range_label_empty() {
        assert_eq!(chapter_range_label(&[]), None);
    }

    #[test]
    fn test_book_title() {
        assert_eq!(
            book_title("Martial Peak", Some("Capítulo 1 a Capítulo 5")),
            "MARTIAL PEAK__Capítulo 1 a Capítulo 5"
        );
        assert_eq!(book_title(" Martial Peak ", None), "MARTIAL PEAK");
    }
}
