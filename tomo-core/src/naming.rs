//! File names derived from book titles

/// Extension of generated archives
pub const EPUB_EXTENSION: &str = "epub";

/// Filesystem-safe stem for the archive of `title`.
///
/// Accented characters are transliterated to ASCII, the result is
/// lower-cased, every run of other characters becomes a single `_`, and
/// leading/trailing separators are dropped. Returns `None` when nothing
/// usable is left.
pub fn output_file_stem(title: &str) -> Option<String> {
    let stem = slug::slugify(title).replace('-', "_");
    if stem.is_empty() {
        None
    } else {
        Some(stem)
    }
}

/// `<stem>.epub` for `title`
pub fn output_file_name(title: &str) -> Option<String> {
    output_file_stem(title).map(|stem| format!("{stem}.{EPUB_EXTENSION}"))
}

/// Name the archive is attached under when mailed: spaces become `-`
pub fn attachment_file_name(title: &str) -> String {
    format!("{}.{EPUB_EXTENSION}", title.replace(' ', "-"))
}
