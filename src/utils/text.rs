// src/utils/text.rs

//! Small text transforms shared by the walker, registry and sinks.

use unicode_segmentation::UnicodeSegmentation;

/// Parse a displayed price into an integer by dropping every non-digit.
///
/// `"159.000 đ"` → `159000`; empty or digit-free text → `0`.
pub fn parse_price(text: &str) -> i64 {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

/// Upper-case the first letter and lower-case the rest.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Normalize a color name to its first word, capitalized.
///
/// Compound colors collapse onto their first word, so `"Trắng Cổ Đen"` and
/// `"Trắng Xanh"` both become `"Trắng"`. Empty names become `"N/A"`; the
/// `"N/A"` sentinel itself is capitalized like any other name (`"N/a"`).
pub fn normalize_color(name: &str) -> String {
    name.split_whitespace()
        .next()
        .map(capitalize)
        .unwrap_or_else(|| "N/A".to_string())
}

/// `"ao-thun-relaxed-fit"` → `"Ao Thun Relaxed Fit"`.
pub fn category_title(slug: &str) -> String {
    slug.split('-')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Asset-store folder segment for a display name.
pub fn folder_segment(name: &str) -> String {
    name.replace(' ', "_")
}

/// Cut a message to at most `max` user-perceived characters.
pub fn truncate(message: &str, max: usize) -> String {
    let mut graphemes = message.graphemes(true);
    let head: String = graphemes.by_ref().take(max).collect();
    if graphemes.next().is_some() {
        format!("{head}…")
    } else {
        head
    }
}
