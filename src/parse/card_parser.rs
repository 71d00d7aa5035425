//! Derived views over a card's raw markdown.
//!
//! A card may open with a single header line (`# Title`). Everything here is
//! computed from the text on demand; titles and written status are never
//! stored anywhere.

/// Markdown header marker recognised at the start of a card
pub const HEADER_MARKER: char = '#';

/// True if the line, once trimmed, starts with the header marker
pub fn is_header_line(line: &str) -> bool {
    line.trim().starts_with(HEADER_MARKER)
}

/// Title from the card's first line.
///
/// Only one marker character is removed, so `## Scene` yields `# Scene`.
pub fn title_of(content: &str) -> String {
    let first = content.split('\n').next().unwrap_or("").trim();
    match first.strip_prefix(HEADER_MARKER) {
        Some(rest) => rest.trim().to_string(),
        None => String::new(),
    }
}

/// A card counts as written once it has any text besides a lone header.
pub fn is_written(content: &str) -> bool {
    let lines: Vec<&str> = content
        .split('\n')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    match lines.as_slice() {
        [] => false,
        [only] => !only.starts_with(HEADER_MARKER),
        _ => true,
    }
}

/// Card text with its first line dropped and the remainder trimmed.
///
/// The first line is discarded whatever it holds; exports number scenes by
/// position instead of reusing titles.
pub fn body_of(content: &str) -> String {
    content
        .split('\n')
        .skip(1)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
