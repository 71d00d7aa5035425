use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

const ELLIPSIS: char = '\u{2026}';

/// Cells a title occupies in the card listing. Tabs take 4 cells.
fn display_width(s: &str) -> usize {
    s.graphemes(true).map(grapheme_width).sum()
}

fn grapheme_width(g: &str) -> usize {
    if g == "\t" { 4 } else { g.width() }
}

/// Shorten `s` to at most `max_cells` cells, ending in `…` when cut.
/// Grapheme clusters are never split.
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    let Some(budget) = max_cells.checked_sub(1) else {
        return String::new();
    };

    let mut used = 0;
    let mut kept: String = s
        .graphemes(true)
        .take_while(|g| {
            used += grapheme_width(g);
            used <= budget
        })
        .collect();
    kept.push(ELLIPSIS);
    kept
}
