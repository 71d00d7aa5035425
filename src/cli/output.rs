use serde::Serialize;

use crate::io::registry::{self, ProjectEntry};
use crate::model::card::{CardNumber, CardSummary};
use crate::ops::search::CardHit;
use crate::util::unicode::truncate_to_width;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct CardJson {
    pub position: usize,
    pub card: usize,
    pub title: String,
    pub written: bool,
}

#[derive(Serialize)]
pub struct ProjectJson {
    pub id: String,
    pub name: String,
    pub path: String,
    pub exists: bool,
    pub current: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_opened: Option<String>,
}

#[derive(Serialize)]
pub struct SearchHitJson {
    pub position: usize,
    pub card: usize,
    pub title: String,
    pub line_number: usize,
    pub line: String,
}

#[derive(Serialize)]
pub struct StatusJson {
    pub project: String,
    pub written: usize,
    pub total: usize,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn card_to_json(row: &CardSummary) -> CardJson {
    CardJson {
        position: row.position,
        card: row.card.get(),
        title: row.title.clone(),
        written: row.written,
    }
}

pub fn project_to_json(id: &str, entry: &ProjectEntry, current: bool) -> ProjectJson {
    ProjectJson {
        id: id.to_string(),
        name: entry.name.clone(),
        path: entry.path.clone(),
        exists: entry.exists(),
        current,
        last_opened: entry.last_opened.map(|dt| dt.format("%Y-%m-%dT%H:%M:%S").to_string()),
    }
}

pub fn hit_to_json(hit: &CardHit) -> SearchHitJson {
    SearchHitJson {
        position: hit.position,
        card: hit.card.get(),
        title: hit.title.clone(),
        line_number: hit.line_number,
        line: hit.line.clone(),
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// Deck listing row: `12  [07] ● Title`
pub fn format_card_line(row: &CardSummary, title_width: usize) -> String {
    let mut line = format!("{:>2}  [{:02}] {}", row.position, row.card.get(), row.glyph());
    if !row.title.trim().is_empty() {
        line.push(' ');
        line.push_str(&truncate_to_width(&row.title, title_width));
    }
    line
}

/// Header shown above a card's text
pub fn format_card_heading(card: CardNumber, title: &str) -> String {
    if title.is_empty() {
        format!("Card [{:02}]", card.get())
    } else {
        format!("[{:02}] {}", card.get(), title)
    }
}

/// First `max_lines` lines of a card, with a marker if more follow
pub fn format_preview(content: &str, max_lines: usize) -> String {
    let lines: Vec<&str> = content.split('\n').collect();
    let mut preview = lines
        .iter()
        .take(max_lines)
        .copied()
        .collect::<Vec<_>>()
        .join("\n");
    if lines.len() > max_lines {
        preview.push_str("\n\n[...more content...]");
    }
    preview
}

/// Projects list row
pub fn format_project_line(id: &str, entry: &ProjectEntry, current: bool, id_width: usize) -> String {
    let marker = if current { "*" } else { " " };
    let path_display = if entry.exists() {
        registry::abbreviate_path(&entry.path)
    } else {
        "(not found)".to_string()
    };
    format!(
        "{} {:<width$}  {:<24}  {:<30}  {}",
        marker,
        id,
        entry.name,
        path_display,
        registry::format_last_opened(entry.last_opened.as_ref()),
        width = id_width
    )
}

/// Search result row: `3 [07]:2: matching line`
pub fn format_hit_line(hit: &CardHit) -> String {
    format!(
        "{:>2} [{:02}]:{}: {}",
        hit.position,
        hit.card.get(),
        hit.line_number,
        hit.line
    )
}
