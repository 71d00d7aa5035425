//! Rendering the ordered deck into screenplay, Fountain and outline text.
//!
//! The render functions are pure: they take the deck and a timestamp and
//! return a string. [`write_export`] is the one place that touches disk.

use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use chrono::NaiveDateTime;
use tracing::info;

use crate::io::atomic::atomic_write;
use crate::io::project_io::{self, ProjectError};
use crate::model::deck::Deck;
use crate::model::project::{hyphenate, Project};
use crate::parse::body_of;

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Markdown screenplay, one `## Scene N` per written card
    Markdown,
    /// Fountain screenplay
    Fountain,
    /// Numbered outline of every position
    Outline,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [
        ExportFormat::Markdown,
        ExportFormat::Fountain,
        ExportFormat::Outline,
    ];

    /// File name of the artifact under `exports/`
    pub fn file_name(self, project_name: &str) -> String {
        let stem = hyphenate(project_name);
        match self {
            ExportFormat::Markdown => format!("{}-screenplay.md", stem),
            ExportFormat::Fountain => format!("{}.fountain", stem),
            ExportFormat::Outline => format!("{}-outline.txt", stem),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Markdown => "Markdown screenplay",
            ExportFormat::Fountain => "Fountain format",
            ExportFormat::Outline => "Story outline",
        }
    }
}

/// Scene bodies in display order, skipping cards with nothing past their first line
fn scenes(deck: &Deck) -> impl Iterator<Item = (usize, String)> + '_ {
    deck.order
        .positions()
        .map(|(position, card)| (position, body_of(deck.content(card))))
        .filter(|(_, body)| !body.is_empty())
}

pub fn render_screenplay(name: &str, deck: &Deck, generated: NaiveDateTime) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "# {}\n\nGenerated: {}\n\n---\n\n",
        name,
        generated.format("%Y-%m-%d %H:%M")
    );
    for (position, body) in scenes(deck) {
        let _ = write!(out, "## Scene {}\n\n{}\n\n---\n\n", position, body);
    }
    out
}

pub fn render_fountain(name: &str, deck: &Deck, generated: NaiveDateTime) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "Title: {}\nAuthor: \nDraft date: {}\n\n",
        name,
        generated.format("%m/%d/%Y")
    );
    for (position, body) in scenes(deck) {
        let _ = write!(out, "INT./EXT. SCENE {}\n\n{}\n\n", position, body);
    }
    out
}

/// One line per position, written or not: `07. ● Title` or `07. ○ [Card 12]`
pub fn outline_entries(deck: &Deck) -> Vec<String> {
    deck.summaries()
        .iter()
        .map(|row| format!("{:02}. {} {}", row.position, row.glyph(), row.display_title()))
        .collect()
}

pub fn render_outline(name: &str, deck: &Deck) -> String {
    let mut out = format!("# {} - Story Outline\n\n", name);
    for line in outline_entries(deck) {
        out.push_str(&line);
        out.push('\n');
    }
    out
}

pub fn render(format: ExportFormat, name: &str, deck: &Deck, generated: NaiveDateTime) -> String {
    match format {
        ExportFormat::Markdown => render_screenplay(name, deck, generated),
        ExportFormat::Fountain => render_fountain(name, deck, generated),
        ExportFormat::Outline => render_outline(name, deck),
    }
}

/// Render the project's deck and write it under `exports/`, returning the path.
pub fn write_export(
    project: &Project,
    format: ExportFormat,
    generated: NaiveDateTime,
) -> Result<PathBuf, ProjectError> {
    let deck = project_io::load_deck(project)?;
    let content = render(format, &project.name, &deck, generated);

    let dir = project.exports_dir();
    fs::create_dir_all(&dir).map_err(|e| ProjectError::WriteError {
        path: dir.clone(),
        source: e,
    })?;
    let path = dir.join(format.file_name(&project.name));
    atomic_write(&path, content.as_bytes()).map_err(|e| ProjectError::WriteError {
        path: path.clone(),
        source: e,
    })?;
    info!(format = format.label(), path = %path.display(), "exported");
    Ok(path)
}
