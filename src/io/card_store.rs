use std::fs;
use std::io::ErrorKind;

use tracing::debug;

use crate::io::atomic::atomic_write;
use crate::io::project_io::ProjectError;
use crate::model::card::CardNumber;
use crate::model::project::Project;

/// Whether the card's file is present on disk
pub fn card_exists(project: &Project, card: CardNumber) -> bool {
    project.card_path(card).is_file()
}

/// Full raw text of a card. A missing file reads as an empty card.
pub fn read_card(project: &Project, card: CardNumber) -> Result<String, ProjectError> {
    let path = project.card_path(card);
    match fs::read_to_string(&path) {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(ProjectError::ReadError { path, source: e }),
    }
}

/// Replace a card's text in full. The file (and `cards/`) is created if needed.
pub fn write_card(project: &Project, card: CardNumber, text: &str) -> Result<(), ProjectError> {
    let path = project.card_path(card);
    let cards_dir = project.cards_dir();
    fs::create_dir_all(&cards_dir).map_err(|e| ProjectError::WriteError {
        path: cards_dir,
        source: e,
    })?;
    atomic_write(&path, text.as_bytes()).map_err(|e| ProjectError::WriteError {
        path: path.clone(),
        source: e,
    })?;
    debug!(card = card.get(), bytes = text.len(), "wrote card");
    Ok(())
}
