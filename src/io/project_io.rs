use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::io::{card_store, order_io};
use crate::model::card::{CardNumber, CardSummary};
use crate::model::deck::Deck;
use crate::model::order::Order;
use crate::model::project::Project;

/// Error type for project I/O operations
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("project directory not found: {0}")]
    NotAProject(PathBuf),
    #[error("card number out of range: {0} (cards are numbered 1-70)")]
    InvalidCard(usize),
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Resolve a user-supplied card number
pub fn card_number(n: usize) -> Result<CardNumber, ProjectError> {
    CardNumber::new(n).ok_or(ProjectError::InvalidCard(n))
}

/// Create the on-disk layout for a new project.
///
/// Makes `cards/` and `exports/`, writes the identity order and an empty
/// file for each of the 70 cards. Card files that already exist are kept.
pub fn create_project(name: &str, root: &Path) -> Result<Project, ProjectError> {
    let project = Project::new(name, root);

    for dir in [project.root.clone(), project.cards_dir(), project.exports_dir()] {
        fs::create_dir_all(&dir).map_err(|e| ProjectError::WriteError {
            path: dir.clone(),
            source: e,
        })?;
    }

    order_io::save_order(&project, &Order::identity())?;

    let mut created = 0;
    for card in CardNumber::all() {
        if !card_store::card_exists(&project, card) {
            card_store::write_card(&project, card, "")?;
            created += 1;
        }
    }

    info!(
        project = %project.name,
        path = %project.root.display(),
        created,
        "created project"
    );
    Ok(project)
}

/// Open an existing project directory.
pub fn open_project(name: &str, root: &Path) -> Result<Project, ProjectError> {
    if !root.is_dir() {
        return Err(ProjectError::NotAProject(root.to_path_buf()));
    }
    debug!(project = %name, path = %root.display(), "opened project");
    Ok(Project::new(name, root))
}

/// Read the order and every card in one pass.
pub fn load_deck(project: &Project) -> Result<Deck, ProjectError> {
    let order = order_io::load_order(project);
    let mut contents = HashMap::new();
    for card in CardNumber::all() {
        let text = card_store::read_card(project, card)?;
        if !text.is_empty() {
            contents.insert(card, text);
        }
    }
    Ok(Deck::new(order, contents))
}

/// Titles and written status for every position, freshly read from disk.
pub fn deck_summary(project: &Project) -> Result<Vec<CardSummary>, ProjectError> {
    Ok(load_deck(project)?.summaries())
}
