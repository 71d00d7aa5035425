use std::path::PathBuf;

use super::card::CardNumber;

/// A scriptedt project on disk.
///
/// Only names and paths live here. Card text, titles and the order are read
/// from the filesystem on every access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// Display name, as entered at creation
    pub name: String,
    /// Project directory (holds `cards/`, `exports/` and `.cardorder`)
    pub root: PathBuf,
}

impl Project {
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Project {
            name: name.into(),
            root: root.into(),
        }
    }

    pub fn cards_dir(&self) -> PathBuf {
        self.root.join("cards")
    }

    pub fn exports_dir(&self) -> PathBuf {
        self.root.join("exports")
    }

    pub fn order_file(&self) -> PathBuf {
        self.root.join(".cardorder")
    }

    pub fn card_path(&self, card: CardNumber) -> PathBuf {
        self.cards_dir().join(card.file_name())
    }
}

/// Replace spaces with hyphens
pub fn hyphenate(name: &str) -> String {
    name.replace(' ', "-")
}
