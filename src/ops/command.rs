//! The one-line command box of the deck view: `swap 3 5`, `rename 2 "Title"`, `open 5`.

use tracing::debug;

use crate::io::order_io;
use crate::io::project_io::{self, ProjectError};
use crate::model::card::CardNumber;
use crate::model::project::Project;
use crate::ops::rename::rename_card;

/// A parsed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorCommand {
    /// Swap two positions, 1-indexed as typed. Kept signed so a negative
    /// position reports as out of range rather than malformed.
    Swap { first: i64, second: i64 },
    /// Set (or with an empty title, clear) a card's title
    Rename { card: usize, title: String },
    /// Open a card for editing
    Open { card: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("invalid command format")]
    InvalidFormat,
    #[error("unknown command, try: swap 3 5, rename 2 'title', open 5")]
    Unknown,
}

/// Parse a command line. The command word is case-insensitive.
pub fn parse_command(line: &str) -> Result<EditorCommand, CommandError> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let Some(word) = parts.first() else {
        return Err(CommandError::Empty);
    };

    match (word.to_lowercase().as_str(), parts.len()) {
        ("swap", 3) => Ok(EditorCommand::Swap {
            first: parse_number(parts[1])?,
            second: parse_number(parts[2])?,
        }),
        ("rename", n) if n >= 3 => Ok(EditorCommand::Rename {
            card: parse_number(parts[1])?,
            title: clean_title(&parts[2..].join(" ")),
        }),
        ("open", 2) => Ok(EditorCommand::Open {
            card: parse_number(parts[1])?,
        }),
        _ => Err(CommandError::Unknown),
    }
}

fn parse_number<T: std::str::FromStr>(token: &str) -> Result<T, CommandError> {
    token.parse().map_err(|_| CommandError::InvalidFormat)
}

/// Strip any quote characters wrapping a typed title
pub fn clean_title(raw: &str) -> String {
    raw.trim_matches(|c| c == '"' || c == '\'').to_string()
}

/// 0-indexed position for a typed 1-indexed one; `None` below 1
fn position_index(typed: i64) -> Option<usize> {
    usize::try_from(typed).ok()?.checked_sub(1)
}

/// What happened when a command ran
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Swapped { first: usize, second: usize },
    /// A swap named a position outside the deck; nothing changed
    InvalidPositions,
    Renamed(CardNumber),
    /// The caller should open this card in its editor
    Open(CardNumber),
}

/// Run a parsed command against a project.
pub fn execute_command(project: &Project, command: &EditorCommand) -> Result<CommandOutcome, ProjectError> {
    debug!(?command, "executing command");
    match command {
        EditorCommand::Swap { first, second } => {
            let (Some(a), Some(b)) = (position_index(*first), position_index(*second)) else {
                return Ok(CommandOutcome::InvalidPositions);
            };
            if order_io::swap_positions(project, a, b)? {
                Ok(CommandOutcome::Swapped {
                    first: a + 1,
                    second: b + 1,
                })
            } else {
                Ok(CommandOutcome::InvalidPositions)
            }
        }
        EditorCommand::Rename { card, title } => {
            let card = project_io::card_number(*card)?;
            rename_card(project, card, title)?;
            Ok(CommandOutcome::Renamed(card))
        }
        EditorCommand::Open { card } => Ok(CommandOutcome::Open(project_io::card_number(*card)?)),
    }
}

impl CommandOutcome {
    /// Message shown to the user after the command
    pub fn message(&self) -> String {
        match self {
            CommandOutcome::Swapped { first, second } => {
                format!("Swapped positions {} and {}", first, second)
            }
            CommandOutcome::InvalidPositions => "Invalid positions".to_string(),
            CommandOutcome::Renamed(card) => format!("Renamed card {}", card),
            CommandOutcome::Open(card) => format!("Opening card {}", card),
        }
    }
}
