use std::fmt;

/// Number of cards in every deck
pub const DECK_SIZE: usize = 70;

/// Fixed identity of a card, always in `1..=DECK_SIZE`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardNumber(u8);

impl CardNumber {
    /// Build a card number, rejecting anything outside `1..=70`
    pub fn new(n: usize) -> Option<CardNumber> {
        if (1..=DECK_SIZE).contains(&n) {
            Some(CardNumber(n as u8))
        } else {
            None
        }
    }

    pub fn get(self) -> usize {
        self.0 as usize
    }

    /// The card's file name under `cards/`, e.g. `07.md`
    pub fn file_name(self) -> String {
        format!("{:02}.md", self.0)
    }

    /// Every card number in ascending order
    pub fn all() -> impl Iterator<Item = CardNumber> {
        (1..=DECK_SIZE).map(|n| CardNumber(n as u8))
    }
}

impl fmt::Display for CardNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Glyph shown next to a card: filled when written, hollow otherwise
pub fn status_glyph(written: bool) -> &'static str {
    if written { "●" } else { "○" }
}

/// One slot of the deck as shown to the user.
///
/// Title and written status are derived from the card file each time a
/// summary is built; nothing here is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardSummary {
    /// 1-indexed display position
    pub position: usize,
    pub card: CardNumber,
    pub title: String,
    pub written: bool,
}

impl CardSummary {
    pub fn glyph(&self) -> &'static str {
        status_glyph(self.written)
    }

    /// Title for display, falling back to `[Card N]` when the card has none
    pub fn display_title(&self) -> String {
        if self.title.is_empty() {
            format!("[Card {}]", self.card)
        } else {
            self.title.clone()
        }
    }
}
