use std::ops::Range;

use regex::Regex;

use crate::io::project_io::{self, ProjectError};
use crate::model::card::CardNumber;
use crate::model::deck::Deck;
use crate::model::project::Project;
use crate::parse::title_of;

/// A matching line inside a card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardHit {
    /// 1-indexed display position of the card
    pub position: usize,
    pub card: CardNumber,
    pub title: String,
    /// 1-indexed line within the card
    pub line_number: usize,
    pub line: String,
    /// Byte ranges of the matches within `line`
    pub spans: Vec<Range<usize>>,
}

/// Collect all non-overlapping match byte-ranges for a regex in the given text.
fn find_matches(re: &Regex, text: &str) -> Vec<Range<usize>> {
    re.find_iter(text).map(|m| m.start()..m.end()).collect()
}

/// Search every card's text line by line, in display order.
pub fn search_deck(deck: &Deck, re: &Regex) -> Vec<CardHit> {
    let mut hits = Vec::new();
    for (position, card) in deck.order.positions() {
        let content = deck.content(card);
        if content.is_empty() {
            continue;
        }
        let title = title_of(content);
        for (idx, line) in content.split('\n').enumerate() {
            let spans = find_matches(re, line);
            if spans.is_empty() {
                continue;
            }
            hits.push(CardHit {
                position,
                card,
                title: title.clone(),
                line_number: idx + 1,
                line: line.to_string(),
                spans,
            });
        }
    }
    hits
}

/// Load the project's deck and search it.
pub fn search_cards(project: &Project, re: &Regex) -> Result<Vec<CardHit>, ProjectError> {
    let deck = project_io::load_deck(project)?;
    Ok(search_deck(&deck, re))
}
