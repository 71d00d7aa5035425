use std::collections::HashMap;

use super::card::{CardNumber, CardSummary};
use super::order::Order;
use crate::parse::{is_written, title_of};

/// A snapshot of a project's deck: the order plus the raw text of every card.
///
/// Loaded in one pass from disk for exports and listings. Cards missing from
/// `contents` read as empty.
#[derive(Debug, Clone, Default)]
pub struct Deck {
    pub order: Order,
    pub contents: HashMap<CardNumber, String>,
}

impl Deck {
    pub fn new(order: Order, contents: HashMap<CardNumber, String>) -> Self {
        Deck { order, contents }
    }

    /// Raw text of a card, empty if it has none
    pub fn content(&self, card: CardNumber) -> &str {
        self.contents.get(&card).map(String::as_str).unwrap_or("")
    }

    /// Title and written status for every position, in display order
    pub fn summaries(&self) -> Vec<CardSummary> {
        self.order
            .positions()
            .map(|(position, card)| {
                let content = self.content(card);
                CardSummary {
                    position,
                    card,
                    title: title_of(content),
                    written: is_written(content),
                }
            })
            .collect()
    }

    /// Number of written cards
    pub fn written_count(&self) -> usize {
        CardNumber::all()
            .filter(|&card| is_written(self.content(card)))
            .count()
    }
}
