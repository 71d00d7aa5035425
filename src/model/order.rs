use super::card::{CardNumber, DECK_SIZE};

/// Reasons a sequence of card numbers is not a valid deck order
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderError {
    #[error("expected 70 cards, found {0}")]
    WrongLength(usize),
    #[error("card number out of range: {0}")]
    OutOfRange(usize),
    #[error("card {0} appears more than once")]
    Duplicate(usize),
}

/// Display order of the deck: position (0-indexed) → card number.
///
/// Always a permutation of `1..=70`; the constructors refuse anything else,
/// so every `Order` that exists can be saved as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    cards: Vec<CardNumber>,
}

impl Order {
    /// `[1, 2, ..., 70]`
    pub fn identity() -> Order {
        Order {
            cards: CardNumber::all().collect(),
        }
    }

    /// Validate raw card numbers as a permutation of the deck
    pub fn from_numbers(numbers: &[usize]) -> Result<Order, OrderError> {
        if numbers.len() != DECK_SIZE {
            return Err(OrderError::WrongLength(numbers.len()));
        }
        let mut seen = [false; DECK_SIZE];
        let mut cards = Vec::with_capacity(DECK_SIZE);
        for &n in numbers {
            let card = CardNumber::new(n).ok_or(OrderError::OutOfRange(n))?;
            let slot = &mut seen[n - 1];
            if *slot {
                return Err(OrderError::Duplicate(n));
            }
            *slot = true;
            cards.push(card);
        }
        Ok(Order { cards })
    }

    pub fn cards(&self) -> &[CardNumber] {
        &self.cards
    }

    /// Card at a 0-indexed position
    pub fn card_at(&self, position: usize) -> Option<CardNumber> {
        self.cards.get(position).copied()
    }

    /// 0-indexed position currently holding `card`
    pub fn position_of(&self, card: CardNumber) -> Option<usize> {
        self.cards.iter().position(|&c| c == card)
    }

    /// Exchange the cards at two 0-indexed positions.
    /// Returns false and leaves the order untouched if either is out of range.
    pub fn swap(&mut self, a: usize, b: usize) -> bool {
        if a >= self.cards.len() || b >= self.cards.len() {
            return false;
        }
        self.cards.swap(a, b);
        true
    }

    /// `(position, card)` pairs with 1-indexed positions, as shown to users
    pub fn positions(&self) -> impl Iterator<Item = (usize, CardNumber)> + '_ {
        self.cards.iter().enumerate().map(|(i, &c)| (i + 1, c))
    }
}

impl Default for Order {
    fn default() -> Self {
        Order::identity()
    }
}
