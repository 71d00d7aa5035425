use crate::model::order::{Order, OrderError};

/// Why the text of an order file could not be turned into an [`Order`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderParseError {
    #[error("invalid card number {0:?}")]
    InvalidToken(String),
    #[error(transparent)]
    Invalid(#[from] OrderError),
}

/// Parse `1,2,3,...` into an order. Whitespace around the list and around
/// each number is ignored; anything else must be a valid permutation.
pub fn parse_order(text: &str) -> Result<Order, OrderParseError> {
    let numbers = text
        .trim()
        .split(',')
        .map(|token| {
            let token = token.trim();
            token
                .parse::<usize>()
                .map_err(|_| OrderParseError::InvalidToken(token.to_string()))
        })
        .collect::<Result<Vec<usize>, _>>()?;
    Ok(Order::from_numbers(&numbers)?)
}

/// Comma-separated card numbers, no trailing newline
pub fn serialize_order(order: &Order) -> String {
    order
        .cards()
        .iter()
        .map(|c| c.get().to_string())
        .collect::<Vec<_>>()
        .join(",")
}
