pub mod card;
pub mod config;
pub mod deck;
pub mod order;
pub mod project;

pub use card::*;
pub use config::*;
pub use deck::*;
pub use order::*;
pub use project::*;
