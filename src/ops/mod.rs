pub mod command;
pub mod export;
pub mod rename;
pub mod search;
