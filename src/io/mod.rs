pub mod atomic;
pub mod card_store;
pub mod config_io;
pub mod lock;
pub mod order_io;
pub mod project_io;
pub mod registry;
