pub mod card_parser;
pub mod order_parser;

pub use card_parser::{body_of, is_header_line, is_written, title_of};
pub use order_parser::{parse_order, serialize_order};
