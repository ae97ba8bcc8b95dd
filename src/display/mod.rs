//! Terminal output: colour handling and feed tables.

pub mod colours;
pub mod table;

pub use colours::ColourManager;
pub use table::{format_arrival, format_compact_table, format_feed_json, format_feed_table, format_summary};
