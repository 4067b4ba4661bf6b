mod export;
mod filters;
mod summary;
pub mod views;

pub use export::write_recommendations_csv;
pub use filters::{FilterOptions, RowFilter};
pub use summary::{TopTierSummary, TOP_TIER_LIMIT};
