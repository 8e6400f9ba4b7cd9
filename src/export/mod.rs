//! Export functionality for analysis
//!
//! Currently supports CSV export of the learner's action values per cell.

mod spread_csv;

pub use spread_csv::{SpreadCsvExporter, SpreadRecord};
