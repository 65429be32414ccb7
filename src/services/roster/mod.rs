pub mod aggregator;
pub mod charts;
pub mod classifier;
pub mod filter;
pub mod normalizer;
pub mod types;

pub use aggregator::{combine, group_by_sheet, summarize, Breakdown};
pub use classifier::classify;
pub use filter::filter_rows;
pub use normalizer::{normalize, promote_headers, standardize_columns};
pub use types::{Cell, NamedRow, NormalizedRow, NormalizedTable, RawSheet};
