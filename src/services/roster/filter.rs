use super::types::{NamedRow, NormalizedRow, NormalizedTable};

/// Drops rows without a usable name (blank or trailing rows of the sheet).
pub fn filter_rows(table: NormalizedTable) -> Vec<NamedRow> {
    table.into_iter().filter_map(NamedRow::from_normalized).collect()
}
