use super::types::*;
use crate::error::AppError;

/// Minimum number of filled cells for a row to be taken as a header.
const HEADER_MIN_FILLED: usize = 3;

/// Resolves the header row of `sheet` and projects it onto [`COLUMNS_TO_KEEP`].
pub fn normalize(sheet: RawSheet) -> Result<NormalizedTable, AppError> {
    let sheet = if needs_header_promotion(&sheet)? {
        tracing::debug!("Sheet {} has title rows above its header, promoting", sheet.name);
        promote_headers(sheet)?
    } else {
        sheet
    };

    Ok(standardize_columns(&sheet))
}

/// True when the first cell of data row 0 is the literal `Nom`, meaning the
/// real header was pushed below the first worksheet row.
pub fn needs_header_promotion(sheet: &RawSheet) -> Result<bool, AppError> {
    let first_row = sheet
        .rows
        .first()
        .ok_or_else(|| AppError::malformed(&sheet.name, "sheet has no data rows"))?;
    let first_cell = first_row
        .first()
        .ok_or_else(|| AppError::malformed(&sheet.name, "first row has no cells"))?;

    Ok(first_cell.as_text() == Some(NAME_COLUMN))
}

/// Picks data row 0, then data row 1, as the header when it has more than
/// two filled cells. Otherwise the sheet keeps its current header.
pub fn promote_headers(mut sheet: RawSheet) -> Result<RawSheet, AppError> {
    if sheet.rows.len() < 2 {
        return Err(AppError::malformed(
            &sheet.name,
            format!("need at least 2 rows to resolve a header, found {}", sheet.rows.len()),
        ));
    }

    if non_null_count(&sheet.rows[0]) >= HEADER_MIN_FILLED {
        sheet.header = sheet.rows.remove(0);
    } else if non_null_count(&sheet.rows[1]) >= HEADER_MIN_FILLED {
        sheet.rows.remove(0);
        sheet.header = sheet.rows.remove(0);
    }

    Ok(sheet)
}

/// Keeps exactly the expected columns, in order. Missing ones come out null.
pub fn standardize_columns(sheet: &RawSheet) -> NormalizedTable {
    let indices: Vec<Option<usize>> = COLUMNS_TO_KEEP
        .iter()
        .map(|column| {
            let idx = sheet.column_index(column);
            if idx.is_none() {
                tracing::debug!("Sheet {} has no '{}' column, filling with nulls", sheet.name, column);
            }
            idx
        })
        .collect();

    let value = |row: &[Cell], idx: Option<usize>| {
        idx.and_then(|i| row.get(i)).and_then(Cell::to_value)
    };

    sheet
        .rows
        .iter()
        .map(|row| NormalizedRow {
            name: value(row, indices[0]),
            first_name: value(row, indices[1]),
            sex_raw: value(row, indices[2]),
            status_raw: value(row, indices[3]),
        })
        .collect()
}
