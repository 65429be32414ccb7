use std::io::Cursor;
use std::time::Instant;
use bytes::Bytes;
use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use crate::error::AppError;
use crate::models::DashboardReport;
use crate::services::export::ExportCache;
use crate::services::roster::{self, charts, Breakdown, Cell, RawSheet};

/// Decodes every worksheet of the uploaded workbook, in workbook order.
pub fn decode_workbook(file_data: Bytes) -> Result<Vec<RawSheet>, AppError> {
    let start = Instant::now();
    let cursor = Cursor::new(file_data);

    let mut workbook = open_workbook_auto_from_rs(cursor)
        .map_err(|e| {
            tracing::error!("Failed to open workbook: {}", e);
            AppError::FileProcessing(format!("Failed to open workbook: {}", e))
        })?;

    let sheet_names = workbook.sheet_names().to_vec();
    tracing::info!("Found {} sheets: {:?}", sheet_names.len(), sheet_names);

    let mut sheets = Vec::with_capacity(sheet_names.len());
    for sheet_name in sheet_names {
        let range = workbook.worksheet_range(&sheet_name).map_err(|e| {
            AppError::FileProcessing(format!("Failed to read worksheet {}: {}", sheet_name, e))
        })?;
        let grid = range_to_grid(&range);
        tracing::debug!("Sheet {} decoded with {} rows", sheet_name, grid.len());
        sheets.push(RawSheet::from_grid(sheet_name, grid));
    }

    tracing::info!("Workbook decoded in {:?}", start.elapsed());
    Ok(sheets)
}

/// Copies a calamine range into a grid anchored at column A, so that the
/// first cell of each row is always the worksheet's first column.
fn range_to_grid(range: &Range<Data>) -> Vec<Vec<Cell>> {
    let leading_cols = range.start().map_or(0, |(_, col)| col as usize);

    range
        .rows()
        .map(|row| {
            std::iter::repeat(Cell::Empty)
                .take(leading_cols)
                .chain(row.iter().map(to_cell))
                .collect()
        })
        .collect()
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) if s.is_empty() => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Bool(*b),
        other => Cell::Text(other.to_string()),
    }
}

/// Runs the full pipeline over already decoded sheets.
///
/// Returns the report together with the CSV encoding its `export_key` names.
pub fn build_report(
    sheets: Vec<RawSheet>,
    exports: &ExportCache,
) -> Result<(DashboardReport, Bytes), AppError> {
    let sheet_names: Vec<String> = sheets.iter().map(|s| s.name.clone()).collect();

    let rows = roster::combine(sheets)?;
    let summary = roster::summarize(&rows);
    tracing::info!(
        "Combined {} students, {} placed ({:.2}%)",
        summary.total_students,
        summary.total_placed,
        summary.percentage_placed
    );

    let sex_by_sheet = roster::group_by_sheet(&rows, Breakdown::Sex)?;
    let status_by_sheet = roster::group_by_sheet(&rows, Breakdown::Status)?;
    let charts = charts::build_charts(&sex_by_sheet, &status_by_sheet);
    let kpi = charts::placed_kpi(&summary);
    let (export_key, csv) = exports.get_or_encode(&rows)?;

    let report = DashboardReport {
        sheet_names,
        rows,
        summary,
        kpi,
        sex_by_sheet,
        status_by_sheet,
        charts,
        export_key,
    };
    Ok((report, csv))
}

pub fn process_roster_file(
    file_data: Bytes,
    exports: &ExportCache,
) -> Result<(DashboardReport, Bytes), AppError> {
    let start = Instant::now();
    tracing::info!("Processing roster workbook, size: {}KB", file_data.len() / 1024);

    let sheets = decode_workbook(file_data)?;
    let processed = build_report(sheets, exports)?;

    tracing::info!("Roster processed in {:?}", start.elapsed());
    Ok(processed)
}
