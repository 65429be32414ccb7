use super::classifier::classify;
use super::filter::filter_rows;
use super::normalizer::normalize;
use super::types::RawSheet;
use crate::error::AppError;
use crate::models::{CombinedTable, GroupCount, Status, Summary};
use polars::prelude::*;

const NAME_COL: &str = "Name";
const SHEET_COL: &str = "SheetName";
const SEX_COL: &str = "NormalizedSex";
const STATUS_COL: &str = "Status";
const COUNT_COL: &str = "Count";
const TOTAL_COL: &str = "Total";
const PERCENTAGE_COL: &str = "Percentage";

/// Runs every sheet through normalize, filter and classify, in order.
/// The first malformed sheet aborts the whole workbook.
pub fn combine(sheets: Vec<RawSheet>) -> Result<CombinedTable, AppError> {
    let mut combined = CombinedTable::new();

    for sheet in sheets {
        let sheet_name = sheet.name.clone();
        let normalized = normalize(sheet)?;
        let row_count = normalized.len();
        let kept = filter_rows(normalized);
        tracing::info!("Sheet {}: kept {} of {} rows", sheet_name, kept.len(), row_count);

        combined.extend(kept.into_iter().map(|row| classify(row, &sheet_name)));
    }

    if combined.is_empty() {
        tracing::warn!("No named rows found in any sheet");
    }

    Ok(combined)
}

pub fn summarize(table: &CombinedTable) -> Summary {
    let total_students = table.len();
    let total_placed = table
        .iter()
        .filter(|row| row.status == Some(Status::Placed))
        .count();

    let percentage_placed = if total_students > 0 {
        round2(total_placed as f64 / total_students as f64 * 100.0)
    } else {
        0.0
    };

    Summary {
        total_students,
        total_placed,
        percentage_placed,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Which derived column to break each sheet down by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Breakdown {
    Sex,
    Status,
}

impl Breakdown {
    fn column(&self) -> &'static str {
        match self {
            Breakdown::Sex => SEX_COL,
            Breakdown::Status => STATUS_COL,
        }
    }

    fn rank(&self, category: Option<&str>) -> usize {
        match (self, category) {
            (Breakdown::Sex, Some("F")) => 0,
            (Breakdown::Sex, _) => 1,
            (Breakdown::Status, Some("Placed")) => 0,
            (Breakdown::Status, Some("Selected")) => 1,
            (Breakdown::Status, _) => 2,
        }
    }
}

/// Row counts per `(sheet, category)` with each count's share of its sheet.
///
/// Output is ordered by sheet (first appearance), then category.
pub fn group_by_sheet(table: &CombinedTable, breakdown: Breakdown) -> Result<Vec<GroupCount>, AppError> {
    if table.is_empty() {
        return Ok(Vec::new());
    }

    let df = to_dataframe(table)?;
    let category_col = breakdown.column();
    let grouped = grouped_counts(df, category_col)?;

    let groups = grouped.column(SHEET_COL)?.str()?;
    let categories = grouped.column(category_col)?.str()?;
    let counts = grouped.column(COUNT_COL)?.cast(&DataType::UInt64)?;
    let counts = counts.u64()?;
    let percentages = grouped.column(PERCENTAGE_COL)?.f64()?;

    let mut result: Vec<GroupCount> = groups
        .into_iter()
        .zip(categories.into_iter())
        .zip(counts.into_iter())
        .zip(percentages.into_iter())
        .map(|(((group, category), count), percentage)| GroupCount {
            group: group.unwrap_or_default().to_string(),
            category: category.map(str::to_string),
            count: count.unwrap_or(0) as usize,
            percentage: percentage.unwrap_or(0.0),
        })
        .collect();

    let sheet_order = sheet_order(table);
    result.sort_by_key(|g| {
        let position = sheet_order
            .iter()
            .position(|name| *name == g.group)
            .unwrap_or(usize::MAX);
        (position, breakdown.rank(g.category.as_deref()))
    });

    Ok(result)
}

/// Distinct sheet names in order of first appearance.
pub fn sheet_order(table: &CombinedTable) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for row in table {
        if !names.contains(&row.sheet_name.as_str()) {
            names.push(&row.sheet_name);
        }
    }
    names
}

fn to_dataframe(table: &CombinedTable) -> PolarsResult<DataFrame> {
    let names: Vec<&str> = table.iter().map(|r| r.name.as_str()).collect();
    let sheets: Vec<&str> = table.iter().map(|r| r.sheet_name.as_str()).collect();
    let sexes: Vec<&str> = table.iter().map(|r| r.normalized_sex.as_str()).collect();
    let statuses: Vec<Option<&str>> = table.iter().map(|r| r.status.map(|s| s.as_str())).collect();

    DataFrame::new(vec![
        Series::new(NAME_COL, names),
        Series::new(SHEET_COL, sheets),
        Series::new(SEX_COL, sexes),
        Series::new(STATUS_COL, statuses),
    ])
}

fn grouped_counts(df: DataFrame, category_col: &str) -> PolarsResult<DataFrame> {
    let totals = df
        .clone()
        .lazy()
        .group_by_stable([col(SHEET_COL)])
        .agg([col(NAME_COL).count().alias(TOTAL_COL)]);

    df.lazy()
        .group_by_stable([col(SHEET_COL), col(category_col)])
        .agg([col(NAME_COL).count().alias(COUNT_COL)])
        .join(
            totals,
            [col(SHEET_COL)],
            [col(SHEET_COL)],
            JoinArgs::new(JoinType::Left),
        )
        .with_column(
            (col(COUNT_COL).cast(DataType::Float64) / col(TOTAL_COL).cast(DataType::Float64)
                * lit(100.0))
            .alias(PERCENTAGE_COL),
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClassifiedRow, Sex};
    use crate::services::roster::types::Cell;

    fn sheet(name: &str, rows: &[[Option<&str>; 4]]) -> RawSheet {
        RawSheet::new(
            name,
            ["Nom", "Prénom", "Sexe", "Statut"].iter().map(|c| Cell::from(*c)).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| Cell::from(*c)).collect())
                .collect(),
        )
    }

    fn classified(sheet: &str, sex: Sex, status: Option<Status>) -> ClassifiedRow {
        ClassifiedRow {
            name: "X".to_string(),
            first_name: None,
            sex_raw: None,
            status_raw: None,
            normalized_sex: sex,
            status,
            sheet_name: sheet.to_string(),
        }
    }

    fn two_classes() -> Vec<RawSheet> {
        vec![
            sheet(
                "6A",
                &[
                    [Some("Dupont"), Some("Jean"), Some("M"), Some("Placé")],
                    [Some("Martin"), Some("Alice"), Some("F"), Some("Selectionné")],
                ],
            ),
            sheet("6B", &[[Some("Durand"), Some("Paul"), None, None]]),
        ]
    }

    #[test]
    fn combines_two_classes_in_order() {
        let table = combine(two_classes()).unwrap();

        let sheets: Vec<_> = table.iter().map(|r| r.sheet_name.as_str()).collect();
        let sexes: Vec<_> = table.iter().map(|r| r.normalized_sex).collect();
        let statuses: Vec<_> = table.iter().map(|r| r.status).collect();
        assert_eq!(sheets, vec!["6A", "6A", "6B"]);
        assert_eq!(sexes, vec![Sex::M, Sex::F, Sex::M]);
        assert_eq!(statuses, vec![Some(Status::Placed), Some(Status::Selected), None]);

        let summary = summarize(&table);
        assert_eq!(summary.total_students, 3);
        assert_eq!(summary.total_placed, 1);
        assert_eq!(summary.percentage_placed, 33.33);
    }

    #[test]
    fn unnamed_rows_never_reach_the_table() {
        let sheets = vec![sheet(
            "6C",
            &[
                [Some("Petit"), None, Some("F"), Some("Placé")],
                [None, Some("Orphelin"), Some("M"), Some("Placé")],
                [None, None, None, None],
            ],
        )];

        let table = combine(sheets).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table[0].name, "Petit");
    }

    #[test]
    fn one_malformed_sheet_aborts_everything() {
        let mut sheets = two_classes();
        sheets.push(RawSheet::new("vide", vec![Cell::from("Nom")], Vec::new()));

        let err = combine(sheets).unwrap_err();
        assert!(matches!(err, AppError::MalformedSheet { ref sheet, .. } if sheet == "vide"));
    }

    #[test]
    fn zero_rows_give_zero_percentage() {
        let sheets = vec![sheet("6D", &[[None, Some("Personne"), None, None]])];
        let table = combine(sheets).unwrap();
        assert!(table.is_empty());

        let summary = summarize(&table);
        assert_eq!(summary.total_students, 0);
        assert_eq!(summary.percentage_placed, 0.0);
        assert!(group_by_sheet(&table, Breakdown::Sex).unwrap().is_empty());
    }

    #[test]
    fn sex_breakdown_per_sheet() {
        let table = vec![
            classified("6B", Sex::M, None),
            classified("6A", Sex::M, Some(Status::Placed)),
            classified("6A", Sex::F, Some(Status::Placed)),
            classified("6B", Sex::F, None),
            classified("6B", Sex::M, Some(Status::Selected)),
            classified("6B", Sex::M, None),
        ];

        let groups = group_by_sheet(&table, Breakdown::Sex).unwrap();
        let flat: Vec<_> = groups
            .iter()
            .map(|g| (g.group.as_str(), g.category.as_deref(), g.count, g.percentage))
            .collect();
        assert_eq!(
            flat,
            vec![
                ("6B", Some("F"), 1, 25.0),
                ("6B", Some("M"), 3, 75.0),
                ("6A", Some("F"), 1, 50.0),
                ("6A", Some("M"), 1, 50.0),
            ]
        );
    }

    #[test]
    fn status_breakdown_keeps_null_category() {
        let table = vec![
            classified("6A", Sex::M, Some(Status::Selected)),
            classified("6A", Sex::F, None),
            classified("6A", Sex::F, Some(Status::Placed)),
            classified("6A", Sex::M, Some(Status::Placed)),
        ];

        let groups = group_by_sheet(&table, Breakdown::Status).unwrap();
        let flat: Vec<_> = groups
            .iter()
            .map(|g| (g.category.as_deref(), g.count, g.percentage))
            .collect();
        assert_eq!(
            flat,
            vec![
                (Some("Placed"), 2, 50.0),
                (Some("Selected"), 1, 25.0),
                (None, 1, 25.0),
            ]
        );
    }

    #[test]
    fn sheet_percentages_sum_to_hundred() {
        let table = combine(two_classes()).unwrap();
        let groups = group_by_sheet(&table, Breakdown::Status).unwrap();

        for sheet in sheet_order(&table) {
            let total: f64 = groups
                .iter()
                .filter(|g| g.group == sheet)
                .map(|g| g.percentage)
                .sum();
            assert!((total - 100.0).abs() < 1e-9, "sheet {} sums to {}", sheet, total);
        }
    }
}
