use super::types::NamedRow;
use crate::models::{ClassifiedRow, Sex, Status};

/// Anything other than an exact `"F"` counts as `M`, blanks included.
pub fn normalize_sex(sex_raw: Option<&str>) -> Sex {
    match sex_raw {
        Some("F") => Sex::F,
        _ => Sex::M,
    }
}

/// Only the first letter of the lowercased status matters.
pub fn status_of(status_raw: Option<&str>) -> Option<Status> {
    let first = status_raw?.to_lowercase().chars().next()?;
    match first {
        'p' => Some(Status::Placed),
        's' => Some(Status::Selected),
        'o' | 'i' => Some(Status::Placed),
        _ => None,
    }
}

pub fn classify(row: NamedRow, sheet_name: &str) -> ClassifiedRow {
    let normalized_sex = normalize_sex(row.sex_raw.as_deref());
    let status = status_of(row.status_raw.as_deref());

    ClassifiedRow {
        name: row.name,
        first_name: row.first_name,
        sex_raw: row.sex_raw,
        status_raw: row.status_raw,
        normalized_sex,
        status,
        sheet_name: sheet_name.to_string(),
    }
}
