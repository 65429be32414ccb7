use std::fmt;

pub const NAME_COLUMN: &str = "Nom";
pub const FIRST_NAME_COLUMN: &str = "Prénom";
pub const SEX_COLUMN: &str = "Sexe";
pub const STATUS_COLUMN: &str = "Statut";

/// Columns kept from every sheet, in output order.
pub const COLUMNS_TO_KEEP: [&str; 4] = [NAME_COLUMN, FIRST_NAME_COLUMN, SEX_COLUMN, STATUS_COLUMN];

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Cell {
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Cell content as an optional string; numbers use their shortest form.
    pub fn to_value(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => f.write_str(s),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<Option<&str>> for Cell {
    fn from(value: Option<&str>) -> Self {
        value.map_or(Cell::Empty, Cell::from)
    }
}

/// One worksheet as decoded from the workbook.
///
/// `header` is the first worksheet row, `rows` everything below it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawSheet {
    pub name: String,
    pub header: Vec<Cell>,
    pub rows: Vec<Vec<Cell>>,
}

impl RawSheet {
    pub fn new(name: impl Into<String>, header: Vec<Cell>, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            name: name.into(),
            header,
            rows,
        }
    }

    /// Builds a sheet from a full grid, taking the first row as the header.
    pub fn from_grid(name: impl Into<String>, mut grid: Vec<Vec<Cell>>) -> Self {
        let header = if grid.is_empty() { Vec::new() } else { grid.remove(0) };
        Self::new(name, header, grid)
    }

    /// Position of the first header cell whose text is exactly `column`.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.header.iter().position(|cell| cell.as_text() == Some(column))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NormalizedRow {
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub sex_raw: Option<String>,
    pub status_raw: Option<String>,
}

pub type NormalizedTable = Vec<NormalizedRow>;

/// A normalized row that passed the name filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedRow {
    pub name: String,
    pub first_name: Option<String>,
    pub sex_raw: Option<String>,
    pub status_raw: Option<String>,
}

impl NamedRow {
    /// `None` when the name is missing or blank.
    pub fn from_normalized(row: NormalizedRow) -> Option<Self> {
        let name = row.name.filter(|name| !name.trim().is_empty())?;
        Some(Self {
            name,
            first_name: row.first_name,
            sex_raw: row.sex_raw,
            status_raw: row.status_raw,
        })
    }
}

impl From<NamedRow> for NormalizedRow {
    fn from(row: NamedRow) -> Self {
        Self {
            name: Some(row.name),
            first_name: row.first_name,
            sex_raw: row.sex_raw,
            status_raw: row.status_raw,
        }
    }
}

pub fn non_null_count(row: &[Cell]) -> usize {
    row.iter().filter(|cell| !cell.is_null()).count()
}
