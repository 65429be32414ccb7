use serde::Serialize;
use std::fmt;

/// Binary sex label derived from the raw `Sexe` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Sex {
    F,
    M,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::F => "F",
            Sex::M => "M",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Placement status derived from the first letter of the raw `Statut` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Status {
    Placed,
    Selected,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Placed => "Placed",
            Status::Selected => "Selected",
        }
    }

    /// Label shown on the dashboard.
    pub fn label(&self) -> &'static str {
        match self {
            Status::Placed => "Placé",
            Status::Selected => "Selectionné",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ClassifiedRow {
    pub name: String,
    pub first_name: Option<String>,
    pub sex_raw: Option<String>,
    pub status_raw: Option<String>,
    pub normalized_sex: Sex,
    pub status: Option<Status>,
    pub sheet_name: String,
}

/// All classified rows of an upload, in sheet order then row order.
pub type CombinedTable = Vec<ClassifiedRow>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total_students: usize,
    pub total_placed: usize,
    pub percentage_placed: f64,
}

/// Row count of one `(sheet, category)` pair and its share of the sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupCount {
    pub group: String,
    pub category: Option<String>,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub category: Option<String>,
    pub group: String,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BarMode {
    Group,
    Stack,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub legend_label: String,
    pub bar_mode: BarMode,
    pub color_map: Vec<(String, String)>,
    pub points: Vec<ChartPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpi {
    pub label: String,
    pub value: String,
    pub delta: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Charts {
    pub sex_distribution: Chart,
    pub sex_percentage: Chart,
    pub status_distribution: Chart,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub sheet_names: Vec<String>,
    pub rows: CombinedTable,
    pub summary: Summary,
    pub kpi: Kpi,
    pub sex_by_sheet: Vec<GroupCount>,
    pub status_by_sheet: Vec<GroupCount>,
    pub charts: Charts,
    pub export_key: String,
}
