use crate::models::{BarMode, Chart, ChartPoint, Charts, GroupCount, Kpi, Status, Summary};

const CLASS_LABEL: &str = "Classe";
const TOTAL_LABEL: &str = "total";

fn sex_colors() -> Vec<(String, String)> {
    vec![
        ("F".to_string(), "#9AEBA3".to_string()),
        ("M".to_string(), "#00BBC9".to_string()),
    ]
}

fn points(groups: &[GroupCount], value: impl Fn(&GroupCount) -> f64) -> Vec<ChartPoint> {
    groups
        .iter()
        .map(|g| ChartPoint {
            category: g.category.clone(),
            group: g.group.clone(),
            value: value(g),
        })
        .collect()
}

pub fn sex_distribution(sex_by_sheet: &[GroupCount]) -> Chart {
    Chart {
        title: "Répartition par sexe selon la classe".to_string(),
        x_label: CLASS_LABEL.to_string(),
        y_label: TOTAL_LABEL.to_string(),
        legend_label: "Sexe".to_string(),
        bar_mode: BarMode::Group,
        color_map: sex_colors(),
        points: points(sex_by_sheet, |g| g.count as f64),
    }
}

/// Horizontal stacked bars, smallest share first.
pub fn sex_percentage(sex_by_sheet: &[GroupCount]) -> Chart {
    let mut points = points(sex_by_sheet, |g| g.percentage);
    points.sort_by(|a, b| a.value.total_cmp(&b.value));

    Chart {
        title: "Pourcentage par sexe selon la classe".to_string(),
        x_label: "Pourcentage".to_string(),
        y_label: CLASS_LABEL.to_string(),
        legend_label: "Sexe".to_string(),
        bar_mode: BarMode::Stack,
        color_map: sex_colors(),
        points,
    }
}

pub fn status_distribution(status_by_sheet: &[GroupCount]) -> Chart {
    let mut points = points(status_by_sheet, |g| g.count as f64);
    for point in &mut points {
        point.category = point.category.take().map(|c| status_label(&c));
    }

    Chart {
        title: "Répartition par statut selon la classe".to_string(),
        x_label: CLASS_LABEL.to_string(),
        y_label: TOTAL_LABEL.to_string(),
        legend_label: "Statut".to_string(),
        bar_mode: BarMode::Group,
        color_map: Vec::new(),
        points,
    }
}

fn status_label(category: &str) -> String {
    match category {
        "Placed" => Status::Placed.label().to_string(),
        "Selected" => Status::Selected.label().to_string(),
        other => other.to_string(),
    }
}

pub fn build_charts(sex_by_sheet: &[GroupCount], status_by_sheet: &[GroupCount]) -> Charts {
    Charts {
        sex_distribution: sex_distribution(sex_by_sheet),
        sex_percentage: sex_percentage(sex_by_sheet),
        status_distribution: status_distribution(status_by_sheet),
    }
}

pub fn placed_kpi(summary: &Summary) -> Kpi {
    Kpi {
        label: "Pourcentage Placé".to_string(),
        value: format!("{:.2}%", summary.percentage_placed),
        delta: format!("{} étudiants", summary.total_placed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(sheet: &str, category: Option<&str>, count: usize, percentage: f64) -> GroupCount {
        GroupCount {
            group: sheet.to_string(),
            category: category.map(str::to_string),
            count,
            percentage,
        }
    }

    #[test]
    fn percentage_chart_sorts_by_share() {
        let groups = vec![
            group("6A", Some("F"), 3, 75.0),
            group("6A", Some("M"), 1, 25.0),
            group("6B", Some("F"), 1, 50.0),
            group("6B", Some("M"), 1, 50.0),
        ];

        let chart = sex_percentage(&groups);
        let order: Vec<_> = chart
            .points
            .iter()
            .map(|p| (p.group.as_str(), p.category.as_deref(), p.value))
            .collect();
        assert_eq!(
            order,
            vec![
                ("6A", Some("M"), 25.0),
                ("6B", Some("F"), 50.0),
                ("6B", Some("M"), 50.0),
                ("6A", Some("F"), 75.0),
            ]
        );
        assert_eq!(chart.bar_mode, BarMode::Stack);
    }

    #[test]
    fn status_chart_uses_french_labels() {
        let groups = vec![
            group("6A", Some("Placed"), 2, 50.0),
            group("6A", Some("Selected"), 1, 25.0),
            group("6A", None, 1, 25.0),
        ];

        let chart = status_distribution(&groups);
        let labels: Vec<_> = chart.points.iter().map(|p| p.category.as_deref()).collect();
        assert_eq!(labels, vec![Some("Placé"), Some("Selectionné"), None]);
        assert_eq!(chart.points[0].value, 2.0);
    }

    #[test]
    fn kpi_formats_two_decimals() {
        let summary = Summary {
            total_students: 3,
            total_placed: 1,
            percentage_placed: 33.33,
        };

        let kpi = placed_kpi(&summary);
        assert_eq!(kpi.value, "33.33%");
        assert_eq!(kpi.delta, "1 étudiants");
    }
}
