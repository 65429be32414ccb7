#![allow(dead_code)]

use rust_xlsxwriter::Workbook;

pub type Grid<'a> = Vec<Vec<Option<&'a str>>>;

/// Writes each `(name, grid)` pair as a worksheet and returns the xlsx bytes.
pub fn workbook(sheets: &[(&str, Grid<'_>)]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    for (name, rows) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*name).unwrap();
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                if let Some(value) = cell {
                    worksheet.write_string(r as u32, c as u16, *value).unwrap();
                }
            }
        }
    }
    workbook.save_to_buffer().unwrap()
}

pub fn header() -> Vec<Option<&'static str>> {
    vec![Some("Nom"), Some("Prénom"), Some("Sexe"), Some("Statut")]
}

/// The two-class roster used across the end-to-end tests.
pub fn two_classes() -> Vec<u8> {
    workbook(&[
        (
            "6A",
            vec![
                header(),
                vec![Some("Dupont"), Some("Jean"), Some("M"), Some("Placé")],
                vec![Some("Martin"), Some("Alice"), Some("F"), Some("Selectionné")],
            ],
        ),
        (
            "6B",
            vec![
                header(),
                vec![Some("Durand"), Some("Paul"), None, None],
            ],
        ),
    ])
}
