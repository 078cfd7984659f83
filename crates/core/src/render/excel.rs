//! Spreadsheet synthesis.
//!
//! Mirrors the PDF columns: a multi-line header block (kind label, report
//! title, period), the adapter's column headers, one row per record, and
//! the totals block. All kinds render through the same adapter-driven
//! path.

// Column widths are layout geometry, not money.
#![allow(clippy::float_arithmetic)]

use rust_xlsxwriter::{Color, Format, FormatAlign, Workbook};

use crate::format::format_montant;
use crate::planner::Cell;
use crate::registry::Align;

use super::error::RenderError;
use super::{AUCUNE_DONNEE, ReportDocument};

const BLEU_FONCE: Color = Color::RGB(0x1F_38_64);
const GRIS_ALTERNE: Color = Color::RGB(0xED_F0_F7);

/// Renders the report as XLSX bytes.
///
/// # Errors
///
/// Returns an error if the workbook cannot be serialized.
pub fn render_xlsx(docu: &ReportDocument<'_>) -> Result<Vec<u8>, RenderError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    let titre_bloc = Format::new().set_bold().set_font_size(14);
    let sous_titre = Format::new().set_bold();
    let entete = Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(BLEU_FONCE)
        .set_align(FormatAlign::Center);
    let texte = Format::new();
    let texte_alterne = Format::new().set_background_color(GRIS_ALTERNE);
    let montant = Format::new().set_align(FormatAlign::Right);
    let montant_alterne = Format::new()
        .set_align(FormatAlign::Right)
        .set_background_color(GRIS_ALTERNE);
    let total_banner = Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(BLEU_FONCE);
    let total_libelle = Format::new().set_bold();

    // Fixed header block: kind label, title, period.
    worksheet.write_string_with_format(
        0,
        0,
        format!("Liste des {}", docu.adapter.label_pluriel),
        &titre_bloc,
    )?;
    worksheet.write_string_with_format(1, 0, docu.titre_etat, &sous_titre)?;
    worksheet.write_string(2, 0, docu.periode_texte())?;

    let columns = docu.adapter.columns;
    let header_row = 4u32;

    for (col, column) in columns.iter().enumerate() {
        let col = u16::try_from(col).unwrap_or(u16::MAX);
        worksheet.write_string_with_format(header_row, col, column.header, &entete)?;
        worksheet.set_column_width(col, f64::from(column.weight) * 6.0)?;
    }

    if docu.rows.is_empty() {
        worksheet.write_string_with_format(header_row + 2, 0, AUCUNE_DONNEE, &sous_titre)?;
        worksheet.write_string(header_row + 3, 0, docu.periode_texte())?;
    } else {
        let mut row_idx = header_row + 1;

        if docu.include_details {
            for (i, row) in docu.rows.iter().enumerate() {
                let striped = i % 2 == 1;
                for (col, (cell, column)) in row.cells.iter().zip(columns).enumerate() {
                    let col = u16::try_from(col).unwrap_or(u16::MAX);
                    let format = match (column.align, striped) {
                        (Align::Right, false) => &montant,
                        (Align::Right, true) => &montant_alterne,
                        (Align::Left, false) => &texte,
                        (Align::Left, true) => &texte_alterne,
                    };
                    worksheet.write_string_with_format(row_idx, col, cell.render(), format)?;
                }
                row_idx += 1;
            }
        }

        let last_col = u16::try_from(columns.len().saturating_sub(1)).unwrap_or(0);
        for col in 0..=last_col {
            worksheet.write_string_with_format(
                row_idx,
                col,
                if col == 0 { "TOTAL" } else { "" },
                &total_banner,
            )?;
        }
        row_idx += 1;

        worksheet.write_string_with_format(row_idx, 0, "Total USD", &total_libelle)?;
        worksheet.write_string_with_format(
            row_idx,
            last_col,
            format_montant(docu.totals.total_usd),
            &montant,
        )?;
        row_idx += 1;

        worksheet.write_string_with_format(row_idx, 0, "Total CDF", &total_libelle)?;
        worksheet.write_string_with_format(
            row_idx,
            last_col,
            format_montant(docu.totals.total_cdf),
            &montant,
        )?;
    }

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::etat::{ReportKind, ReportTotals};
    use crate::planner::ReportRow;
    use crate::registry::adapter_for;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_render_xlsx_produces_zip_bytes() {
        let adapter = adapter_for(ReportKind::Recette).unwrap();
        let rows = vec![ReportRow::new(
            vec![
                Cell::Text("REC-001".to_string()),
                Cell::Date(d(2024, 6, 10)),
                Cell::Text("Taxe".to_string()),
                Cell::Text("Guichet".to_string()),
                Cell::Montant(dec!(1000.00)),
                Cell::Montant(dec!(0)),
            ],
            (dec!(1000.00), dec!(0)),
        )];
        let doc = ReportDocument::new(
            adapter,
            "Recettes de juin",
            (d(2024, 6, 1), d(2024, 6, 30)),
            &rows,
            ReportTotals {
                total_usd: dec!(1000.00),
                total_cdf: dec!(0),
            },
            true,
        );

        let bytes = render_xlsx(&doc).expect("xlsx renders");
        // XLSX is a zip container.
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_render_xlsx_empty_result() {
        let adapter = adapter_for(ReportKind::SoldeBancaire).unwrap();
        let rows: Vec<ReportRow> = Vec::new();
        let doc = ReportDocument::new(
            adapter,
            "Soldes",
            (d(2024, 6, 1), d(2024, 6, 1)),
            &rows,
            ReportTotals::ZERO,
            true,
        );

        let bytes = render_xlsx(&doc).expect("xlsx renders");
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_render_xlsx_every_adapter_kind() {
        for adapter in crate::registry::all_adapters() {
            let rows: Vec<ReportRow> = Vec::new();
            let doc = ReportDocument::new(
                adapter,
                "Essai",
                (d(2024, 1, 1), d(2024, 1, 31)),
                &rows,
                ReportTotals::ZERO,
                true,
            );
            assert!(render_xlsx(&doc).is_ok(), "kind {:?}", adapter.kind);
        }
    }
}
