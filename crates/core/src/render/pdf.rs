//! PDF synthesis.
//!
//! Deterministic layout over the typed document model: centered title,
//! styled data table with per-kind columns, totals block, and a dated
//! footer on every page. Coordinates are in millimeters from the
//! bottom-left corner, as printpdf expects.

// Page geometry is the one place floating point is legitimate here; money
// never enters this module as anything but preformatted strings.
#![allow(clippy::float_arithmetic, clippy::cast_precision_loss)]

use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference,
    Point, Rect, Rgb,
};

use crate::format::{format_date, format_montant};
use crate::planner::Cell;
use crate::registry::{Align, Column};

use super::error::RenderError;
use super::{AUCUNE_DONNEE, AUCUNE_DONNEE_CONSEIL, ReportDocument};

const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
/// 50 pt margins on all sides.
const MARGIN: f32 = 50.0 * PT_TO_MM;
const PT_TO_MM: f32 = 0.352_778;

const TITLE_PT: f32 = 14.0;
const TABLE_PT: f32 = 9.0;
const FOOTER_PT: f32 = 9.0;

const HEADER_H: f32 = 7.0;
const ROW_H: f32 = 6.0;
const CELL_PAD: f32 = 1.6;
/// Lowest y the table body may reach; below is the footer zone.
const BODY_FLOOR: f32 = MARGIN + 14.0;

fn bleu_fonce() -> Color {
    Color::Rgb(Rgb::new(0.12, 0.22, 0.39, None))
}

fn gris_alterne() -> Color {
    Color::Rgb(Rgb::new(0.93, 0.94, 0.97, None))
}

fn blanc() -> Color {
    Color::Rgb(Rgb::new(1.0, 1.0, 1.0, None))
}

fn noir() -> Color {
    Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None))
}

fn pdf_err(e: impl std::fmt::Display) -> RenderError {
    RenderError::Pdf(e.to_string())
}

/// Approximate Helvetica text width. Good enough for right alignment and
/// centering at the sizes used here.
fn text_width_mm(text: &str, size_pt: f32) -> f32 {
    text.chars().count() as f32 * size_pt * 0.5 * PT_TO_MM
}

/// Distributes the usable width across columns by weight.
fn column_widths(columns: &[Column]) -> Vec<f32> {
    let usable = PAGE_W - 2.0 * MARGIN;
    let total_weight: f32 = columns.iter().map(|c| f32::from(c.weight)).sum();
    columns
        .iter()
        .map(|c| usable * f32::from(c.weight) / total_weight)
        .collect()
}

fn draw_centered(
    layer: &PdfLayerReference,
    text: &str,
    size_pt: f32,
    y: f32,
    font: &IndirectFontRef,
) {
    let x = (PAGE_W - text_width_mm(text, size_pt)) / 2.0;
    layer.use_text(text, size_pt, Mm(x), Mm(y), font);
}

/// Truncates cell text that would overflow its column.
fn fit(text: &str, width: f32, size_pt: f32) -> String {
    let mut out: String = text.to_string();
    while !out.is_empty() && text_width_mm(&out, size_pt) > width - 2.0 * CELL_PAD {
        out.pop();
    }
    out
}

fn fill_rect(layer: &PdfLayerReference, x: f32, y: f32, w: f32, h: f32, color: Color) {
    layer.set_fill_color(color);
    layer.add_rect(Rect::new(Mm(x), Mm(y), Mm(x + w), Mm(y + h)).with_mode(PaintMode::Fill));
}

fn draw_rule(layer: &PdfLayerReference, x1: f32, x2: f32, y: f32) {
    layer.set_outline_color(noir());
    layer.set_outline_thickness(0.5);
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(x1), Mm(y)), false),
            (Point::new(Mm(x2), Mm(y)), false),
        ],
        is_closed: false,
    });
}

/// Draws the dark-blue header row and returns the y of the next row.
fn draw_header_row(
    layer: &PdfLayerReference,
    columns: &[Column],
    widths: &[f32],
    y_top: f32,
    bold: &IndirectFontRef,
) -> f32 {
    fill_rect(layer, MARGIN, y_top - HEADER_H, PAGE_W - 2.0 * MARGIN, HEADER_H, bleu_fonce());

    layer.set_fill_color(blanc());
    let baseline = y_top - HEADER_H + 2.2;
    let mut x = MARGIN;
    for (column, width) in columns.iter().zip(widths) {
        let text = fit(column.header, *width, TABLE_PT);
        match column.align {
            Align::Left => layer.use_text(text, TABLE_PT, Mm(x + CELL_PAD), Mm(baseline), bold),
            Align::Right => {
                let tx = x + width - CELL_PAD - text_width_mm(&text, TABLE_PT);
                layer.use_text(text, TABLE_PT, Mm(tx), Mm(baseline), bold);
            }
        }
        x += width;
    }
    layer.set_fill_color(noir());

    y_top - HEADER_H
}

/// Draws one body row and returns the y of the next row.
fn draw_body_row(
    layer: &PdfLayerReference,
    cells: &[String],
    columns: &[Column],
    widths: &[f32],
    y_top: f32,
    striped: bool,
    font: &IndirectFontRef,
) -> f32 {
    if striped {
        fill_rect(layer, MARGIN, y_top - ROW_H, PAGE_W - 2.0 * MARGIN, ROW_H, gris_alterne());
        layer.set_fill_color(noir());
    }

    let baseline = y_top - ROW_H + 1.8;
    let mut x = MARGIN;
    for ((text, column), width) in cells.iter().zip(columns).zip(widths) {
        let text = fit(text, *width, TABLE_PT);
        match column.align {
            Align::Left => layer.use_text(text, TABLE_PT, Mm(x + CELL_PAD), Mm(baseline), font),
            Align::Right => {
                let tx = x + width - CELL_PAD - text_width_mm(&text, TABLE_PT);
                layer.use_text(text, TABLE_PT, Mm(tx), Mm(baseline), font);
            }
        }
        x += width;
    }

    y_top - ROW_H
}

/// Draws the TOTAL banner and the two currency totals rows.
fn draw_totals(
    layer: &PdfLayerReference,
    docu: &ReportDocument<'_>,
    y_top: f32,
    regular: &IndirectFontRef,
    bold: &IndirectFontRef,
) -> f32 {
    let width = PAGE_W - 2.0 * MARGIN;
    let right_edge = PAGE_W - MARGIN - CELL_PAD;

    fill_rect(layer, MARGIN, y_top - ROW_H, width, ROW_H, bleu_fonce());
    layer.set_fill_color(blanc());
    layer.use_text("TOTAL", TABLE_PT, Mm(MARGIN + CELL_PAD), Mm(y_top - ROW_H + 1.8), bold);
    layer.set_fill_color(noir());
    let mut y = y_top - ROW_H;

    for (label, montant) in [
        ("Total USD", docu.totals.total_usd),
        ("Total CDF", docu.totals.total_cdf),
    ] {
        let value = format_montant(montant);
        layer.use_text(label, TABLE_PT, Mm(MARGIN + CELL_PAD), Mm(y - ROW_H + 1.8), bold);
        let tx = right_edge - text_width_mm(&value, TABLE_PT);
        layer.use_text(value, TABLE_PT, Mm(tx), Mm(y - ROW_H + 1.8), regular);
        y -= ROW_H;
    }

    y
}

fn draw_footer(
    layer: &PdfLayerReference,
    docu: &ReportDocument<'_>,
    page: usize,
    total_pages: usize,
    font: &IndirectFontRef,
) {
    draw_rule(layer, MARGIN, PAGE_W - MARGIN, MARGIN + 6.0);

    let date_line = format!("Kinshasa, le {}", format_date(docu.genere_le.date_naive()));
    layer.use_text(&date_line, FOOTER_PT, Mm(MARGIN), Mm(MARGIN + 1.5), font);

    let page_line = format!("Page {page} / {total_pages}");
    let tx = PAGE_W - MARGIN - text_width_mm(&page_line, FOOTER_PT);
    layer.use_text(&page_line, FOOTER_PT, Mm(tx), Mm(MARGIN + 1.5), font);
}

/// Renders the report as PDF bytes.
///
/// # Errors
///
/// Returns an error if the document cannot be serialized.
pub fn render_pdf(docu: &ReportDocument<'_>) -> Result<Vec<u8>, RenderError> {
    let (doc, page1, layer1) =
        PdfDocument::new(&docu.titre_document, Mm(PAGE_W), Mm(PAGE_H), "Calque 1");
    let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_err)?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(pdf_err)?;

    let mut pages = vec![(page1, layer1)];
    let mut layer = doc.get_page(page1).get_layer(layer1);

    let title_y = PAGE_H - MARGIN - 4.0;
    draw_centered(&layer, &docu.titre_document, TITLE_PT, title_y, &bold);
    let mut y = title_y - 12.0;

    if docu.rows.is_empty() {
        draw_centered(&layer, AUCUNE_DONNEE, 12.0, y, &bold);
        draw_centered(&layer, &docu.periode_texte(), 10.0, y - 8.0, &regular);
        draw_centered(&layer, AUCUNE_DONNEE_CONSEIL, 10.0, y - 15.0, &regular);
    } else {
        let columns = docu.adapter.columns;
        let widths = column_widths(columns);

        if docu.include_details {
            y = draw_header_row(&layer, columns, &widths, y, &bold);

            for (i, row) in docu.rows.iter().enumerate() {
                if y - ROW_H < BODY_FLOOR {
                    let (page, page_layer) = doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Calque 1");
                    pages.push((page, page_layer));
                    layer = doc.get_page(page).get_layer(page_layer);
                    y = PAGE_H - MARGIN;
                    y = draw_header_row(&layer, columns, &widths, y, &bold);
                }

                let cells: Vec<String> = row.cells.iter().map(Cell::render).collect();
                y = draw_body_row(&layer, &cells, columns, &widths, y, i % 2 == 1, &regular);
            }
        }

        if y - 3.0 * ROW_H < BODY_FLOOR {
            let (page, page_layer) = doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Calque 1");
            pages.push((page, page_layer));
            layer = doc.get_page(page).get_layer(page_layer);
            y = PAGE_H - MARGIN;
        }
        draw_totals(&layer, docu, y, &regular, &bold);
    }

    let total_pages = pages.len();
    for (i, (page, page_layer)) in pages.iter().enumerate() {
        let footer_layer = doc.get_page(*page).get_layer(*page_layer);
        draw_footer(&footer_layer, docu, i + 1, total_pages, &regular);
    }

    doc.save_to_bytes().map_err(pdf_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::etat::{ReportKind, ReportTotals};
    use crate::planner::{Cell, ReportRow};
    use crate::registry::adapter_for;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn paiement_row(numero: &str, montant: rust_decimal::Decimal) -> ReportRow {
        ReportRow::new(
            vec![
                Cell::Text(numero.to_string()),
                Cell::Date(d(2024, 5, 1)),
                Cell::Text("Fournisseur".to_string()),
                Cell::Text("USD".to_string()),
                Cell::Montant(montant),
            ],
            (montant, rust_decimal::Decimal::ZERO),
        )
    }

    #[test]
    fn test_render_pdf_produces_pdf_bytes() {
        let adapter = adapter_for(ReportKind::Paiement).unwrap();
        let rows = vec![paiement_row("PAY-001", dec!(100)), paiement_row("PAY-002", dec!(50))];
        let doc = ReportDocument::new(
            adapter,
            "Paiements de mai",
            (d(2024, 5, 1), d(2024, 5, 1)),
            &rows,
            ReportTotals {
                total_usd: dec!(150.00),
                total_cdf: dec!(0),
            },
            true,
        );

        let bytes = render_pdf(&doc).expect("pdf renders");
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 500);
    }

    #[test]
    fn test_render_pdf_empty_result() {
        let adapter = adapter_for(ReportKind::DemandePaiement).unwrap();
        let rows: Vec<ReportRow> = Vec::new();
        let doc = ReportDocument::new(
            adapter,
            "Demandes",
            (d(2024, 1, 1), d(2024, 1, 31)),
            &rows,
            ReportTotals::ZERO,
            true,
        );

        let bytes = render_pdf(&doc).expect("pdf renders");
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_pdf_paginates_large_reports() {
        let adapter = adapter_for(ReportKind::Paiement).unwrap();
        let rows: Vec<ReportRow> = (0..120)
            .map(|i| paiement_row(&format!("PAY-{i:04}"), dec!(10)))
            .collect();
        let doc = ReportDocument::new(
            adapter,
            "Gros rapport",
            (d(2024, 1, 1), d(2024, 12, 1)),
            &rows,
            ReportTotals {
                total_usd: dec!(1200.00),
                total_cdf: dec!(0),
            },
            true,
        );

        let bytes = render_pdf(&doc).expect("pdf renders");
        // Two pages at minimum: /Type /Pages with /Count 2 or more.
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 2_000);
    }
}
