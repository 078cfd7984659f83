//! Row model and dual-currency aggregation.
//!
//! The SQL half of the query planner lives in the database crate; this
//! module owns the kind-agnostic row representation the renderer consumes
//! and the exact-decimal aggregation over it. Each row carries its USD and
//! CDF contributions, classified once at projection time by the adapter's
//! currency rule.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use tresor_shared::types::Devise;

use crate::etat::ReportTotals;
use crate::format::{format_date, format_montant};
use crate::registry::CurrencyRule;

/// One rendered table cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    /// Free text.
    Text(String),
    /// A date, rendered DD/MM/YYYY.
    Date(NaiveDate),
    /// An amount, rendered with French separators.
    Montant(Decimal),
    /// Empty cell.
    Vide,
}

impl Cell {
    /// Renders the cell for display.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Date(d) => format_date(*d),
            Self::Montant(m) => format_montant(*m),
            Self::Vide => String::new(),
        }
    }
}

/// One record projected into the report's column layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    /// Cells in the adapter's column order.
    pub cells: Vec<Cell>,
    /// USD contribution of this record.
    pub usd: Decimal,
    /// CDF contribution of this record.
    pub cdf: Decimal,
}

impl ReportRow {
    /// Builds a row from its cells and per-currency contributions.
    #[must_use]
    pub fn new(cells: Vec<Cell>, (usd, cdf): (Decimal, Decimal)) -> Self {
        Self { cells, usd, cdf }
    }
}

impl CurrencyRule {
    /// Classifies a tag-discriminated amount into (USD, CDF) contributions.
    ///
    /// Unknown or missing tags contribute to neither total.
    #[must_use]
    pub fn classify_tagged(tag: &str, montant: Decimal) -> (Decimal, Decimal) {
        match Devise::parse(tag) {
            Some(Devise::Usd) => (montant, Decimal::ZERO),
            Some(Devise::Cdf) => (Decimal::ZERO, montant),
            None => (Decimal::ZERO, Decimal::ZERO),
        }
    }

    /// Classifies split-field amounts; missing fields count as zero.
    #[must_use]
    pub fn classify_split(usd: Option<Decimal>, cdf: Option<Decimal>) -> (Decimal, Decimal) {
        (usd.unwrap_or(Decimal::ZERO), cdf.unwrap_or(Decimal::ZERO))
    }
}

/// Sums the per-currency contributions of an ordered row collection.
#[must_use]
pub fn aggregate<'a, I>(rows: I) -> ReportTotals
where
    I: IntoIterator<Item = &'a ReportRow>,
{
    rows.into_iter()
        .fold(ReportTotals::ZERO, |acc, row| ReportTotals {
            total_usd: acc.total_usd + row.usd,
            total_cdf: acc.total_cdf + row.cdf,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn row(usd: Decimal, cdf: Decimal) -> ReportRow {
        ReportRow::new(vec![Cell::Text("x".into())], (usd, cdf))
    }

    #[test]
    fn test_aggregate_tagged_scenario() {
        // Three payments: USD 100.00, USD 50.00, CDF 70 000.00.
        let rows = [
            ReportRow::new(vec![], CurrencyRule::classify_tagged("USD", dec!(100.00))),
            ReportRow::new(vec![], CurrencyRule::classify_tagged("USD", dec!(50.00))),
            ReportRow::new(vec![], CurrencyRule::classify_tagged("CDF", dec!(70000.00))),
        ];
        let totals = aggregate(&rows);
        assert_eq!(totals.total_usd, dec!(150.00));
        assert_eq!(totals.total_cdf, dec!(70000.00));
    }

    #[test]
    fn test_aggregate_split_scenario() {
        // Receipts R1 (USD 1 000.00) and R2 (CDF 500 000.00).
        let rows = [
            ReportRow::new(
                vec![],
                CurrencyRule::classify_split(Some(dec!(1000.00)), Some(Decimal::ZERO)),
            ),
            ReportRow::new(
                vec![],
                CurrencyRule::classify_split(Some(Decimal::ZERO), Some(dec!(500000.00))),
            ),
        ];
        let totals = aggregate(&rows);
        assert_eq!(totals.total_usd, dec!(1000.00));
        assert_eq!(totals.total_cdf, dec!(500000.00));
    }

    #[test]
    fn test_unknown_tag_counts_as_zero() {
        assert_eq!(
            CurrencyRule::classify_tagged("EUR", dec!(99)),
            (Decimal::ZERO, Decimal::ZERO)
        );
    }

    #[test]
    fn test_fc_tag_is_cdf() {
        assert_eq!(
            CurrencyRule::classify_tagged("FC", dec!(1500)),
            (Decimal::ZERO, dec!(1500))
        );
    }

    #[test]
    fn test_missing_split_fields_count_as_zero() {
        assert_eq!(
            CurrencyRule::classify_split(None, None),
            (Decimal::ZERO, Decimal::ZERO)
        );
    }

    #[test]
    fn test_aggregate_empty_is_zero() {
        let rows: Vec<ReportRow> = Vec::new();
        assert_eq!(aggregate(&rows), ReportTotals::ZERO);
    }

    #[test]
    fn test_aggregate_is_order_independent() {
        let a = [row(dec!(1.10), dec!(2)), row(dec!(3.25), dec!(4))];
        let b = [row(dec!(3.25), dec!(4)), row(dec!(1.10), dec!(2))];
        assert_eq!(aggregate(&a), aggregate(&b));
    }

    #[test]
    fn test_cell_rendering() {
        assert_eq!(Cell::Montant(dec!(1000)).render(), "1 000,00");
        assert_eq!(
            Cell::Date(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()).render(),
            "01/06/2024"
        );
        assert_eq!(Cell::Text("Achat".into()).render(), "Achat");
        assert_eq!(Cell::Vide.render(), "");
    }
}
