//! Report rendering.
//!
//! The same computed result renders to two artifact formats: a paginated
//! PDF and a spreadsheet. Both are deterministic layouts over the typed
//! document model below; there is no HTML-to-PDF pipeline.

mod error;
mod excel;
mod filename;
mod pdf;

pub use error::RenderError;
pub use excel::render_xlsx;
pub use filename::{nom_artefact, slugifier};
pub use pdf::render_pdf;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::etat::ReportTotals;
use crate::format::format_date;
use crate::planner::ReportRow;
use crate::registry::RecordAdapter;

/// Display and filename timezone.
pub const FUSEAU: Tz = chrono_tz::Africa::Kinshasa;

/// The typed document model both renderers consume.
#[derive(Debug)]
pub struct ReportDocument<'a> {
    /// Adapter supplying columns and labels.
    pub adapter: &'static RecordAdapter,
    /// Centered document title ("Liste des ...").
    pub titre_document: String,
    /// The user-chosen report title (spreadsheet header block).
    pub titre_etat: &'a str,
    /// The queried window, as submitted.
    pub periode: (NaiveDate, NaiveDate),
    /// Rows in planner order.
    pub rows: &'a [ReportRow],
    /// Dual-currency totals.
    pub totals: ReportTotals,
    /// Whether the data table is included (totals-only otherwise).
    pub include_details: bool,
    /// Generation instant, Kinshasa time. Drives the footer date.
    pub genere_le: DateTime<Tz>,
}

impl<'a> ReportDocument<'a> {
    /// Assembles a document from a computed report.
    #[must_use]
    pub fn new(
        adapter: &'static RecordAdapter,
        titre_etat: &'a str,
        periode: (NaiveDate, NaiveDate),
        rows: &'a [ReportRow],
        totals: ReportTotals,
        include_details: bool,
    ) -> Self {
        Self {
            adapter,
            titre_document: document_title(adapter, periode.0, periode.1),
            titre_etat,
            periode,
            rows,
            totals,
            include_details,
            genere_le: kinshasa_now(),
        }
    }

    /// The period line shown on empty reports and spreadsheet headers.
    #[must_use]
    pub fn periode_texte(&self) -> String {
        if self.periode.0 == self.periode.1 {
            format!("Période du {}", format_date(self.periode.0))
        } else {
            format!(
                "Période du {} au {}",
                format_date(self.periode.0),
                format_date(self.periode.1)
            )
        }
    }
}

/// Builds the centered document title.
///
/// `Liste des <plural> du DD/MM/YYYY` for a one-day window,
/// `Liste des <plural> du DD/MM/YYYY au DD/MM/YYYY` otherwise.
#[must_use]
pub fn document_title(adapter: &RecordAdapter, debut: NaiveDate, fin: NaiveDate) -> String {
    if debut == fin {
        format!(
            "Liste des {} du {}",
            adapter.label_pluriel,
            format_date(debut)
        )
    } else {
        format!(
            "Liste des {} du {} au {}",
            adapter.label_pluriel,
            format_date(debut),
            format_date(fin)
        )
    }
}

/// Current instant in the Kinshasa timezone. Storage stays UTC; only
/// display and filenames use this.
#[must_use]
pub fn kinshasa_now() -> DateTime<Tz> {
    Utc::now().with_timezone(&FUSEAU)
}

/// Empty-result banner text.
pub const AUCUNE_DONNEE: &str = "AUCUNE DONNÉE TROUVÉE";

/// Hint appended below the empty-result banner.
pub const AUCUNE_DONNEE_CONSEIL: &str =
    "Essayez d'élargir la période ou de retirer des filtres.";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::etat::ReportKind;
    use crate::registry::adapter_for;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_title_single_day() {
        let adapter = adapter_for(ReportKind::Paiement).unwrap();
        assert_eq!(
            document_title(adapter, d(2024, 5, 1), d(2024, 5, 1)),
            "Liste des paiements du 01/05/2024"
        );
    }

    #[test]
    fn test_title_window() {
        let adapter = adapter_for(ReportKind::Recette).unwrap();
        assert_eq!(
            document_title(adapter, d(2024, 6, 1), d(2024, 6, 30)),
            "Liste des recettes du 01/06/2024 au 30/06/2024"
        );
    }

    #[test]
    fn test_title_releve_label() {
        let adapter = adapter_for(ReportKind::ReleveDepense).unwrap();
        assert_eq!(
            document_title(adapter, d(2024, 3, 1), d(2024, 3, 31)),
            "Liste des relevés du 01/03/2024 au 31/03/2024"
        );
    }

    #[test]
    fn test_periode_texte() {
        let adapter = adapter_for(ReportKind::Paiement).unwrap();
        let rows: Vec<ReportRow> = Vec::new();
        let doc = ReportDocument::new(
            adapter,
            "Essai",
            (d(2024, 5, 1), d(2024, 5, 31)),
            &rows,
            ReportTotals::ZERO,
            true,
        );
        assert_eq!(doc.periode_texte(), "Période du 01/05/2024 au 31/05/2024");
    }
}
