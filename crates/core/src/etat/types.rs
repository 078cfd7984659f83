//! Report domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use tresor_shared::types::Devise;

/// The type of financial record a report enumerates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportKind {
    /// Payment request.
    #[serde(rename = "DEMANDE_PAIEMENT")]
    DemandePaiement,
    /// Receipt.
    #[serde(rename = "RECETTE")]
    Recette,
    /// Expenditure.
    #[serde(rename = "DEPENSE")]
    Depense,
    /// Executed payment.
    #[serde(rename = "PAIEMENT")]
    Paiement,
    /// Monthly expense statement.
    #[serde(rename = "RELEVE_DEPENSE")]
    ReleveDepense,
    /// Bank account balance snapshot.
    #[serde(rename = "SOLDE_BANCAIRE")]
    SoldeBancaire,
    /// Balance sheet (no record adapter yet).
    #[serde(rename = "BILAN")]
    Bilan,
    /// Financial situation (no record adapter yet).
    #[serde(rename = "SITUATION_FINANCIERE")]
    SituationFinanciere,
}

impl ReportKind {
    /// Returns the string representation stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DemandePaiement => "DEMANDE_PAIEMENT",
            Self::Recette => "RECETTE",
            Self::Depense => "DEPENSE",
            Self::Paiement => "PAIEMENT",
            Self::ReleveDepense => "RELEVE_DEPENSE",
            Self::SoldeBancaire => "SOLDE_BANCAIRE",
            Self::Bilan => "BILAN",
            Self::SituationFinanciere => "SITUATION_FINANCIERE",
        }
    }

    /// Parses a kind from its stored representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "DEMANDE_PAIEMENT" => Some(Self::DemandePaiement),
            "RECETTE" => Some(Self::Recette),
            "DEPENSE" => Some(Self::Depense),
            "PAIEMENT" => Some(Self::Paiement),
            "RELEVE_DEPENSE" => Some(Self::ReleveDepense),
            "SOLDE_BANCAIRE" => Some(Self::SoldeBancaire),
            "BILAN" => Some(Self::Bilan),
            "SITUATION_FINANCIERE" => Some(Self::SituationFinanciere),
            _ => None,
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Reporting periodicity selected by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Periodicity {
    /// A single day.
    Daily,
    /// A calendar week.
    Weekly,
    /// A calendar month.
    #[default]
    Monthly,
    /// A quarter.
    Quarterly,
    /// A full year.
    Yearly,
    /// A free date window.
    Custom,
}

impl Periodicity {
    /// Returns the string representation stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "DAILY",
            Self::Weekly => "WEEKLY",
            Self::Monthly => "MONTHLY",
            Self::Quarterly => "QUARTERLY",
            Self::Yearly => "YEARLY",
            Self::Custom => "CUSTOM",
        }
    }

    /// Parses a periodicity from its stored representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "DAILY" => Some(Self::Daily),
            "WEEKLY" => Some(Self::Weekly),
            "MONTHLY" => Some(Self::Monthly),
            "QUARTERLY" => Some(Self::Quarterly),
            "YEARLY" => Some(Self::Yearly),
            "CUSTOM" => Some(Self::Custom),
            _ => None,
        }
    }
}

/// Output artifact selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutputFormat {
    /// PDF only.
    #[default]
    Pdf,
    /// Spreadsheet only.
    Xlsx,
    /// Both artifacts.
    Both,
}

impl OutputFormat {
    /// Returns true if a PDF artifact must be produced.
    #[must_use]
    pub const fn wants_pdf(&self) -> bool {
        matches!(self, Self::Pdf | Self::Both)
    }

    /// Returns true if a spreadsheet artifact must be produced.
    #[must_use]
    pub const fn wants_xlsx(&self) -> bool {
        matches!(self, Self::Xlsx | Self::Both)
    }
}

/// Sort key applied to the record collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// The adapter's period field.
    #[default]
    Date,
    /// The primary amount.
    Amount,
    /// The record reference number.
    Reference,
    /// The owning service.
    Service,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending.
    #[default]
    Asc,
    /// Descending.
    Desc,
}

/// Lifecycle status of a report descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportStatus {
    /// Created, artifacts not yet written.
    Generating,
    /// Artifacts written, totals persisted.
    Generated,
    /// Generation failed.
    Error,
}

impl ReportStatus {
    /// Returns the string representation stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Generating => "GENERATING",
            Self::Generated => "GENERATED",
            Self::Error => "ERROR",
        }
    }

    /// Parses a status from its stored representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "GENERATING" => Some(Self::Generating),
            "GENERATED" => Some(Self::Generated),
            "ERROR" => Some(Self::Error),
            _ => None,
        }
    }

    /// Returns true if the descriptor reached a terminal state.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Generated | Self::Error)
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// User-visible action appended to a descriptor's audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    /// Descriptor created.
    Create,
    /// Artifacts generated.
    Generate,
    /// Detail page viewed.
    View,
    /// Artifact downloaded.
    Download,
}

impl AuditAction {
    /// Returns the string representation stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Generate => "GENERATE",
            Self::View => "VIEW",
            Self::Download => "DOWNLOAD",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Set-membership filters. An empty set means "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetFilters {
    /// Owning services.
    #[serde(default)]
    pub services: Vec<Uuid>,
    /// Economic natures.
    #[serde(default)]
    pub natures_economiques: Vec<Uuid>,
    /// Banks.
    #[serde(default)]
    pub banques: Vec<Uuid>,
    /// Bank accounts.
    #[serde(default)]
    pub comptes: Vec<Uuid>,
}

impl SetFilters {
    /// Returns true if no set filter is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
            && self.natures_economiques.is_empty()
            && self.banques.is_empty()
            && self.comptes.is_empty()
    }
}

/// Scalar filters. `None` means "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalarFilters {
    /// Record status (e.g. demande workflow status).
    #[serde(default)]
    pub statut: Option<String>,
    /// Currency tag filter for tag-discriminated kinds.
    #[serde(default)]
    pub devise: Option<Devise>,
    /// Inclusive lower bound on the primary amount.
    #[serde(default)]
    pub montant_min: Option<Decimal>,
    /// Inclusive upper bound on the primary amount.
    #[serde(default)]
    pub montant_max: Option<Decimal>,
    /// Substring match on the expense code.
    #[serde(default)]
    pub code_depense: Option<String>,
    /// Receipt source.
    #[serde(default)]
    pub source_recette: Option<String>,
    /// Whether partial payments are included. Defaults to true.
    #[serde(default = "default_true")]
    pub inclure_partiels: bool,
}

fn default_true() -> bool {
    true
}

/// Output options for the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputOptions {
    /// Requested artifact formats.
    #[serde(default)]
    pub format: OutputFormat,
    /// Whether the data table is included (totals-only otherwise).
    #[serde(default = "default_true")]
    pub include_details: bool,
    /// Whether charts are included. Reserved; the renderer ignores it.
    #[serde(default)]
    pub include_charts: bool,
    /// Sort key.
    #[serde(default)]
    pub sort_key: SortKey,
    /// Sort direction.
    #[serde(default)]
    pub sort_order: SortOrder,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            include_details: true,
            include_charts: false,
            sort_key: SortKey::default(),
            sort_order: SortOrder::default(),
        }
    }
}

/// A report specification as submitted by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSpec {
    /// Report kind.
    pub kind: ReportKind,
    /// Document title.
    pub titre: String,
    /// Optional free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Inclusive window start.
    pub date_debut: NaiveDate,
    /// Inclusive window end.
    pub date_fin: NaiveDate,
    /// Selected periodicity.
    #[serde(default)]
    pub periodicite: Periodicity,
    /// Set-membership filters.
    #[serde(default)]
    pub filtres: SetFilters,
    /// Scalar filters.
    #[serde(default)]
    pub criteres: ScalarFilters,
    /// Output options.
    #[serde(default)]
    pub options: OutputOptions,
}

/// Dual-currency aggregates computed by the planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReportTotals {
    /// Sum of USD amounts.
    pub total_usd: Decimal,
    /// Sum of CDF amounts.
    pub total_cdf: Decimal,
}

impl ReportTotals {
    /// Zero totals.
    pub const ZERO: Self = Self {
        total_usd: Decimal::ZERO,
        total_cdf: Decimal::ZERO,
    };

    /// The general total persisted on the descriptor.
    ///
    /// The two currencies are summed without conversion; the figure is a
    /// bookkeeping convention carried over from the paper forms.
    #[must_use]
    pub fn total_general(&self) -> Decimal {
        self.total_usd + self.total_cdf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_kind_round_trip() {
        for kind in [
            ReportKind::DemandePaiement,
            ReportKind::Recette,
            ReportKind::Depense,
            ReportKind::Paiement,
            ReportKind::ReleveDepense,
            ReportKind::SoldeBancaire,
            ReportKind::Bilan,
            ReportKind::SituationFinanciere,
        ] {
            assert_eq!(ReportKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(ReportKind::parse("FACTURE"), None);
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            ReportStatus::Generating,
            ReportStatus::Generated,
            ReportStatus::Error,
        ] {
            assert_eq!(ReportStatus::parse(status.as_str()), Some(status));
        }
        assert!(!ReportStatus::Generating.is_terminal());
        assert!(ReportStatus::Generated.is_terminal());
        assert!(ReportStatus::Error.is_terminal());
    }

    #[test]
    fn test_output_format_selection() {
        assert!(OutputFormat::Pdf.wants_pdf());
        assert!(!OutputFormat::Pdf.wants_xlsx());
        assert!(OutputFormat::Xlsx.wants_xlsx());
        assert!(!OutputFormat::Xlsx.wants_pdf());
        assert!(OutputFormat::Both.wants_pdf());
        assert!(OutputFormat::Both.wants_xlsx());
    }

    #[test]
    fn test_total_general_is_sum() {
        let totals = ReportTotals {
            total_usd: dec!(150.00),
            total_cdf: dec!(70000.00),
        };
        assert_eq!(totals.total_general(), dec!(70150.00));
    }

    #[test]
    fn test_spec_serde_round_trip() {
        let spec = ReportSpec {
            kind: ReportKind::Recette,
            titre: "Recettes de juin".to_string(),
            description: None,
            date_debut: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            date_fin: NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
            periodicite: Periodicity::Monthly,
            filtres: SetFilters::default(),
            criteres: ScalarFilters::default(),
            options: OutputOptions::default(),
        };
        let json = serde_json::to_string(&spec).unwrap();
        assert!(json.contains("\"RECETTE\""));
        let back: ReportSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(back, spec);
    }

    #[test]
    fn test_scalar_filter_defaults() {
        let criteres: ScalarFilters = serde_json::from_str("{}").unwrap();
        assert!(criteres.inclure_partiels);
        assert!(criteres.statut.is_none());
        assert!(criteres.montant_min.is_none());
    }
}
