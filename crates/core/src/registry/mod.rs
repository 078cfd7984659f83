//! Record adapter registry.
//!
//! Every report kind is described by one declarative [`RecordAdapter`]:
//! the source collection, the period field and its semantics, the
//! dual-currency discriminator, the rendering columns, and the filters the
//! kind accepts. Dispatch anywhere in the engine is a table lookup on this
//! registry; adding a kind means registering an adapter, not branching.

use crate::etat::{ReportKind, SortKey};

/// How the period window applies to a kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodSemantics {
    /// Records carry an exact day; the window applies unchanged.
    DayExact,
    /// Records are anchored to the first of their month; a one-day window
    /// must match the whole containing month.
    MonthAnchored,
    /// Point-in-time records; all period inputs are ignored.
    Snapshot,
}

/// How a record's amounts split across the two currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrencyRule {
    /// One amount field discriminated by a currency tag field.
    Tagged {
        /// Name of the currency tag field.
        devise_field: &'static str,
        /// Name of the single amount field.
        montant_field: &'static str,
    },
    /// Two parallel amount fields, one per currency.
    Split {
        /// Name of the USD amount field.
        usd_field: &'static str,
        /// Name of the CDF amount field (stored as "FC" on some tables).
        cdf_field: &'static str,
    },
}

/// Horizontal alignment of a rendered column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    /// Text columns.
    Left,
    /// Numeric columns.
    Right,
}

/// One rendering column.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    /// Header label, French.
    pub header: &'static str,
    /// Cell alignment.
    pub align: Align,
    /// Relative width weight used by the PDF table layout.
    pub weight: u8,
}

/// Set filters a kind accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetFilter {
    /// Owning service.
    Services,
    /// Economic nature.
    NaturesEconomiques,
    /// Bank.
    Banques,
    /// Bank account.
    Comptes,
}

/// Scalar filters a kind accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarFilter {
    /// Workflow status.
    Statut,
    /// Currency tag.
    Devise,
    /// Amount bounds on the primary amount.
    MontantBounds,
    /// Expense code substring.
    CodeDepense,
    /// Receipt source.
    SourceRecette,
    /// Partial payment inclusion flag.
    InclurePartiels,
}

/// Declarative descriptor of one report kind.
#[derive(Debug)]
pub struct RecordAdapter {
    /// The kind this adapter serves.
    pub kind: ReportKind,
    /// French plural label used in document titles ("Liste des ...").
    pub label_pluriel: &'static str,
    /// The period field, `None` for snapshot kinds.
    pub period_field: Option<&'static str>,
    /// Period semantics.
    pub semantics: PeriodSemantics,
    /// Dual-currency discriminator.
    pub currency_rule: CurrencyRule,
    /// Rendering columns, in order.
    pub columns: &'static [Column],
    /// Allowed set filters.
    pub set_filters: &'static [SetFilter],
    /// Allowed scalar filters.
    pub scalar_filters: &'static [ScalarFilter],
}

impl RecordAdapter {
    /// Returns true if the kind accepts the given set filter.
    #[must_use]
    pub fn allows_set(&self, filter: SetFilter) -> bool {
        self.set_filters.contains(&filter)
    }

    /// Returns true if the kind accepts the given scalar filter.
    #[must_use]
    pub fn allows_scalar(&self, filter: ScalarFilter) -> bool {
        self.scalar_filters.contains(&filter)
    }

    /// Maps a sort key to the source field it orders by.
    ///
    /// `date` maps to the period field, `amount` to the primary amount,
    /// `reference` and `service` to the kind's named columns when present.
    #[must_use]
    pub fn sort_field(&self, key: SortKey) -> Option<&'static str> {
        match (self.kind, key) {
            (_, SortKey::Date) => self.period_field,
            (ReportKind::DemandePaiement, SortKey::Amount) => Some("montant"),
            (ReportKind::DemandePaiement, SortKey::Reference) => Some("numero"),
            (ReportKind::DemandePaiement | ReportKind::Depense, SortKey::Service) => {
                Some("service_id")
            }
            (ReportKind::Recette, SortKey::Amount) => Some("montant_usd"),
            (ReportKind::Recette, SortKey::Reference) => Some("numero"),
            (ReportKind::Depense, SortKey::Amount) => Some("montant_usd"),
            (ReportKind::Depense, SortKey::Reference) => Some("code_depense"),
            (ReportKind::Paiement, SortKey::Amount) => Some("montant_paye"),
            (ReportKind::Paiement, SortKey::Reference) => Some("numero"),
            (ReportKind::ReleveDepense, SortKey::Amount) => Some("net_usd"),
            (ReportKind::ReleveDepense, SortKey::Service) => Some("service_id"),
            (ReportKind::SoldeBancaire, SortKey::Amount) => Some("solde_courant"),
            (ReportKind::SoldeBancaire, SortKey::Reference) => Some("numero_compte"),
            _ => None,
        }
    }
}

const DEMANDE_COLUMNS: &[Column] = &[
    Column { header: "N°", align: Align::Left, weight: 2 },
    Column { header: "Date", align: Align::Left, weight: 2 },
    Column { header: "Bénéficiaire", align: Align::Left, weight: 4 },
    Column { header: "Motif", align: Align::Left, weight: 5 },
    Column { header: "Devise", align: Align::Left, weight: 1 },
    Column { header: "Montant", align: Align::Right, weight: 3 },
];

const RECETTE_COLUMNS: &[Column] = &[
    Column { header: "N°", align: Align::Left, weight: 2 },
    Column { header: "Date", align: Align::Left, weight: 2 },
    Column { header: "Libellé", align: Align::Left, weight: 5 },
    Column { header: "Source", align: Align::Left, weight: 3 },
    Column { header: "Montant USD", align: Align::Right, weight: 3 },
    Column { header: "Montant CDF", align: Align::Right, weight: 3 },
];

const DEPENSE_COLUMNS: &[Column] = &[
    Column { header: "Code", align: Align::Left, weight: 2 },
    Column { header: "Date", align: Align::Left, weight: 2 },
    Column { header: "Libellé", align: Align::Left, weight: 5 },
    Column { header: "Montant USD", align: Align::Right, weight: 3 },
    Column { header: "Montant FC", align: Align::Right, weight: 3 },
];

const PAIEMENT_COLUMNS: &[Column] = &[
    Column { header: "N°", align: Align::Left, weight: 2 },
    Column { header: "Date", align: Align::Left, weight: 2 },
    Column { header: "Bénéficiaire", align: Align::Left, weight: 5 },
    Column { header: "Devise", align: Align::Left, weight: 1 },
    Column { header: "Montant payé", align: Align::Right, weight: 3 },
];

const RELEVE_COLUMNS: &[Column] = &[
    Column { header: "Période", align: Align::Left, weight: 2 },
    Column { header: "Libellé", align: Align::Left, weight: 5 },
    Column { header: "Net USD", align: Align::Right, weight: 3 },
    Column { header: "Net CDF", align: Align::Right, weight: 3 },
];

const SOLDE_COLUMNS: &[Column] = &[
    Column { header: "Banque", align: Align::Left, weight: 3 },
    Column { header: "N° compte", align: Align::Left, weight: 3 },
    Column { header: "Intitulé", align: Align::Left, weight: 4 },
    Column { header: "Devise", align: Align::Left, weight: 1 },
    Column { header: "Solde courant", align: Align::Right, weight: 3 },
];

/// The closed adapter table. Order matches the selection form.
static ADAPTERS: &[RecordAdapter] = &[
    RecordAdapter {
        kind: ReportKind::DemandePaiement,
        label_pluriel: "demandes",
        period_field: Some("date_soumission"),
        semantics: PeriodSemantics::DayExact,
        currency_rule: CurrencyRule::Tagged {
            devise_field: "devise",
            montant_field: "montant",
        },
        columns: DEMANDE_COLUMNS,
        set_filters: &[SetFilter::Services, SetFilter::NaturesEconomiques],
        scalar_filters: &[
            ScalarFilter::Statut,
            ScalarFilter::Devise,
            ScalarFilter::MontantBounds,
        ],
    },
    RecordAdapter {
        kind: ReportKind::Recette,
        label_pluriel: "recettes",
        period_field: Some("date_encaissement"),
        semantics: PeriodSemantics::DayExact,
        currency_rule: CurrencyRule::Split {
            usd_field: "montant_usd",
            cdf_field: "montant_cdf",
        },
        columns: RECETTE_COLUMNS,
        set_filters: &[SetFilter::Services, SetFilter::Banques],
        scalar_filters: &[ScalarFilter::SourceRecette, ScalarFilter::MontantBounds],
    },
    RecordAdapter {
        kind: ReportKind::Depense,
        label_pluriel: "dépenses",
        period_field: Some("date_depense"),
        semantics: PeriodSemantics::DayExact,
        currency_rule: CurrencyRule::Split {
            usd_field: "montant_usd",
            cdf_field: "montant_fc",
        },
        columns: DEPENSE_COLUMNS,
        set_filters: &[SetFilter::Services, SetFilter::NaturesEconomiques],
        scalar_filters: &[
            ScalarFilter::Statut,
            ScalarFilter::CodeDepense,
            ScalarFilter::MontantBounds,
        ],
    },
    RecordAdapter {
        kind: ReportKind::Paiement,
        label_pluriel: "paiements",
        period_field: Some("date_paiement"),
        semantics: PeriodSemantics::DayExact,
        currency_rule: CurrencyRule::Tagged {
            devise_field: "devise",
            montant_field: "montant_paye",
        },
        columns: PAIEMENT_COLUMNS,
        set_filters: &[SetFilter::Services, SetFilter::Banques],
        scalar_filters: &[
            ScalarFilter::Devise,
            ScalarFilter::MontantBounds,
            ScalarFilter::InclurePartiels,
        ],
    },
    RecordAdapter {
        kind: ReportKind::ReleveDepense,
        label_pluriel: "relevés",
        period_field: Some("periode"),
        semantics: PeriodSemantics::MonthAnchored,
        currency_rule: CurrencyRule::Split {
            usd_field: "net_usd",
            cdf_field: "net_cdf",
        },
        columns: RELEVE_COLUMNS,
        set_filters: &[SetFilter::Services],
        scalar_filters: &[ScalarFilter::MontantBounds],
    },
    RecordAdapter {
        kind: ReportKind::SoldeBancaire,
        label_pluriel: "soldes",
        period_field: None,
        semantics: PeriodSemantics::Snapshot,
        currency_rule: CurrencyRule::Tagged {
            devise_field: "devise",
            montant_field: "solde_courant",
        },
        columns: SOLDE_COLUMNS,
        set_filters: &[SetFilter::Banques, SetFilter::Comptes],
        scalar_filters: &[ScalarFilter::Devise],
    },
];

/// Looks up the adapter for a kind.
///
/// Returns `None` for kinds with no registered source (BILAN,
/// SITUATION_FINANCIERE); those are rejected at validation time.
#[must_use]
pub fn adapter_for(kind: ReportKind) -> Option<&'static RecordAdapter> {
    ADAPTERS.iter().find(|a| a.kind == kind)
}

/// All registered adapters, in form order.
#[must_use]
pub fn all_adapters() -> &'static [RecordAdapter] {
    ADAPTERS
}
