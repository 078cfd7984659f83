//! Specification validation.
//!
//! Validation failures are surfaced per-field so the surface can re-render
//! the form; no descriptor is created when validation fails.

use std::collections::BTreeMap;

use thiserror::Error;

use super::types::ReportSpec;
use crate::registry;

/// Maximum report window, inclusive, in days.
const MAX_WINDOW_DAYS: i64 = 365;

/// Field-keyed validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid report specification: {}", self.summary())]
pub struct SpecViolations {
    /// Field name to human-readable message.
    pub fields: BTreeMap<String, String>,
}

impl SpecViolations {
    fn new() -> Self {
        Self {
            fields: BTreeMap::new(),
        }
    }

    fn push(&mut self, field: &str, message: impl Into<String>) {
        self.fields.insert(field.to_string(), message.into());
    }

    fn summary(&self) -> String {
        self.fields
            .keys()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl ReportSpec {
    /// Validates the specification invariants.
    ///
    /// # Errors
    ///
    /// Returns the full set of violated fields; callers surface them
    /// without any persistence side effect.
    pub fn validate(&self) -> Result<(), SpecViolations> {
        let mut violations = SpecViolations::new();

        if self.titre.trim().is_empty() {
            violations.push("titre", "Le titre est obligatoire");
        }

        if registry::adapter_for(self.kind).is_none() {
            violations.push(
                "kind",
                format!("Aucune source de données pour le type {}", self.kind),
            );
        }

        if self.date_debut > self.date_fin {
            violations.push(
                "date_fin",
                "La date de fin doit être postérieure ou égale à la date de début",
            );
        } else if (self.date_fin - self.date_debut).num_days() > MAX_WINDOW_DAYS {
            violations.push("date_fin", "La période ne peut pas dépasser 365 jours");
        }

        if let (Some(min), Some(max)) = (self.criteres.montant_min, self.criteres.montant_max)
            && min > max
        {
            violations.push(
                "montant_max",
                "Le montant maximum doit être supérieur ou égal au montant minimum",
            );
        }

        if violations.fields.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::etat::{OutputOptions, Periodicity, ReportKind, ScalarFilters, SetFilters};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn base_spec() -> ReportSpec {
        ReportSpec {
            kind: ReportKind::Paiement,
            titre: "Paiements du mois".to_string(),
            description: None,
            date_debut: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            date_fin: NaiveDate::from_ymd_opt(2024, 5, 31).unwrap(),
            periodicite: Periodicity::Monthly,
            filtres: SetFilters::default(),
            criteres: ScalarFilters::default(),
            options: OutputOptions::default(),
        }
    }

    #[test]
    fn test_valid_spec_passes() {
        assert!(base_spec().validate().is_ok());
    }

    #[test]
    fn test_inverted_dates_rejected() {
        let mut spec = base_spec();
        spec.date_debut = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        spec.date_fin = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let err = spec.validate().unwrap_err();
        assert!(err.fields.contains_key("date_fin"));
    }

    #[test]
    fn test_window_over_one_year_rejected() {
        let mut spec = base_spec();
        spec.date_debut = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        spec.date_fin = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let err = spec.validate().unwrap_err();
        assert!(err.fields.contains_key("date_fin"));
    }

    #[test]
    fn test_window_of_exactly_365_days_accepted() {
        let mut spec = base_spec();
        spec.date_debut = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
        spec.date_fin = NaiveDate::from_ymd_opt(2024, 5, 31).unwrap();
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn test_amount_bounds_rejected_when_inverted() {
        let mut spec = base_spec();
        spec.criteres.montant_min = Some(dec!(500));
        spec.criteres.montant_max = Some(dec!(100));
        let err = spec.validate().unwrap_err();
        assert!(err.fields.contains_key("montant_max"));
    }

    #[test]
    fn test_amount_bounds_accepted_when_ordered() {
        let mut spec = base_spec();
        spec.criteres.montant_min = Some(dec!(100));
        spec.criteres.montant_max = Some(dec!(500));
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn test_empty_title_rejected() {
        let mut spec = base_spec();
        spec.titre = "   ".to_string();
        let err = spec.validate().unwrap_err();
        assert!(err.fields.contains_key("titre"));
    }

    #[test]
    fn test_kind_without_adapter_rejected() {
        let mut spec = base_spec();
        spec.kind = ReportKind::Bilan;
        let err = spec.validate().unwrap_err();
        assert!(err.fields.contains_key("kind"));
    }

    #[test]
    fn test_all_violations_reported_together() {
        let mut spec = base_spec();
        spec.titre = String::new();
        spec.date_debut = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        spec.date_fin = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        spec.criteres.montant_min = Some(dec!(10));
        spec.criteres.montant_max = Some(dec!(1));
        let err = spec.validate().unwrap_err();
        assert_eq!(err.fields.len(), 3);
    }
}
