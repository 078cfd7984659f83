//! Artifact filename convention.
//!
//! `<KIND>_<slugified-title>_<YYYYMMDD_HHMMSS>.<ext>`, timestamped in
//! Kinshasa time.

use chrono::DateTime;
use chrono_tz::Tz;

use crate::etat::ReportKind;

/// Slugifies a report title for use in a filename.
///
/// Folds the accented characters French titles actually contain,
/// lowercases, and collapses every other character run to a single `_`.
#[must_use]
pub fn slugifier(titre: &str) -> String {
    let mut slug = String::with_capacity(titre.len());
    let mut pending_sep = false;

    for c in titre.chars() {
        let folded: &str = match c {
            'à' | 'â' | 'ä' | 'À' | 'Â' | 'Ä' => "a",
            'é' | 'è' | 'ê' | 'ë' | 'É' | 'È' | 'Ê' | 'Ë' => "e",
            'î' | 'ï' | 'Î' | 'Ï' => "i",
            'ô' | 'ö' | 'Ô' | 'Ö' => "o",
            'ù' | 'û' | 'ü' | 'Ù' | 'Û' | 'Ü' => "u",
            'ç' | 'Ç' => "c",
            'œ' | 'Œ' => "oe",
            _ => {
                if c.is_ascii_alphanumeric() {
                    if pending_sep && !slug.is_empty() {
                        slug.push('_');
                    }
                    pending_sep = false;
                    slug.push(c.to_ascii_lowercase());
                } else {
                    pending_sep = true;
                }
                continue;
            }
        };

        if pending_sep && !slug.is_empty() {
            slug.push('_');
        }
        pending_sep = false;
        slug.push_str(folded);
    }

    if slug.is_empty() {
        "etat".to_string()
    } else {
        slug
    }
}

/// Builds an artifact filename for a report.
#[must_use]
pub fn nom_artefact(kind: ReportKind, titre: &str, genere_le: &DateTime<Tz>, ext: &str) -> String {
    format!(
        "{}_{}_{}.{ext}",
        kind.as_str(),
        slugifier(titre),
        genere_le.format("%Y%m%d_%H%M%S")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_slugifier_folds_accents() {
        assert_eq!(slugifier("Dépenses du Trésor"), "depenses_du_tresor");
        assert_eq!(slugifier("Relevé août"), "releve_aout");
    }

    #[test]
    fn test_slugifier_collapses_separators() {
        assert_eq!(slugifier("Rapport -- mensuel  (2024)"), "rapport_mensuel_2024");
    }

    #[test]
    fn test_slugifier_empty_falls_back() {
        assert_eq!(slugifier("***"), "etat");
    }

    #[test]
    fn test_nom_artefact() {
        let at = crate::render::FUSEAU
            .with_ymd_and_hms(2024, 6, 30, 14, 5, 9)
            .unwrap();
        assert_eq!(
            nom_artefact(ReportKind::Recette, "Recettes de juin", &at, "pdf"),
            "RECETTE_recettes_de_juin_20240630_140509.pdf"
        );
    }
}
