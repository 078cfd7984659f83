//! Date formatting.

use chrono::NaiveDate;

/// Formats a date as `DD/MM/YYYY`.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Returns the French month name for a 1-based month number.
///
/// Out-of-range numbers return an empty string.
#[must_use]
pub fn nom_du_mois(mois: u32) -> &'static str {
    match mois {
        1 => "janvier",
        2 => "février",
        3 => "mars",
        4 => "avril",
        5 => "mai",
        6 => "juin",
        7 => "juillet",
        8 => "août",
        9 => "septembre",
        10 => "octobre",
        11 => "novembre",
        12 => "décembre",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert_eq!(format_date(date), "01/06/2024");
    }

    #[test]
    fn test_nom_du_mois() {
        assert_eq!(nom_du_mois(1), "janvier");
        assert_eq!(nom_du_mois(8), "août");
        assert_eq!(nom_du_mois(12), "décembre");
        assert_eq!(nom_du_mois(0), "");
        assert_eq!(nom_du_mois(13), "");
    }
}
