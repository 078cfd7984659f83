//! French money-to-words conversion.
//!
//! Official statements carry the general total spelled out ("arrêté à la
//! somme de ..."). The rules follow standard French usage: soixante-dix
//! and quatre-vingt-dix composites, "et un" for 21..61 and 71, the plural
//! "s" on quatre-vingts and cents only when nothing follows.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use tresor_shared::types::Devise;

const UNITES: [&str; 17] = [
    "zéro", "un", "deux", "trois", "quatre", "cinq", "six", "sept", "huit", "neuf", "dix", "onze",
    "douze", "treize", "quatorze", "quinze", "seize",
];

const DIZAINES: [&str; 10] = [
    "", "dix", "vingt", "trente", "quarante", "cinquante", "soixante", "soixante-dix",
    "quatre-vingt", "quatre-vingt-dix",
];

fn moins_de_vingt(n: u64) -> String {
    match n {
        0..=16 => UNITES[usize::try_from(n).unwrap_or(0)].to_string(),
        17..=19 => format!("dix-{}", UNITES[usize::try_from(n - 10).unwrap_or(0)]),
        _ => unreachable!(),
    }
}

fn moins_de_cent(n: u64) -> String {
    if n < 20 {
        return moins_de_vingt(n);
    }

    let dizaine = n / 10;
    let unite = n % 10;
    match (dizaine, unite) {
        // 70..79 and 90..99 compose on soixante / quatre-vingt
        (7, _) => {
            if unite == 1 {
                "soixante et onze".to_string()
            } else {
                format!("soixante-{}", moins_de_vingt(10 + unite))
            }
        }
        (9, _) => format!("quatre-vingt-{}", moins_de_vingt(10 + unite)),
        (8, 0) => "quatre-vingts".to_string(),
        (8, _) => format!("quatre-vingt-{}", moins_de_vingt(unite)),
        (_, 0) => DIZAINES[usize::try_from(dizaine).unwrap_or(0)].to_string(),
        (_, 1) => format!("{} et un", DIZAINES[usize::try_from(dizaine).unwrap_or(0)]),
        _ => format!(
            "{}-{}",
            DIZAINES[usize::try_from(dizaine).unwrap_or(0)],
            moins_de_vingt(unite)
        ),
    }
}

fn moins_de_mille(n: u64) -> String {
    if n < 100 {
        return moins_de_cent(n);
    }

    let centaines = n / 100;
    let reste = n % 100;
    let tete = match (centaines, reste) {
        (1, _) => "cent".to_string(),
        (_, 0) => format!("{} cents", moins_de_cent(centaines)),
        _ => format!("{} cent", moins_de_cent(centaines)),
    };

    if reste == 0 {
        tete
    } else {
        format!("{tete} {}", moins_de_cent(reste))
    }
}

/// Drops the plural "s" of "cents" and "vingts" when another numeral
/// follows ("deux cent mille", "quatre-vingt mille").
fn sans_accord(mot: String) -> String {
    if let Some(prefix) = mot.strip_suffix("cents") {
        format!("{prefix}cent")
    } else if let Some(prefix) = mot.strip_suffix("vingts") {
        format!("{prefix}vingt")
    } else {
        mot
    }
}

fn nombre_en_lettres(n: u64) -> String {
    if n == 0 {
        return UNITES[0].to_string();
    }

    let milliards = n / 1_000_000_000;
    let millions = (n / 1_000_000) % 1_000;
    let milliers = (n / 1_000) % 1_000;
    let reste = n % 1_000;

    let mut parties: Vec<String> = Vec::new();

    if milliards > 0 {
        let mot = if milliards == 1 { "milliard" } else { "milliards" };
        parties.push(format!("{} {mot}", moins_de_mille(milliards)));
    }
    if millions > 0 {
        let mot = if millions == 1 { "million" } else { "millions" };
        parties.push(format!("{} {mot}", moins_de_mille(millions)));
    }
    if milliers > 0 {
        // "mille" is invariable and drops the leading "un"
        if milliers == 1 {
            parties.push("mille".to_string());
        } else {
            parties.push(format!("{} mille", sans_accord(moins_de_mille(milliers))));
        }
    }
    if reste > 0 {
        parties.push(moins_de_mille(reste));
    }

    parties.join(" ")
}

/// Spells out an amount in French, with the currency label and cents.
///
/// The amount is rounded HALF_UP to two fractional digits first. Negative
/// amounts are prefixed with "moins".
#[must_use]
pub fn montant_en_lettres(montant: Decimal, devise: Devise) -> String {
    let rounded = montant.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negatif = rounded.is_sign_negative();
    let abs = rounded.abs();

    let entier = abs.trunc().to_u64().unwrap_or(u64::MAX);
    let cents = (abs.fract() * Decimal::from(100)).trunc().to_u64().unwrap_or(0);

    let libelle = match devise {
        Devise::Usd => {
            if entier <= 1 {
                "dollar américain"
            } else {
                "dollars américains"
            }
        }
        Devise::Cdf => {
            if entier <= 1 {
                "franc congolais"
            } else {
                "francs congolais"
            }
        }
    };

    let mut texte = format!("{} {libelle}", nombre_en_lettres(entier));
    if cents > 0 {
        let cent_mot = if cents == 1 { "centime" } else { "centimes" };
        texte.push_str(&format!(" et {} {cent_mot}", nombre_en_lettres(cents)));
    }

    if negatif {
        format!("moins {texte}")
    } else {
        texte
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(0, "zéro")]
    #[case(1, "un")]
    #[case(16, "seize")]
    #[case(17, "dix-sept")]
    #[case(21, "vingt et un")]
    #[case(34, "trente-quatre")]
    #[case(70, "soixante-dix")]
    #[case(71, "soixante et onze")]
    #[case(77, "soixante-dix-sept")]
    #[case(80, "quatre-vingts")]
    #[case(81, "quatre-vingt-un")]
    #[case(91, "quatre-vingt-onze")]
    #[case(100, "cent")]
    #[case(200, "deux cents")]
    #[case(203, "deux cent trois")]
    #[case(1000, "mille")]
    #[case(1234, "mille deux cent trente-quatre")]
    #[case(2000, "deux mille")]
    #[case(80_000, "quatre-vingt mille")]
    #[case(1_000_000, "un million")]
    #[case(2_500_000, "deux millions cinq cent mille")]
    #[case(200_000_000, "deux cents millions")]
    #[case(1_000_000_000, "un milliard")]
    fn test_nombre_en_lettres(#[case] n: u64, #[case] expected: &str) {
        assert_eq!(nombre_en_lettres(n), expected);
    }

    #[test]
    fn test_montant_usd() {
        assert_eq!(
            montant_en_lettres(dec!(1000.00), Devise::Usd),
            "mille dollars américains"
        );
    }

    #[test]
    fn test_montant_cdf_with_cents() {
        assert_eq!(
            montant_en_lettres(dec!(500000.50), Devise::Cdf),
            "cinq cent mille francs congolais et cinquante centimes"
        );
    }

    #[test]
    fn test_montant_singular() {
        assert_eq!(
            montant_en_lettres(dec!(1), Devise::Usd),
            "un dollar américain"
        );
        assert_eq!(
            montant_en_lettres(dec!(0.01), Devise::Usd),
            "zéro dollar américain et un centime"
        );
    }

    #[test]
    fn test_montant_negative() {
        assert_eq!(
            montant_en_lettres(dec!(-20), Devise::Usd),
            "moins vingt dollars américains"
        );
    }
}
