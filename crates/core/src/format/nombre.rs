//! Exact-decimal number formatting.

use rust_decimal::{Decimal, RoundingStrategy};

/// Formats an amount with French separators: thousands grouped by a space
/// (U+0020), decimal comma, always two fractional digits.
///
/// Rounding is HALF_UP on the second fractional digit; the computation
/// stays in exact decimal throughout.
#[must_use]
pub fn format_montant(montant: Decimal) -> String {
    let rounded = montant.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative();
    let abs = rounded.abs();

    // "1234567.50" -> integer and fractional halves
    let fixed = format!("{abs:.2}");
    let (entier, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let digits: Vec<char> = entier.chars().collect();
    let mut grouped = String::with_capacity(entier.len() + entier.len() / 3 + 4);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i).is_multiple_of(3) {
            grouped.push(' ');
        }
        grouped.push(*c);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}{grouped},{fraction}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(0), "0,00")]
    #[case(dec!(7), "7,00")]
    #[case(dec!(42.5), "42,50")]
    #[case(dec!(1000), "1 000,00")]
    #[case(dec!(1000.00), "1 000,00")]
    #[case(dec!(500000), "500 000,00")]
    #[case(dec!(1234567.891), "1 234 567,89")]
    #[case(dec!(999.999), "1 000,00")]
    #[case(dec!(-2500.5), "-2 500,50")]
    #[case(dec!(70000), "70 000,00")]
    fn test_format_montant(#[case] input: Decimal, #[case] expected: &str) {
        assert_eq!(format_montant(input), expected);
    }

    #[test]
    fn test_half_up_rounding() {
        assert_eq!(format_montant(dec!(0.125)), "0,13");
        assert_eq!(format_montant(dec!(0.114)), "0,11");
        assert_eq!(format_montant(dec!(-0.125)), "-0,13");
    }

    #[test]
    fn test_separator_is_plain_space() {
        let s = format_montant(dec!(1000000));
        assert_eq!(s, "1\u{20}000\u{20}000,00");
    }
}
