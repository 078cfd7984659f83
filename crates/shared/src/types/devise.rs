//! Currency classification for the dual-currency ledger.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are `rust_decimal::Decimal` everywhere; this type only carries
//! the currency tag.

use serde::{Deserialize, Serialize};

/// The two currencies handled by the directorate.
///
/// Legacy records label the Congolese Franc either "CDF" or "FC"; the two
/// spellings are the same currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Devise {
    /// US Dollar.
    Usd,
    /// Congolese Franc (CDF, also written FC).
    Cdf,
}

impl Devise {
    /// Parses a currency tag, accepting the legacy "FC" spelling for CDF.
    ///
    /// Returns `None` for unknown tags; callers treat those amounts as
    /// contributing to neither total.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "USD" => Some(Self::Usd),
            "CDF" | "FC" => Some(Self::Cdf),
            _ => None,
        }
    }

    /// Returns the canonical tag stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Cdf => "CDF",
        }
    }
}

impl std::fmt::Display for Devise {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical_tags() {
        assert_eq!(Devise::parse("USD"), Some(Devise::Usd));
        assert_eq!(Devise::parse("CDF"), Some(Devise::Cdf));
    }

    #[test]
    fn test_parse_fc_is_cdf() {
        assert_eq!(Devise::parse("FC"), Some(Devise::Cdf));
        assert_eq!(Devise::parse("fc"), Some(Devise::Cdf));
    }

    #[test]
    fn test_parse_is_case_insensitive_and_trims() {
        assert_eq!(Devise::parse(" usd "), Some(Devise::Usd));
        assert_eq!(Devise::parse("cdf"), Some(Devise::Cdf));
    }

    #[test]
    fn test_parse_unknown_tag() {
        assert_eq!(Devise::parse("EUR"), None);
        assert_eq!(Devise::parse(""), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Devise::Usd.to_string(), "USD");
        assert_eq!(Devise::Cdf.to_string(), "CDF");
    }
}
