//! Currency codes for monetary values.
//!
//! Monetary amounts themselves are plain `rust_decimal::Decimal` fields on
//! the owning entities, serialized as JSON numbers (via
//! `rust_decimal::serde::float`) to stay compatible with the stored data
//! files. The currency travels alongside the amount as a separate field, the
//! way the mobile client expects it.

use serde::{Deserialize, Serialize};

/// Currency codes used by the catalog and cart data.
///
/// The stored documents use `"KD"` (Kuwaiti dinar) throughout; the other
/// codes exist so foreign catalog entries deserialize without data loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    #[serde(rename = "KD")]
    Kd,
    #[serde(rename = "USD")]
    Usd,
    #[serde(rename = "EUR")]
    Eur,
}

impl Currency {
    /// The wire representation of this currency code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Kd => "KD",
            Self::Usd => "USD",
            Self::Eur => "EUR",
        }
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format() {
        assert_eq!(serde_json::to_string(&Currency::Kd).expect("serialize"), "\"KD\"");
        let back: Currency = serde_json::from_str("\"KD\"").expect("deserialize");
        assert_eq!(back, Currency::Kd);
    }

    #[test]
    fn test_default_is_kd() {
        assert_eq!(Currency::default(), Currency::Kd);
    }
}
