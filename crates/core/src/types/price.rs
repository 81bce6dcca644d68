//! Type-safe INR amounts using decimal arithmetic.
//!
//! Prices are stored as `NUMERIC(12, 2)` rupees. Floats never touch a price.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing an [`Inr`] amount.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative")]
    Negative,
    /// The amount has sub-paisa precision.
    #[error("price can have at most {max} decimal places")]
    TooPrecise {
        /// Maximum number of decimal places.
        max: u32,
    },
    /// The amount does not fit `NUMERIC(12, 2)`.
    #[error("price must be below {max}")]
    TooLarge {
        /// Exclusive upper bound in rupees.
        max: i64,
    },
    /// The input is not a decimal number.
    #[error("price is not a valid number")]
    Invalid,
}

/// An amount in Indian rupees.
///
/// Serializes as a decimal string (`"1499.00"`) so JSON clients never see a
/// float. Deserializes from either a string or a JSON number and validates
/// the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Inr(Decimal);

impl Inr {
    /// Maximum number of decimal places (paise).
    pub const SCALE: u32 = 2;

    /// Exclusive upper bound imposed by `NUMERIC(12, 2)`.
    pub const MAX_RUPEES: i64 = 10_000_000_000;

    /// Validate a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns a [`PriceError`] if the amount is negative, has more than two
    /// decimal places, or exceeds the storage range.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }

        let normalized = amount.normalize();
        if normalized.scale() > Self::SCALE {
            return Err(PriceError::TooPrecise { max: Self::SCALE });
        }

        if normalized >= Decimal::from(Self::MAX_RUPEES) {
            return Err(PriceError::TooLarge {
                max: Self::MAX_RUPEES,
            });
        }

        let mut value = normalized;
        value.rescale(Self::SCALE);
        Ok(Self(value))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl Default for Inr {
    fn default() -> Self {
        Self(Decimal::new(0, Self::SCALE))
    }
}

impl TryFrom<Decimal> for Inr {
    type Error = PriceError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Inr> for Decimal {
    fn from(value: Inr) -> Self {
        value.0
    }
}

impl FromStr for Inr {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = Decimal::from_str(s.trim()).map_err(|_| PriceError::Invalid)?;
        Self::new(amount)
    }
}

impl std::fmt::Display for Inr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "₹{}", self.0)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Inr {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Inr {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::new(amount)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Inr {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rescales_to_paise() {
        let price: Inr = "1499".parse().unwrap();
        assert_eq!(price.amount().to_string(), "1499.00");

        let price: Inr = "99.5".parse().unwrap();
        assert_eq!(price.amount().to_string(), "99.50");
    }

    #[test]
    fn test_zero_is_allowed() {
        assert_eq!("0".parse::<Inr>().unwrap().amount(), Decimal::ZERO);
        assert!("-0".parse::<Inr>().is_ok());
    }

    #[test]
    fn test_rejects_invalid_amounts() {
        assert_eq!("-1".parse::<Inr>(), Err(PriceError::Negative));
        assert_eq!(
            "10.999".parse::<Inr>(),
            Err(PriceError::TooPrecise { max: 2 })
        );
        assert!(matches!(
            "10000000000".parse::<Inr>(),
            Err(PriceError::TooLarge { .. })
        ));
        assert_eq!("abc".parse::<Inr>(), Err(PriceError::Invalid));
    }

    #[test]
    fn test_trailing_zeros_do_not_count_as_precision() {
        assert!("12.500".parse::<Inr>().is_ok());
    }

    #[test]
    fn test_serde_accepts_strings_and_numbers() {
        let from_str: Inr = serde_json::from_str("\"250.00\"").unwrap();
        let from_num: Inr = serde_json::from_str("250").unwrap();
        assert_eq!(from_str, from_num);
        assert_eq!(serde_json::to_string(&from_num).unwrap(), "\"250.00\"");

        assert!(serde_json::from_str::<Inr>("-5").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!("1299".parse::<Inr>().unwrap().to_string(), "₹1299.00");
    }
}
