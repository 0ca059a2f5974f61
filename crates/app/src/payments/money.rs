//! Currency codes and minor-unit conversion.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use rust_decimal::{Decimal, prelude::ToPrimitive};
use thiserror::Error;

/// Minor units per major unit for the two-decimal currencies we sell in.
const MINOR_UNITS_PER_MAJOR: Decimal = Decimal::ONE_HUNDRED;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("amount is smaller than one minor unit")]
    BelowMinorUnit,

    #[error("amount is too large to charge")]
    TooLarge,
}

/// Convert a major-unit amount to minor units, truncating any fraction of a
/// minor unit: `19.995` becomes `1999`.
///
/// # Errors
///
/// Returns an error when the result is zero or negative, or does not fit in a
/// `u64`.
pub fn to_minor_units(amount: Decimal) -> Result<u64, AmountError> {
    let minor = amount
        .checked_mul(MINOR_UNITS_PER_MAJOR)
        .ok_or(AmountError::TooLarge)?
        .floor();

    if minor <= Decimal::ZERO {
        return Err(AmountError::BelowMinorUnit);
    }

    minor.to_u64().ok_or(AmountError::TooLarge)
}

/// Lowercase ISO 4217 currency code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Currency(String);

impl Currency {
    #[must_use]
    pub fn usd() -> Self {
        Self("usd".to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self::usd()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid currency code \"{0}\"")]
pub struct CurrencyParseError(String);

impl FromStr for Currency {
    type Err = CurrencyParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();

        if value.len() != 3 || !value.bytes().all(|byte| byte.is_ascii_alphabetic()) {
            return Err(CurrencyParseError(value.to_string()));
        }

        Ok(Self(value.to_ascii_lowercase()))
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}
