//! Base-unit token amounts
//!
//! Chain amounts are unsigned integers carried as decimal strings on the wire.
//! They are parsed into `u128` at the edge and serialized back as strings so
//! JSON consumers never lose precision.

use crate::{Error, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Parse a base-unit amount such as `"1000000"`.
pub fn parse_amount(raw: &str) -> Result<u128> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidArgument(format!(
            "Invalid amount '{}': expected an unsigned integer in base units",
            raw
        )));
    }
    trimmed
        .parse::<u128>()
        .map_err(|e| Error::InvalidArgument(format!("Invalid amount '{}': {}", raw, e)))
}

/// Convert a base-unit amount to a `Decimal`, failing if it cannot be represented.
pub fn to_decimal(amount: u128) -> Result<Decimal> {
    let signed = i128::try_from(amount)
        .map_err(|_| Error::InvalidArgument(format!("Amount {} is too large", amount)))?;
    Decimal::try_from_i128_with_scale(signed, 0)
        .map_err(|_| Error::InvalidArgument(format!("Amount {} is too large", amount)))
}

/// Round a non-negative decimal up to the next whole base unit.
pub fn ceil_to_units(value: Decimal) -> Result<u128> {
    value
        .ceil()
        .to_u128()
        .ok_or_else(|| Error::InvalidArgument(format!("Value {} is not a valid amount", value)))
}

/// Round a non-negative decimal down to a whole base unit.
pub fn floor_to_units(value: Decimal) -> Result<u128> {
    value
        .floor()
        .to_u128()
        .ok_or_else(|| Error::InvalidArgument(format!("Value {} is not a valid amount", value)))
}

/// Serde adapter for integers the chain encodes as decimal strings.
///
/// Serializes as a string; accepts either a string or a JSON number.
pub mod as_string {
    use serde::{de, Deserialize, Deserializer, Serializer};
    use std::fmt::Display;
    use std::str::FromStr;

    pub fn serialize<T: Display, S: Serializer>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: FromStr + TryFrom<u64>,
        T::Err: Display,
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(u64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Text(s) => s.parse().map_err(de::Error::custom),
            Raw::Number(n) => T::try_from(n).map_err(|_| de::Error::custom("integer out of range")),
        }
    }
}
