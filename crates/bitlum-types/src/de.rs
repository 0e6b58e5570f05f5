//! Lenient deserializers for exchange payloads
//!
//! The exchange sends monetary values either as JSON strings or as JSON
//! numbers, and leaves unset fields as `null`.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

/// Deserialize a decimal from a string, a number, or `null` (zero)
///
/// Numbers are parsed from their raw JSON text, which `serde_json` keeps
/// with `arbitrary_precision`, so they never pass through `f64`.
/// Scientific notation is accepted in both forms.
pub fn decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    use std::str::FromStr;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Number(serde_json::Number),
    }

    let parse = |s: &str| {
        if s.contains('e') || s.contains('E') {
            Decimal::from_scientific(s).map_err(D::Error::custom)
        } else {
            Decimal::from_str(s).map_err(D::Error::custom)
        }
    };

    match Option::<StringOrNumber>::deserialize(deserializer)? {
        None => Ok(Decimal::ZERO),
        Some(StringOrNumber::String(s)) if s.is_empty() => Ok(Decimal::ZERO),
        Some(StringOrNumber::String(s)) => parse(&s),
        Some(StringOrNumber::Number(n)) => parse(&n.to_string()),
    }
}

/// Deserialize `null` as the type's default value
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
