//! Lenient numeric handling for values typed into an invoice form.
//!
//! Quantities, rates and discounts arrive as whatever the user typed: numbers,
//! numeric strings, empty strings or nothing at all. None of these may block
//! editing, so anything that is not a usable number reads as `0`.

use core::fmt;

use serde::de::{self, Deserializer, Visitor};

/// Coerce an input to a finite, non-negative number (`0` otherwise).
pub fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Parse typed text the way a form field is read: blank or garbage is `0`.
pub fn parse_lenient(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// `deserialize_with` target accepting a number, a numeric string, a bool or
/// `null`. Never fails on the value itself.
pub fn lenient<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(LenientNumber)
}

struct LenientNumber;

impl<'de> Visitor<'de> for LenientNumber {
    type Value = f64;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number, a numeric string or null")
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
        Ok(if v.is_finite() { v } else { 0.0 })
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
        Ok(v as f64)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
        Ok(v as f64)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<f64, E> {
        Ok(if v { 1.0 } else { 0.0 })
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
        Ok(parse_lenient(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<f64, E> {
        Ok(0.0)
    }

    fn visit_none<E: de::Error>(self) -> Result<f64, E> {
        Ok(0.0)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<f64, D::Error> {
        deserializer.deserialize_any(self)
    }
}
