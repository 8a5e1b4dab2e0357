use serde::{Deserialize, Serialize};

use invoicedesk_core::ValueObject;

use crate::numeric::non_negative;

/// How a discount value is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountType {
    /// An absolute amount in currency units.
    #[default]
    Flat,
    /// A percentage of the amount it is applied to.
    Percentage,
}

/// A discount configuration: kind + raw value, as entered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discount {
    pub discount_type: DiscountType,
    #[serde(default, deserialize_with = "crate::numeric::lenient")]
    pub discount_value: f64,
}

impl ValueObject for Discount {}

impl Discount {
    pub fn new(discount_type: DiscountType, discount_value: f64) -> Self {
        Self {
            discount_type,
            discount_value,
        }
    }

    pub fn flat(value: f64) -> Self {
        Self::new(DiscountType::Flat, value)
    }

    pub fn percentage(value: f64) -> Self {
        Self::new(DiscountType::Percentage, value)
    }

    pub fn none() -> Self {
        Self::flat(0.0)
    }

    /// Discount amount for `base`, always within `[0, base]`.
    ///
    /// A non-positive or non-finite `base` yields `0`.
    pub fn amount_on(&self, base: f64) -> f64 {
        let base = non_negative(base);
        let value = non_negative(self.discount_value);
        let raw = match self.discount_type {
            DiscountType::Percentage => base * value / 100.0,
            DiscountType::Flat => value,
        };
        raw.min(base)
    }
}
