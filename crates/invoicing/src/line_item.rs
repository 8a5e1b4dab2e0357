use serde::{Deserialize, Serialize};

use crate::discount::{Discount, DiscountType};
use crate::numeric::{lenient, non_negative};

/// One billable row on an invoice.
///
/// `discount_amount` and `amount` are derived; they are overwritten by every
/// recomputation and whatever a caller stores there is ignored as input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hsn_code: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub quantity: f64,
    #[serde(default, deserialize_with = "lenient")]
    pub rate: f64,
    #[serde(default)]
    pub discount_type: DiscountType,
    #[serde(default, deserialize_with = "lenient")]
    pub discount_value: f64,
    #[serde(default, deserialize_with = "lenient")]
    pub discount_amount: f64,
    #[serde(default, deserialize_with = "lenient")]
    pub amount: f64,
}

impl Default for LineItem {
    /// A fresh row: one unit at zero rate, no discount.
    fn default() -> Self {
        Self {
            description: String::new(),
            hsn_code: None,
            quantity: 1.0,
            rate: 0.0,
            discount_type: DiscountType::Flat,
            discount_value: 0.0,
            discount_amount: 0.0,
            amount: 0.0,
        }
    }
}

/// Derived amounts of a single line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineAmounts {
    pub discount_amount: f64,
    pub amount: f64,
}

impl LineItem {
    pub fn new(description: impl Into<String>, quantity: f64, rate: f64) -> Self {
        Self {
            description: description.into(),
            quantity,
            rate,
            ..Self::default()
        }
    }

    pub fn with_discount(mut self, discount: Discount) -> Self {
        self.discount_type = discount.discount_type;
        self.discount_value = discount.discount_value;
        self
    }

    pub fn with_hsn_code(mut self, code: impl Into<String>) -> Self {
        self.hsn_code = Some(code.into());
        self
    }

    pub fn discount(&self) -> Discount {
        Discount::new(self.discount_type, self.discount_value)
    }

    /// Gross amount before discount; unusable quantity or rate counts as `0`,
    /// and so does a product too large to represent.
    pub fn base_amount(&self) -> f64 {
        non_negative(non_negative(self.quantity) * non_negative(self.rate))
    }

    /// Net line amounts from the current inputs.
    pub fn compute(&self) -> LineAmounts {
        let base = self.base_amount();
        let discount_amount = self.discount().amount_on(base);
        LineAmounts {
            discount_amount,
            amount: base - discount_amount,
        }
    }
}
