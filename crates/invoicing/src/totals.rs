//! Invoice computation engine.
//!
//! Pure, total and deterministic: the same inputs always produce the same
//! totals and no input (including NaN or garbage coerced to `0`) makes it fail.

use serde::{Deserialize, Serialize};

use invoicedesk_core::ValueObject;

use crate::discount::Discount;
use crate::line_item::{LineAmounts, LineItem};
use crate::numeric::non_negative;

/// GST rate a new invoice starts with.
pub const DEFAULT_TAX_RATE: f64 = 18.0;

/// Everything derived from an invoice's inputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceTotals {
    /// Per-line derived amounts, in item order.
    pub lines: Vec<LineAmounts>,
    /// Sum of net line amounts (after per-item discounts).
    pub sub_total: f64,
    /// Invoice-level discount configuration.
    #[serde(flatten)]
    pub discount: Discount,
    /// Invoice-level discount amount, within `[0, sub_total]`.
    pub discount_amount: f64,
    pub taxable_value: f64,
    pub tax_rate: f64,
    pub tax_amount: f64,
    pub total_amount: f64,
}

impl ValueObject for InvoiceTotals {}

/// Derive line amounts and invoice totals.
///
/// Item order only matters for the order of [`InvoiceTotals::lines`]. A
/// negative or non-finite `tax_rate` is treated as `0`. Any intermediate sum
/// or product that overflows to infinity is treated as `0` as well, so every
/// field of the result is finite.
pub fn recompute(items: &[LineItem], tax_rate: f64, discount: Discount) -> InvoiceTotals {
    let lines: Vec<LineAmounts> = items.iter().map(LineItem::compute).collect();
    let sub_total = non_negative(lines.iter().map(|l| l.amount).sum());

    let discount_amount = discount.amount_on(sub_total);
    let taxable_value = sub_total - discount_amount;
    let tax_rate = non_negative(tax_rate);
    let tax_amount = non_negative(taxable_value * tax_rate / 100.0);
    let total_amount = non_negative(taxable_value + tax_amount);

    InvoiceTotals {
        lines,
        sub_total,
        discount,
        discount_amount,
        taxable_value,
        tax_rate,
        tax_amount,
        total_amount,
    }
}
