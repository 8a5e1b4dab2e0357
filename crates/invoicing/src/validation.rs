//! Pre-submission checks.
//!
//! Separate from the computation engine, which accepts anything. These run
//! once, when a draft is turned into a creation payload.

use invoicedesk_core::{DomainError, DomainResult};

use crate::draft::InvoiceDraft;
use crate::line_item::LineItem;

pub fn validate_draft(draft: &InvoiceDraft) -> DomainResult<()> {
    require_text("customerName", &draft.customer_name)?;
    require_text("customerAddress", &draft.customer_address)?;

    if draft.items().is_empty() {
        return Err(DomainError::validation(
            "an invoice needs at least one line item",
        ));
    }
    for (index, item) in draft.items().iter().enumerate() {
        validate_item(index + 1, item)?;
    }

    if !is_non_negative(draft.tax_rate()) {
        return Err(DomainError::validation("taxRate must be zero or more"));
    }
    if !is_non_negative(draft.discount().discount_value) {
        return Err(DomainError::validation("discountValue must be zero or more"));
    }

    Ok(())
}

fn validate_item(line_no: usize, item: &LineItem) -> DomainResult<()> {
    if item.description.trim().is_empty() {
        return Err(DomainError::validation(format!(
            "line {line_no}: description is required"
        )));
    }
    if !(item.quantity.is_finite() && item.quantity > 0.0) {
        return Err(DomainError::validation(format!(
            "line {line_no}: quantity must be positive"
        )));
    }
    if !is_non_negative(item.rate) {
        return Err(DomainError::validation(format!(
            "line {line_no}: rate must be zero or more"
        )));
    }
    if !is_non_negative(item.discount_value) {
        return Err(DomainError::validation(format!(
            "line {line_no}: discountValue must be zero or more"
        )));
    }
    Ok(())
}

fn is_non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

fn require_text(field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} is required")));
    }
    Ok(())
}
