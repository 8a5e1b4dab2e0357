//! Invoice being composed: mutable inputs plus stored derived values.
//!
//! Every change to a watched input runs exactly one recomputation pass, and a
//! pass only writes the derived fields whose value actually changed. Writing a
//! derived field is never itself a change event, so a pass cannot retrigger
//! itself.

use chrono::NaiveDate;
use serde::Deserialize;

use invoicedesk_core::{DomainError, DomainResult};

use crate::discount::{Discount, DiscountType};
use crate::line_item::{LineAmounts, LineItem};
use crate::numeric::lenient;
use crate::payload::{CreateInvoiceRequest, InvoiceType};
use crate::totals::{DEFAULT_TAX_RATE, InvoiceTotals, recompute};
use crate::validation::validate_draft;

/// A change to one of the inputs the totals depend on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldChange {
    Quantity { index: usize, value: f64 },
    Rate { index: usize, value: f64 },
    ItemDiscountType { index: usize, value: DiscountType },
    ItemDiscountValue { index: usize, value: f64 },
    TaxRate(f64),
    DiscountType(DiscountType),
    DiscountValue(f64),
}

/// A derived field written back by a recomputation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DerivedField {
    ItemDiscountAmount(usize),
    ItemAmount(usize),
    SubTotal,
    DiscountAmount,
    TaxableValue,
    TaxAmount,
    TotalAmount,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceDraft {
    pub customer_name: String,
    pub customer_address: String,
    pub customer_gstin: Option<String>,
    pub place_of_supply: Option<String>,
    pub invoice_type: InvoiceType,
    pub due_date: Option<NaiveDate>,
    items: Vec<LineItem>,
    discount: Discount,
    tax_rate: f64,
    sub_total: f64,
    discount_amount: f64,
    taxable_value: f64,
    tax_amount: f64,
    total_amount: f64,
}

impl Default for InvoiceDraft {
    /// One blank line, 18% GST, no invoice discount.
    fn default() -> Self {
        Self::with_inputs(vec![LineItem::default()], Discount::none(), DEFAULT_TAX_RATE)
    }
}

impl InvoiceDraft {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_inputs(items: Vec<LineItem>, discount: Discount, tax_rate: f64) -> Self {
        let mut draft = Self {
            customer_name: String::new(),
            customer_address: String::new(),
            customer_gstin: None,
            place_of_supply: None,
            invoice_type: InvoiceType::TaxInvoice,
            due_date: None,
            items,
            discount,
            tax_rate,
            sub_total: 0.0,
            discount_amount: 0.0,
            taxable_value: 0.0,
            tax_amount: 0.0,
            total_amount: 0.0,
        };
        draft.refresh();
        draft
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn discount(&self) -> Discount {
        self.discount
    }

    pub fn tax_rate(&self) -> f64 {
        self.tax_rate
    }

    pub fn sub_total(&self) -> f64 {
        self.sub_total
    }

    pub fn discount_amount(&self) -> f64 {
        self.discount_amount
    }

    pub fn taxable_value(&self) -> f64 {
        self.taxable_value
    }

    pub fn tax_amount(&self) -> f64 {
        self.tax_amount
    }

    pub fn total_amount(&self) -> f64 {
        self.total_amount
    }

    /// Stored derived values as a totals snapshot.
    pub fn totals(&self) -> InvoiceTotals {
        InvoiceTotals {
            lines: self
                .items
                .iter()
                .map(|item| LineAmounts {
                    discount_amount: item.discount_amount,
                    amount: item.amount,
                })
                .collect(),
            sub_total: self.sub_total,
            discount: self.discount,
            discount_amount: self.discount_amount,
            taxable_value: self.taxable_value,
            tax_rate: self.tax_rate,
            tax_amount: self.tax_amount,
            total_amount: self.total_amount,
        }
    }

    /// Apply one input change and recompute.
    pub fn apply(&mut self, change: FieldChange) -> DomainResult<Vec<DerivedField>> {
        match change {
            FieldChange::Quantity { index, value } => self.item_mut(index)?.quantity = value,
            FieldChange::Rate { index, value } => self.item_mut(index)?.rate = value,
            FieldChange::ItemDiscountType { index, value } => {
                self.item_mut(index)?.discount_type = value
            }
            FieldChange::ItemDiscountValue { index, value } => {
                self.item_mut(index)?.discount_value = value
            }
            FieldChange::TaxRate(value) => self.tax_rate = value,
            FieldChange::DiscountType(value) => self.discount.discount_type = value,
            FieldChange::DiscountValue(value) => self.discount.discount_value = value,
        }
        Ok(self.refresh())
    }

    /// Append a blank line (quantity 1, rate 0).
    pub fn add_item(&mut self) -> Vec<DerivedField> {
        self.push_item(LineItem::default())
    }

    pub fn push_item(&mut self, item: LineItem) -> Vec<DerivedField> {
        self.items.push(item);
        self.refresh()
    }

    /// Remove a line. The last remaining line cannot be removed.
    pub fn remove_item(&mut self, index: usize) -> DomainResult<Vec<DerivedField>> {
        self.item_mut(index)?;
        if self.items.len() == 1 {
            return Err(DomainError::validation(
                "an invoice needs at least one line item",
            ));
        }
        self.items.remove(index);
        Ok(self.refresh())
    }

    /// Descriptions do not affect totals; no recomputation.
    pub fn set_description(&mut self, index: usize, description: impl Into<String>) -> DomainResult<()> {
        self.item_mut(index)?.description = description.into();
        Ok(())
    }

    pub fn set_hsn_code(&mut self, index: usize, code: Option<String>) -> DomainResult<()> {
        self.item_mut(index)?.hsn_code = code;
        Ok(())
    }

    /// Run one recomputation pass and write back what changed.
    ///
    /// Returns the derived fields that were written; an immediate second call
    /// returns an empty list.
    pub fn refresh(&mut self) -> Vec<DerivedField> {
        let totals = recompute(&self.items, self.tax_rate, self.discount);
        let mut written = Vec::new();

        for (index, (item, line)) in self.items.iter_mut().zip(&totals.lines).enumerate() {
            write_if_changed(
                &mut item.discount_amount,
                line.discount_amount,
                DerivedField::ItemDiscountAmount(index),
                &mut written,
            );
            write_if_changed(&mut item.amount, line.amount, DerivedField::ItemAmount(index), &mut written);
        }

        write_if_changed(&mut self.sub_total, totals.sub_total, DerivedField::SubTotal, &mut written);
        write_if_changed(
            &mut self.discount_amount,
            totals.discount_amount,
            DerivedField::DiscountAmount,
            &mut written,
        );
        write_if_changed(
            &mut self.taxable_value,
            totals.taxable_value,
            DerivedField::TaxableValue,
            &mut written,
        );
        write_if_changed(&mut self.tax_amount, totals.tax_amount, DerivedField::TaxAmount, &mut written);
        write_if_changed(
            &mut self.total_amount,
            totals.total_amount,
            DerivedField::TotalAmount,
            &mut written,
        );

        written
    }

    /// Validate and freeze the draft into a creation payload.
    ///
    /// Totals are recomputed from the inputs rather than read from the stored
    /// fields, so the payload is consistent even if a caller skipped a pass.
    pub fn to_request(&self) -> DomainResult<CreateInvoiceRequest> {
        validate_draft(self)?;

        let items = self
            .items
            .iter()
            .cloned()
            .map(|mut item| {
                item.description = item.description.trim().to_string();
                item.hsn_code = non_blank(item.hsn_code);
                item
            })
            .collect();

        let mut request = CreateInvoiceRequest {
            customer_name: self.customer_name.trim().to_string(),
            customer_address: self.customer_address.trim().to_string(),
            customer_gstin: non_blank(self.customer_gstin.clone()),
            place_of_supply: non_blank(self.place_of_supply.clone()),
            items,
            sub_total: 0.0,
            discount_type: self.discount.discount_type,
            discount_value: self.discount.discount_value,
            discount_amount: 0.0,
            tax_rate: self.tax_rate,
            tax_amount: 0.0,
            total_amount: 0.0,
            due_date: self.due_date,
            invoice_type: Some(self.invoice_type),
        };
        request.stamp(&recompute(&self.items, self.tax_rate, self.discount));
        Ok(request)
    }

    fn item_mut(&mut self, index: usize) -> DomainResult<&mut LineItem> {
        self.items
            .get_mut(index)
            .ok_or_else(|| DomainError::validation(format!("no line item at position {}", index + 1)))
    }
}

fn write_if_changed(slot: &mut f64, value: f64, field: DerivedField, written: &mut Vec<DerivedField>) {
    if *slot != value {
        *slot = value;
        written.push(field);
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Draft as read from a JSON file; derived fields in the file are ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DraftInput {
    #[serde(default)]
    customer_name: String,
    #[serde(default)]
    customer_address: String,
    #[serde(default)]
    customer_gstin: Option<String>,
    #[serde(default)]
    place_of_supply: Option<String>,
    #[serde(rename = "type", default)]
    invoice_type: InvoiceType,
    #[serde(default, deserialize_with = "crate::payload::iso_date::deserialize")]
    due_date: Option<NaiveDate>,
    #[serde(default = "default_items")]
    items: Vec<LineItem>,
    #[serde(default)]
    discount_type: DiscountType,
    #[serde(default, deserialize_with = "lenient")]
    discount_value: f64,
    #[serde(default = "default_tax_rate", deserialize_with = "lenient")]
    tax_rate: f64,
}

fn default_items() -> Vec<LineItem> {
    vec![LineItem::default()]
}

fn default_tax_rate() -> f64 {
    DEFAULT_TAX_RATE
}

impl From<DraftInput> for InvoiceDraft {
    fn from(input: DraftInput) -> Self {
        let mut draft = Self::with_inputs(
            input.items,
            Discount::new(input.discount_type, input.discount_value),
            input.tax_rate,
        );
        draft.customer_name = input.customer_name;
        draft.customer_address = input.customer_address;
        draft.customer_gstin = input.customer_gstin;
        draft.place_of_supply = input.place_of_supply;
        draft.invoice_type = input.invoice_type;
        draft.due_date = input.due_date;
        draft
    }
}

impl<'de> Deserialize<'de> for InvoiceDraft {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        DraftInput::deserialize(deserializer).map(InvoiceDraft::from)
    }
}
