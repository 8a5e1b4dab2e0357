//! Invoicing domain module.
//!
//! Invoice computation (line discounts, invoice discount, tax, totals), amounts
//! in words and Indian-style formatting, the editable draft with its reactive
//! recomputation, and the wire types exchanged with the invoice service.
//! Deterministic domain logic only (no IO, no HTTP).

pub mod discount;
pub mod draft;
pub mod format;
pub mod line_item;
pub mod numeric;
pub mod payload;
pub mod record;
pub mod totals;
pub mod validation;
pub mod words;

pub use discount::{Discount, DiscountType};
pub use draft::{DerivedField, FieldChange, InvoiceDraft};
pub use format::{format_inr, format_rupees};
pub use line_item::{LineAmounts, LineItem};
pub use payload::{CreateInvoiceRequest, InvoiceType};
pub use record::{CompanyProfileSnapshot, InvoiceRecord, search};
pub use totals::{DEFAULT_TAX_RATE, InvoiceTotals, recompute};
pub use validation::validate_draft;
pub use words::{MAX_WORDS_AMOUNT, amount_in_words, number_to_words};
