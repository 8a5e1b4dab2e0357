//! Invoices as the server returns them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use invoicedesk_core::DomainResult;

use crate::payload::CreateInvoiceRequest;
use crate::words::amount_in_words;

/// Company profile frozen onto an invoice when it was created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanyProfileSnapshot {
    pub company_name: Option<String>,
    pub address: Option<String>,
    pub gstin: Option<String>,
    /// Corporate identification number (CIN).
    pub company_id: Option<String>,
    pub logo_url: Option<String>,
    pub bank_name: Option<String>,
    pub account_holder_name: Option<String>,
    pub account_number: Option<String>,
    pub ifsc_code: Option<String>,
    pub swift_code: Option<String>,
    pub branch: Option<String>,
    pub signatory_name: Option<String>,
    pub signature_url: Option<String>,
    pub terms_url: Option<String>,
}

/// A stored invoice: server identity + the payload it was created from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub invoice_no: String,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(flatten)]
    pub invoice: CreateInvoiceRequest,
    #[serde(default)]
    pub company_profile_snapshot: Option<CompanyProfileSnapshot>,
}

impl InvoiceRecord {
    pub fn amount_in_words(&self) -> DomainResult<String> {
        amount_in_words(self.invoice.total_amount)
    }

    /// Case-insensitive match on customer name or invoice number.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        term.is_empty()
            || self.invoice.customer_name.to_lowercase().contains(&term)
            || self.invoice_no.to_lowercase().contains(&term)
    }
}

/// Filter an invoice list, preserving order. A blank term keeps everything.
pub fn search<'a>(records: &'a [InvoiceRecord], term: &str) -> Vec<&'a InvoiceRecord> {
    records.iter().filter(|r| r.matches(term)).collect()
}
