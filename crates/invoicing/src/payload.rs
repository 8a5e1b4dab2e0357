//! Wire payload for `POST /invoices`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::discount::{Discount, DiscountType};
use crate::line_item::LineItem;
use crate::numeric::lenient;
use crate::totals::InvoiceTotals;

/// Invoice document kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceType {
    #[default]
    TaxInvoice,
    Proforma,
}

impl InvoiceType {
    pub fn title(&self) -> &'static str {
        match self {
            InvoiceType::TaxInvoice => "TAX INVOICE",
            InvoiceType::Proforma => "PROFORMA INVOICE",
        }
    }
}

/// Flat snapshot sent to the invoice-creation endpoint.
///
/// Built by [`crate::InvoiceDraft::to_request`]; totals are the client's own
/// and are never reconciled with what the server stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceRequest {
    pub customer_name: String,
    pub customer_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_gstin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_of_supply: Option<String>,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default, deserialize_with = "lenient")]
    pub sub_total: f64,
    #[serde(default)]
    pub discount_type: DiscountType,
    #[serde(default, deserialize_with = "lenient")]
    pub discount_value: f64,
    #[serde(default, deserialize_with = "lenient")]
    pub discount_amount: f64,
    #[serde(default, deserialize_with = "lenient")]
    pub tax_rate: f64,
    #[serde(default, deserialize_with = "lenient")]
    pub tax_amount: f64,
    #[serde(default, deserialize_with = "lenient")]
    pub total_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "iso_date")]
    pub due_date: Option<NaiveDate>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub invoice_type: Option<InvoiceType>,
}

impl CreateInvoiceRequest {
    pub fn discount(&self) -> Discount {
        Discount::new(self.discount_type, self.discount_value)
    }

    /// Copy derived values from `totals` into the payload, items included.
    pub(crate) fn stamp(&mut self, totals: &InvoiceTotals) {
        for (item, line) in self.items.iter_mut().zip(&totals.lines) {
            item.discount_amount = line.discount_amount;
            item.amount = line.amount;
        }
        self.sub_total = totals.sub_total;
        self.discount_type = totals.discount.discount_type;
        self.discount_value = totals.discount.discount_value;
        self.discount_amount = totals.discount_amount;
        self.tax_rate = totals.tax_rate;
        self.tax_amount = totals.tax_amount;
        self.total_amount = totals.total_amount;
    }
}

/// ISO-8601 calendar dates on the wire.
///
/// Reads either a plain date (`2025-01-31`, what a date input produces) or a
/// full RFC 3339 timestamp (what the server echoes back).
pub(crate) mod iso_date {
    use chrono::{DateTime, NaiveDate};
    use serde::{Deserialize, Deserializer, Serializer, de};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(d) => serializer.serialize_str(&d.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        let Some(raw) = raw else {
            return Ok(None);
        };
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        if let Ok(date) = NaiveDate::parse_from_str(raw, FORMAT) {
            return Ok(Some(date));
        }
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| Some(dt.date_naive()))
            .map_err(|e| de::Error::custom(format!("invalid date {raw:?}: {e}")))
    }
}
