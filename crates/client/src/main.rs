//! `invoicedesk` command-line entry point.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;

use invoicedesk_client::{ClientConfig, InvoiceClient};
use invoicedesk_core::DomainResult;
use invoicedesk_invoicing::{
    InvoiceDraft, InvoiceRecord, InvoiceTotals, LineItem, amount_in_words, format_inr,
    format_rupees, search,
};
use invoicedesk_observability::LogFormat;
use invoicedesk_observability::tracing::LOG_FORMAT_ENV;

#[derive(Parser)]
#[command(name = "invoicedesk")]
#[command(about = "Compose, check and submit invoices")]
struct Cli {
    /// Log output format (`json` or `pretty`).
    #[arg(long, global = true, env = LOG_FORMAT_ENV, default_value = "json")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recompute a draft and print its totals.
    Totals {
        #[arg(long)]
        draft: PathBuf,
        /// Print the totals as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Spell out an amount in rupees.
    Words { amount: f64 },
    /// Validate a draft and create the invoice.
    Submit {
        #[arg(long)]
        draft: PathBuf,
    },
    /// List invoices, optionally filtered by customer or invoice number.
    List {
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one invoice.
    Show { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    invoicedesk_observability::init_with(cli.log_format);

    let mut out = io::stdout().lock();
    match cli.command {
        Commands::Totals { draft, json } => {
            let draft = load_draft(&draft)?;
            let totals = draft.totals();
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&totals)?)?;
            } else {
                write_items(&mut out, draft.items(), &totals)?;
                write_totals(&mut out, &totals)?;
            }
        }
        Commands::Words { amount } => {
            writeln!(out, "{}", amount_in_words(amount)?)?;
        }
        Commands::Submit { draft } => {
            let draft = load_draft(&draft)?;
            let client = client_from_env()?;
            let created = client
                .submit(&draft)
                .await
                .context("failed to create invoice")?;
            write_created(&mut out, &created)?;
        }
        Commands::List { search: term } => {
            let client = client_from_env()?;
            let records = client.list().await.context("failed to fetch invoices")?;
            let matches = search(&records, term.as_deref().unwrap_or(""));
            write_list(&mut out, &matches)?;
        }
        Commands::Show { id } => {
            let client = client_from_env()?;
            let record = client
                .get(&id)
                .await
                .with_context(|| format!("failed to fetch invoice {id}"))?;
            write_record(&mut out, &record)?;
        }
    }

    Ok(())
}

fn client_from_env() -> Result<InvoiceClient> {
    let config = ClientConfig::from_env()?;
    Ok(InvoiceClient::new(config)?)
}

fn load_draft(path: &Path) -> Result<InvoiceDraft> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read draft {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid draft {}", path.display()))
}

fn write_created(out: &mut impl Write, created: &Value) -> io::Result<()> {
    let id = created.get("_id").and_then(Value::as_str).unwrap_or("-");
    let number = created
        .get("invoiceNo")
        .and_then(Value::as_str)
        .unwrap_or("-");
    writeln!(out, "Invoice created successfully: {number} (id {id})")
}

fn write_list(out: &mut impl Write, records: &[&InvoiceRecord]) -> io::Result<()> {
    if records.is_empty() {
        return writeln!(out, "No invoices found.");
    }
    for record in records {
        writeln!(
            out,
            "{:<14} {:<12} {:<30} {:>16} {}",
            record.invoice_no,
            record
                .date
                .map(|d| d.format("%d %b %Y").to_string())
                .unwrap_or_default(),
            record.invoice.customer_name,
            format!("₹{}", format_inr(record.invoice.total_amount, 0)),
            record.status.as_deref().unwrap_or("")
        )?;
    }
    Ok(())
}

fn write_items(out: &mut impl Write, items: &[LineItem], totals: &InvoiceTotals) -> io::Result<()> {
    for (i, (item, line)) in items.iter().zip(&totals.lines).enumerate() {
        writeln!(
            out,
            "{:>3}. {:<30} {:>8} x {:>12}  -{:>12}  {:>14}",
            i + 1,
            item.description,
            item.quantity,
            format_inr(item.rate, 0),
            format_inr(line.discount_amount, 2),
            format_inr(line.amount, 2)
        )?;
    }
    Ok(())
}

fn write_totals(out: &mut impl Write, totals: &InvoiceTotals) -> io::Result<()> {
    writeln!(out, "{:<20} {:>18}", "Sub Total", format_rupees(totals.sub_total))?;
    if totals.discount_amount > 0.0 {
        writeln!(out, "{:<20} {:>18}", "Discount", format_rupees(totals.discount_amount))?;
        writeln!(out, "{:<20} {:>18}", "Taxable Value", format_rupees(totals.taxable_value))?;
    }
    writeln!(
        out,
        "{:<20} {:>18}",
        format!("Tax ({}%)", totals.tax_rate),
        format_rupees(totals.tax_amount)
    )?;
    writeln!(out, "{:<20} {:>18}", "Total", format_rupees(totals.total_amount))?;
    write_words(out, amount_in_words(totals.total_amount))
}

fn write_record(out: &mut impl Write, record: &InvoiceRecord) -> io::Result<()> {
    let invoice = &record.invoice;
    let title = invoice.invoice_type.unwrap_or_default().title();

    writeln!(out, "{title}  {}", record.invoice_no)?;
    if let Some(date) = record.date {
        writeln!(out, "Date:      {}", date.format("%d %b %Y"))?;
    }
    if let Some(due) = invoice.due_date {
        writeln!(out, "Due date:  {}", due.format("%d %b %Y"))?;
    }
    if let Some(company) = &record.company_profile_snapshot {
        writeln!(out, "From:      {}", company.company_name.as_deref().unwrap_or("-"))?;
        if let Some(gstin) = &company.gstin {
            writeln!(out, "GSTIN:     {gstin}")?;
        }
    }
    writeln!(out, "Bill to:   {}", invoice.customer_name)?;
    writeln!(out, "           {}", invoice.customer_address)?;
    if let Some(gstin) = &invoice.customer_gstin {
        writeln!(out, "GSTIN:     {gstin}")?;
    }
    writeln!(
        out,
        "Place of supply: {}",
        invoice.place_of_supply.as_deref().unwrap_or("-")
    )?;
    writeln!(out)?;

    // Stored figures are printed as the server has them; nothing is recomputed.
    for (i, item) in invoice.items.iter().enumerate() {
        writeln!(
            out,
            "{:>3}. {:<30} {:<10} {:>8} x {:>12}  {:>14}",
            i + 1,
            item.description,
            item.hsn_code.as_deref().unwrap_or(""),
            item.quantity,
            format_inr(item.rate, 0),
            format_inr(item.amount, 0)
        )?;
    }
    writeln!(out)?;
    writeln!(out, "{:<20} {:>18}", "Sub Total", format_rupees(invoice.sub_total))?;
    writeln!(out, "{:<20} {:>18}", "Tax Amount", format_rupees(invoice.tax_amount))?;
    writeln!(out, "{:<20} {:>18}", "Total", format_rupees(invoice.total_amount))?;
    write_words(out, record.amount_in_words())
}

/// A total that cannot be spelled out is logged, not fatal.
fn write_words(out: &mut impl Write, words: DomainResult<String>) -> io::Result<()> {
    match words {
        Ok(words) => writeln!(out, "{words}"),
        Err(e) => {
            tracing::warn!("Total cannot be spelled out: {}", e);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use invoicedesk_invoicing::FieldChange;
    use serde_json::json;

    fn rendered(write: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        write(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn stored(total: f64) -> InvoiceRecord {
        serde_json::from_value(json!({
            "_id": "inv-7",
            "invoiceNo": "INV-0007",
            "date": "2025-01-15T10:30:00.000Z",
            "status": "Pending",
            "customerName": "Globex",
            "customerAddress": "Pune",
            "placeOfSupply": "Maharashtra",
            "type": "PROFORMA",
            "dueDate": "2025-02-14",
            "items": [{"description": "Widget", "hsnCode": "8471", "quantity": 1, "rate": total,
                       "discountType": "FLAT", "discountValue": 0, "discountAmount": 0, "amount": total}],
            "subTotal": total,
            "discountType": "FLAT",
            "discountValue": 0,
            "discountAmount": 0,
            "taxRate": 0,
            "taxAmount": 0,
            "totalAmount": total,
            "companyProfileSnapshot": {"companyName": "Northwind Pvt Ltd", "gstin": "29ABCDE1234F1Z5"}
        }))
        .unwrap()
    }

    fn temp_draft(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "invoicedesk-{}-{name}.json",
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn cli_parses_subcommands_and_log_format() {
        let cli = Cli::try_parse_from([
            "invoicedesk",
            "--log-format",
            "pretty",
            "totals",
            "--draft",
            "d.json",
            "--json",
        ])
        .unwrap();
        assert_eq!(cli.log_format, LogFormat::Pretty);
        assert!(matches!(cli.command, Commands::Totals { json: true, .. }));

        let cli = Cli::try_parse_from(["invoicedesk", "words", "236"]).unwrap();
        assert!(matches!(cli.command, Commands::Words { amount } if amount == 236.0));

        assert!(Cli::try_parse_from(["invoicedesk", "--log-format", "xml", "words", "1"]).is_err());
    }

    #[test]
    fn totals_table_includes_discount_rows_and_words() {
        let mut draft = InvoiceDraft::new();
        draft.set_description(0, "Widget").unwrap();
        draft
            .apply(FieldChange::Quantity { index: 0, value: 2.0 })
            .unwrap();
        draft
            .apply(FieldChange::Rate { index: 0, value: 100.0 })
            .unwrap();
        let totals = draft.totals();

        let text = rendered(|out| write_totals(out, &totals));
        assert!(text.contains("Sub Total"));
        assert!(text.contains("₹200.00"));
        assert!(text.contains("Tax (18%)"));
        assert!(text.contains("₹236.00"));
        assert!(!text.contains("Discount"));
        assert!(text.ends_with("Two Hundred and Thirty Six Rupees Only\n"));

        draft.apply(FieldChange::DiscountValue(100.0)).unwrap();
        let text = rendered(|out| write_totals(out, &draft.totals()));
        assert!(text.contains("Discount"));
        assert!(text.contains("Taxable Value"));
        assert!(text.contains("₹118.00"));
    }

    #[test]
    fn items_are_numbered_in_order() {
        let mut draft = InvoiceDraft::new();
        draft.set_description(0, "Widget").unwrap();
        draft.add_item();
        draft.set_description(1, "Cable").unwrap();

        let text = rendered(|out| write_items(out, draft.items(), &draft.totals()));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("  1. Widget"));
        assert!(lines[1].starts_with("  2. Cable"));
    }

    #[test]
    fn record_shows_header_parties_and_words() {
        let text = rendered(|out| write_record(out, &stored(1500050.0)));
        assert!(text.starts_with("PROFORMA INVOICE  INV-0007\n"));
        assert!(text.contains("Date:      15 Jan 2025"));
        assert!(text.contains("Due date:  14 Feb 2025"));
        assert!(text.contains("From:      Northwind Pvt Ltd"));
        assert!(text.contains("Bill to:   Globex"));
        assert!(text.contains("Place of supply: Maharashtra"));
        assert!(text.contains("8471"));
        assert!(text.contains("₹15,00,050.00"));
        assert!(text.ends_with("Fifteen Lakh and Fifty Rupees Only\n"));
    }

    #[test]
    fn record_with_unspellable_total_still_prints_in_full() {
        let text = rendered(|out| write_record(out, &stored(2_000_000_000.0)));
        assert!(text.contains("Total"));
        assert!(text.contains("₹2,00,00,00,000.00"));
        assert!(!text.contains("Rupees Only"));
    }

    #[test]
    fn list_rows_and_empty_result() {
        let record = stored(236.0);
        let text = rendered(|out| write_list(out, &[&record]));
        assert!(text.contains("INV-0007"));
        assert!(text.contains("15 Jan 2025"));
        assert!(text.contains("₹236"));
        assert!(text.contains("Pending"));

        let text = rendered(|out| write_list(out, &[]));
        assert_eq!(text, "No invoices found.\n");
    }

    #[test]
    fn created_summary_tolerates_missing_fields() {
        let text = rendered(|out| write_created(out, &json!({"_id": "inv-1", "invoiceNo": "INV-0001"})));
        assert_eq!(text, "Invoice created successfully: INV-0001 (id inv-1)\n");

        let text = rendered(|out| write_created(out, &json!({})));
        assert_eq!(text, "Invoice created successfully: - (id -)\n");
    }

    #[test]
    fn load_draft_recomputes_and_reports_bad_files() {
        let path = temp_draft(
            "ok",
            r#"{"customerName": "Acme", "items": [{"description": "Widget", "quantity": 2, "rate": "100"}]}"#,
        );
        let draft = load_draft(&path).unwrap();
        assert_eq!(draft.total_amount(), 236.0);
        std::fs::remove_file(&path).unwrap();

        let path = temp_draft("broken", "{ not json");
        let err = load_draft(&path).unwrap_err();
        assert!(err.to_string().starts_with("invalid draft "));
        std::fs::remove_file(&path).unwrap();

        let missing = std::env::temp_dir().join("invoicedesk-no-such-draft.json");
        let err = load_draft(&missing).unwrap_err();
        assert!(err.to_string().starts_with("failed to read draft "));
    }
}
