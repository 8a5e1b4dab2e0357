use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};

use invoicedesk_client::{ClientConfig, ClientError, InvoiceClient};
use invoicedesk_core::DomainError;
use invoicedesk_invoicing::{Discount, FieldChange, InvoiceDraft, search};

#[derive(Clone, Default)]
struct FakeInvoiceService {
    /// (Authorization header, body) of every create request received.
    received: Arc<Mutex<Vec<(Option<String>, Value)>>>,
}

fn stored_invoice(id: &str, invoice_no: &str, customer: &str, total: f64) -> Value {
    json!({
        "_id": id,
        "invoiceNo": invoice_no,
        "date": "2025-01-15T10:30:00.000Z",
        "status": "Pending",
        "customerName": customer,
        "customerAddress": "Somewhere",
        "items": [{
            "description": "Widget", "quantity": 1, "rate": total,
            "discountType": "FLAT", "discountValue": 0, "discountAmount": 0, "amount": total
        }],
        "subTotal": total,
        "discountType": "FLAT",
        "discountValue": 0,
        "discountAmount": 0,
        "taxRate": 0,
        "taxAmount": 0,
        "totalAmount": total,
        "companyProfileSnapshot": { "companyName": "Northwind Pvt Ltd", "gstin": "29ABCDE1234F1Z5" }
    })
}

async fn list_invoices() -> Json<Value> {
    Json(json!([
        stored_invoice("inv-1", "INV-0001", "Acme Traders", 236.0),
        stored_invoice("inv-2", "INV-0002", "Globex", 1500050.0),
    ]))
}

async fn get_invoice(Path(id): Path<String>) -> Result<Json<Value>, (StatusCode, String)> {
    match id.as_str() {
        "inv-2" => Ok(Json(stored_invoice("inv-2", "INV-0002", "Globex", 1500050.0))),
        _ => Err((StatusCode::NOT_FOUND, "Invoice not found".to_string())),
    }
}

async fn create_invoice(
    State(service): State<FakeInvoiceService>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, String)> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    service.received.lock().unwrap().push((auth, body.clone()));

    if body["customerName"] == "explode" {
        return Err((StatusCode::INTERNAL_SERVER_ERROR, "database unavailable".to_string()));
    }

    // Slow enough for a second submission to overlap.
    tokio::time::sleep(Duration::from_millis(100)).await;

    let mut created = body;
    created["_id"] = json!("inv-100");
    created["invoiceNo"] = json!("INV-0100");
    Ok((StatusCode::CREATED, Json(created)))
}

struct TestServer {
    base_url: String,
    service: FakeInvoiceService,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        let service = FakeInvoiceService::default();
        let app = Router::new()
            .route("/api/invoices", get(list_invoices).post(create_invoice))
            .route("/api/invoices/:id", get(get_invoice))
            .with_state(service.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}/api", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            service,
            handle,
        }
    }

    fn client(&self) -> InvoiceClient {
        let config = ClientConfig::new(self.base_url.clone())
            .unwrap()
            .with_token("test-token");
        InvoiceClient::new(config).unwrap()
    }

    fn received(&self) -> Vec<(Option<String>, Value)> {
        self.service.received.lock().unwrap().clone()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn widget_draft(customer: &str) -> InvoiceDraft {
    let mut draft = InvoiceDraft::new();
    draft.customer_name = customer.to_string();
    draft.customer_address = "12 MG Road, Bengaluru".to_string();
    draft.set_description(0, "Widget").unwrap();
    draft
        .apply(FieldChange::Quantity { index: 0, value: 2.0 })
        .unwrap();
    draft
        .apply(FieldChange::Rate { index: 0, value: 100.0 })
        .unwrap();
    draft
}

#[tokio::test]
async fn submit_sends_the_client_computed_snapshot() {
    let server = TestServer::spawn().await;
    let client = server.client();

    let created = client.submit(&widget_draft("Acme Traders")).await.unwrap();
    assert_eq!(created["_id"], json!("inv-100"));
    assert_eq!(created["invoiceNo"], json!("INV-0100"));

    let received = server.received();
    assert_eq!(received.len(), 1);
    let (auth, body) = &received[0];
    assert_eq!(auth.as_deref(), Some("Bearer test-token"));
    assert_eq!(body["subTotal"], json!(200.0));
    assert_eq!(body["taxRate"], json!(18.0));
    assert_eq!(body["taxAmount"], json!(36.0));
    assert_eq!(body["totalAmount"], json!(236.0));
    assert_eq!(body["discountType"], json!("FLAT"));
    assert_eq!(body["type"], json!("TAX_INVOICE"));
    assert_eq!(body["items"][0]["amount"], json!(200.0));
    assert!(body.get("dueDate").is_none());
}

#[tokio::test]
async fn overlapping_submissions_are_rejected_but_later_ones_go_through() {
    let server = TestServer::spawn().await;
    let client = server.client();

    let mut draft = widget_draft("Acme Traders");
    draft.apply(FieldChange::DiscountValue(20.0)).unwrap();
    let request = draft.to_request().unwrap();
    assert_eq!(request.discount(), Discount::flat(20.0));

    let (first, second) = tokio::join!(client.create(&request), client.create(&request));
    assert!(first.is_ok());
    assert!(matches!(second, Err(ClientError::SubmissionInFlight)));
    assert!(!client.guard().is_in_flight());

    // No idempotency key: a later identical submission creates another invoice.
    client.create(&request).await.unwrap();
    assert_eq!(server.received().len(), 2);
}

#[tokio::test]
async fn invalid_drafts_never_reach_the_server() {
    let server = TestServer::spawn().await;
    let client = server.client();

    let err = client.submit(&InvoiceDraft::new()).await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::Domain(DomainError::Validation(ref msg)) if msg == "customerName is required"
    ));
    assert!(server.received().is_empty());
}

#[tokio::test]
async fn server_errors_surface_once_and_release_the_guard() {
    let server = TestServer::spawn().await;
    let client = server.client();

    let err = client.submit(&widget_draft("explode")).await.unwrap_err();
    match err {
        ClientError::Api(500, body) => assert_eq!(body, "database unavailable"),
        other => panic!("expected API error, got {other:?}"),
    }
    assert_eq!(server.received().len(), 1);
    assert!(!client.guard().is_in_flight());
}

#[tokio::test]
async fn list_search_and_fetch() {
    let server = TestServer::spawn().await;
    let client = server.client();

    let records = client.list().await.unwrap();
    assert_eq!(records.len(), 2);
    let hits = search(&records, "glob");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].invoice_no, "INV-0002");

    let record = client.get("inv-2").await.unwrap();
    assert_eq!(record.invoice.customer_name, "Globex");
    assert_eq!(
        record
            .company_profile_snapshot
            .as_ref()
            .and_then(|c| c.company_name.as_deref()),
        Some("Northwind Pvt Ltd")
    );
    assert_eq!(
        record.amount_in_words().unwrap(),
        "Fifteen Lakh and Fifty Rupees Only"
    );

    let err = client.get("missing").await.unwrap_err();
    assert!(matches!(err, ClientError::Domain(DomainError::NotFound)));
}

#[tokio::test]
async fn ids_cannot_rewrite_the_request_path() {
    let server = TestServer::spawn().await;
    let client = server.client();

    // Each id reaches the service verbatim as one segment, so none of them
    // resolves to `inv-2`.
    for id in ["inv-2?x=1", "inv-2#top", "../invoices/inv-2"] {
        let err = client.get(id).await.unwrap_err();
        assert!(
            matches!(err, ClientError::Domain(DomainError::NotFound)),
            "{id}: {err:?}"
        );
    }

    let err = client.get("   ").await.unwrap_err();
    assert!(matches!(err, ClientError::Domain(DomainError::Validation(_))));
}

#[tokio::test]
async fn unreachable_service_is_a_network_error() {
    let config = ClientConfig::new("http://127.0.0.1:9")
        .unwrap()
        .with_timeout(Duration::from_secs(2));
    let client = InvoiceClient::new(config).unwrap();

    let err = client.list().await.unwrap_err();
    assert!(matches!(err, ClientError::Network(_)));
}
