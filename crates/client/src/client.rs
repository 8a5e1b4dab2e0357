//! HTTP client for the invoice service.

use reqwest::{RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use invoicedesk_core::DomainError;
use invoicedesk_invoicing::{CreateInvoiceRequest, InvoiceDraft, InvoiceRecord};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::guard::SubmissionGuard;

/// Client for `/invoices`.
///
/// Cloning is cheap; clones share the connection pool and the submission
/// guard.
#[derive(Debug, Clone)]
pub struct InvoiceClient {
    http: reqwest::Client,
    config: ClientConfig,
    guard: SubmissionGuard,
}

impl InvoiceClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;
        Ok(Self {
            http,
            config,
            guard: SubmissionGuard::new(),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn guard(&self) -> &SubmissionGuard {
        &self.guard
    }

    /// `GET /invoices`.
    pub async fn list(&self) -> Result<Vec<InvoiceRecord>, ClientError> {
        let req = self.authorize(self.http.get(self.url("/invoices")));
        let resp = req.send().await?;
        let records: Vec<InvoiceRecord> = read_json(resp).await?;
        tracing::info!("Fetched {} invoices", records.len());
        Ok(records)
    }

    /// `GET /invoices/{id}`.
    ///
    /// The id is sent as a single percent-encoded path segment. A 404 maps to
    /// [`DomainError::NotFound`].
    pub async fn get(&self, id: &str) -> Result<InvoiceRecord, ClientError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(DomainError::validation("invoice id is required").into());
        }

        let req = self.authorize(self.http.get(self.invoice_url(id)?));
        let resp = req.send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            tracing::info!("Invoice {} not found", id);
            return Err(DomainError::not_found().into());
        }
        read_json(resp).await
    }

    /// `POST /invoices` with a finished payload.
    ///
    /// Fails fast with [`ClientError::SubmissionInFlight`] while another
    /// create through this client is still running. Never retries. The
    /// response body is returned as-is.
    pub async fn create(&self, request: &CreateInvoiceRequest) -> Result<Value, ClientError> {
        let _ticket = self.guard.try_begin()?;

        tracing::info!(
            "Submitting invoice for {} ({} items, total {})",
            request.customer_name,
            request.items.len(),
            request.total_amount
        );

        let req = self.authorize(self.http.post(self.url("/invoices")).json(request));
        let result = match req.send().await {
            Ok(resp) => read_json(resp).await,
            Err(e) => Err(e.into()),
        };

        match &result {
            Ok(_) => tracing::info!("Invoice created"),
            Err(e) => tracing::warn!("Invoice submission failed: {}", e),
        }
        result
    }

    /// Validate a draft, snapshot its totals and create the invoice.
    pub async fn submit(&self, draft: &InvoiceDraft) -> Result<Value, ClientError> {
        let request = draft.to_request()?;
        self.create(&request).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_url, path)
    }

    fn invoice_url(&self, id: &str) -> Result<Url, ClientError> {
        let mut url =
            Url::parse(&self.url("/invoices")).map_err(|e| ClientError::Network(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::Network("API URL cannot take a path".to_string()))?
            .push(id);
        Ok(url)
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.config.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }
}

async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    let status = resp.status();
    if !status.is_success() {
        return Err(ClientError::Api(
            status.as_u16(),
            resp.text().await.unwrap_or_default(),
        ));
    }

    let body = resp.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| ClientError::Parse(e.to_string()))
}
