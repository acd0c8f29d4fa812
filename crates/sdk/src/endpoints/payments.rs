use greentick_types::{Payment, PaymentInput, PaymentStats, RecordId};
use serde_json::Value as JsonValue;
use url::Url;

use super::{PAYMENT_STATS_PATH, PAYMENTS_PATH, with_query};
use crate::{
    client::{ApiClient, ApiResponse},
    error::Result,
};

/// Server-side filters for `GET /payments/`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentQuery {
    pub limit: Option<u32>,
}

impl PaymentQuery {
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn path(&self) -> String {
        with_query(PAYMENTS_PATH, &[("limit", self.limit.map(|l| l.to_string()))])
    }
}

fn payment_path(id: RecordId) -> String {
    format!("/payments/{}", id)
}

impl ApiClient {
    pub async fn list_payments(&self, query: &PaymentQuery) -> Result<Vec<Payment>> {
        self.get(&query.path()).await
    }

    pub async fn get_payment(&self, id: RecordId) -> Result<Payment> {
        self.get(&payment_path(id)).await
    }

    pub async fn create_payment(&self, input: &PaymentInput) -> Result<ApiResponse<Payment>> {
        self.post(PAYMENTS_PATH, input).await
    }

    pub async fn delete_payment(&self, id: RecordId) -> Result<ApiResponse<JsonValue>> {
        self.delete(&payment_path(id)).await
    }

    pub async fn payment_stats(&self) -> Result<PaymentStats> {
        self.get(PAYMENT_STATS_PATH).await
    }

    /// Have the backend send the payment link to the customer again
    pub async fn send_payment_link(&self, id: RecordId) -> Result<ApiResponse<JsonValue>> {
        self.post_action(&format!("/payments/{}/send-link", id)).await
    }

    /// Invoice document URL. The document is opened directly, never parsed.
    pub fn invoice_url(&self, id: RecordId) -> Result<Url> {
        self.url(&format!("/payments/{}/invoice", id))
    }
}
