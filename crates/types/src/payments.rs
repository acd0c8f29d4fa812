use serde::{Deserialize, Serialize};

use crate::{ExtraFields, RecordId};

/// Payment request issued to a customer
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Payment {
    pub id: RecordId,
    pub customer_id: RecordId,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_link: Option<String>,
}

impl Payment {
    pub fn is_pending(&self) -> bool {
        self.status == crate::status::PENDING
    }
}

/// Body of `POST /payments/`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PaymentInput {
    pub customer_id: RecordId,
    pub amount: f64,
    pub description: String,
    pub send_payment_link: bool,
}

impl PaymentInput {
    /// Payment links are sent by default, as the forms do.
    pub fn new(customer_id: RecordId, amount: f64, description: impl Into<String>) -> Self {
        Self {
            customer_id,
            amount,
            description: description.into(),
            send_payment_link: true,
        }
    }

    pub fn with_send_payment_link(mut self, send: bool) -> Self {
        self.send_payment_link = send;
        self
    }
}

/// Aggregates from `/payments/stats/summary`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PaymentStats {
    #[serde(default)]
    pub total_amount: f64,
    #[serde(default)]
    pub completion_rate: f64,
    #[serde(flatten)]
    pub extra: ExtraFields,
}
