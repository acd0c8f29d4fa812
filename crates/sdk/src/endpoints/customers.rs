use greentick_types::{Customer, CustomerInput, RecordId};
use serde_json::Value as JsonValue;

use super::CUSTOMERS_PATH;
use crate::{
    client::{ApiClient, ApiResponse},
    error::Result,
};

fn customer_path(id: RecordId) -> String {
    format!("/customers/{}", id)
}

impl ApiClient {
    pub async fn list_customers(&self) -> Result<Vec<Customer>> {
        self.get(CUSTOMERS_PATH).await
    }

    pub async fn get_customer(&self, id: RecordId) -> Result<Customer> {
        self.get(&customer_path(id)).await
    }

    pub async fn create_customer(&self, input: &CustomerInput) -> Result<ApiResponse<Customer>> {
        self.post(CUSTOMERS_PATH, input).await
    }

    pub async fn update_customer(
        &self,
        id: RecordId,
        input: &CustomerInput,
    ) -> Result<ApiResponse<Customer>> {
        self.put(&customer_path(id), input).await
    }

    pub async fn delete_customer(&self, id: RecordId) -> Result<ApiResponse<JsonValue>> {
        self.delete(&customer_path(id)).await
    }
}
