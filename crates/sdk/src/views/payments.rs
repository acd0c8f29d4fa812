use greentick_types::{Customer, Payment, PaymentInput, RecordId};
use url::Url;

use super::{Confirmation, FetchTicket, ListState, Notices, Phase, Searchable, contains_ignore_case};
use crate::{
    client::{ApiClient, ApiResponse},
    endpoints::PaymentQuery,
    error::{ApiError, Result},
};

const FETCH_FAILED: &str = "Failed to fetch payments";

impl Searchable for Payment {
    fn matches(&self, needle: &str, _raw: &str) -> bool {
        contains_ignore_case(&self.description, needle)
    }
}

/// Check a payment form before it is sent.
pub fn validate(input: &PaymentInput) -> Result<()> {
    if input.customer_id <= 0 || input.amount.is_nan() || input.amount <= 0.0 {
        return Err(ApiError::Validation(
            "Please select a customer and enter an amount.".to_string(),
        ));
    }
    Ok(())
}

/// Payment list screen and its request form
#[derive(Debug)]
pub struct PaymentsController {
    api: ApiClient,
    list: ListState<Payment>,
    customers: Vec<Customer>,
    notices: Notices,
}

impl PaymentsController {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            list: ListState::default(),
            customers: Vec::new(),
            notices: Notices::default(),
        }
    }

    pub async fn on_visible(&mut self) {
        let ticket = self.list.begin(Phase::Loading);
        self.fetch(ticket).await;
    }

    pub async fn refresh(&mut self) {
        let ticket = self.list.begin(Phase::Refreshing);
        self.fetch(ticket).await;
    }

    async fn fetch(&mut self, ticket: FetchTicket) {
        let result = self.api.list_payments(&PaymentQuery::default()).await;
        self.finish_fetch(ticket, result);
    }

    pub fn begin_fetch(&mut self, phase: Phase) -> FetchTicket {
        self.list.begin(phase)
    }

    pub fn finish_fetch(
        &mut self,
        ticket: FetchTicket,
        result: std::result::Result<Vec<Payment>, ApiError>,
    ) -> bool {
        self.list.finish(ticket, result, &mut self.notices, FETCH_FAILED)
    }

    pub async fn create(&mut self, input: &PaymentInput) -> Option<ApiResponse<Payment>> {
        if let Err(e) = validate(input) {
            self.notices.error(e.to_string());
            return None;
        }
        match self.api.create_payment(input).await {
            Ok(response) => {
                self.notices.success("Payment created successfully!");
                self.refresh().await;
                Some(response)
            }
            Err(e) => {
                self.notices.report("Failed to create payment", &e);
                None
            }
        }
    }

    pub async fn delete(&mut self, id: RecordId, confirm: &impl Confirmation) -> bool {
        if !confirm.confirm("Are you sure you want to delete this payment?") {
            return false;
        }
        match self.api.delete_payment(id).await {
            Ok(_) => {
                self.notices.success("Payment deleted successfully");
                self.refresh().await;
                true
            }
            Err(e) => {
                self.notices.report("Failed to delete payment", &e);
                false
            }
        }
    }

    /// Resend the payment link. The list is left as is.
    pub async fn send_link(&mut self, id: RecordId) -> bool {
        match self.api.send_payment_link(id).await {
            Ok(_) => {
                self.notices.success("Payment link sent successfully");
                true
            }
            Err(e) => {
                self.notices.report("Failed to send payment link", &e);
                false
            }
        }
    }

    pub fn invoice_url(&mut self, id: RecordId) -> Option<Url> {
        match self.api.invoice_url(id) {
            Ok(url) => Some(url),
            Err(e) => {
                self.notices.report("Failed to open invoice", &e);
                None
            }
        }
    }

    pub async fn load_customers(&mut self) -> &[Customer] {
        match self.api.list_customers().await {
            Ok(customers) => self.customers = customers,
            Err(e) => self.notices.report("Failed to load customers", &e),
        }
        &self.customers
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn find(&self, id: RecordId) -> Option<&Payment> {
        self.list.items().iter().find(|p| p.id == id)
    }

    pub fn list(&self) -> &ListState<Payment> {
        &self.list
    }

    pub fn phase(&self) -> Phase {
        self.list.phase()
    }

    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.list.set_filter(filter);
    }

    pub fn filtered(&self) -> Vec<&Payment> {
        self.list.filtered()
    }

    pub fn notices(&mut self) -> &mut Notices {
        &mut self.notices
    }
}
