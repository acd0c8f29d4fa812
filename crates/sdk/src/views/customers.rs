use greentick_types::{Customer, CustomerInput, RecordId};

use super::{Confirmation, FetchTicket, ListState, Notices, Phase, Searchable, contains_ignore_case};
use crate::{
    client::{ApiClient, ApiResponse},
    error::ApiError,
};

const FETCH_FAILED: &str = "Failed to fetch customers";

/// Name matches case-insensitively; phone matches as typed.
impl Searchable for Customer {
    fn matches(&self, needle: &str, raw: &str) -> bool {
        contains_ignore_case(&self.name, needle) || self.phone.contains(raw)
    }
}

/// Customer list screen and its add/edit form
#[derive(Debug)]
pub struct CustomersController {
    api: ApiClient,
    list: ListState<Customer>,
    notices: Notices,
}

impl CustomersController {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            list: ListState::default(),
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
        let result = self.api.list_customers().await;
        self.finish_fetch(ticket, result);
    }

    /// Start a fetch driven by the caller, e.g. on another task.
    pub fn begin_fetch(&mut self, phase: Phase) -> FetchTicket {
        self.list.begin(phase)
    }

    pub fn finish_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<Customer>, ApiError>,
    ) -> bool {
        self.list.finish(ticket, result, &mut self.notices, FETCH_FAILED)
    }

    /// Save a new customer. `None` when the request failed; a success without
    /// a body comes back as `Some(ApiResponse::NoContent)`.
    pub async fn create(&mut self, input: &CustomerInput) -> Option<ApiResponse<Customer>> {
        match self.api.create_customer(input).await {
            Ok(response) => {
                self.notices.success("Customer added successfully!");
                self.refresh().await;
                Some(response)
            }
            Err(e) => {
                self.notices.report("Failed to save customer", &e);
                None
            }
        }
    }

    pub async fn update(
        &mut self,
        id: RecordId,
        input: &CustomerInput,
    ) -> Option<ApiResponse<Customer>> {
        match self.api.update_customer(id, input).await {
            Ok(response) => {
                self.notices.success("Customer updated successfully!");
                self.refresh().await;
                Some(response)
            }
            Err(e) => {
                self.notices.report("Failed to save customer", &e);
                None
            }
        }
    }

    /// Delete after `confirm` agrees. Returns whether the customer was deleted.
    pub async fn delete(&mut self, id: RecordId, confirm: &impl Confirmation) -> bool {
        if !confirm.confirm("Are you sure you want to delete this customer?") {
            return false;
        }
        match self.api.delete_customer(id).await {
            Ok(_) => {
                self.notices.success("Customer deleted successfully");
                self.refresh().await;
                true
            }
            Err(e) => {
                self.notices.report("Failed to delete customer", &e);
                false
            }
        }
    }

    pub fn find(&self, id: RecordId) -> Option<&Customer> {
        self.list.items().iter().find(|c| c.id == id)
    }

    pub fn list(&self) -> &ListState<Customer> {
        &self.list
    }

    pub fn phase(&self) -> Phase {
        self.list.phase()
    }

    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.list.set_filter(filter);
    }

    pub fn filtered(&self) -> Vec<&Customer> {
        self.list.filtered()
    }

    pub fn notices(&mut self) -> &mut Notices {
        &mut self.notices
    }
}
