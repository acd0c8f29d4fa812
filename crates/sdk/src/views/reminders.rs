use greentick_types::{Customer, RecordId, Reminder, ReminderInput, Template};
use indexmap::IndexMap;

use super::{Confirmation, FetchTicket, ListState, Notices, Phase, Searchable, contains_ignore_case};
use crate::{
    client::{ApiClient, ApiResponse},
    endpoints::ReminderQuery,
    error::{ApiError, Result},
};

const FETCH_FAILED: &str = "Failed to fetch reminders";
const SAVE_FAILED: &str = "Failed to save reminder";

impl Searchable for Reminder {
    fn matches(&self, needle: &str, _raw: &str) -> bool {
        contains_ignore_case(&self.message, needle)
    }
}

/// Check a reminder form before it is sent.
pub fn validate(input: &ReminderInput) -> Result<()> {
    if input.customer_id <= 0 {
        return Err(ApiError::Validation("Please select a customer.".to_string()));
    }
    if input.message.trim().is_empty() && input.template_id.is_none() {
        return Err(ApiError::Validation(
            "Please enter a message or choose a template.".to_string(),
        ));
    }
    if input.send_time.trim().is_empty() {
        return Err(ApiError::Validation("Please choose a send time.".to_string()));
    }
    Ok(())
}

/// Reminder list screen, its form and the template helpers
#[derive(Debug)]
pub struct RemindersController {
    api: ApiClient,
    list: ListState<Reminder>,
    status_filter: Option<String>,
    customers: Vec<Customer>,
    templates: Vec<Template>,
    notices: Notices,
}

impl RemindersController {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            list: ListState::default(),
            status_filter: None,
            customers: Vec::new(),
            templates: Vec::new(),
            notices: Notices::default(),
        }
    }

    /// Server-side status filter applied by the next fetch
    pub fn set_status_filter(&mut self, status: Option<String>) {
        self.status_filter = status;
    }

    pub fn status_filter(&self) -> Option<&str> {
        self.status_filter.as_deref()
    }

    fn query(&self) -> ReminderQuery {
        match &self.status_filter {
            Some(status) => ReminderQuery::default().with_status(status.clone()),
            None => ReminderQuery::default(),
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
        let result = self.api.list_reminders(&self.query()).await;
        self.finish_fetch(ticket, result);
    }

    pub fn begin_fetch(&mut self, phase: Phase) -> FetchTicket {
        self.list.begin(phase)
    }

    pub fn finish_fetch(
        &mut self,
        ticket: FetchTicket,
        result: std::result::Result<Vec<Reminder>, ApiError>,
    ) -> bool {
        self.list.finish(ticket, result, &mut self.notices, FETCH_FAILED)
    }

    pub async fn create(&mut self, input: &ReminderInput) -> Option<ApiResponse<Reminder>> {
        if let Err(e) = validate(input) {
            self.notices.error(e.to_string());
            return None;
        }
        match self.api.create_reminder(input).await {
            Ok(response) => {
                self.notices.success("Reminder scheduled successfully!");
                self.refresh().await;
                Some(response)
            }
            Err(e) => {
                self.notices.report(SAVE_FAILED, &e);
                None
            }
        }
    }

    pub async fn update(
        &mut self,
        id: RecordId,
        input: &ReminderInput,
    ) -> Option<ApiResponse<Reminder>> {
        if let Err(e) = validate(input) {
            self.notices.error(e.to_string());
            return None;
        }
        match self.api.update_reminder(id, input).await {
            Ok(response) => {
                self.notices.success("Reminder updated successfully!");
                self.refresh().await;
                Some(response)
            }
            Err(e) => {
                self.notices.report(SAVE_FAILED, &e);
                None
            }
        }
    }

    pub async fn delete(&mut self, id: RecordId, confirm: &impl Confirmation) -> bool {
        if !confirm.confirm("Are you sure you want to delete this reminder?") {
            return false;
        }
        match self.api.delete_reminder(id).await {
            Ok(_) => {
                self.notices.success("Reminder deleted successfully");
                self.refresh().await;
                true
            }
            Err(e) => {
                self.notices.report("Failed to delete reminder", &e);
                false
            }
        }
    }

    /// Send a reminder right away instead of waiting for its send time.
    pub async fn send_now(&mut self, id: RecordId) -> bool {
        match self.api.send_reminder(id).await {
            Ok(_) => {
                self.notices.success("Reminder sent successfully");
                self.refresh().await;
                true
            }
            Err(e) => {
                self.notices.report("Failed to send reminder", &e);
                false
            }
        }
    }

    /// Fill the customer picker of the form.
    pub async fn load_customers(&mut self) -> &[Customer] {
        match self.api.list_customers().await {
            Ok(customers) => self.customers = customers,
            Err(e) => self.notices.report("Failed to load customers", &e),
        }
        &self.customers
    }

    pub async fn load_templates(&mut self) -> &[Template] {
        match self.api.list_templates().await {
            Ok(templates) => self.templates = templates,
            Err(e) => self.notices.report("Failed to load templates", &e),
        }
        &self.templates
    }

    /// Render `template_id` with `variables`. The text is meant to replace
    /// the form's message.
    pub async fn preview(
        &mut self,
        template_id: &str,
        variables: &IndexMap<String, String>,
    ) -> Option<String> {
        match self.api.preview_template(template_id, variables).await {
            Ok(preview) => Some(preview.preview),
            Err(e) => {
                self.notices.report("Failed to preview template", &e);
                None
            }
        }
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn template(&self, id: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// Name of the reminder's customer, if the picker has been loaded
    pub fn customer_name(&self, customer_id: RecordId) -> Option<&str> {
        self.customers
            .iter()
            .find(|c| c.id == customer_id)
            .map(|c| c.name.as_str())
    }

    pub fn find(&self, id: RecordId) -> Option<&Reminder> {
        self.list.items().iter().find(|r| r.id == id)
    }

    pub fn list(&self) -> &ListState<Reminder> {
        &self.list
    }

    pub fn phase(&self) -> Phase {
        self.list.phase()
    }

    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.list.set_filter(filter);
    }

    pub fn filtered(&self) -> Vec<&Reminder> {
        self.list.filtered()
    }

    pub fn notices(&mut self) -> &mut Notices {
        &mut self.notices
    }
}
