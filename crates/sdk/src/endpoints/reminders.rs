use greentick_types::{RecordId, Reminder, ReminderInput, Template, TemplatePreview, status};
use indexmap::IndexMap;
use serde_json::Value as JsonValue;

use super::{PREVIEW_TEMPLATE_PATH, REMINDERS_PATH, TEMPLATES_PATH, with_query};
use crate::{
    client::{ApiClient, ApiResponse},
    error::Result,
};

/// Server-side filters for `GET /reminders/`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReminderQuery {
    pub status: Option<String>,
    pub limit: Option<u32>,
}

impl ReminderQuery {
    pub fn pending() -> Self {
        Self {
            status: Some(status::PENDING.to_string()),
            limit: None,
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn path(&self) -> String {
        with_query(
            REMINDERS_PATH,
            &[
                ("status", self.status.clone()),
                ("limit", self.limit.map(|l| l.to_string())),
            ],
        )
    }
}

fn reminder_path(id: RecordId) -> String {
    format!("/reminders/{}", id)
}

impl ApiClient {
    pub async fn list_reminders(&self, query: &ReminderQuery) -> Result<Vec<Reminder>> {
        self.get(&query.path()).await
    }

    pub async fn get_reminder(&self, id: RecordId) -> Result<Reminder> {
        self.get(&reminder_path(id)).await
    }

    pub async fn create_reminder(&self, input: &ReminderInput) -> Result<ApiResponse<Reminder>> {
        self.post(REMINDERS_PATH, input).await
    }

    pub async fn update_reminder(
        &self,
        id: RecordId,
        input: &ReminderInput,
    ) -> Result<ApiResponse<Reminder>> {
        self.put(&reminder_path(id), input).await
    }

    pub async fn delete_reminder(&self, id: RecordId) -> Result<ApiResponse<JsonValue>> {
        self.delete(&reminder_path(id)).await
    }

    /// Ask the backend to send a reminder immediately
    pub async fn send_reminder(&self, id: RecordId) -> Result<ApiResponse<JsonValue>> {
        self.post_action(&format!("/reminders/{}/send", id)).await
    }

    pub async fn list_templates(&self) -> Result<Vec<Template>> {
        self.get(TEMPLATES_PATH).await
    }

    /// Render a template server-side.
    ///
    /// The backend expects a multipart form with the variables JSON-encoded
    /// in a single field.
    pub async fn preview_template(
        &self,
        template_id: &str,
        variables: &IndexMap<String, String>,
    ) -> Result<TemplatePreview> {
        let form = reqwest::multipart::Form::new()
            .text("template_id", template_id.to_string())
            .text("variables", serde_json::to_string(variables)?);
        self.post_multipart(PREVIEW_TEMPLATE_PATH, form)
            .await?
            .require(PREVIEW_TEMPLATE_PATH)
    }
}
