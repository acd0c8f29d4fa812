use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::RecordId;

/// Reminder frequencies offered by the forms. The backend may report others.
pub mod frequency {
    pub const ONE_TIME: &str = "one_time";
    pub const DAILY: &str = "daily";
    pub const WEEKLY: &str = "weekly";
    pub const MONTHLY: &str = "monthly";

    pub const ALL: [&str; 4] = [ONE_TIME, DAILY, WEEKLY, MONTHLY];

    /// Whether a reminder with this frequency fires more than once
    pub fn is_recurring(frequency: &str) -> bool {
        frequency != ONE_TIME
    }
}

/// Status strings set by the backend. The client never computes transitions.
pub mod status {
    pub const PENDING: &str = "pending";
    pub const SENT: &str = "sent";
    pub const FAILED: &str = "failed";
    pub const COMPLETED: &str = "completed";
}

/// Scheduled WhatsApp reminder
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Reminder {
    pub id: RecordId,
    pub customer_id: RecordId,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub send_time: String,
    #[serde(default = "default_frequency")]
    pub frequency: String,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_variables: Option<IndexMap<String, String>>,
}

fn default_frequency() -> String {
    frequency::ONE_TIME.to_string()
}

fn default_status() -> String {
    status::PENDING.to_string()
}

impl Reminder {
    /// Only pending reminders can be sent on demand
    pub fn is_pending(&self) -> bool {
        self.status == status::PENDING
    }
}

/// Body of `POST /reminders/` and `PUT /reminders/{id}`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ReminderInput {
    pub customer_id: RecordId,
    pub message: String,
    pub send_time: String,
    pub frequency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_variables: Option<IndexMap<String, String>>,
}

impl ReminderInput {
    pub fn new(
        customer_id: RecordId,
        message: impl Into<String>,
        send_time: impl Into<String>,
    ) -> Self {
        Self {
            customer_id,
            message: message.into(),
            send_time: send_time.into(),
            frequency: default_frequency(),
            recurring_end_date: None,
            template_id: None,
            template_variables: None,
        }
    }

    /// Set the frequency. One-time reminders drop any end date.
    pub fn with_frequency(mut self, value: impl Into<String>) -> Self {
        self.frequency = value.into();
        if !frequency::is_recurring(&self.frequency) {
            self.recurring_end_date = None;
        }
        self
    }

    /// Ignored unless the frequency is recurring.
    pub fn with_recurring_end_date(mut self, date: impl Into<String>) -> Self {
        if frequency::is_recurring(&self.frequency) {
            self.recurring_end_date = Some(date.into());
        }
        self
    }

    pub fn with_template(
        mut self,
        template_id: impl Into<String>,
        variables: IndexMap<String, String>,
    ) -> Self {
        self.template_id = Some(template_id.into());
        self.template_variables = Some(variables);
        self
    }
}

impl From<&Reminder> for ReminderInput {
    fn from(reminder: &Reminder) -> Self {
        Self {
            customer_id: reminder.customer_id,
            message: reminder.message.clone(),
            send_time: reminder.send_time.clone(),
            frequency: reminder.frequency.clone(),
            recurring_end_date: reminder.recurring_end_date.clone(),
            template_id: reminder.template_id.clone(),
            template_variables: reminder.template_variables.clone(),
        }
    }
}

/// Message template listed by `/reminders/templates`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Template {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default)]
    pub variables: Vec<String>,
}

/// Response of `/reminders/preview-template`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TemplatePreview {
    pub preview: String,
}
