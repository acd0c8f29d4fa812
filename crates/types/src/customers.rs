use serde::{Deserialize, Serialize};

use crate::RecordId;

/// Customer owned by the logged-in business
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Customer {
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Customer {
    /// Label used in customer pickers, e.g. `Alice (111)`
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.phone)
    }
}

/// Body of `POST /customers/` and `PUT /customers/{id}`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct CustomerInput {
    pub name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl CustomerInput {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        let notes = notes.into();
        self.notes = if notes.is_empty() { None } else { Some(notes) };
        self
    }
}

impl From<&Customer> for CustomerInput {
    fn from(customer: &Customer) -> Self {
        Self {
            name: customer.name.clone(),
            phone: customer.phone.clone(),
            notes: customer.notes.clone(),
        }
    }
}
