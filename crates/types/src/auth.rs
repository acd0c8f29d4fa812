use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::{ExtraFields, RecordId, merge_json};

/// Current user profile as returned by `/auth/users/me`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_whatsapp: Option<String>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl User {
    /// Name shown in greetings: business name, else email
    pub fn display_name(&self) -> &str {
        match self.business_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.email,
        }
    }

    /// Return a copy of this user with every key of `patch` overlaid.
    pub fn merged_with(&self, patch: JsonValue) -> Result<User, serde_json::Error> {
        let mut base = serde_json::to_value(self)?;
        merge_json(&mut base, patch);
        serde_json::from_value(base)
    }
}

/// Response of `/auth/token` and `/auth/signup`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

/// Body of `POST /auth/signup`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub phone: String,
    pub business_name: String,
    pub business_whatsapp: String,
}

impl SignupRequest {
    /// The business WhatsApp number defaults to the contact phone.
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        phone: impl Into<String>,
        business_name: impl Into<String>,
    ) -> Self {
        let phone = phone.into();
        Self {
            email: email.into(),
            password: password.into(),
            business_whatsapp: phone.clone(),
            phone,
            business_name: business_name.into(),
        }
    }

    pub fn with_business_whatsapp(mut self, number: impl Into<String>) -> Self {
        self.business_whatsapp = number.into();
        self
    }
}

/// Editable business fields of `/auth/business-profile`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct BusinessProfile {
    #[serde(default)]
    pub business_name: Option<String>,
    #[serde(default)]
    pub business_whatsapp: Option<String>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}
