//! Records exchanged with the GreenTick backend.
//!
//! The backend owns these shapes; the client only reads the fields it renders
//! and round-trips everything else untouched.

use indexmap::IndexMap;
use serde_json::Value as JsonValue;

pub mod auth;
pub mod customers;
pub mod payments;
pub mod reminders;

pub use auth::{BusinessProfile, SignupRequest, TokenResponse, User};
pub use customers::{Customer, CustomerInput};
pub use payments::{Payment, PaymentInput, PaymentStats};
pub use reminders::{Reminder, ReminderInput, Template, TemplatePreview, frequency, status};

/// Backend base URL used when nothing else is configured
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// Storage key holding the raw bearer token
pub const AUTH_TOKEN_KEY: &str = "authToken";

/// Storage key holding the JSON-serialized [`User`]
pub const CURRENT_USER_KEY: &str = "currentUser";

/// Backend ids are integer primary keys
pub type RecordId = i64;

/// Fields the backend sent that this crate does not model
pub type ExtraFields = IndexMap<String, JsonValue>;

/// Overlay `patch` on top of `base`, key by key.
///
/// Non-object patches leave `base` untouched.
pub fn merge_json(base: &mut JsonValue, patch: JsonValue) {
    if let (JsonValue::Object(base), JsonValue::Object(patch)) = (base, patch) {
        for (key, value) in patch {
            base.insert(key, value);
        }
    }
}
