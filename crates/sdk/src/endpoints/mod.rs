//! Typed wrappers around every backend endpoint the clients consume.

pub mod auth;
pub mod customers;
pub mod dashboard;
pub mod payments;
pub mod reminders;

pub use dashboard::RECENT_ACTIVITY_LIMIT;
pub use payments::PaymentQuery;
pub use reminders::ReminderQuery;

pub const LOGIN_PATH: &str = "/auth/token";
pub const SIGNUP_PATH: &str = "/auth/signup";
pub const CURRENT_USER_PATH: &str = "/auth/users/me";
pub const BUSINESS_PROFILE_PATH: &str = "/auth/business-profile";
pub const CUSTOMERS_PATH: &str = "/customers/";
pub const REMINDERS_PATH: &str = "/reminders/";
pub const TEMPLATES_PATH: &str = "/reminders/templates";
pub const PREVIEW_TEMPLATE_PATH: &str = "/reminders/preview-template";
pub const PAYMENTS_PATH: &str = "/payments/";
pub const PAYMENT_STATS_PATH: &str = "/payments/stats/summary";

/// Append `pairs` as a query string, skipping absent values
pub(crate) fn with_query(path: &str, pairs: &[(&str, Option<String>)]) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    let mut any = false;
    for (key, value) in pairs {
        if let Some(value) = value {
            serializer.append_pair(key, value);
            any = true;
        }
    }
    if any {
        format!("{}?{}", path, serializer.finish())
    } else {
        path.to_string()
    }
}
