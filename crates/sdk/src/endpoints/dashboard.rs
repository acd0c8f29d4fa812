use greentick_types::{Customer, Payment, PaymentStats, Reminder};

use super::{PaymentQuery, ReminderQuery};
use crate::{client::ApiClient, error::Result};

/// Number of items shown in each recent-activity list
pub const RECENT_ACTIVITY_LIMIT: u32 = 5;

impl ApiClient {
    /// Customers, pending reminders and payment stats, fetched concurrently
    /// and returned in that order.
    pub async fn dashboard_stats(&self) -> Result<(Vec<Customer>, Vec<Reminder>, PaymentStats)> {
        let pending = ReminderQuery::pending();
        futures::try_join!(
            self.list_customers(),
            self.list_reminders(&pending),
            self.payment_stats(),
        )
    }

    /// Latest reminders and payments, fetched concurrently.
    pub async fn recent_activity(&self) -> Result<(Vec<Reminder>, Vec<Payment>)> {
        let reminders = ReminderQuery::default().with_limit(RECENT_ACTIVITY_LIMIT);
        let payments = PaymentQuery::default().with_limit(RECENT_ACTIVITY_LIMIT);
        futures::try_join!(
            self.list_reminders(&reminders),
            self.list_payments(&payments),
        )
    }
}
