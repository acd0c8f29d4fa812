use greentick_types::{Customer, Payment, PaymentStats, Reminder};
use tracing::debug;

use super::{FetchTicket, Notices, Phase};
use crate::{client::ApiClient, error::ApiError};

/// Headline numbers of the dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DashboardStats {
    pub total_customers: usize,
    /// Reminders still pending
    pub active_reminders: usize,
    pub total_revenue: f64,
    /// Percentage of payments completed
    pub delivery_rate: f64,
}

impl DashboardStats {
    pub fn from_parts(customers: &[Customer], pending: &[Reminder], stats: &PaymentStats) -> Self {
        Self {
            total_customers: customers.len(),
            active_reminders: pending.len(),
            total_revenue: stats.total_amount,
            delivery_rate: stats.completion_rate,
        }
    }
}

/// Everything one dashboard fetch returns
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardData {
    pub stats: DashboardStats,
    pub recent_reminders: Vec<Reminder>,
    pub recent_payments: Vec<Payment>,
}

#[derive(Debug)]
pub struct DashboardController {
    api: ApiClient,
    data: DashboardData,
    phase: Phase,
    issued: u64,
    notices: Notices,
}

impl DashboardController {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            data: DashboardData::default(),
            phase: Phase::Idle,
            issued: 0,
            notices: Notices::default(),
        }
    }

    pub async fn on_visible(&mut self) {
        let ticket = self.begin_fetch(Phase::Loading);
        let result = fetch(&self.api).await;
        self.finish_fetch(ticket, result);
    }

    pub async fn refresh(&mut self) {
        let ticket = self.begin_fetch(Phase::Refreshing);
        let result = fetch(&self.api).await;
        self.finish_fetch(ticket, result);
    }

    pub fn begin_fetch(&mut self, phase: Phase) -> FetchTicket {
        self.issued += 1;
        self.phase = phase;
        FetchTicket(self.issued)
    }

    /// Apply a fetch outcome. Stale tickets are dropped; on error the
    /// previous numbers stay on screen.
    pub fn finish_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<DashboardData, ApiError>,
    ) -> bool {
        if ticket.0 != self.issued {
            debug!(ticket = ticket.0, latest = self.issued, "Dropping stale dashboard result");
            return false;
        }
        self.phase = Phase::Loaded;
        match result {
            Ok(data) => self.data = data,
            Err(e) => self.notices.report("Failed to fetch dashboard data", &e),
        }
        true
    }

    /// "Welcome, <business name or email>"
    pub fn greeting(&self) -> String {
        match self.api.session().display_name() {
            Some(name) => format!("Welcome, {}", name),
            None => "Welcome".to_string(),
        }
    }

    pub fn stats(&self) -> DashboardStats {
        self.data.stats
    }

    pub fn recent_reminders(&self) -> &[Reminder] {
        &self.data.recent_reminders
    }

    pub fn recent_payments(&self) -> &[Payment] {
        &self.data.recent_payments
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn notices(&mut self) -> &mut Notices {
        &mut self.notices
    }
}

/// Run both fan-outs concurrently and combine them positionally.
pub async fn fetch(api: &ApiClient) -> Result<DashboardData, ApiError> {
    let ((customers, pending, stats), (recent_reminders, recent_payments)) =
        futures::try_join!(api.dashboard_stats(), api.recent_activity())?;
    Ok(DashboardData {
        stats: DashboardStats::from_parts(&customers, &pending, &stats),
        recent_reminders,
        recent_payments,
    })
}
