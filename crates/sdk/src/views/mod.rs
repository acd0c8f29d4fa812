//! Screen-level controllers.
//!
//! Each controller owns the fetched list for one resource, a local text
//! filter and a queue of user-facing notices. Front ends call the
//! operations, then render [`ListState`] and drain the notices.

use std::collections::VecDeque;

use tracing::debug;

use crate::error::ApiError;

pub mod customers;
pub mod dashboard;
pub mod payments;
pub mod profile;
pub mod reminders;

pub use customers::CustomersController;
pub use dashboard::{DashboardController, DashboardData, DashboardStats};
pub use payments::PaymentsController;
pub use profile::ProfileController;
pub use reminders::RemindersController;

/// Loading state of a screen, reset on every visibility event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    /// First fetch after becoming visible
    Loading,
    Loaded,
    /// User-initiated re-fetch while the previous list stays on screen
    Refreshing,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Idle => write!(f, "idle"),
            Phase::Loading => write!(f, "loading"),
            Phase::Loaded => write!(f, "loaded"),
            Phase::Refreshing => write!(f, "refreshing"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// Transient message shown to the user (toast, alert, status line)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// FIFO of notices waiting to be shown
#[derive(Debug, Default)]
pub struct Notices {
    queue: VecDeque<Notice>,
}

impl Notices {
    pub fn push(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.queue.push_back(Notice {
            level,
            message: message.into(),
        });
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Success, message);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Info, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Error, message);
    }

    /// Report a failed call. An expired session becomes a warning, since the
    /// client has already logged the user out.
    pub fn report(&mut self, context: &str, error: &ApiError) {
        match error {
            ApiError::SessionExpired => self.push(NoticeLevel::Warning, error.to_string()),
            _ => self.error(format!("{}: {}", context, error)),
        }
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.queue.iter()
    }

    /// Take every pending notice, oldest first
    pub fn drain(&mut self) -> Vec<Notice> {
        self.queue.drain(..).collect()
    }
}

/// Gate in front of destructive actions
pub trait Confirmation {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F: Fn(&str) -> bool> Confirmation for F {
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Confirmation that always answers yes, for non-interactive callers
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirmation for AssumeYes {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// Identifies one fetch of a screen. Only the most recent ticket may update
/// the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

/// Records that can be matched against the text filter
pub trait Searchable {
    /// `needle` is already lowercased; `raw` is the filter as typed.
    fn matches(&self, needle: &str, raw: &str) -> bool;
}

/// Case-insensitive substring test against an already lowercased needle
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Fetched list, filter and load state of one screen
#[derive(Debug)]
pub struct ListState<T> {
    items: Vec<T>,
    filter: String,
    phase: Phase,
    issued: u64,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            filter: String::new(),
            phase: Phase::Idle,
            issued: 0,
        }
    }
}

impl<T: Searchable> ListState<T> {
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.filter = filter.into();
    }

    /// Items matching the current filter, in fetch order
    pub fn filtered(&self) -> Vec<&T> {
        let raw = self.filter.trim();
        if raw.is_empty() {
            return self.items.iter().collect();
        }
        let needle = raw.to_lowercase();
        self.items
            .iter()
            .filter(|item| item.matches(&needle, raw))
            .collect()
    }

    /// Start a fetch, superseding any fetch still in flight.
    pub fn begin(&mut self, phase: Phase) -> FetchTicket {
        self.issued += 1;
        self.phase = phase;
        FetchTicket(self.issued)
    }

    /// Apply the outcome of the fetch identified by `ticket`.
    ///
    /// Returns `false` when the ticket is stale; its outcome is dropped.
    /// On error the previous items are kept.
    pub fn finish(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<T>, ApiError>,
        notices: &mut Notices,
        context: &str,
    ) -> bool {
        if ticket.0 != self.issued {
            debug!(ticket = ticket.0, latest = self.issued, "Dropping stale fetch result");
            return false;
        }
        self.phase = Phase::Loaded;
        match result {
            Ok(items) => self.items = items,
            Err(e) => notices.report(context, &e),
        }
        true
    }
}
