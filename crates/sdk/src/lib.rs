//! GreenTick SDK
//!
//! Client-side building blocks for the GreenTick reminders and payments
//! backend: a persisted authentication session, a typed REST client and
//! headless controllers for each screen of a front end.
//!
//! # Overview
//!
//! - [`SessionStore`] - Token and user profile, persisted through a [`KeyValueStore`]
//! - [`ApiClient`] - Every backend call, with bearer auth and error normalization
//! - [`views`] - Per-screen controllers holding list state, filters and notices
//!
//! # Quick Start
//!
//! ```ignore
//! use greentick_sdk::{ApiClient, ClientConfig, FileStore, SessionStore};
//! use greentick_sdk::views::CustomersController;
//!
//! let session = SessionStore::new(FileStore::in_system_data_dir()?);
//! session.load();
//!
//! let api = ApiClient::new(ClientConfig::from_env()?, session.clone());
//! if !session.is_authenticated() {
//!     session.login(&api, "shop@example.com", "secret").await?;
//! }
//!
//! let mut customers = CustomersController::new(api.clone());
//! customers.on_visible().await;
//! customers.set_filter("ali");
//! for customer in customers.filtered() {
//!     println!("{}", customer.label());
//! }
//! for notice in customers.notices().drain() {
//!     eprintln!("{:?}: {}", notice.level, notice.message);
//! }
//! ```
//!
//! # Session expiry
//!
//! A 401 on a request that carried a token logs the user out everywhere the
//! [`SessionStore`] is shared, and surfaces as [`ApiError::SessionExpired`].

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod session;
pub mod storage;
pub mod views;

#[cfg(test)]
mod test_backend;

// Re-export main types at crate root
pub use client::{ApiClient, ApiResponse};
pub use config::ClientConfig;
pub use endpoints::{PaymentQuery, ReminderQuery};
pub use error::{ApiError, Result, StorageError};
pub use session::{Session, SessionStore};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
