//! Offline cache and connectivity monitor for the laundry-chain dashboard.
//!
//! [`application::monitor::ConnectivityMonitor`] polls reachability and
//! invalidates queries when the device comes back online;
//! [`application::cache::CacheManager`] keeps small JSON payloads in the
//! secure store for offline fallback, expiring them all together after
//! a fixed age.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod presentation;
pub mod state;

pub use application::cache::CacheManager;
pub use application::monitor::{ConnectivityMonitor, MonitorHandle};
pub use application::offline::OfflineManager;
pub use application::query::QueryRegistry;
pub use domain::error::WashboardError;
pub use state::AppState;
