// HTTP client utilities
use crate::domain::error::WashboardError;
use reqwest::Client;

/// Create the shared HTTP client. Per-request timeouts are set by callers.
pub fn create_client() -> Result<Client, WashboardError> {
    Ok(Client::builder()
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(std::time::Duration::from_secs(30))
        .timeout(std::time::Duration::from_secs(30))
        .user_agent(concat!("washboard/", env!("CARGO_PKG_VERSION")))
        .build()?)
}
