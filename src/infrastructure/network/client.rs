use crate::domain::error::WashboardError;
use crate::infrastructure::config::ApiConfig;
use reqwest::{Client, StatusCode};
use serde_json::Value;

/// Dashboard REST API client.
///
/// Credentials are only read, never refreshed here: the session store owns them.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(client: Client, base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            token,
        }
    }

    pub fn from_config(client: Client, config: &ApiConfig) -> Result<Self, WashboardError> {
        let base_url = config
            .base_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| WashboardError::Config("API base_url not configured".to_string()))?;

        Ok(Self::new(client, base_url, config.token()))
    }

    fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// GET a JSON payload.
    pub async fn get_json(&self, path: &str) -> Result<Value, WashboardError> {
        let mut request = self.client.get(self.url_for(path));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let error_msg = match status {
                StatusCode::UNAUTHORIZED => "Session expired or missing credentials",
                StatusCode::FORBIDDEN => "Not allowed to read this resource",
                StatusCode::NOT_FOUND => "Resource not found",
                StatusCode::TOO_MANY_REQUESTS => "Access frequency limited",
                s if s.is_server_error() => "Server-side exception",
                _ => "Unexpected response",
            };
            return Err(WashboardError::Api(format!(
                "{} {}: {}",
                status.as_u16(),
                path,
                error_msg
            )));
        }

        Ok(response.json::<Value>().await?)
    }
}
