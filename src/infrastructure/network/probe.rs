use crate::domain::traits::Probe;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// HEAD probe against a highly available public endpoint.
pub struct HttpProbe {
    client: Client,
    url: String,
    timeout: Duration,
}

impl HttpProbe {
    pub fn new(client: Client, url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            url: url.into(),
            timeout,
        }
    }

    /// One probe. Timeout, network error and non-2xx all read as offline.
    pub async fn check_now(&self) -> bool {
        let request = self.client.head(&self.url).timeout(self.timeout).send();

        // reqwest's timeout covers the exchange; the outer one also bounds connect
        match tokio::time::timeout(self.timeout, request).await {
            Ok(Ok(response)) => {
                let ok = response.status().is_success();
                debug!(url = %self.url, status = %response.status(), online = ok, "probe finished");
                ok
            }
            Ok(Err(e)) => {
                debug!(url = %self.url, error = %e, "probe failed");
                false
            }
            Err(_) => {
                debug!(url = %self.url, timeout = ?self.timeout, "probe timed out");
                false
            }
        }
    }
}

#[async_trait]
impl Probe for HttpProbe {
    async fn check(&self) -> bool {
        self.check_now().await
    }
}
