//! Usage API.

use crate::error::Result;
use crate::http::HttpClient;
use crate::types::UsageStats;

/// Usage API client.
pub struct UsageApi {
    http: HttpClient,
}

impl UsageApi {
    pub(crate) fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Get usage statistics and tier limits for the current billing period.
    pub async fn get(&self) -> Result<UsageStats> {
        self.http.get("/v1/usage").await
    }
}
