use std::fmt;

use async_trait::async_trait;

use super::change::ChangeBatch;
use crate::error::ProviderError;

/// Opaque acknowledgement returned by the provider for a submitted batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeResponse {
    pub detail: String,
}

impl fmt::Display for ChangeResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.detail)
    }
}

#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Submit every change in `batch` to the zone as one atomic request
    async fn submit_changes(
        &self,
        zone_id: &str,
        batch: &ChangeBatch,
    ) -> Result<ChangeResponse, ProviderError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}
