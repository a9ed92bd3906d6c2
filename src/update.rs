use std::sync::Arc;

use tracing::{info, warn};

use crate::dns::{build_change, client_comment, ChangeBatch, ChangeResponse, DnsProvider, RecordType};
use crate::error::UpdateError;
use crate::ip::{AddressResolver, Families};

/// How a successful run ended.
#[derive(Debug)]
pub enum UpdateOutcome {
    /// The batch was accepted by the provider
    Submitted(ChangeResponse),
    /// Nothing resolved, so nothing was submitted
    NoChanges,
    /// The batch that would have been submitted
    DryRun(ChangeBatch),
}

/// Resolves the requested addresses and upserts them for one hostname.
pub struct Updater {
    resolver: Arc<dyn AddressResolver>,
    provider: Arc<dyn DnsProvider>,
    comment: String,
    dry_run: bool,
}

impl Updater {
    pub fn new(resolver: Arc<dyn AddressResolver>, provider: Arc<dyn DnsProvider>) -> Self {
        Self {
            resolver,
            provider,
            comment: client_comment(),
            dry_run: false,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub async fn update(
        &self,
        zone_id: &str,
        hostname: &str,
        families: Families,
    ) -> Result<UpdateOutcome, UpdateError> {
        // Resolve every family before building anything: a lookup failure
        // must not lead to a partial submission.
        let mut addresses = Vec::new();
        for family in families.iter() {
            match self.resolver.resolve(family).await? {
                Some(ip) => addresses.push((family, ip)),
                None => info!("No {} address available", family),
            }
        }

        let mut batch = ChangeBatch::new(self.comment.as_str());
        for (family, ip) in addresses {
            let change = build_change(hostname, ip, RecordType::for_family(family).as_str())?;
            batch.push(change);
        }

        if batch.is_empty() {
            warn!("No addresses resolved for {}, nothing to update", hostname);
            return Ok(UpdateOutcome::NoChanges);
        }

        for change in batch.changes() {
            info!("{}", change);
        }

        if self.dry_run {
            info!("Dry run, not submitting {} change(s)", batch.len());
            return Ok(UpdateOutcome::DryRun(batch));
        }

        info!(
            "Submitting {} change(s) to {} zone {}",
            batch.len(),
            self.provider.provider_name(),
            zone_id
        );

        let response = self.provider.submit_changes(zone_id, &batch).await?;
        info!("{} responded: {}", self.provider.provider_name(), response);

        Ok(UpdateOutcome::Submitted(response))
    }
}
