use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_config::BehaviorVersion;
use aws_sdk_route53::config::Region;
use aws_sdk_route53::error::{BuildError, DisplayErrorContext};
use aws_sdk_route53::operation::change_resource_record_sets::ChangeResourceRecordSetsError;
use aws_sdk_route53::types as r53;
use aws_sdk_route53::Client;
use tracing::debug;

use super::change::{ChangeAction, ChangeBatch, ChangeRecord, RecordType};
use super::provider::{ChangeResponse, DnsProvider};
use crate::config::Route53Config;
use crate::error::ProviderError;

/// Route 53 is a global service; its API lives in us-east-1.
const DEFAULT_REGION: &str = "us-east-1";

pub struct Route53Provider {
    client: Client,
}

impl Route53Provider {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from the standard AWS credential and region chain,
    /// with overrides from `config`.
    pub async fn from_env(config: &Route53Config) -> Self {
        let region = RegionProviderChain::first_try(config.region.clone().map(Region::new))
            .or_default_provider()
            .or_else(Region::new(DEFAULT_REGION));

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(region)
            .load()
            .await;

        let mut builder = aws_sdk_route53::config::Builder::from(&sdk_config);
        if let Some(url) = &config.endpoint_url {
            builder = builder.endpoint_url(url);
        }

        Self::new(Client::from_conf(builder.build()))
    }
}

#[async_trait]
impl DnsProvider for Route53Provider {
    async fn submit_changes(
        &self,
        zone_id: &str,
        batch: &ChangeBatch,
    ) -> Result<ChangeResponse, ProviderError> {
        let change_batch = to_change_batch(batch)
            .map_err(|e| ProviderError::InvalidChangeBatch(e.to_string()))?;

        debug!("Submitting {} change(s) to zone {}", batch.len(), zone_id);

        let output = self
            .client
            .change_resource_record_sets()
            .hosted_zone_id(zone_id)
            .change_batch(change_batch)
            .send()
            .await
            .map_err(|err| match err.into_service_error() {
                ChangeResourceRecordSetsError::InvalidChangeBatch(e) => {
                    ProviderError::InvalidChangeBatch(e.to_string())
                }
                other => ProviderError::Other(DisplayErrorContext(&other).to_string()),
            })?;

        Ok(ChangeResponse {
            detail: format!("{:?}", output),
        })
    }

    fn provider_name(&self) -> &'static str {
        "route53"
    }
}

fn to_change_batch(batch: &ChangeBatch) -> Result<r53::ChangeBatch, BuildError> {
    let changes = batch
        .changes()
        .iter()
        .map(to_change)
        .collect::<Result<Vec<_>, _>>()?;

    r53::ChangeBatch::builder()
        .comment(batch.comment())
        .set_changes(Some(changes))
        .build()
}

fn to_change(change: &ChangeRecord) -> Result<r53::Change, BuildError> {
    let record = r53::ResourceRecord::builder()
        .value(change.value().to_string())
        .build()?;

    let rr_type = match change.record_type() {
        RecordType::A => r53::RrType::A,
        RecordType::Aaaa => r53::RrType::Aaaa,
    };

    let record_set = r53::ResourceRecordSet::builder()
        .name(change.name())
        .r#type(rr_type)
        .ttl(i64::from(change.ttl()))
        .resource_records(record)
        .build()?;

    let action = match change.action() {
        ChangeAction::Upsert => r53::ChangeAction::Upsert,
    };

    r53::Change::builder()
        .action(action)
        .resource_record_set(record_set)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::build_change;
    use aws_sdk_route53::config::retry::RetryConfig;
    use aws_sdk_route53::config::Credentials;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const CHANGE_ACCEPTED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ChangeResourceRecordSetsResponse xmlns="https://route53.amazonaws.com/doc/2013-04-01/">
  <ChangeInfo>
    <Id>/change/C2682N5HXP0BZ4</Id>
    <Status>PENDING</Status>
    <SubmittedAt>2026-10-16T12:00:00.000Z</SubmittedAt>
  </ChangeInfo>
</ChangeResourceRecordSetsResponse>"#;

    const CHANGE_INVALID: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ErrorResponse xmlns="https://route53.amazonaws.com/doc/2013-04-01/">
  <Error>
    <Type>Sender</Type>
    <Code>InvalidChangeBatch</Code>
    <Message>RRSet with DNS name bad. is not permitted in zone example.com.</Message>
  </Error>
  <RequestId>8a9e5c1e-0000-4000-8000-000000000000</RequestId>
</ErrorResponse>"#;

    fn provider_at(endpoint: &str) -> Route53Provider {
        let config = aws_sdk_route53::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(DEFAULT_REGION))
            .credentials_provider(Credentials::new("AKIDTEST", "secret", None, None, "test"))
            .retry_config(RetryConfig::disabled())
            .endpoint_url(endpoint)
            .build();
        Route53Provider::new(Client::from_conf(config))
    }

    fn both_families() -> ChangeBatch {
        let mut batch = ChangeBatch::new("me@box via r53up");
        batch.push(build_change("h.example.com", "203.0.113.7".parse().unwrap(), "A").unwrap());
        batch.push(build_change("h.example.com", "2001:db8::1".parse().unwrap(), "AAAA").unwrap());
        batch
    }

    async fn mount_rrset(server: &MockServer, status: u16, body: &str) {
        Mock::given(method("POST"))
            .and(path("/2013-04-01/hostedzone/Z123/rrset"))
            .respond_with(
                ResponseTemplate::new(status)
                    .insert_header("content-type", "text/xml")
                    .set_body_string(body),
            )
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_submit_accepted() {
        let server = MockServer::start().await;
        mount_rrset(&server, 200, CHANGE_ACCEPTED).await;

        let response = provider_at(&server.uri())
            .submit_changes("Z123", &both_families())
            .await
            .unwrap();
        assert!(response.detail.contains("C2682N5HXP0BZ4"), "got {}", response);

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        let body = String::from_utf8_lossy(&requests[0].body);
        assert!(body.contains("<Action>UPSERT</Action>"), "body: {}", body);
        assert!(body.contains("<TTL>60</TTL>"), "body: {}", body);
        assert!(body.contains("<Comment>me@box via r53up</Comment>"), "body: {}", body);
        assert!(!body.contains("<Action>CREATE</Action>"));
        assert!(!body.contains("<Action>DELETE</Action>"));

        let a = body.find("<Type>A</Type>").expect("A record in body");
        let aaaa = body.find("<Type>AAAA</Type>").expect("AAAA record in body");
        assert!(a < aaaa, "A must precede AAAA: {}", body);
    }

    #[tokio::test]
    async fn test_submit_invalid_change_batch() {
        let server = MockServer::start().await;
        mount_rrset(&server, 400, CHANGE_INVALID).await;

        let err = provider_at(&server.uri())
            .submit_changes("Z123", &both_families())
            .await
            .unwrap_err();

        match err {
            ProviderError::InvalidChangeBatch(msg) => {
                assert!(msg.contains("is not permitted"), "got {}", msg)
            }
            other => panic!("expected InvalidChangeBatch, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_submit_other_service_error() {
        let server = MockServer::start().await;
        mount_rrset(
            &server,
            400,
            r#"<ErrorResponse><Error><Type>Sender</Type><Code>Throttling</Code><Message>Rate exceeded</Message></Error><RequestId>r1</RequestId></ErrorResponse>"#,
        )
        .await;

        let err = provider_at(&server.uri())
            .submit_changes("Z123", &both_families())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Other(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_submit_connection_failure() {
        let err = provider_at("http://127.0.0.1:9")
            .submit_changes("Z123", &both_families())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Other(_)), "got {:?}", err);
    }

    #[test]
    fn test_to_change_batch() {
        let mut batch = ChangeBatch::new("me@box via r53up");
        batch.push(build_change("h.example.com", "203.0.113.7".parse().unwrap(), "A").unwrap());
        batch.push(build_change("h.example.com", "2001:db8::1".parse().unwrap(), "AAAA").unwrap());

        let converted = to_change_batch(&batch).unwrap();
        let dump = format!("{:?}", converted);

        assert!(dump.contains("me@box via r53up"));
        assert!(dump.contains("Upsert"));
        assert!(dump.contains("h.example.com"));
        assert!(dump.contains("203.0.113.7"));
        assert!(dump.contains("2001:db8::1"));
        assert!(dump.find("203.0.113.7") < dump.find("2001:db8::1"));
        assert!(!dump.contains("Delete"));
        assert!(!dump.contains("Create"));
    }
}
