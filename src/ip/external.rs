use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use super::{AddressResolver, IpFamily};
use crate::error::LookupError;

pub const DEFAULT_IPV4_URL: &str = "https://api.ipify.org?format=json";
pub const DEFAULT_IPV6_URL: &str = "https://api6.ipify.org?format=json";

/// Body returned by the lookup endpoints: `{"ip": "..."}`.
#[derive(Debug, Deserialize)]
struct IpResponse {
    ip: String,
}

/// Resolves public addresses through ipify-style JSON endpoints, one per family.
pub struct HttpResolver {
    client: Client,
    ipv4_url: String,
    ipv6_url: String,
}

impl HttpResolver {
    pub fn new(
        ipv4_url: impl Into<String>,
        ipv6_url: impl Into<String>,
        timeout: Duration,
    ) -> reqwest::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            ipv4_url: ipv4_url.into(),
            ipv6_url: ipv6_url.into(),
        })
    }

    fn url_for(&self, family: IpFamily) -> &str {
        match family {
            IpFamily::V4 => &self.ipv4_url,
            IpFamily::V6 => &self.ipv6_url,
        }
    }
}

#[async_trait]
impl AddressResolver for HttpResolver {
    async fn resolve(&self, family: IpFamily) -> Result<Option<IpAddr>, LookupError> {
        let url = self.url_for(family);
        let literal = fetch_ip(&self.client, url).await?;

        // The IPv6 endpoint answers over IPv4 when the host has no IPv6 route.
        if family == IpFamily::V6 && !literal.contains(':') {
            debug!("{} returned {:?}, no IPv6 connectivity", url, literal);
            return Ok(None);
        }

        let ip = parse_ip(url, family, &literal)?;
        info!("My {} address: {}", family, ip);
        Ok(Some(ip))
    }
}

async fn fetch_ip(client: &Client, url: &str) -> Result<String, LookupError> {
    let response = client
        .get(url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|source| LookupError::Request {
            url: url.to_string(),
            source,
        })?;

    let body: IpResponse = response.json().await.map_err(|source| LookupError::Decode {
        url: url.to_string(),
        source,
    })?;

    Ok(body.ip)
}

fn parse_ip(url: &str, family: IpFamily, literal: &str) -> Result<IpAddr, LookupError> {
    literal
        .trim()
        .parse::<IpAddr>()
        .ok()
        .filter(|ip| family.matches(ip))
        .ok_or_else(|| LookupError::Malformed {
            url: url.to_string(),
            value: literal.to_string(),
        })
}
