use thiserror::Error;

/// Failure to discover the public address for one family.
#[derive(Debug, Error)]
pub enum LookupError {
    /// Transport failure, timeout or non-success HTTP status
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Response body was not the expected JSON object
    #[error("unexpected response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The returned literal is not an address of the requested family
    #[error("malformed address from {url}: {value:?}")]
    Malformed { url: String, value: String },
}

/// Failure reported by a [`crate::dns::DnsProvider`] when submitting a batch.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("invalid change batch: {0}")]
    InvalidChangeBatch(String),

    #[error("{0}")]
    Other(String),
}

/// Everything that can make an update run fail.
#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("Failed to get IP address")]
    Lookup(#[from] LookupError),

    /// Internal precondition violation, never a user-facing condition
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Change rejected")]
    ChangeRejected(#[source] ProviderError),

    #[error("DNS provider request failed")]
    Provider(#[source] ProviderError),
}

impl From<ProviderError> for UpdateError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::InvalidChangeBatch(_) => Self::ChangeRejected(err),
            ProviderError::Other(_) => Self::Provider(err),
        }
    }
}

/// Command-line flags that cannot be combined.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FlagError {
    #[error("--ipv4 and --ipv6 are mutually exclusive")]
    MutuallyExclusive,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_classification() {
        let rejected: UpdateError = ProviderError::InvalidChangeBatch("bad name".into()).into();
        assert!(matches!(
            rejected,
            UpdateError::ChangeRejected(ProviderError::InvalidChangeBatch(ref m)) if m == "bad name"
        ));
        assert_eq!(rejected.to_string(), "Change rejected");

        let other: UpdateError = ProviderError::Other("throttled".into()).into();
        assert!(matches!(other, UpdateError::Provider(_)));
    }

    #[test]
    fn test_lookup_error_message() {
        let err = UpdateError::from(LookupError::Malformed {
            url: "https://api.ipify.org".into(),
            value: "nope".into(),
        });
        assert_eq!(err.to_string(), "Failed to get IP address");
    }
}
