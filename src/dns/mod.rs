mod change;
mod provider;
mod route53;

pub use change::{
    build_change, client_comment, ChangeAction, ChangeBatch, ChangeRecord, RecordType, RECORD_TTL,
};
pub use provider::{ChangeResponse, DnsProvider};
pub use route53::Route53Provider;
