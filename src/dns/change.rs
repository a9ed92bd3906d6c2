use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use crate::error::UpdateError;
use crate::ip::IpFamily;

/// TTL written on every record, in seconds.
pub const RECORD_TTL: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordType {
    A,
    Aaaa,
}

impl RecordType {
    pub fn for_family(family: IpFamily) -> Self {
        match family {
            IpFamily::V4 => RecordType::A,
            IpFamily::V6 => RecordType::Aaaa,
        }
    }

    pub fn family(self) -> IpFamily {
        match self {
            RecordType::A => IpFamily::V4,
            RecordType::Aaaa => IpFamily::V6,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = UpdateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(RecordType::A),
            "AAAA" => Ok(RecordType::Aaaa),
            other => Err(UpdateError::InvalidArgument(format!(
                "unsupported record type {:?}, expected A or AAAA",
                other
            ))),
        }
    }
}

/// Only create-or-replace is ever issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeAction {
    Upsert,
}

/// A single resource record change, ready to be submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    action: ChangeAction,
    name: String,
    record_type: RecordType,
    ttl: u32,
    value: IpAddr,
}

impl ChangeRecord {
    pub fn action(&self) -> ChangeAction {
        self.action
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    pub fn ttl(&self) -> u32 {
        self.ttl
    }

    pub fn value(&self) -> IpAddr {
        self.value
    }
}

impl fmt::Display for ChangeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "UPSERT {} {} {} {}",
            self.name, self.ttl, self.record_type, self.value
        )
    }
}

/// Build the UPSERT change for `hostname` pointing at `address`.
///
/// `record_type` must be `"A"` or `"AAAA"` and agree with the address
/// family; anything else is [`UpdateError::InvalidArgument`].
pub fn build_change(
    hostname: &str,
    address: IpAddr,
    record_type: &str,
) -> Result<ChangeRecord, UpdateError> {
    let record_type: RecordType = record_type.parse()?;

    if !record_type.family().matches(&address) {
        return Err(UpdateError::InvalidArgument(format!(
            "{} record cannot hold {}",
            record_type, address
        )));
    }

    Ok(ChangeRecord {
        action: ChangeAction::Upsert,
        name: hostname.to_string(),
        record_type,
        ttl: RECORD_TTL,
        value: address,
    })
}

/// Ordered changes submitted together, with an informational comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeBatch {
    comment: String,
    changes: Vec<ChangeRecord>,
}

impl ChangeBatch {
    pub fn new(comment: impl Into<String>) -> Self {
        Self {
            comment: comment.into(),
            changes: Vec::new(),
        }
    }

    pub fn push(&mut self, change: ChangeRecord) {
        self.changes.push(change);
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn changes(&self) -> &[ChangeRecord] {
        &self.changes
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// `user@host via r53up`, identifying who submitted a change.
pub fn client_comment() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());
    let host = hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "unknown".to_string());

    format!("{}@{} via {}", user, host, env!("CARGO_PKG_NAME"))
}
