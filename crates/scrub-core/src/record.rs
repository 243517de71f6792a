//! Record identifiers and the masked address value

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;

/// Address written over every scrubbed comment when no valid override exists
pub const DEFAULT_MASKED_IP: &str = "127.0.0.1";

/// Identifier of a stored comment
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl RecordId {
    pub fn get(self) -> u64 {
        self.0
    }

    /// Zero is never assigned by a store
    pub fn is_valid(self) -> bool {
        self.0 > 0
    }
}

impl From<u64> for RecordId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A syntactically valid IP address used as the replacement value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MaskedValue(String);

impl MaskedValue {
    /// Accepts the candidate only if it parses as an IPv4 or IPv6 address.
    pub fn parse(candidate: &str) -> Option<Self> {
        if candidate.is_empty() {
            return None;
        }
        candidate
            .parse::<IpAddr>()
            .ok()
            .map(|_| Self(candidate.to_string()))
    }

    /// Validated override, or the default when the override is absent or invalid.
    pub fn resolve(candidate: Option<&str>) -> Self {
        candidate.and_then(Self::parse).unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Exact string comparison; `127.0.0.01` and `127.0.0.1` differ.
    pub fn matches(&self, stored: &str) -> bool {
        self.0 == stored
    }
}

impl Default for MaskedValue {
    fn default() -> Self {
        Self(DEFAULT_MASKED_IP.to_string())
    }
}

impl fmt::Display for MaskedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A comment about to be persisted by the host
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewComment {
    #[serde(default)]
    pub post_id: u64,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub author_email: String,
    #[serde(default)]
    pub author_ip: String,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masked_value_accepts_ipv4_and_ipv6() {
        assert_eq!(MaskedValue::resolve(Some("10.0.0.5")).as_str(), "10.0.0.5");
        assert_eq!(MaskedValue::resolve(Some("::1")).as_str(), "::1");
        assert_eq!(
            MaskedValue::resolve(Some("2001:db8::ff00:42:8329")).as_str(),
            "2001:db8::ff00:42:8329"
        );
    }

    #[test]
    fn test_masked_value_falls_back_to_default() {
        assert_eq!(MaskedValue::resolve(Some("not-an-ip")).as_str(), DEFAULT_MASKED_IP);
        assert_eq!(MaskedValue::resolve(Some("")).as_str(), DEFAULT_MASKED_IP);
        assert_eq!(MaskedValue::resolve(Some(" 10.0.0.5")).as_str(), DEFAULT_MASKED_IP);
        assert_eq!(MaskedValue::resolve(Some("127.0.0.01")).as_str(), DEFAULT_MASKED_IP);
        assert_eq!(MaskedValue::resolve(None).as_str(), DEFAULT_MASKED_IP);
    }

    #[test]
    fn test_matches_is_string_equality() {
        let masked = MaskedValue::default();
        assert!(masked.matches("127.0.0.1"));
        assert!(!masked.matches("127.0.0.01"));
        assert!(!masked.matches(""));
    }

    #[test]
    fn test_record_id_validity() {
        assert!(!RecordId(0).is_valid());
        assert!(RecordId(7).is_valid());
        assert_eq!(RecordId::from(7).to_string(), "7");
    }
}
