// Ciphergate — Caller Origin
//
// Resolves the network origin recorded on audit records: the peer IP of the
// connection, or the first hop of a forwarded-for list when a trusted proxy
// sits in front of the server. Falls back to the "unknown" sentinel.

use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::store::UNKNOWN_SOURCE;

/// The caller's network origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceAddress(String);

impl SourceAddress {
    pub fn unknown() -> Self {
        Self(UNKNOWN_SOURCE.to_string())
    }

    /// Origin of a directly connected peer. The port is dropped.
    pub fn from_peer(addr: SocketAddr) -> Self {
        Self(addr.ip().to_string())
    }

    /// First entry of a comma-separated forwarded-for list, if it is an IP
    /// address.
    pub fn from_forwarded_for(value: &str) -> Option<Self> {
        let first = value.split(',').next()?.trim();
        first.parse::<IpAddr>().ok().map(|ip| Self(ip.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SourceAddress {
    fn default() -> Self {
        Self::unknown()
    }
}

impl fmt::Display for SourceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
