use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ScanError;

/// A target string that passed shape validation: an IPv4/IPv6 literal or a
/// dotted domain name. Constructed only through [`crate::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidTarget(String);

impl ValidTarget {
    pub(crate) fn new(target: &str) -> Self {
        Self(target.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ValidTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One scan: a validated target and an inclusive port range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    target: ValidTarget,
    start_port: u16,
    end_port: u16,
}

impl ScanRequest {
    /// Build a request, enforcing `1 <= start_port <= end_port`.
    /// (`end_port <= 65535` holds by construction of `u16`.)
    pub fn new(target: ValidTarget, start_port: u16, end_port: u16) -> Result<Self, ScanError> {
        if start_port == 0 {
            return Err(ScanError::invalid_range(
                &format!("{start_port}-{end_port}"),
                "ports start at 1",
            ));
        }
        if start_port > end_port {
            return Err(ScanError::invalid_range(
                &format!("{start_port}-{end_port}"),
                "start is greater than end",
            ));
        }
        Ok(Self {
            target,
            start_port,
            end_port,
        })
    }

    pub fn target(&self) -> &str {
        self.target.as_str()
    }

    pub fn start_port(&self) -> u16 {
        self.start_port
    }

    pub fn end_port(&self) -> u16 {
        self.end_port
    }

    /// Number of ports the scan will probe.
    pub fn total_ports(&self) -> u64 {
        u64::from(self.end_port) - u64::from(self.start_port) + 1
    }
}

/// Classified result of a single connect probe.
///
/// A probe that times out produces no outcome at all: closed/filtered ports
/// are counted toward progress but never reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortOutcome {
    /// The connect completed; the port accepts TCP connections.
    Open(u16),
    /// Name resolution failed. Reported once per occurrence, not deduplicated.
    NetworkError(String),
    /// The connect failed for any other reason (refused, unreachable, ...).
    UnexpectedError(u16, String),
}

/// Summary written by the CLI when `--output` is given.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ScanReport {
    pub target: String,
    pub start_port: u16,
    pub end_port: u16,
    pub scanned: u64,
    pub open_ports: Vec<u16>,
}
