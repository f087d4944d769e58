use std::net::IpAddr;

use crate::error::ScanError;
use crate::types::ValidTarget;

/// Check that `raw` is an IPv4/IPv6 literal or has a minimal domain-name
/// shape: at least two non-empty dot-separated labels and at least one
/// alphabetic character. No DNS resolution happens here.
///
/// The alphabetic requirement keeps malformed literals like
/// `999.999.999.999` from slipping through as "domains".
pub fn validate_target(raw: &str) -> Result<ValidTarget, ScanError> {
    let target = raw.trim();
    if target.is_empty() || target.chars().any(char::is_whitespace) {
        return Err(ScanError::InvalidTarget(raw.to_string()));
    }

    if target.parse::<IpAddr>().is_ok() {
        return Ok(ValidTarget::new(target));
    }

    let shaped = target.contains('.')
        && target.split('.').all(|l| !l.is_empty())
        && target.chars().any(|c| c.is_ascii_alphabetic());
    if shaped {
        Ok(ValidTarget::new(target))
    } else {
        Err(ScanError::InvalidTarget(raw.to_string()))
    }
}

/// Parse a `start-end` port range. Exactly one `-`, both sides base-10
/// integers, `1 <= start <= end <= 65535`.
pub fn validate_port_range(raw: &str) -> Result<(u16, u16), ScanError> {
    let text = raw.trim();
    let (a, b) = text
        .split_once('-')
        .ok_or_else(|| ScanError::invalid_range(raw, "expected start-end, e.g. 1-500"))?;
    if b.contains('-') {
        return Err(ScanError::invalid_range(raw, "expected a single separator"));
    }

    let start: u32 = a
        .trim()
        .parse()
        .map_err(|_| ScanError::invalid_range(raw, format!("invalid start port: {a}")))?;
    let end: u32 = b
        .trim()
        .parse()
        .map_err(|_| ScanError::invalid_range(raw, format!("invalid end port: {b}")))?;

    if start < 1 {
        return Err(ScanError::invalid_range(raw, "ports start at 1"));
    }
    if end > 65535 {
        return Err(ScanError::invalid_range(raw, format!("port out of range: {end}")));
    }
    if start > end {
        return Err(ScanError::invalid_range(raw, "start is greater than end"));
    }

    Ok((start as u16, end as u16))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ip_literals_accepted() {
        assert!(validate_target("127.0.0.1").is_ok());
        assert!(validate_target("192.168.1.254").is_ok());
        assert!(validate_target("::1").is_ok());
        assert!(validate_target("2001:db8::1").is_ok());
    }

    #[test]
    fn domains_accepted() {
        assert!(validate_target("example.com").is_ok());
        assert!(validate_target("sub.example.co.uk").is_ok());
        // Surrounding whitespace is trimmed, not rejected.
        assert_eq!(
            validate_target("  example.com ").unwrap().as_str(),
            "example.com"
        );
    }

    #[test]
    fn out_of_range_octets_rejected() {
        assert!(validate_target("999.999.999.999").is_err());
    }

    #[test]
    fn empty_and_shapeless_targets_rejected() {
        assert!(validate_target("").is_err());
        assert!(validate_target("   ").is_err());
        assert!(validate_target("localhost").is_err());
        assert!(validate_target("trailing.dot.").is_err());
        assert!(validate_target("has space.com").is_err());
    }

    #[test]
    fn valid_ranges_parse() {
        assert_eq!(validate_port_range("1-500").unwrap(), (1, 500));
        assert_eq!(validate_port_range("80-80").unwrap(), (80, 80));
        assert_eq!(validate_port_range(" 1 - 65535 ").unwrap(), (1, 65535));
    }

    #[test]
    fn inverted_range_rejected() {
        assert!(validate_port_range("10-5").is_err());
    }

    #[test]
    fn zero_start_rejected() {
        assert!(validate_port_range("0-100").is_err());
    }

    #[test]
    fn oversized_end_rejected() {
        assert!(validate_port_range("1-70000").is_err());
    }

    #[test]
    fn malformed_ranges_rejected() {
        assert!(validate_port_range("80").is_err());
        assert!(validate_port_range("a-b").is_err());
        assert!(validate_port_range("1-2-3").is_err());
        assert!(validate_port_range("-").is_err());
        assert!(validate_port_range("").is_err());
    }
}
