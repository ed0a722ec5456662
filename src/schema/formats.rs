//! String format checks.
//!
//! Fixed catalogue: date-time, date, time (chrono), email, hostname,
//! uri (anchored regexes), ipv4, ipv6 (std parsers), regex (must
//! compile). Unknown format names are annotation-only and accepted,
//! matching draft-7 behavior.

use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, NaiveTime};
use regex::Regex;

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap())
}

fn hostname_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)*[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?$").unwrap()
    })
}

fn uri_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*:\S*$").unwrap())
}

/// Checks a string against a named format.
///
/// Returns `true` for format names outside the catalogue.
pub fn check_format(name: &str, s: &str) -> bool {
    match name {
        "date-time" => DateTime::parse_from_rfc3339(s).is_ok(),
        "date" => NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok(),
        "time" => {
            NaiveTime::parse_from_str(s, "%H:%M:%S").is_ok()
                || NaiveTime::parse_from_str(s, "%H:%M:%S%.f").is_ok()
        }
        "email" => email_re().is_match(s),
        "hostname" => s.len() <= 253 && hostname_re().is_match(s),
        "uri" => uri_re().is_match(s),
        "ipv4" => s.parse::<Ipv4Addr>().is_ok(),
        "ipv6" => s.parse::<Ipv6Addr>().is_ok(),
        "regex" => Regex::new(s).is_ok(),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_time() {
        assert!(check_format("date-time", "2024-05-01T12:30:00Z"));
        assert!(check_format("date-time", "2024-05-01T12:30:00+02:00"));
        assert!(!check_format("date-time", "2024-05-01"));
        assert!(!check_format("date-time", "not a date"));
    }

    #[test]
    fn test_date_and_time() {
        assert!(check_format("date", "2024-12-31"));
        assert!(!check_format("date", "2024-13-01"));
        assert!(check_format("time", "23:59:59"));
        assert!(check_format("time", "23:59:59.125"));
        assert!(!check_format("time", "25:00:00"));
    }

    #[test]
    fn test_email() {
        assert!(check_format("email", "a@example.com"));
        assert!(!check_format("email", "not-an-email"));
        assert!(!check_format("email", "a b@example.com"));
    }

    #[test]
    fn test_hostname() {
        assert!(check_format("hostname", "example.com"));
        assert!(check_format("hostname", "localhost"));
        assert!(!check_format("hostname", "-leading.example.com"));
    }

    #[test]
    fn test_uri() {
        assert!(check_format("uri", "https://example.com/a?b=c"));
        assert!(check_format("uri", "urn:isbn:0451450523"));
        assert!(!check_format("uri", "no scheme here"));
    }

    #[test]
    fn test_ip_addresses() {
        assert!(check_format("ipv4", "192.168.0.1"));
        assert!(!check_format("ipv4", "999.0.0.1"));
        assert!(check_format("ipv6", "::1"));
        assert!(!check_format("ipv6", "192.168.0.1"));
    }

    #[test]
    fn test_regex_format() {
        assert!(check_format("regex", "^a+$"));
        assert!(!check_format("regex", "(unclosed"));
    }

    #[test]
    fn test_unknown_format_accepted() {
        assert!(check_format("color", "anything at all"));
    }
}
