//! Protocol version of a wire message.
//!
//! The transport only speaks HTTP/1.x, but the version parser accepts any
//! `HTTP/<major>.<minor>` token so that callers can hand through whatever the
//! framework side declares and let the parser be the single place that rejects it.

use std::fmt;

use crate::ensure;
use crate::protocol::ParseError;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct WireVersion {
    major: u8,
    minor: u8,
}

impl WireVersion {
    pub const HTTP_10: WireVersion = WireVersion { major: 1, minor: 0 };
    pub const HTTP_11: WireVersion = WireVersion { major: 1, minor: 1 };

    /// Parses a version token such as `HTTP/1.1`.
    ///
    /// The protocol name is matched case-insensitively; both version numbers must be
    /// a single decimal digit.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let invalid = || ParseError::InvalidVersion(text.to_string());

        let text_trimmed = text.trim();
        let (protocol, numbers) = text_trimmed.split_once('/').ok_or_else(invalid)?;
        ensure!(protocol.eq_ignore_ascii_case("HTTP"), invalid());

        let numbers = numbers.as_bytes();
        ensure!(numbers.len() == 3 && numbers[1] == b'.', invalid());
        ensure!(numbers[0].is_ascii_digit() && numbers[2].is_ascii_digit(), invalid());

        Ok(Self { major: numbers[0] - b'0', minor: numbers[2] - b'0' })
    }

    #[inline]
    pub fn major(&self) -> u8 {
        self.major
    }

    #[inline]
    pub fn minor(&self) -> u8 {
        self.minor
    }
}

impl fmt::Display for WireVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP/{}.{}", self.major, self.minor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_versions() {
        assert_eq!(WireVersion::parse("HTTP/1.1").unwrap(), WireVersion::HTTP_11);
        assert_eq!(WireVersion::parse("HTTP/1.0").unwrap(), WireVersion::HTTP_10);
        assert_eq!(WireVersion::parse("http/1.1").unwrap(), WireVersion::HTTP_11);
    }

    #[test]
    fn parse_passes_other_versions_through() {
        let version = WireVersion::parse("HTTP/2.0").unwrap();
        assert_eq!(version.major(), 2);
        assert_eq!(version.minor(), 0);
        assert_eq!(version.to_string(), "HTTP/2.0");
    }

    #[test]
    fn parse_rejects_garbage() {
        for token in ["", "HTTP", "HTTP/", "HTTP/1", "HTTP/1.10", "HTTPS/1.1", "HTTP/a.b", "HTTP/1,1"] {
            assert!(matches!(WireVersion::parse(token), Err(ParseError::InvalidVersion(_))), "{token}");
        }
    }
}
