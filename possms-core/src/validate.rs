//! Phone number format gate.
//!
//! [`validate`] is deliberately liberal: it rejects empty input and obvious
//! typos, and leaves deliverability to the SMS gateway. [`canonicalize`] is the
//! stricter form the gateway receives.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

/// Result of [`validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validity {
    Valid,
    /// Empty or whitespace-only input.
    Missing,
    /// Non-empty input that does not look like a phone number.
    InvalidFormat,
}

impl Validity {
    pub fn is_valid(self) -> bool {
        matches!(self, Validity::Valid)
    }
}

impl fmt::Display for Validity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Validity::Valid => write!(f, "valid"),
            Validity::Missing => write!(f, "missing"),
            Validity::InvalidFormat => write!(f, "invalid format"),
        }
    }
}

fn format_gate() -> &'static Regex {
    static GATE: OnceLock<Regex> = OnceLock::new();
    GATE.get_or_init(|| Regex::new(r"^\+?[0-9 \-]{7,}$").expect("static regex"))
}

fn gateway_format() -> &'static Regex {
    static GATEWAY: OnceLock<Regex> = OnceLock::new();
    GATEWAY.get_or_init(|| Regex::new(r"^\+?[0-9]{7,15}$").expect("static regex"))
}

/// Optional leading `+`, then at least 7 of: ASCII digits, spaces, hyphens.
pub fn validate(phone: &str) -> Validity {
    let trimmed = phone.trim();
    if trimmed.is_empty() {
        Validity::Missing
    } else if format_gate().is_match(trimmed) {
        Validity::Valid
    } else {
        Validity::InvalidFormat
    }
}

/// Strip spaces, hyphens and parentheses; accept `+` and 7–15 digits.
pub fn canonicalize(phone: &str) -> Option<String> {
    let cleaned: String = phone
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '(' | ')'))
        .collect();
    gateway_format().is_match(&cleaned).then_some(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("+15551234567")]
    #[case("+1 555-123-4567")]
    #[case("  5551234  ")]
    #[case("45 12 34 56 78")]
    #[case("1234567")]
    fn accepts(#[case] phone: &str) {
        assert_eq!(validate(phone), Validity::Valid);
    }

    #[rstest]
    #[case("abc")]
    #[case("123")]
    #[case("123456")]
    #[case("++1234567")]
    #[case("555-CALL-NOW")]
    #[case("(555) 1234567")]
    #[case("1234567+")]
    fn rejects_format(#[case] phone: &str) {
        assert_eq!(validate(phone), Validity::InvalidFormat);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\t\n")]
    fn reports_missing(#[case] phone: &str) {
        assert_eq!(validate(phone), Validity::Missing);
    }

    #[test]
    fn canonicalize_strips_separators() {
        assert_eq!(canonicalize("+45 (12) 34-56-78").as_deref(), Some("+4512345678"));
        assert_eq!(canonicalize("12 34"), None);
        assert_eq!(canonicalize("+1234567890123456"), None);
        assert_eq!(canonicalize("12a4567"), None);
    }
}
