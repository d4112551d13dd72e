//! Mailbox names.

use base64::Engine;
use base64::alphabet::IMAP_MUTF7;
use base64::engine::general_purpose::{GeneralPurpose, NO_PAD};

/// Base64 variant of RFC 3501 section 5.1.3 (`,` instead of `/`, no padding).
const MODIFIED_BASE64: GeneralPurpose = GeneralPurpose::new(&IMAP_MUTF7, NO_PAD);

/// Mailbox name as the user writes it (UTF-8).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Mailbox(pub String);

impl Mailbox {
    /// Creates a new mailbox name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the mailbox name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the name in modified UTF-7, the form sent on the wire.
    ///
    /// Printable ASCII passes through, `&` becomes `&-`, and every other run
    /// of characters is written as `&<modified base64 of UTF-16BE>-`.
    #[must_use]
    pub fn encoded(&self) -> String {
        let mut out = String::with_capacity(self.0.len());
        let mut pending: Vec<u16> = Vec::new();

        for c in self.0.chars() {
            if matches!(c, ' '..='~') {
                flush_utf16(&mut pending, &mut out);
                if c == '&' {
                    out.push_str("&-");
                } else {
                    out.push(c);
                }
            } else {
                let mut units = [0u16; 2];
                pending.extend_from_slice(c.encode_utf16(&mut units));
            }
        }
        flush_utf16(&mut pending, &mut out);

        out
    }
}

fn flush_utf16(pending: &mut Vec<u16>, out: &mut String) {
    if pending.is_empty() {
        return;
    }
    let bytes: Vec<u8> = pending.iter().flat_map(|unit| unit.to_be_bytes()).collect();
    out.push('&');
    out.push_str(&MODIFIED_BASE64.encode(bytes));
    out.push('-');
    pending.clear();
}

impl std::fmt::Display for Mailbox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_names_unchanged() {
        assert_eq!(Mailbox::new("[Gmail]/Drafts").encoded(), "[Gmail]/Drafts");
        assert_eq!(Mailbox::new("Drafts").encoded(), "Drafts");
    }

    #[test]
    fn test_ampersand_escaped() {
        assert_eq!(Mailbox::new("R&D").encoded(), "R&-D");
    }

    #[test]
    fn test_non_ascii_encoded() {
        // RFC 3501 section 5.1.3 examples
        assert_eq!(Mailbox::new("~peter/mail/台北/日本語").encoded(), "~peter/mail/&U,BTFw-/&ZeVnLIqe-");
        assert_eq!(Mailbox::new("Entwürfe").encoded(), "Entw&APw-rfe");
    }
}
