//! Server capabilities.

use std::fmt;

/// A capability the client acts on, or any other advertised name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Capability {
    /// `IMAP4rev1`
    Imap4Rev1,
    /// `IMAP4rev2`
    Imap4Rev2,
    /// `UIDPLUS`: APPEND answers with `[APPENDUID]`.
    UidPlus,
    /// `LITERAL+`
    LiteralPlus,
    /// `STARTTLS`
    StartTls,
    /// `LOGINDISABLED`: LOGIN must not be used on this connection.
    LoginDisabled,
    /// `AUTH=<mechanism>`
    Auth(String),
    /// Anything else, as advertised.
    Other(String),
}

const NAMED: [(&str, Capability); 6] = [
    ("IMAP4rev1", Capability::Imap4Rev1),
    ("IMAP4rev2", Capability::Imap4Rev2),
    ("UIDPLUS", Capability::UidPlus),
    ("LITERAL+", Capability::LiteralPlus),
    ("STARTTLS", Capability::StartTls),
    ("LOGINDISABLED", Capability::LoginDisabled),
];

impl Capability {
    /// Interprets one capability atom. Names are case-insensitive.
    #[must_use]
    pub fn parse(atom: &str) -> Self {
        if let Some((_, capability)) = NAMED
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(atom))
        {
            return capability.clone();
        }
        match atom.split_once('=') {
            Some((prefix, mechanism)) if prefix.eq_ignore_ascii_case("AUTH") => {
                Self::Auth(mechanism.to_string())
            }
            _ => Self::Other(atom.to_string()),
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auth(mechanism) => write!(f, "AUTH={mechanism}"),
            Self::Other(name) => f.write_str(name),
            known => {
                let name = NAMED
                    .iter()
                    .find_map(|(name, capability)| (capability == known).then_some(*name))
                    .unwrap_or_default();
                f.write_str(name)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(Capability::parse("IMAP4rev1"), Capability::Imap4Rev1);
        assert_eq!(Capability::parse("imap4REV2"), Capability::Imap4Rev2);
        assert_eq!(Capability::parse("logindisabled"), Capability::LoginDisabled);
        assert_eq!(Capability::parse("auth=PLAIN"), Capability::Auth("PLAIN".to_string()));
        assert_eq!(
            Capability::parse("X-GM-EXT-1"),
            Capability::Other("X-GM-EXT-1".to_string())
        );
        assert_eq!(
            Capability::parse("COMPRESS=DEFLATE"),
            Capability::Other("COMPRESS=DEFLATE".to_string())
        );
    }

    #[test]
    fn test_display_round_trips_known_names() {
        for name in ["IMAP4rev1", "UIDPLUS", "LITERAL+", "LOGINDISABLED", "AUTH=XOAUTH2"] {
            assert_eq!(Capability::parse(name).to_string(), name);
        }
    }
}
