//! IMAP command builder.
//!
//! This module provides types and serialization for the commands a draft
//! upload needs.

mod serialize;
mod tag_generator;

use std::fmt;

use chrono::{DateTime, FixedOffset};

use crate::types::{Flag, Mailbox};

pub use tag_generator::TagGenerator;

use serialize::{write_astring, write_date_time, write_flag_list, write_mailbox};

/// IMAP command.
#[derive(Clone, PartialEq, Eq)]
pub enum Command {
    /// CAPABILITY command.
    Capability,
    /// NOOP command.
    Noop,
    /// LOGOUT command.
    Logout,
    /// LOGIN command.
    Login {
        /// Username.
        username: String,
        /// Password.
        password: String,
    },
    /// APPEND command line, up to and including the literal announcement.
    ///
    /// The message itself follows once the server sends a continuation.
    Append {
        /// Target mailbox.
        mailbox: Mailbox,
        /// Flags to set; written as `()` when empty.
        flags: Vec<Flag>,
        /// Internal date to record for the message.
        internal_date: Option<DateTime<FixedOffset>>,
        /// Size of the message literal in bytes.
        size: usize,
    },
}

impl Command {
    /// Serializes the command to bytes with the given tag.
    #[must_use]
    pub fn serialize(&self, tag: &str) -> Vec<u8> {
        let mut buf = Vec::with_capacity(64);
        buf.extend_from_slice(tag.as_bytes());
        buf.push(b' ');

        match self {
            Self::Capability => buf.extend_from_slice(b"CAPABILITY"),
            Self::Noop => buf.extend_from_slice(b"NOOP"),
            Self::Logout => buf.extend_from_slice(b"LOGOUT"),
            Self::Login { username, password } => {
                buf.extend_from_slice(b"LOGIN ");
                write_astring(&mut buf, username);
                buf.push(b' ');
                write_astring(&mut buf, password);
            }
            Self::Append {
                mailbox,
                flags,
                internal_date,
                size,
            } => {
                buf.extend_from_slice(b"APPEND ");
                write_mailbox(&mut buf, mailbox);
                buf.push(b' ');
                write_flag_list(&mut buf, flags);
                if let Some(date) = internal_date {
                    buf.push(b' ');
                    write_date_time(&mut buf, date);
                }
                buf.extend_from_slice(format!(" {{{size}}}").as_bytes());
            }
        }

        buf.extend_from_slice(b"\r\n");
        buf
    }

    /// Returns the command name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Capability => "CAPABILITY",
            Self::Noop => "NOOP",
            Self::Logout => "LOGOUT",
            Self::Login { .. } => "LOGIN",
            Self::Append { .. } => "APPEND",
        }
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Login { username, .. } => f
                .debug_struct("Login")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Self::Append {
                mailbox,
                flags,
                internal_date,
                size,
            } => f
                .debug_struct("Append")
                .field("mailbox", mailbox)
                .field("flags", flags)
                .field("internal_date", internal_date)
                .field("size", size)
                .finish(),
            other => f.write_str(other.name()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_simple_commands() {
        assert_eq!(Command::Capability.serialize("A0001"), b"A0001 CAPABILITY\r\n");
        assert_eq!(Command::Noop.serialize("A0002"), b"A0002 NOOP\r\n");
        assert_eq!(Command::Logout.serialize("A0003"), b"A0003 LOGOUT\r\n");
    }

    #[test]
    fn test_login_quotes_when_needed() {
        let cmd = Command::Login {
            username: "user@example.com".to_string(),
            password: "p4ss \"word\"".to_string(),
        };
        assert_eq!(
            cmd.serialize("A0001"),
            b"A0001 LOGIN user@example.com \"p4ss \\\"word\\\"\"\r\n"
        );
    }

    #[test]
    fn test_login_debug_redacts_password() {
        let cmd = Command::Login {
            username: "user".to_string(),
            password: "hunter2".to_string(),
        };
        let debug = format!("{cmd:?}");
        assert!(debug.contains("user"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_append_line() {
        let date = FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2024, 1, 17, 8, 5, 9)
            .unwrap();
        let cmd = Command::Append {
            mailbox: Mailbox::new("[Gmail]/Drafts"),
            flags: Vec::new(),
            internal_date: Some(date),
            size: 310,
        };

        assert_eq!(
            cmd.serialize("A0002"),
            b"A0002 APPEND [Gmail]/Drafts () \"17-Jan-2024 08:05:09 +0100\" {310}\r\n"
        );
    }

    #[test]
    fn test_append_without_date() {
        let cmd = Command::Append {
            mailbox: Mailbox::new("Drafts"),
            flags: vec![Flag::Draft],
            internal_date: None,
            size: 0,
        };
        assert_eq!(cmd.serialize("X1"), b"X1 APPEND Drafts (\\Draft) {0}\r\n");
    }
}
