//! Command serialization helpers.

use chrono::{DateTime, FixedOffset};

use crate::types::{Flag, Mailbox};

/// Writes an astring: bare when it is a valid atom, otherwise quoted.
pub fn write_astring(buf: &mut Vec<u8>, s: &str) {
    if s.is_empty() || s.bytes().any(needs_quoting) {
        buf.push(b'"');
        for b in s.bytes() {
            if b == b'"' || b == b'\\' {
                buf.push(b'\\');
            }
            buf.push(b);
        }
        buf.push(b'"');
    } else {
        buf.extend_from_slice(s.as_bytes());
    }
}

/// Writes a mailbox name in modified UTF-7.
pub fn write_mailbox(buf: &mut Vec<u8>, mailbox: &Mailbox) {
    write_astring(buf, &mailbox.encoded());
}

/// Writes a parenthesized flag list; `()` when empty.
pub fn write_flag_list(buf: &mut Vec<u8>, flags: &[Flag]) {
    buf.push(b'(');
    for (i, flag) in flags.iter().enumerate() {
        if i > 0 {
            buf.push(b' ');
        }
        buf.extend_from_slice(flag.as_str().as_bytes());
    }
    buf.push(b')');
}

/// Writes an RFC 3501 `date-time`, e.g. `"05-Mar-2024 09:30:00 +0200"`.
pub fn write_date_time(buf: &mut Vec<u8>, date: &DateTime<FixedOffset>) {
    buf.extend_from_slice(date.format("\"%d-%b-%Y %H:%M:%S %z\"").to_string().as_bytes());
}

/// Returns true if the byte cannot appear in an unquoted astring.
const fn needs_quoting(b: u8) -> bool {
    matches!(b, b' ' | b'"' | b'\\' | b'(' | b')' | b'{' | b'%' | b'*') || b < 0x20 || b >= 0x7F
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn astring(s: &str) -> String {
        let mut buf = Vec::new();
        write_astring(&mut buf, s);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_astring_quoting() {
        assert_eq!(astring("user@example.com"), "user@example.com");
        assert_eq!(astring(""), "\"\"");
        assert_eq!(astring("pass word"), "\"pass word\"");
        assert_eq!(astring("a\"b\\c"), "\"a\\\"b\\\\c\"");
    }

    #[test]
    fn test_mailbox_with_brackets_stays_bare() {
        let mut buf = Vec::new();
        write_mailbox(&mut buf, &Mailbox::new("[Gmail]/Drafts"));
        assert_eq!(buf, b"[Gmail]/Drafts");
    }

    #[test]
    fn test_flag_list() {
        let mut buf = Vec::new();
        write_flag_list(&mut buf, &[]);
        assert_eq!(buf, b"()");

        buf.clear();
        write_flag_list(&mut buf, &[Flag::Draft, Flag::Seen]);
        assert_eq!(buf, b"(\\Draft \\Seen)");
    }

    #[test]
    fn test_date_time() {
        let date = FixedOffset::west_opt(5 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 5, 9, 30, 0)
            .unwrap();
        let mut buf = Vec::new();
        write_date_time(&mut buf, &date);
        assert_eq!(buf, b"\"05-Mar-2024 09:30:00 -0500\"");
    }
}
