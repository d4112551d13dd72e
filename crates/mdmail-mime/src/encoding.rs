//! MIME encoding and decoding utilities.
//!
//! Supports Base64, Quoted-Printable (RFC 2045), and RFC 2047 header encoding.

use crate::error::{Error, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::fmt::Write as _;

/// Encodes data as Base64.
#[must_use]
pub fn encode_base64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Decodes Base64 data.
///
/// # Errors
///
/// Returns an error if the input is not valid Base64.
pub fn decode_base64(data: &str) -> Result<Vec<u8>> {
    STANDARD.decode(data).map_err(Into::into)
}

/// Maximum encoded line length for Quoted-Printable, excluding CRLF.
const MAX_LINE_LENGTH: usize = 76;

/// Raw bytes carried by a single RFC 2047 encoded-word.
///
/// 45 bytes encode to 60 Base64 characters, which keeps
/// `=?utf-8?B?...?=` under the 75 character limit.
const ENCODED_WORD_BYTES: usize = 45;

/// Longest space-free run a header value may carry as plain text.
///
/// Headers fold only at spaces, so a longer word could push a line past the
/// 998 octet limit of RFC 5322 section 2.1.1 once the field name is added.
const MAX_PLAIN_WORD: usize = 900;

/// Encodes text using Quoted-Printable encoding (RFC 2045).
///
/// Line breaks (`\n` or `\r\n`) in the input become CRLF hard breaks.
/// Long lines are split with soft breaks so that no encoded line exceeds
/// 76 characters, and trailing whitespace is always encoded.
#[must_use]
pub fn encode_quoted_printable(text: &str) -> String {
    let mut result = String::with_capacity(text.len() + text.len() / 8);

    for (index, line) in text.split('\n').enumerate() {
        if index > 0 {
            result.push_str("\r\n");
        }
        encode_quoted_printable_line(line.strip_suffix('\r').unwrap_or(line), &mut result);
    }

    result
}

fn encode_quoted_printable_line(line: &str, out: &mut String) {
    let bytes = line.as_bytes();
    let mut line_length = 0;
    let mut token = String::with_capacity(3);

    for (i, &byte) in bytes.iter().enumerate() {
        let is_last = i + 1 == bytes.len();

        token.clear();
        match byte {
            b' ' | b'\t' if !is_last => token.push(byte as char),
            b'!'..=b'<' | b'>'..=b'~' => token.push(byte as char),
            _ => {
                let _ = write!(token, "={byte:02X}");
            }
        }

        // Leave room for the '=' of a soft break
        if line_length + token.len() > MAX_LINE_LENGTH - 1 {
            out.push_str("=\r\n");
            line_length = 0;
        }

        out.push_str(&token);
        line_length += token.len();
    }
}

/// Decodes Quoted-Printable text (RFC 2045) into raw bytes.
///
/// Soft line breaks are removed; hard line breaks are kept as they appear.
///
/// # Errors
///
/// Returns an error if the input contains invalid escape sequences.
pub fn decode_quoted_printable(text: &str) -> Result<Vec<u8>> {
    let bytes = text.as_bytes();
    let mut result = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'=' {
            result.push(bytes[i]);
            i += 1;
            continue;
        }

        // Soft line break, tolerating whitespace added in transport
        let mut j = i + 1;
        while j < bytes.len() && (bytes[j] == b' ' || bytes[j] == b'\t') {
            j += 1;
        }
        if bytes.get(j) == Some(&b'\r') && bytes.get(j + 1) == Some(&b'\n') {
            i = j + 2;
            continue;
        }
        if bytes.get(j) == Some(&b'\n') {
            i = j + 1;
            continue;
        }
        if j == bytes.len() {
            break;
        }

        let hex = bytes
            .get(i + 1..i + 3)
            .ok_or_else(|| Error::InvalidEncoding("Incomplete escape sequence".to_string()))?;
        let hex = std::str::from_utf8(hex)
            .map_err(|_| Error::InvalidEncoding("Invalid escape sequence".to_string()))?;
        let byte = u8::from_str_radix(hex, 16)
            .map_err(|e| Error::InvalidEncoding(format!("Invalid hex {hex:?}: {e}")))?;
        result.push(byte);
        i += 3;
    }

    Ok(result)
}

/// Returns true if a header value must be RFC 2047 encoded.
pub(crate) fn needs_rfc2047(text: &str) -> bool {
    text.contains("=?")
        || text.chars().any(|c| !c.is_ascii() || c.is_ascii_control())
        || text.split(' ').any(|word| word.len() > MAX_PLAIN_WORD)
}

/// Encodes a header value using RFC 2047 encoding.
///
/// Format: `=?charset?B?encoded-text?=`. ASCII text without control
/// characters or unfoldable runs is returned unchanged. Long values are split into several
/// encoded-words separated by a space, never splitting a character.
#[must_use]
pub fn encode_rfc2047(text: &str, charset: &str) -> String {
    if !needs_rfc2047(text) {
        return text.to_string();
    }

    let mut words = Vec::new();
    let mut chunk = String::new();

    for ch in text.chars() {
        if chunk.len() + ch.len_utf8() > ENCODED_WORD_BYTES {
            words.push(format!("=?{charset}?B?{}?=", encode_base64(chunk.as_bytes())));
            chunk.clear();
        }
        chunk.push(ch);
    }
    if !chunk.is_empty() {
        words.push(format!("=?{charset}?B?{}?=", encode_base64(chunk.as_bytes())));
    }

    words.join(" ")
}

/// Decodes RFC 2047 encoded-words within a header value.
///
/// Plain text around encoded-words is kept; whitespace between two adjacent
/// encoded-words is dropped as RFC 2047 section 6.2 requires. Malformed
/// encoded-words are kept literally.
///
/// # Errors
///
/// Returns an error if an encoded-word carries invalid Base64 or
/// Quoted-Printable data.
pub fn decode_rfc2047(text: &str) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    let mut previous_was_word = false;

    while let Some(start) = rest.find("=?") {
        let (before, candidate) = rest.split_at(start);

        if let Some((decoded, consumed)) = decode_encoded_word(candidate)? {
            if !(previous_was_word && before.trim().is_empty()) {
                out.push_str(before);
            }
            out.push_str(&decoded);
            rest = &candidate[consumed..];
            previous_was_word = true;
        } else {
            out.push_str(before);
            out.push_str("=?");
            rest = &candidate[2..];
            previous_was_word = false;
        }
    }

    out.push_str(rest);
    Ok(out)
}

/// Decodes one encoded-word at the start of `s`.
///
/// Returns the decoded text and the number of bytes consumed, or `None` if
/// `s` does not start with a well-formed encoded-word.
fn decode_encoded_word(s: &str) -> Result<Option<(String, usize)>> {
    let Some(inner) = s.strip_prefix("=?") else {
        return Ok(None);
    };
    let mut fields = inner.splitn(3, '?');
    let (Some(charset), Some(encoding), Some(payload)) = (fields.next(), fields.next(), fields.next())
    else {
        return Ok(None);
    };
    let Some(end) = payload.find("?=") else {
        return Ok(None);
    };
    let encoded_text = &payload[..end];
    if encoded_text.contains(char::is_whitespace) {
        return Ok(None);
    }

    let raw = match encoding {
        "B" | "b" => decode_base64(encoded_text)?,
        "Q" | "q" => decode_quoted_printable(&encoded_text.replace('_', " "))?,
        _ => return Ok(None),
    };

    let decoded = if charset.eq_ignore_ascii_case("iso-8859-1") {
        raw.iter().map(|&b| char::from(b)).collect()
    } else {
        String::from_utf8_lossy(&raw).into_owned()
    };

    let consumed = 2 + charset.len() + 1 + encoding.len() + 1 + end + 2;
    Ok(Some((decoded, consumed)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::redundant_clone, clippy::manual_string_new, clippy::needless_collect, clippy::unreadable_literal, clippy::used_underscore_items, clippy::similar_names)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_base64_encode_decode() {
        let data = b"Hello, World!";
        let encoded = encode_base64(data);
        assert_eq!(encoded, "SGVsbG8sIFdvcmxkIQ==");

        let decoded = decode_base64(&encoded).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn test_quoted_printable_encode_ascii_untouched() {
        assert_eq!(encode_quoted_printable("<h1>Hi</h1>"), "<h1>Hi</h1>");
    }

    #[test]
    fn test_quoted_printable_encode_specials() {
        assert_eq!(encode_quoted_printable("a=b"), "a=3Db");
        assert!(encode_quoted_printable("Héllo").contains("=C3=A9"));
    }

    #[test]
    fn test_quoted_printable_line_breaks_become_crlf() {
        assert_eq!(encode_quoted_printable("one\ntwo\r\nthree\n"), "one\r\ntwo\r\nthree\r\n");
    }

    #[test]
    fn test_quoted_printable_trailing_whitespace_encoded() {
        assert_eq!(encode_quoted_printable("end \nnext\t"), "end=20\r\nnext=09");
    }

    #[test]
    fn test_quoted_printable_soft_breaks_bound_line_length() {
        let long = "x".repeat(200);
        let encoded = encode_quoted_printable(&long);
        for line in encoded.split("\r\n") {
            assert!(line.len() <= MAX_LINE_LENGTH, "line too long: {}", line.len());
        }
        assert_eq!(decode_quoted_printable(&encoded).unwrap(), long.as_bytes());
    }

    #[test]
    fn test_quoted_printable_decode() {
        assert_eq!(decode_quoted_printable("H=C3=A9llo").unwrap(), "Héllo".as_bytes());
        assert_eq!(decode_quoted_printable("Hello=\r\nWorld").unwrap(), b"HelloWorld");
        assert_eq!(decode_quoted_printable("Hello= \nWorld").unwrap(), b"HelloWorld");
    }

    #[test]
    fn test_quoted_printable_decode_rejects_bad_escape() {
        assert!(decode_quoted_printable("bad=ZZ").is_err());
        assert!(decode_quoted_printable("short=4").is_err());
    }

    #[test]
    fn test_rfc2047_encode() {
        assert_eq!(encode_rfc2047("Hello? World", "utf-8"), "Hello? World");

        let encoded = encode_rfc2047("Héllo", "utf-8");
        assert_eq!(encoded, "=?utf-8?B?SMOpbGxv?=");
    }

    #[test]
    fn test_rfc2047_encode_splits_long_values() {
        let subject = "Ünïcödé ".repeat(20);
        let encoded = encode_rfc2047(&subject, "utf-8");
        for word in encoded.split(' ') {
            assert!(word.len() <= 75, "encoded-word too long: {word}");
        }
        assert_eq!(decode_rfc2047(&encoded).unwrap(), subject);
    }

    #[test]
    fn test_rfc2047_encode_unbreakable_ascii() {
        let subject = "x".repeat(1200);
        let encoded = encode_rfc2047(&subject, "utf-8");

        assert!(encoded.split(' ').all(|word| word.len() <= 75));
        assert_eq!(decode_rfc2047(&encoded).unwrap(), subject);

        let url = format!("see https://example.com/{}", "a".repeat(200));
        assert_eq!(encode_rfc2047(&url, "utf-8"), url);
    }

    #[test]
    fn test_rfc2047_decode() {
        assert_eq!(decode_rfc2047("Hello").unwrap(), "Hello");
        assert_eq!(decode_rfc2047("=?utf-8?B?SMOpbGxv?=").unwrap(), "Héllo");
        assert_eq!(decode_rfc2047("=?utf-8?Q?H=C3=A9llo_there?=").unwrap(), "Héllo there");
        assert_eq!(decode_rfc2047("=?iso-8859-1?Q?caf=E9?=").unwrap(), "café");
    }

    #[test]
    fn test_rfc2047_decode_mixed_text() {
        assert_eq!(
            decode_rfc2047("Re: =?utf-8?B?SMOpbGxv?= =?utf-8?B?IHRoZXJl?= again").unwrap(),
            "Re: Héllo there again"
        );
        assert_eq!(decode_rfc2047("odd =?not-a-word").unwrap(), "odd =?not-a-word");
    }

    proptest! {
        #[test]
        fn quoted_printable_decodes_to_input(text in "[ -~\u{e9}\u{4e2d}\t]{0,300}") {
            let encoded = encode_quoted_printable(&text);
            prop_assert!(encoded.is_ascii());
            prop_assert_eq!(decode_quoted_printable(&encoded).unwrap(), text.as_bytes());
        }
    }
}
