//! MIME message structure, serialization and parsing.

use crate::content_type::ContentType;
use crate::encoding::{decode_base64, decode_quoted_printable};
use crate::error::{Error, Result};
use crate::header::Headers;
use std::fmt;

/// Transfer encoding types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferEncoding {
    /// 7-bit ASCII.
    SevenBit,
    /// 8-bit binary.
    EightBit,
    /// Base64 encoding.
    Base64,
    /// Quoted-Printable encoding.
    QuotedPrintable,
    /// Binary (no encoding).
    Binary,
}

impl TransferEncoding {
    /// Parses transfer encoding from string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "8bit" => Self::EightBit,
            "base64" => Self::Base64,
            "quoted-printable" => Self::QuotedPrintable,
            "binary" => Self::Binary,
            _ => Self::SevenBit,
        }
    }

    fn decode(self, body: &[u8]) -> Result<Vec<u8>> {
        match self {
            Self::Base64 => {
                let cleaned: String = String::from_utf8_lossy(body)
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .collect();
                decode_base64(&cleaned)
            }
            Self::QuotedPrintable => decode_quoted_printable(&String::from_utf8_lossy(body)),
            _ => Ok(body.to_vec()),
        }
    }
}

impl fmt::Display for TransferEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SevenBit => write!(f, "7bit"),
            Self::EightBit => write!(f, "8bit"),
            Self::Base64 => write!(f, "base64"),
            Self::QuotedPrintable => write!(f, "quoted-printable"),
            Self::Binary => write!(f, "binary"),
        }
    }
}

/// MIME message part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    /// Part headers.
    pub headers: Headers,
    /// Part body, still transfer-encoded.
    pub body: Vec<u8>,
}

impl Part {
    /// Creates a new part.
    #[must_use]
    pub const fn new(headers: Headers, body: Vec<u8>) -> Self {
        Self { headers, body }
    }

    /// Gets the content type, defaulting to `text/plain`.
    ///
    /// # Errors
    ///
    /// Returns an error if content type header is invalid.
    pub fn content_type(&self) -> Result<ContentType> {
        self.headers
            .get("content-type")
            .map_or_else(|| Ok(ContentType::text_plain()), ContentType::parse)
    }

    /// Gets the disposition type (`inline`, `attachment`), without parameters.
    #[must_use]
    pub fn disposition(&self) -> Option<&str> {
        self.headers
            .get("content-disposition")
            .and_then(|value| value.split(';').next())
            .map(str::trim)
    }

    /// Gets the transfer encoding.
    #[must_use]
    pub fn transfer_encoding(&self) -> TransferEncoding {
        self.headers
            .get("content-transfer-encoding")
            .map_or(TransferEncoding::SevenBit, TransferEncoding::parse)
    }

    /// Decodes the body according to the transfer encoding.
    ///
    /// # Errors
    ///
    /// Returns an error if decoding fails.
    pub fn decode_body(&self) -> Result<Vec<u8>> {
        self.transfer_encoding().decode(&self.body)
    }

    /// Gets the decoded body as text with line breaks normalized to `\n`.
    ///
    /// # Errors
    ///
    /// Returns an error if decoding or UTF-8 conversion fails.
    pub fn body_text(&self) -> Result<String> {
        let text = String::from_utf8(self.decode_body()?)?;
        Ok(text.replace("\r\n", "\n"))
    }

    fn parse(text: &str) -> Result<Self> {
        let (head, body) = split_head_body(text);
        Ok(Self::new(Headers::parse(head)?, body.as_bytes().to_vec()))
    }
}

/// MIME message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Message headers.
    pub headers: Headers,
    /// Message parts (empty for single-part messages).
    pub parts: Vec<Part>,
    /// Body for single-part messages.
    pub body: Option<Vec<u8>>,
}

impl Message {
    /// Creates a single-part message.
    #[must_use]
    pub const fn single_part(headers: Headers, body: Vec<u8>) -> Self {
        Self {
            headers,
            parts: Vec::new(),
            body: Some(body),
        }
    }

    /// Creates a multipart message.
    #[must_use]
    pub const fn multipart(headers: Headers, parts: Vec<Part>) -> Self {
        Self {
            headers,
            parts,
            body: None,
        }
    }

    /// Parses a raw RFC 5322 message.
    ///
    /// Accepts CRLF or bare LF line endings. Multipart bodies are split
    /// into parts; the preamble and epilogue are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the headers, content type or multipart
    /// structure are malformed.
    pub fn parse(raw: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(raw)
            .map_err(|e| Error::Parse(format!("Message is not valid UTF-8: {e}")))?;
        let (head, body) = split_head_body(text);
        let headers = Headers::parse(head)?;

        let content_type = headers
            .get("content-type")
            .map_or_else(|| Ok(ContentType::text_plain()), ContentType::parse)?;

        if content_type.is_multipart() {
            let boundary = content_type.boundary().ok_or(Error::MissingBoundary)?;
            let parts = split_multipart(body, boundary)?;
            Ok(Self::multipart(headers, parts))
        } else {
            Ok(Self::single_part(headers, body.as_bytes().to_vec()))
        }
    }

    /// Serializes the message with CRLF line endings.
    ///
    /// # Errors
    ///
    /// Returns an error if a multipart message has no boundary.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = self.headers.to_string().into_bytes();
        out.extend_from_slice(b"\r\n");

        if self.parts.is_empty() {
            if let Some(body) = &self.body {
                out.extend_from_slice(body);
            }
            return Ok(out);
        }

        let content_type = self.content_type()?;
        let boundary = content_type.boundary().ok_or(Error::MissingBoundary)?;
        for part in &self.parts {
            out.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
            out.extend_from_slice(part.headers.to_string().as_bytes());
            out.extend_from_slice(b"\r\n");
            out.extend_from_slice(&part.body);
            out.extend_from_slice(b"\r\n");
        }
        out.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

        Ok(out)
    }

    /// Gets the content type, defaulting to `text/plain`.
    ///
    /// # Errors
    ///
    /// Returns an error if content type header is invalid.
    pub fn content_type(&self) -> Result<ContentType> {
        self.headers
            .get("content-type")
            .map_or_else(|| Ok(ContentType::text_plain()), ContentType::parse)
    }

    /// Gets the From header.
    #[must_use]
    pub fn from(&self) -> Option<&str> {
        self.headers.get("from")
    }

    /// Gets the To header.
    #[must_use]
    pub fn to(&self) -> Option<&str> {
        self.headers.get("to")
    }

    /// Gets the Subject header.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.headers.get("subject")
    }

    /// Gets the Date header.
    #[must_use]
    pub fn date(&self) -> Option<&str> {
        self.headers.get("date")
    }

    /// Gets the Message-ID header.
    #[must_use]
    pub fn message_id(&self) -> Option<&str> {
        self.headers.get("message-id")
    }

    /// Finds the first text/html part and returns its decoded text.
    ///
    /// # Errors
    ///
    /// Returns an error if no HTML part is found or decoding fails.
    pub fn html_part(&self) -> Result<String> {
        for part in &self.parts {
            if part.content_type()?.is("text", "html") {
                return part.body_text();
            }
        }

        Err(Error::Parse("No text/html part found".to_string()))
    }
}

/// Splits an entity at the blank line separating header and body.
fn split_head_body(text: &str) -> (&str, &str) {
    if let Some(body) = text.strip_prefix("\r\n").or_else(|| text.strip_prefix('\n')) {
        return ("", body);
    }

    let crlf = text.find("\r\n\r\n").map(|i| (i, i + 4));
    let lf = text.find("\n\n").map(|i| (i, i + 2));
    let split = match (crlf, lf) {
        (Some(a), Some(b)) => Some(if a.0 <= b.0 { a } else { b }),
        (a, b) => a.or(b),
    };

    match split {
        Some((head_end, body_start)) => (&text[..head_end], &text[body_start..]),
        None => (text, ""),
    }
}

/// Splits a multipart body on `--boundary` delimiter lines (RFC 2046 section 5.1.1).
fn split_multipart(body: &str, boundary: &str) -> Result<Vec<Part>> {
    let delimiter = format!("--{boundary}");
    let close_delimiter = format!("--{boundary}--");

    let mut parts = Vec::new();
    let mut current: Option<Vec<&str>> = None;
    let mut closed = false;

    for line in body.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let marker = line.trim_end();

        if marker == delimiter || marker == close_delimiter {
            if let Some(lines) = current.take() {
                parts.push(Part::parse(&lines.join("\r\n"))?);
            }
            if marker == close_delimiter {
                closed = true;
                break;
            }
            current = Some(Vec::new());
        } else if let Some(lines) = current.as_mut() {
            lines.push(line);
        }
    }

    if !closed {
        return Err(Error::InvalidMultipart(format!(
            "Missing closing delimiter --{boundary}--"
        )));
    }
    if parts.is_empty() {
        return Err(Error::InvalidMultipart("No body parts".to_string()));
    }

    Ok(parts)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::redundant_clone, clippy::similar_names)]
mod tests {
    use super::*;

    const DRAFT: &str = concat!(
        "MIME-Version: 1.0\r\n",
        "From: A <a@x.com>\r\n",
        "To: B <b@y.com>\r\n",
        "Subject: Hi\r\n",
        "Content-Type: multipart/mixed; boundary=b1\r\n",
        "\r\n",
        "preamble\r\n",
        "--b1\r\n",
        "Content-Type: text/html; charset=utf-8\r\n",
        "Content-Disposition: inline\r\n",
        "Content-Transfer-Encoding: quoted-printable\r\n",
        "\r\n",
        "<h1>H=C3=A9llo</h1>\r\n",
        "\r\n",
        "--b1--\r\n",
    );

    #[test]
    fn test_transfer_encoding_parse() {
        assert_eq!(TransferEncoding::parse("7bit"), TransferEncoding::SevenBit);
        assert_eq!(TransferEncoding::parse("Base64"), TransferEncoding::Base64);
        assert_eq!(
            TransferEncoding::parse("quoted-printable"),
            TransferEncoding::QuotedPrintable
        );
    }

    #[test]
    fn test_parse_multipart() {
        let message = Message::parse(DRAFT.as_bytes()).unwrap();

        assert_eq!(message.from(), Some("A <a@x.com>"));
        assert_eq!(message.subject(), Some("Hi"));
        assert_eq!(message.parts.len(), 1);

        let part = &message.parts[0];
        assert_eq!(part.disposition(), Some("inline"));
        assert_eq!(part.transfer_encoding(), TransferEncoding::QuotedPrintable);
        assert_eq!(message.html_part().unwrap(), "<h1>Héllo</h1>\n");
    }

    #[test]
    fn test_parse_accepts_bare_lf() {
        let lf = DRAFT.replace("\r\n", "\n");
        let message = Message::parse(lf.as_bytes()).unwrap();
        assert_eq!(message.to(), Some("B <b@y.com>"));
        assert_eq!(message.html_part().unwrap(), "<h1>Héllo</h1>\n");
    }

    #[test]
    fn test_parse_single_part() {
        let raw = b"Subject: plain\r\nContent-Transfer-Encoding: base64\r\n\r\nSGVsbG8=";
        let message = Message::parse(raw).unwrap();
        assert!(message.parts.is_empty());
        assert_eq!(message.body.as_deref(), Some(&b"SGVsbG8="[..]));
    }

    #[test]
    fn test_parse_rejects_unterminated_multipart() {
        let truncated = DRAFT.replace("--b1--\r\n", "");
        assert!(matches!(
            Message::parse(truncated.as_bytes()),
            Err(Error::InvalidMultipart(_))
        ));
    }

    #[test]
    fn test_parse_rejects_missing_boundary() {
        let raw = b"Content-Type: multipart/mixed\r\n\r\n--x--\r\n";
        assert!(matches!(Message::parse(raw), Err(Error::MissingBoundary)));
    }

    #[test]
    fn test_to_bytes_parses_back() {
        let original = Message::parse(DRAFT.as_bytes()).unwrap();
        let bytes = original.to_bytes().unwrap();
        let reparsed = Message::parse(&bytes).unwrap();

        assert_eq!(reparsed.headers, original.headers);
        assert_eq!(reparsed.parts, original.parts);
    }

    #[test]
    fn test_html_part_missing() {
        let mut headers = Headers::new();
        headers.add("Content-Type", "multipart/mixed; boundary=z");
        let mut part_headers = Headers::new();
        part_headers.add("Content-Type", "text/plain");
        let message = Message::multipart(headers, vec![Part::new(part_headers, b"x".to_vec())]);

        assert!(message.html_part().is_err());
    }
}
