//! Builder for HTML draft messages.

use crate::address::{Address, encode_address_list};
use crate::content_type::ContentType;
use crate::encoding::encode_quoted_printable;
use crate::error::{Error, Result};
use crate::header::Headers;
use crate::message::{Message, Part, TransferEncoding};
use chrono::{DateTime, FixedOffset, Utc};
use rand::Rng;
use rand::distributions::Alphanumeric;

/// Builds a `multipart/mixed` message with a single inline `text/html` part.
///
/// ```
/// use mdmail_mime::{Address, MessageBuilder};
///
/// let message = MessageBuilder::new()
///     .from(Address::new("A", "a@x.com"))
///     .to(Address::new("B", "b@y.com"))
///     .subject("Hi")
///     .html_body("<h1>Hi</h1>\n")
///     .build()
///     .unwrap();
///
/// assert_eq!(message.from(), Some("A <a@x.com>"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MessageBuilder {
    from: Vec<Address>,
    to: Vec<Address>,
    subject: Option<String>,
    date: Option<DateTime<FixedOffset>>,
    message_id: Option<String>,
    html_body: String,
    boundary: Option<String>,
}

impl MessageBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a sender.
    #[must_use]
    pub fn from(mut self, address: Address) -> Self {
        self.from.push(address);
        self
    }

    /// Adds a recipient.
    #[must_use]
    pub fn to(mut self, address: Address) -> Self {
        self.to.push(address);
        self
    }

    /// Sets the subject.
    #[must_use]
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Sets the `Date` header. Defaults to the current time.
    #[must_use]
    pub const fn date(mut self, date: DateTime<FixedOffset>) -> Self {
        self.date = Some(date);
        self
    }

    /// Sets the `Message-ID`, without angle brackets. Generated when unset.
    #[must_use]
    pub fn message_id(mut self, message_id: impl Into<String>) -> Self {
        self.message_id = Some(message_id.into());
        self
    }

    /// Sets the HTML body.
    #[must_use]
    pub fn html_body(mut self, html: impl Into<String>) -> Self {
        self.html_body = html.into();
        self
    }

    /// Sets the multipart boundary. Random when unset.
    #[must_use]
    pub fn boundary(mut self, boundary: impl Into<String>) -> Self {
        self.boundary = Some(boundary.into());
        self
    }

    /// Builds the message.
    ///
    /// # Errors
    ///
    /// Returns an error if `From`, `To` or `Subject` is missing, or an
    /// address cannot be encoded.
    pub fn build(self) -> Result<Message> {
        if self.from.is_empty() {
            return Err(Error::MissingHeader("From"));
        }
        if self.to.is_empty() {
            return Err(Error::MissingHeader("To"));
        }
        let subject = self.subject.ok_or(Error::MissingHeader("Subject"))?;

        let from = encode_address_list(&self.from)?;
        let to = encode_address_list(&self.to)?;
        let date = self.date.unwrap_or_else(|| Utc::now().fixed_offset());
        let message_id = self
            .message_id
            .unwrap_or_else(|| generate_message_id(&date, self.from[0].domain().unwrap_or("localhost")));
        let boundary = self.boundary.unwrap_or_else(generate_boundary);

        let mut headers = Headers::new();
        headers.add("MIME-Version", "1.0");
        headers.add("Date", date.to_rfc2822());
        headers.add("From", from);
        headers.add("To", to);
        headers.add("Subject", Headers::encode_value(&subject));
        headers.add("Message-ID", format!("<{message_id}>"));
        headers.add("Content-Type", ContentType::multipart_mixed(boundary).to_string());

        let mut part_headers = Headers::new();
        part_headers.add("Content-Type", ContentType::text_html().to_string());
        part_headers.add("Content-Disposition", "inline");
        part_headers.add(
            "Content-Transfer-Encoding",
            TransferEncoding::QuotedPrintable.to_string(),
        );
        let body = encode_quoted_printable(&self.html_body).into_bytes();

        Ok(Message::multipart(headers, vec![Part::new(part_headers, body)]))
    }
}

fn random_token(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

fn generate_boundary() -> String {
    format!("mdmail-{}", random_token(24))
}

fn generate_message_id(date: &DateTime<FixedOffset>, domain: &str) -> String {
    format!("{}.{}@{domain}", date.timestamp(), random_token(12))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_date() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 5, 9, 30, 0)
            .unwrap()
    }

    fn builder() -> MessageBuilder {
        MessageBuilder::new()
            .from(Address::new("A", "a@x.com"))
            .to(Address::new("B", "b@y.com"))
            .subject("Hi")
            .date(fixed_date())
            .html_body("<h1>Hi</h1>\n")
    }

    #[test]
    fn test_headers_in_order() {
        let message = builder().message_id("1.abc@x.com").boundary("b1").build().unwrap();
        let names: Vec<&str> = message.headers.iter().map(|(name, _)| name).collect();

        assert_eq!(
            names,
            vec!["MIME-Version", "Date", "From", "To", "Subject", "Message-ID", "Content-Type"]
        );
        assert_eq!(message.date(), Some("Tue, 5 Mar 2024 09:30:00 +0200"));
        assert_eq!(message.message_id(), Some("<1.abc@x.com>"));
    }

    #[test]
    fn test_serialized_draft() {
        let bytes = builder()
            .message_id("1.abc@x.com")
            .boundary("b1")
            .build()
            .unwrap()
            .to_bytes()
            .unwrap();

        let expected = concat!(
            "MIME-Version: 1.0\r\n",
            "Date: Tue, 5 Mar 2024 09:30:00 +0200\r\n",
            "From: A <a@x.com>\r\n",
            "To: B <b@y.com>\r\n",
            "Subject: Hi\r\n",
            "Message-ID: <1.abc@x.com>\r\n",
            "Content-Type: multipart/mixed; boundary=b1\r\n",
            "\r\n",
            "--b1\r\n",
            "Content-Type: text/html; charset=utf-8\r\n",
            "Content-Disposition: inline\r\n",
            "Content-Transfer-Encoding: quoted-printable\r\n",
            "\r\n",
            "<h1>Hi</h1>\r\n",
            "\r\n",
            "--b1--\r\n",
        );
        assert_eq!(String::from_utf8(bytes).unwrap(), expected);
    }

    #[test]
    fn test_generated_ids_use_sender_domain() {
        let message = builder().build().unwrap();

        let id = message.message_id().unwrap();
        assert!(id.starts_with(&format!("<{}.", fixed_date().timestamp())));
        assert!(id.ends_with("@x.com>"));

        let boundary = message.content_type().unwrap().boundary().unwrap().to_string();
        assert!(boundary.starts_with("mdmail-"));
        assert_ne!(boundary, builder().build().unwrap().content_type().unwrap().boundary().unwrap());
    }

    #[test]
    fn test_multiple_recipients_and_encoded_subject() {
        let message = builder()
            .to(Address::new("", "c@z.org"))
            .subject("Grüße")
            .build()
            .unwrap();

        assert_eq!(message.to(), Some("B <b@y.com>, <c@z.org>"));
        assert_eq!(
            Headers::decode_value(message.subject().unwrap()).unwrap(),
            "Grüße"
        );
    }

    #[test]
    fn test_unbreakable_subject_stays_within_line_limit() {
        let subject = "z".repeat(2000);
        let bytes = builder().subject(subject.as_str()).build().unwrap().to_bytes().unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.split("\r\n").all(|line| line.len() <= 998));

        let reparsed = Message::parse(text.as_bytes()).unwrap();
        assert_eq!(
            Headers::decode_value(reparsed.subject().unwrap()).unwrap(),
            subject
        );
    }

    #[test]
    fn test_missing_fields() {
        assert!(matches!(
            MessageBuilder::new().to(Address::new("B", "b@y.com")).subject("s").build(),
            Err(Error::MissingHeader("From"))
        ));
        assert!(matches!(
            MessageBuilder::new().from(Address::new("A", "a@x.com")).subject("s").build(),
            Err(Error::MissingHeader("To"))
        ));
        assert!(matches!(
            MessageBuilder::new()
                .from(Address::new("A", "a@x.com"))
                .to(Address::new("B", "b@y.com"))
                .build(),
            Err(Error::MissingHeader("Subject"))
        ));
    }

    #[test]
    fn test_invalid_address_fails() {
        let result = builder().to(Address::new("C", "not an email")).build();
        assert!(matches!(result, Err(Error::InvalidAddress { .. })));
    }
}
