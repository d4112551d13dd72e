//! Mailbox addresses for `From`/`To` headers (RFC 5322 section 3.4).

use crate::encoding::{decode_rfc2047, encode_rfc2047, needs_rfc2047};
use crate::error::{Error, Result};

/// A single mailbox: optional display name plus addr-spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    /// Display name, may be empty.
    pub name: String,
    /// The addr-spec, `local@domain`.
    pub email: String,
}

impl Address {
    /// Creates a new address.
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    /// Checks that the email can be written as an addr-spec.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAddress`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        let reject = |reason| {
            Err(Error::InvalidAddress {
                address: self.email.clone(),
                reason,
            })
        };

        if self.email.is_empty() {
            return reject("email is empty");
        }
        if !self.email.is_ascii() {
            return reject("email contains non-ASCII characters");
        }
        if self
            .email
            .chars()
            .any(|c| c.is_ascii_whitespace() || c.is_ascii_control() || matches!(c, '<' | '>' | ',' | '"'))
        {
            return reject("email contains whitespace, control or delimiter characters");
        }

        let mut parts = self.email.split('@');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(local), Some(domain), None) if !local.is_empty() && !domain.is_empty() => Ok(()),
            (_, _, Some(_)) => reject("email contains more than one '@'"),
            _ => reject("email must have the form local@domain"),
        }
    }

    /// Returns the domain part of the address, if any.
    #[must_use]
    pub fn domain(&self) -> Option<&str> {
        self.email.rsplit_once('@').map(|(_, domain)| domain)
    }

    /// Formats the address for a header field.
    ///
    /// `Name <local@domain>`, with the name quoted when it contains
    /// specials and RFC 2047 encoded when it is not ASCII or carries control
    /// characters such as line breaks. An empty name
    /// gives `<local@domain>`.
    ///
    /// # Errors
    ///
    /// Returns an error if the email fails [`Address::validate`].
    pub fn encode(&self) -> Result<String> {
        self.validate()?;

        let name = self.name.trim();
        if name.is_empty() {
            return Ok(format!("<{}>", self.email));
        }
        Ok(format!("{} <{}>", encode_display_name(name), self.email))
    }

    /// Parses a single mailbox such as `"Doe, Jane" <jane@example.com>`
    /// or a bare `jane@example.com`.
    ///
    /// # Errors
    ///
    /// Returns an error if the mailbox is malformed.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();

        let address = if let Some(open) = text.rfind('<') {
            let close = text[open..]
                .find('>')
                .map(|i| open + i)
                .ok_or_else(|| Error::Parse(format!("Unterminated angle address in {text:?}")))?;
            let name = decode_display_name(text[..open].trim())?;
            Self::new(name, text[open + 1..close].trim())
        } else {
            Self::new("", text)
        };

        address.validate()?;
        Ok(address)
    }
}

/// Formats an address list for a `From`/`To` header.
///
/// # Errors
///
/// Returns an error if any address is invalid.
pub fn encode_address_list(addresses: &[Address]) -> Result<String> {
    let encoded = addresses.iter().map(Address::encode).collect::<Result<Vec<_>>>()?;
    Ok(encoded.join(", "))
}

/// Parses a comma-separated address list, honouring quoted names.
///
/// # Errors
///
/// Returns an error if any mailbox in the list is malformed.
pub fn parse_address_list(text: &str) -> Result<Vec<Address>> {
    let mut addresses = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut in_angle = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            '<' if !in_quotes => in_angle = true,
            '>' if !in_quotes => in_angle = false,
            ',' if !in_quotes && !in_angle => {
                push_mailbox(&text[start..i], &mut addresses)?;
                start = i + 1;
            }
            _ => {}
        }
    }
    push_mailbox(&text[start..], &mut addresses)?;

    Ok(addresses)
}

fn push_mailbox(text: &str, addresses: &mut Vec<Address>) -> Result<()> {
    if !text.trim().is_empty() {
        addresses.push(Address::parse(text)?);
    }
    Ok(())
}

/// RFC 5322 `atext` plus space: characters a display name may carry unquoted.
fn is_plain_phrase_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == ' ' || "!#$%&'*+-/=?^_`{|}~".contains(c)
}

fn encode_display_name(name: &str) -> String {
    if needs_rfc2047(name) {
        return encode_rfc2047(name, "utf-8");
    }
    if name.chars().all(is_plain_phrase_char) {
        return name.to_string();
    }

    let mut quoted = String::with_capacity(name.len() + 2);
    quoted.push('"');
    for c in name.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

fn decode_display_name(raw: &str) -> Result<String> {
    if let Some(inner) = raw.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
        let mut name = String::with_capacity(inner.len());
        let mut chars = inner.chars();
        while let Some(c) = chars.next() {
            if c == '\\' {
                if let Some(next) = chars.next() {
                    name.push(next);
                }
            } else {
                name.push(c);
            }
        }
        return Ok(name);
    }
    decode_rfc2047(raw)
}
