//! Frontmatter decoding.
//!
//! The metadata block is YAML:
//!
//! ```yaml
//! From:
//!   - name: Jane Doe
//!     email: jane@example.com
//! To:
//!   - name: John Roe
//!     email: john@example.com
//! Subject: Hello, world!
//! ```
//!
//! `From` and `To` are non-empty lists of `{name, email}` entries and
//! `Subject` is a non-empty string. Other keys are ignored.

use chrono::{DateTime, FixedOffset, Local};
use mdmail_mime::Address;
use serde::Deserialize;
use serde_yaml::{Mapping, Value};

use crate::error::ValidationError;
use crate::markdown::{self, RenderedBody};
use crate::Result;

const ADDRESS_LIST: &str = "a list of `name`/`email` entries";

/// Metadata extracted from a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frontmatter {
    /// Senders, at least one.
    pub from: Vec<Address>,
    /// Recipients, at least one.
    pub to: Vec<Address>,
    /// Subject line, never empty.
    pub subject: String,
    /// When the document was processed.
    pub date: DateTime<FixedOffset>,
}

#[derive(Debug, Default, Deserialize)]
struct RawFrontmatter {
    #[serde(rename = "From")]
    from: Option<Value>,
    #[serde(rename = "To")]
    to: Option<Value>,
    #[serde(rename = "Subject")]
    subject: Option<Value>,
}

impl Frontmatter {
    /// Decodes a metadata block, stamping it with the current local time.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming the first field that is missing,
    /// empty or of the wrong shape.
    pub fn from_yaml(yaml: &str) -> std::result::Result<Self, ValidationError> {
        Self::from_yaml_at(yaml, Local::now().fixed_offset())
    }

    /// Decodes a metadata block with an explicit date.
    ///
    /// # Errors
    ///
    /// See [`Frontmatter::from_yaml`].
    pub fn from_yaml_at(
        yaml: &str,
        date: DateTime<FixedOffset>,
    ) -> std::result::Result<Self, ValidationError> {
        if yaml.trim().is_empty() {
            return Self::from_raw(RawFrontmatter::default(), date);
        }

        let raw = match serde_yaml::from_str::<Value>(yaml)
            .map_err(|e| ValidationError::Syntax(e.to_string()))?
        {
            Value::Null => RawFrontmatter::default(),
            value @ Value::Mapping(_) => serde_yaml::from_value(value)
                .map_err(|e| ValidationError::Syntax(e.to_string()))?,
            _ => return Err(ValidationError::wrong_shape("frontmatter", "a mapping")),
        };
        Self::from_raw(raw, date)
    }

    fn from_raw(
        raw: RawFrontmatter,
        date: DateTime<FixedOffset>,
    ) -> std::result::Result<Self, ValidationError> {
        Ok(Self {
            from: addresses("From", raw.from)?,
            to: addresses("To", raw.to)?,
            subject: subject(raw.subject)?,
            date,
        })
    }
}

/// Parses a whole document: frontmatter plus rendered body.
///
/// A document without a metadata block fails the same way as one whose
/// block lacks every field.
///
/// # Errors
///
/// Returns [`crate::Error::Render`] for non-UTF-8 input and
/// [`crate::Error::Validation`] for bad frontmatter.
pub fn parse_document(source: &[u8]) -> Result<(Frontmatter, RenderedBody)> {
    let document = markdown::parse_bytes(source)?;
    let frontmatter = Frontmatter::from_yaml(document.metadata.as_deref().unwrap_or_default())?;
    Ok((frontmatter, document.html))
}

fn addresses(field: &str, value: Option<Value>) -> std::result::Result<Vec<Address>, ValidationError> {
    let entries = match value {
        None | Some(Value::Null) => return Err(ValidationError::missing(field)),
        Some(Value::Sequence(entries)) => entries,
        Some(_) => return Err(ValidationError::wrong_shape(field, ADDRESS_LIST)),
    };
    if entries.is_empty() {
        return Err(ValidationError::empty(field));
    }

    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let path = format!("{field}[{i}]");
            match entry {
                Value::Mapping(map) => address(&path, map),
                _ => Err(ValidationError::wrong_shape(path, "a mapping with `name` and `email`")),
            }
        })
        .collect()
}

fn address(path: &str, entry: &Mapping) -> std::result::Result<Address, ValidationError> {
    let name = match entry.get("name") {
        None => return Err(ValidationError::missing(format!("{path}.name"))),
        Some(Value::Null) => String::new(),
        Some(Value::String(name)) => name.trim().to_string(),
        Some(_) => return Err(ValidationError::wrong_shape(format!("{path}.name"), "a string")),
    };

    let email = match entry.get("email") {
        None | Some(Value::Null) => {
            return Err(ValidationError::missing(format!("{path}.email")));
        }
        Some(Value::String(email)) => email.trim(),
        Some(_) => return Err(ValidationError::wrong_shape(format!("{path}.email"), "a string")),
    };
    if email.is_empty() {
        return Err(ValidationError::empty(format!("{path}.email")));
    }

    Ok(Address::new(name, email))
}

fn subject(value: Option<Value>) -> std::result::Result<String, ValidationError> {
    match value {
        None | Some(Value::Null) => Err(ValidationError::missing("Subject")),
        Some(Value::String(subject)) if subject.trim().is_empty() => {
            Err(ValidationError::empty("Subject"))
        }
        Some(Value::String(subject)) => Ok(subject),
        Some(_) => Err(ValidationError::wrong_shape("Subject", "a string")),
    }
}
