//! `Content-Type` values.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Error, Result};

/// RFC 2045 `tspecials`; a parameter value containing one must be quoted.
const TSPECIALS: &str = "()<>@,;:\\\"/[]?=";

/// A media type with its parameters.
///
/// Type, subtype and parameter names are lowercased on parse. Parameters
/// are kept sorted so the serialized form is stable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType {
    /// Top-level type, e.g. `text`.
    pub main_type: String,
    /// Subtype, e.g. `html`.
    pub sub_type: String,
    /// Parameters such as `charset` and `boundary`.
    pub parameters: BTreeMap<String, String>,
}

impl ContentType {
    /// `main/sub` without parameters.
    #[must_use]
    pub fn new(main_type: impl Into<String>, sub_type: impl Into<String>) -> Self {
        Self {
            main_type: main_type.into(),
            sub_type: sub_type.into(),
            parameters: BTreeMap::new(),
        }
    }

    /// `text/plain; charset=utf-8`, also the default for entities without
    /// a `Content-Type`.
    #[must_use]
    pub fn text_plain() -> Self {
        Self::new("text", "plain").with_parameter("charset", "utf-8")
    }

    /// `text/html; charset=utf-8`
    #[must_use]
    pub fn text_html() -> Self {
        Self::new("text", "html").with_parameter("charset", "utf-8")
    }

    /// `multipart/mixed` with the given boundary.
    #[must_use]
    pub fn multipart_mixed(boundary: impl Into<String>) -> Self {
        Self::new("multipart", "mixed").with_parameter("boundary", boundary)
    }

    /// Sets a parameter.
    #[must_use]
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// `charset` parameter.
    #[must_use]
    pub fn charset(&self) -> Option<&str> {
        self.parameters.get("charset").map(String::as_str)
    }

    /// `boundary` parameter.
    #[must_use]
    pub fn boundary(&self) -> Option<&str> {
        self.parameters.get("boundary").map(String::as_str)
    }

    /// True for any `multipart/*`.
    #[must_use]
    pub fn is_multipart(&self) -> bool {
        self.main_type.eq_ignore_ascii_case("multipart")
    }

    /// True if this is `main/sub`, ignoring case and parameters.
    #[must_use]
    pub fn is(&self, main_type: &str, sub_type: &str) -> bool {
        self.main_type.eq_ignore_ascii_case(main_type) && self.sub_type.eq_ignore_ascii_case(sub_type)
    }

    /// Parses `type/subtype *(";" name "=" value)`.
    ///
    /// Quoted values may contain `;`. Parameters without `=` are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidContentType`] if the type or subtype is
    /// missing.
    pub fn parse(value: &str) -> Result<Self> {
        let invalid = |reason| Error::InvalidContentType {
            value: value.to_string(),
            reason,
        };

        let mut segments = split_parameters(value).into_iter();
        let media_type = segments.next().unwrap_or_default();
        let (main_type, sub_type) = media_type
            .split_once('/')
            .map(|(main, sub)| (main.trim(), sub.trim()))
            .ok_or_else(|| invalid("expected type/subtype"))?;
        if main_type.is_empty() || sub_type.is_empty() {
            return Err(invalid("empty type or subtype"));
        }

        let mut content_type = Self::new(main_type.to_ascii_lowercase(), sub_type.to_ascii_lowercase());
        for segment in segments {
            if let Some((name, raw)) = segment.split_once('=') {
                content_type
                    .parameters
                    .insert(name.trim().to_ascii_lowercase(), unquote(raw.trim()));
            }
        }

        Ok(content_type)
    }
}

/// Splits on `;` outside quoted strings.
fn split_parameters(value: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut quoted = false;
    let mut escaped = false;

    for (i, c) in value.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if quoted => escaped = true,
            '"' => quoted = !quoted,
            ';' if !quoted => {
                segments.push(value[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    segments.push(value[start..].trim());
    segments
}

fn unquote(raw: &str) -> String {
    match raw.strip_prefix('"').and_then(|rest| rest.strip_suffix('"')) {
        Some(inner) => {
            let mut out = String::with_capacity(inner.len());
            let mut chars = inner.chars();
            while let Some(c) = chars.next() {
                out.push(if c == '\\' { chars.next().unwrap_or(c) } else { c });
            }
            out
        }
        None => raw.to_string(),
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.main_type, self.sub_type)?;

        for (name, value) in &self.parameters {
            if value.is_empty() || value.contains(|c: char| c.is_ascii_whitespace() || TSPECIALS.contains(c)) {
                let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
                write!(f, "; {name}=\"{escaped}\"")?;
            } else {
                write!(f, "; {name}={value}")?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_text_html() {
        let ct = ContentType::text_html();
        assert!(ct.is("text", "html"));
        assert_eq!(ct.charset(), Some("utf-8"));
        assert_eq!(ct.to_string(), "text/html; charset=utf-8");
    }

    #[test]
    fn test_parse_quoted_boundary() {
        let ct = ContentType::parse("Multipart/Mixed; boundary=\"----=_Part_123\"").unwrap();
        assert!(ct.is_multipart());
        assert!(ct.is("multipart", "mixed"));
        assert_eq!(ct.boundary(), Some("----=_Part_123"));
    }

    #[test]
    fn test_parse_semicolon_inside_quotes() {
        let ct = ContentType::parse("text/html; name=\"a;b\"; Charset=UTF-8").unwrap();
        assert_eq!(ct.parameters.get("name").map(String::as_str), Some("a;b"));
        assert_eq!(ct.charset(), Some("UTF-8"));
    }

    #[test]
    fn test_parse_rejects_missing_subtype() {
        for value in ["text", "", "text/", "/html"] {
            assert!(
                matches!(ContentType::parse(value), Err(Error::InvalidContentType { .. })),
                "{value:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_display_quotes_special_values() {
        let ct = ContentType::multipart_mixed("a=b");
        assert_eq!(ct.to_string(), "multipart/mixed; boundary=\"a=b\"");

        let parsed = ContentType::parse(&ct.to_string()).unwrap();
        assert_eq!(parsed, ct);
    }
}
