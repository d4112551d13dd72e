//! Markdown rendering.
//!
//! One `pulldown-cmark` pass over the whole document both lifts out the
//! leading YAML metadata block and renders everything after it to HTML.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd, html};

use crate::error::RenderError;

/// HTML produced from a Markdown body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBody {
    html: String,
}

impl RenderedBody {
    /// Returns the HTML as text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.html
    }

    /// Returns the HTML bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.html.as_bytes()
    }

    /// Consumes the body and returns the HTML.
    #[must_use]
    pub fn into_string(self) -> String {
        self.html
    }
}

/// A document split into its metadata block and rendered body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document<'a> {
    /// Raw YAML of the leading metadata block, if the document has one.
    pub metadata: Option<String>,
    /// Source text after the metadata block.
    pub body: &'a str,
    /// The body rendered to HTML.
    pub html: RenderedBody,
}

/// Markdown dialect: `CommonMark` plus tables, strikethrough, task lists,
/// footnotes and YAML-style metadata blocks.
#[must_use]
pub fn options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_YAML_STYLE_METADATA_BLOCKS
}

/// Parses raw document bytes.
///
/// # Errors
///
/// Returns [`RenderError::InvalidUtf8`] if the bytes are not UTF-8.
pub fn parse_bytes(source: &[u8]) -> Result<Document<'_>, RenderError> {
    let text = std::str::from_utf8(source).map_err(|e| RenderError::InvalidUtf8 {
        valid_up_to: e.valid_up_to(),
    })?;
    Ok(parse(text))
}

/// Splits off the metadata block and renders the rest in a single pass.
#[must_use]
pub fn parse(source: &str) -> Document<'_> {
    let mut metadata: Option<String> = None;
    let mut in_metadata = false;
    let mut body_start = 0;

    let events = Parser::new_ext(source, options())
        .into_offset_iter()
        .filter_map(|(event, range)| match event {
            Event::Start(Tag::MetadataBlock(_)) => {
                in_metadata = true;
                metadata.get_or_insert_with(String::new);
                None
            }
            Event::End(TagEnd::MetadataBlock(_)) => {
                in_metadata = false;
                body_start = range.end;
                None
            }
            Event::Text(text) if in_metadata => {
                if let Some(yaml) = metadata.as_mut() {
                    yaml.push_str(&text);
                }
                None
            }
            _ if in_metadata => None,
            event => Some(event),
        });

    let mut out = String::with_capacity(source.len() + source.len() / 2);
    html::push_html(&mut out, events);

    Document {
        metadata,
        body: source.get(body_start..).unwrap_or_default(),
        html: RenderedBody { html: out },
    }
}

/// Renders a Markdown body that carries no metadata block.
#[must_use]
pub fn render(body: &str) -> RenderedBody {
    let mut out = String::with_capacity(body.len() + body.len() / 2);
    html::push_html(&mut out, Parser::new_ext(body, options()));
    RenderedBody { html: out }
}
