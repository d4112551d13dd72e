//! Message assembly.

use mdmail_mime::{Message, MessageBuilder};
use tracing::debug;

use crate::Result;
use crate::frontmatter::Frontmatter;
use crate::markdown::RenderedBody;

/// Builds the draft: all senders and recipients, the subject, the
/// processing date and a single inline HTML part.
///
/// # Errors
///
/// Returns [`crate::Error::Assembly`] if an address cannot be encoded.
pub fn assemble(frontmatter: &Frontmatter, body: &RenderedBody) -> Result<Message> {
    let builder = frontmatter
        .from
        .iter()
        .fold(MessageBuilder::new(), |builder, address| builder.from(address.clone()));
    let builder = frontmatter
        .to
        .iter()
        .fold(builder, |builder, address| builder.to(address.clone()));

    let message = builder
        .subject(frontmatter.subject.clone())
        .date(frontmatter.date)
        .html_body(body.as_str())
        .build()?;

    debug!(
        from = frontmatter.from.len(),
        to = frontmatter.to.len(),
        message_id = message.message_id().unwrap_or_default(),
        "message assembled"
    );
    Ok(message)
}

/// Assembles and serializes the draft.
///
/// # Errors
///
/// See [`assemble`].
pub fn assemble_bytes(frontmatter: &Frontmatter, body: &RenderedBody) -> Result<Vec<u8>> {
    let bytes = assemble(frontmatter, body)?.to_bytes()?;
    debug!(bytes = bytes.len(), "message serialized");
    Ok(bytes)
}
