//! Document → draft pipeline.

use std::path::Path;

use mdmail_imap::AppendUid;
use tracing::{debug, info};

use crate::compose::assemble_bytes;
use crate::config::Config;
use crate::draft::{SessionOpener, upload_draft};
use crate::frontmatter::{Frontmatter, parse_document};
use crate::{Error, Result};

/// A document turned into message bytes, ready for upload.
#[derive(Debug, Clone)]
pub struct PreparedDraft {
    /// Decoded metadata.
    pub frontmatter: Frontmatter,
    /// Serialized MIME message.
    pub message: Vec<u8>,
}

/// What happened to a document that made it to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedDraft {
    /// Subject of the draft.
    pub subject: String,
    /// Mailbox it was appended to.
    pub mailbox: String,
    /// UID assigned by a UIDPLUS server.
    pub uid: Option<AppendUid>,
}

/// Parses, renders and assembles a document without touching the network.
///
/// # Errors
///
/// Returns [`Error::Render`], [`Error::Validation`] or [`Error::Assembly`].
pub fn prepare(source: &[u8]) -> Result<PreparedDraft> {
    let (frontmatter, body) = parse_document(source)?;
    debug!(
        subject = %frontmatter.subject,
        html_bytes = body.as_bytes().len(),
        "document parsed"
    );

    let message = assemble_bytes(&frontmatter, &body)?;
    Ok(PreparedDraft { frontmatter, message })
}

/// Runs the whole pipeline on an in-memory document.
///
/// The network is only reached once the document has been fully validated
/// and assembled.
///
/// # Errors
///
/// Any [`Error`] from [`prepare`] or [`upload_draft`].
pub async fn process<O: SessionOpener>(
    source: &[u8],
    config: &Config,
    opener: &O,
) -> Result<SavedDraft> {
    let draft = prepare(source)?;
    let uid = upload_draft(opener, config, &draft.message, &draft.frontmatter.date).await?;

    Ok(SavedDraft {
        subject: draft.frontmatter.subject,
        mailbox: config.drafts_mailbox.clone(),
        uid,
    })
}

/// Reads a document from disk and runs the pipeline on it.
///
/// # Errors
///
/// Returns [`Error::Read`] if the file cannot be read, otherwise see
/// [`process`].
pub async fn process_file<O: SessionOpener>(
    path: impl AsRef<Path>,
    config: &Config,
    opener: &O,
) -> Result<SavedDraft> {
    let path = path.as_ref();
    let source = tokio::fs::read(path).await.map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), bytes = source.len(), "processing document");

    process(&source, config, opener).await
}
