//! # mdmail-core
//!
//! Turns a Markdown document with a YAML metadata block into an HTML email
//! and saves it as a draft on an IMAP server.
//!
//! The pipeline runs in four stages, each feeding the next:
//! - [`frontmatter`]: decodes and validates `From`, `To` and `Subject`
//! - [`markdown`]: renders the body to HTML with `pulldown-cmark`
//! - [`compose`]: assembles a `multipart/mixed` message with one inline HTML part
//! - [`draft`]: appends it to the drafts mailbox over TLS, always logging out
//!
//! Nothing touches the network until the document has been validated and the
//! message assembled.
//!
//! ```no_run
//! use mdmail_core::{Config, ImapOpener, process_file};
//!
//! # async fn example() -> mdmail_core::Result<()> {
//! let config = Config::from_env()?;
//! let saved = process_file("note.md", &config, &ImapOpener).await?;
//! println!("draft \"{}\" saved to {}", saved.subject, saved.mailbox);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod compose;
pub mod config;
pub mod draft;
mod error;
pub mod frontmatter;
pub mod markdown;
mod pipeline;

pub use compose::{assemble, assemble_bytes};
pub use config::{Config, Password, ServerAddress};
pub use draft::{DraftSession, ImapOpener, ImapSession, SessionOpener, upload_draft};
pub use error::{ConfigError, Error, Problem, RenderError, Result, Stage, ValidationError};
pub use frontmatter::{Frontmatter, parse_document};
pub use markdown::{Document, RenderedBody, render};
pub use pipeline::{PreparedDraft, SavedDraft, prepare, process, process_file};
