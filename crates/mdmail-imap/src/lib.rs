//! # mdmail-imap
//!
//! An async IMAP client for depositing messages into a mailbox over implicit
//! TLS. It speaks the part of RFC 9051 (`IMAP4rev2`) and RFC 3501
//! (`IMAP4rev1`) needed for that: greeting, CAPABILITY, LOGIN, APPEND with a
//! synchronizing literal, NOOP and LOGOUT.
//!
//! ## Features
//!
//! - **Type-state connection management**: `append` only exists on an
//!   authenticated client
//! - **TLS via rustls**: Mozilla roots from `webpki-roots`, no OpenSSL
//! - **Bounded I/O**: connect, handshake and every read/write share a
//!   configurable time budget
//! - **UIDPLUS**: the `[APPENDUID]` of an appended message is returned
//! - **Sans-I/O parser**: Protocol parsing separated from network I/O
//!
//! ## Quick Start
//!
//! ```no_run
//! use mdmail_imap::{Client, Config, Mailbox};
//!
//! # async fn run() -> mdmail_imap::Result<()> {
//! let config = Config::new("imap.example.com");
//! let client = Client::connect(&config).await?;
//!
//! let mut client = match client.login("user@example.com", "password").await {
//!     Ok(client) => client,
//!     Err((err, client)) => {
//!         let _ = client.logout().await;
//!         return Err(err);
//!     }
//! };
//!
//! let message = b"Subject: hi\r\n\r\nhello\r\n";
//! let uid = client.append(&Mailbox::new("Drafts"), &[], None, message).await;
//! client.logout().await?;
//! uid?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Connection States
//!
//! ```text
//! ┌─────────────────────┐
//! │   NotAuthenticated  │ ─── login() / PREAUTH ───→ Authenticated
//! └─────────────────────┘
//!            │                                            │
//!            └────────────── logout() ────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`command`]: IMAP command serialization
//! - [`connection`]: Connection management and type-state client
//! - [`parser`]: Sans-I/O response parser
//! - [`types`]: Core IMAP types (flags, mailboxes, response codes, etc.)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod command;
pub mod connection;
mod error;
pub mod parser;
pub mod types;

pub use command::{Command, TagGenerator};
pub use connection::{
    Authenticated, Client, Config, ConfigBuilder, FramedStream, IMPLICIT_TLS_PORT, ImapStream,
    NotAuthenticated, ResponseAccumulator,
};
pub use error::{Error, Result};
pub use parser::{Response, ResponseParser, UntaggedResponse};
pub use types::{
    AppendUid, Capability, Flag, Mailbox, ResponseCode, Status, Tag, Uid, UidValidity,
};
