//! # mdmail-mime
//!
//! MIME generation and parsing for HTML drafts.
//!
//! ## Features
//!
//! - **Message generation**: `multipart/mixed` drafts with one inline HTML part
//! - **Message parsing**: parse generated (or any simple MIME) messages back
//! - **Addresses**: validated mailbox formatting with quoted or encoded names
//! - **Encoding/Decoding**: Base64, Quoted-Printable, RFC 2047 header encoding
//!
//! ## Quick Start
//!
//! ```
//! use mdmail_mime::{Address, Message, MessageBuilder};
//!
//! let bytes = MessageBuilder::new()
//!     .from(Address::new("Sender", "sender@example.com"))
//!     .to(Address::new("", "recipient@example.com"))
//!     .subject("Test")
//!     .html_body("<p>Hello, World!</p>\n")
//!     .build()?
//!     .to_bytes()?;
//!
//! let parsed = Message::parse(&bytes)?;
//! assert_eq!(parsed.to(), Some("<recipient@example.com>"));
//! assert_eq!(parsed.html_part()?, "<p>Hello, World!</p>\n");
//! # Ok::<(), mdmail_mime::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod address;
mod builder;
mod content_type;
mod error;
mod header;
mod message;

pub mod encoding;

pub use address::{Address, encode_address_list, parse_address_list};
pub use builder::MessageBuilder;
pub use content_type::ContentType;
pub use error::{Error, Result};
pub use header::Headers;
pub use message::{Message, Part, TransferEncoding};
