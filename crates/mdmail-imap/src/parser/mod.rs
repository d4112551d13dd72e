//! IMAP protocol parser.
//!
//! A sans-I/O parser for the server responses a draft upload sees:
//! greetings, status responses with response codes, capability data and
//! continuation requests. Anything else is kept as raw text.
//!
//! # Example
//!
//! ```
//! use mdmail_imap::parser::{ResponseParser, Response, UntaggedResponse};
//! use mdmail_imap::Status;
//!
//! let input = b"* OK IMAP4rev2 server ready\r\n";
//! let response = ResponseParser::parse(input).unwrap();
//!
//! match response {
//!     Response::Untagged(UntaggedResponse::Status { status: Status::Ok, text, .. }) => {
//!         assert!(text.contains("IMAP4rev2"));
//!     }
//!     _ => panic!("Expected untagged OK"),
//! }
//! ```

pub mod lexer;
pub mod response;

pub use lexer::{Lexer, Token};
pub use response::{Response, ResponseParser, UntaggedResponse};
