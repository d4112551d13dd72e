//! MIME errors.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from building or parsing a message.
#[derive(Debug, Error)]
pub enum Error {
    /// A header line is not `Name: value`, or a value cannot be written.
    #[error("malformed header: {0}")]
    InvalidHeader(String),

    /// A `Content-Type` value could not be parsed.
    #[error("malformed content type {value:?}: {reason}")]
    InvalidContentType {
        /// The value as found.
        value: String,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// Quoted-printable or encoded-word data is malformed.
    #[error("malformed transfer encoding: {0}")]
    InvalidEncoding(String),

    /// An address that cannot be written into a header.
    #[error("invalid address {address:?}: {reason}")]
    InvalidAddress {
        /// The address as given.
        address: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// Base64 payload is malformed.
    #[error(transparent)]
    Base64(#[from] base64::DecodeError),

    /// A text body does not decode to UTF-8.
    #[error(transparent)]
    Utf8(#[from] std::string::FromUtf8Error),

    /// A multipart entity has no `boundary` parameter.
    #[error("multipart entity without boundary")]
    MissingBoundary,

    /// The multipart body does not follow its boundary.
    #[error("malformed multipart body: {0}")]
    InvalidMultipart(String),

    /// The builder is missing a required header.
    #[error("{0} header is required")]
    MissingHeader(&'static str),

    /// The message cannot be parsed.
    #[error("cannot parse message: {0}")]
    Parse(String),
}
