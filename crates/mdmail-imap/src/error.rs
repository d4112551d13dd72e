//! IMAP client errors.

use std::time::Duration;

use thiserror::Error;

use crate::types::ResponseCode;

/// Everything that can go wrong between connecting and logging out.
#[derive(Debug, Error)]
pub enum Error {
    /// Socket error, including the server closing the connection.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// TLS handshake or record failure.
    #[error("tls error: {0}")]
    Tls(#[from] rustls::Error),

    /// The host cannot be used as a TLS server name.
    #[error("invalid server name: {0}")]
    InvalidDnsName(#[from] rustls::pki_types::InvalidDnsNameError),

    /// A response line does not follow the grammar.
    #[error("unparseable response at byte {position}: {message}")]
    Parse {
        /// Byte position where the error occurred.
        position: usize,
        /// Description of what went wrong.
        message: String,
    },

    /// LOGIN was refused or is not permitted.
    #[error("login refused: {0}")]
    Auth(String),

    /// Tagged NO.
    #[error("server said NO: {text}")]
    No {
        /// Response code, e.g. `TRYCREATE` or `OVERQUOTA`.
        code: Option<ResponseCode>,
        /// Human-readable text.
        text: String,
    },

    /// Tagged BAD.
    #[error("server said BAD: {text}")]
    Bad {
        /// Response code, if any.
        code: Option<ResponseCode>,
        /// Human-readable text.
        text: String,
    },

    /// The server is closing the connection.
    #[error("server said BYE: {0}")]
    Bye(String),

    /// A read, write, connect or handshake took longer than allowed.
    #[error("no progress within {0:?}")]
    Timeout(Duration),

    /// The server broke the protocol, e.g. an odd greeting.
    #[error("protocol violation: {0}")]
    Protocol(String),
}

impl Error {
    /// Returns true if the operation ran out of time.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// Returns the response code attached to a NO or BAD, if any.
    #[must_use]
    pub const fn response_code(&self) -> Option<&ResponseCode> {
        match self {
            Self::No { code, .. } | Self::Bad { code, .. } => code.as_ref(),
            _ => None,
        }
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
