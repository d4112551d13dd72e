//! Error types for the core library.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Network stage of a draft upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// TCP connect, TLS handshake and greeting.
    Connect,
    /// LOGIN.
    Login,
    /// APPEND.
    Append,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Connect => "connect",
            Self::Login => "login",
            Self::Append => "append",
        })
    }
}

/// What is wrong with a frontmatter field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Problem {
    /// The field is absent.
    Missing,
    /// The field is present but empty.
    Empty,
    /// The field has the wrong type; holds what was expected.
    WrongShape(&'static str),
}

/// A frontmatter field failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing, empty or of the wrong shape.
    #[error("`{field}` {problem}")]
    Field {
        /// Path of the field, e.g. `To` or `From[0].email`.
        field: String,
        /// What is wrong with it.
        problem: Problem,
    },

    /// The metadata block is not valid YAML.
    #[error("metadata block is not valid YAML: {0}")]
    Syntax(String),
}

impl ValidationError {
    pub(crate) fn missing(field: impl Into<String>) -> Self {
        Self::Field {
            field: field.into(),
            problem: Problem::Missing,
        }
    }

    pub(crate) fn empty(field: impl Into<String>) -> Self {
        Self::Field {
            field: field.into(),
            problem: Problem::Empty,
        }
    }

    pub(crate) fn wrong_shape(field: impl Into<String>, expected: &'static str) -> Self {
        Self::Field {
            field: field.into(),
            problem: Problem::WrongShape(expected),
        }
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => f.write_str("is required"),
            Self::Empty => f.write_str("must not be empty"),
            Self::WrongShape(expected) => write!(f, "must be {expected}"),
        }
    }
}

/// The Markdown body could not be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// The document is not UTF-8.
    #[error("document is not valid UTF-8 (first bad byte at offset {valid_up_to})")]
    InvalidUtf8 {
        /// Length of the valid prefix.
        valid_up_to: usize,
    },
}

/// Configuration is missing or malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required variable is unset or empty.
    #[error("{0} is not set")]
    Missing(&'static str),

    /// A variable holds an unusable value.
    #[error("{variable} is invalid: {reason}")]
    Invalid {
        /// Variable name.
        variable: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Errors that can occur while turning a document into a draft.
#[derive(Debug, Error)]
pub enum Error {
    /// The input document could not be read.
    #[error("cannot read {}", path.display())]
    Read {
        /// Document path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Frontmatter is missing or malformed.
    #[error("invalid frontmatter")]
    Validation(#[from] ValidationError),

    /// The Markdown body could not be rendered.
    #[error("cannot render body")]
    Render(#[from] RenderError),

    /// The MIME message could not be built.
    #[error("cannot assemble message")]
    Assembly(#[from] mdmail_mime::Error),

    /// Network or TLS failure.
    #[error("connection failed during {stage}")]
    Connection {
        /// Stage that failed.
        stage: Stage,
        /// Underlying IMAP error.
        source: mdmail_imap::Error,
    },

    /// The server rejected the credentials.
    #[error("authentication failed")]
    Auth {
        /// Stage that failed.
        stage: Stage,
        /// Underlying IMAP error.
        source: mdmail_imap::Error,
    },

    /// The server rejected the APPEND.
    #[error("server refused the draft")]
    Append {
        /// Stage that failed.
        stage: Stage,
        /// Underlying IMAP error.
        source: mdmail_imap::Error,
    },

    /// A network stage ran out of time.
    #[error("{stage} timed out")]
    Timeout {
        /// Stage that failed.
        stage: Stage,
        /// Underlying IMAP error.
        source: mdmail_imap::Error,
    },

    /// Required configuration is missing or malformed.
    #[error("invalid configuration")]
    Configuration(#[from] ConfigError),
}

impl Error {
    /// Classifies an IMAP error raised during `stage`.
    #[must_use]
    pub fn network(stage: Stage, source: mdmail_imap::Error) -> Self {
        use mdmail_imap::Error as Imap;

        if source.is_timeout() {
            return Self::Timeout { stage, source };
        }
        let transport = matches!(
            source,
            Imap::Io(_) | Imap::Tls(_) | Imap::InvalidDnsName(_)
        );

        match stage {
            Stage::Connect => Self::Connection { stage, source },
            _ if transport => Self::Connection { stage, source },
            Stage::Login => Self::Auth { stage, source },
            Stage::Append => Self::Append { stage, source },
        }
    }

    /// Returns the network stage that failed, if any.
    #[must_use]
    pub const fn stage(&self) -> Option<Stage> {
        match self {
            Self::Connection { stage, .. }
            | Self::Auth { stage, .. }
            | Self::Append { stage, .. }
            | Self::Timeout { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
