//! Untagged response data.

use crate::types::{Capability, ResponseCode, Status};

/// Data the server sends with a `* ` prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UntaggedResponse {
    /// `* OK`, `* NO`, `* BAD`, `* PREAUTH` or `* BYE`.
    Status {
        /// Condition.
        status: Status,
        /// Bracketed response code, if any.
        code: Option<ResponseCode>,
        /// Human-readable text.
        text: String,
    },
    /// `* CAPABILITY ...`
    Capability(Vec<Capability>),
    /// `* n EXISTS`
    Exists(u32),
    /// Anything else, kept as the text after `* `.
    Other(String),
}
