//! Response codes.

use super::{Capability, Uid, UidValidity};

/// Where an appended message landed (RFC 4315 `APPENDUID`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppendUid {
    /// UIDVALIDITY of the destination mailbox.
    pub uid_validity: UidValidity,
    /// UID assigned to the message.
    pub uid: Uid,
}

impl std::fmt::Display for AppendUid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.uid_validity, self.uid)
    }
}

/// Bracketed response code carried by a status response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseCode {
    /// ALERT: Human-readable message that MUST be shown to user.
    Alert,
    /// CAPABILITY response.
    Capability(Vec<Capability>),
    /// PARSE: Error parsing message.
    Parse,
    /// TRYCREATE: Mailbox doesn't exist, but can be created.
    TryCreate,
    /// AUTHENTICATIONFAILED (RFC 5530).
    AuthenticationFailed,
    /// OVERQUOTA (RFC 5530).
    OverQuota,
    /// LIMIT (RFC 5530), e.g. message too large.
    Limit,
    /// APPENDUID: UID assigned to appended message.
    AppendUid(AppendUid),
    /// Unknown response code.
    Unknown(String),
}
