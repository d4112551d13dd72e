//! Status response conditions.

use std::fmt;

/// Condition of a status response (`OK`, `NO`, `BAD`, `PREAUTH`, `BYE`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Success.
    Ok,
    /// Operational failure, e.g. bad credentials or an unknown mailbox.
    No,
    /// The server did not understand the command.
    Bad,
    /// Greeting of a session that is already authenticated.
    PreAuth,
    /// The server is about to close the connection.
    Bye,
}

impl Status {
    /// Matches a status keyword, ignoring case.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        [Self::Ok, Self::No, Self::Bad, Self::PreAuth, Self::Bye]
            .into_iter()
            .find(|status| status.keyword().eq_ignore_ascii_case(keyword))
    }

    /// Wire keyword.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::No => "NO",
            Self::Bad => "BAD",
            Self::PreAuth => "PREAUTH",
            Self::Bye => "BYE",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_keyword() {
        assert_eq!(Status::from_keyword("ok"), Some(Status::Ok));
        assert_eq!(Status::from_keyword("PreAuth"), Some(Status::PreAuth));
        assert_eq!(Status::from_keyword("BYE"), Some(Status::Bye));
        assert_eq!(Status::from_keyword("MAYBE"), None);
    }
}
