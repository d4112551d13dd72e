//! Flags for the APPEND flag list.

use std::fmt;

/// Flag set on a message as it is appended.
///
/// Drafts are normally appended with an empty list; the server adds
/// `\Draft` itself when the mailbox is a drafts folder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Flag {
    /// `\Seen`
    Seen,
    /// `\Answered`
    Answered,
    /// `\Flagged`
    Flagged,
    /// `\Draft`
    Draft,
    /// A keyword, written as-is.
    Keyword(String),
}

impl Flag {
    /// Creates a keyword flag. Returns `None` unless `name` is a non-empty
    /// atom that does not start with `\`.
    #[must_use]
    pub fn keyword(name: &str) -> Option<Self> {
        let valid = !name.is_empty()
            && !name.starts_with('\\')
            && name
                .bytes()
                .all(|b| b.is_ascii_graphic() && !b"(){%*\"\\]".contains(&b));
        valid.then(|| Self::Keyword(name.to_string()))
    }

    /// Wire form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Seen => "\\Seen",
            Self::Answered => "\\Answered",
            Self::Flagged => "\\Flagged",
            Self::Draft => "\\Draft",
            Self::Keyword(name) => name,
        }
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
