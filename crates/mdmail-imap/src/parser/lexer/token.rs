//! Lexer output.

/// One lexical unit of a server response line.
///
/// Atoms borrow from the input; quoted strings and literals are owned
/// because escapes and literal framing are removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// `*` opening an untagged response.
    Asterisk,
    /// `+` opening a continuation request.
    Plus,
    /// Bare word: a tag, keyword, capability or flag.
    Atom(&'a str),
    /// Run of digits that fits in a `u32`.
    Number(u32),
    /// `"..."` with escapes resolved.
    QuotedString(String),
    /// `{n}` literal payload.
    Literal(Vec<u8>),
    /// `NIL`, any case.
    Nil,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// Single space.
    Space,
    /// Line terminator.
    Crlf,
    /// No input left.
    Eof,
}
