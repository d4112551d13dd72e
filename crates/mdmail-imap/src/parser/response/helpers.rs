//! Parser helper functions.

use crate::parser::lexer::{Lexer, Token};
use crate::types::{AppendUid, Capability, ResponseCode, Uid, UidValidity};
use crate::Result;

/// Parses a bracketed response code such as `[APPENDUID 38505 3955]`.
///
/// Codes this client has no use for are returned as
/// [`ResponseCode::Unknown`] with their arguments skipped.
pub fn parse_response_code(lexer: &mut Lexer<'_>) -> Result<ResponseCode> {
    lexer.expect(Token::LBracket)?;

    let atom = lexer.read_atom_string()?;
    let code = match atom.to_uppercase().as_str() {
        "ALERT" => ResponseCode::Alert,
        "PARSE" => ResponseCode::Parse,
        "TRYCREATE" => ResponseCode::TryCreate,
        "AUTHENTICATIONFAILED" => ResponseCode::AuthenticationFailed,
        "OVERQUOTA" => ResponseCode::OverQuota,
        "LIMIT" => ResponseCode::Limit,
        "CAPABILITY" => ResponseCode::Capability(parse_capability_data(lexer)?),
        "APPENDUID" => {
            lexer.expect_space()?;
            let validity = lexer.read_number()?;
            lexer.expect_space()?;
            let uid = lexer.read_number()?;
            match (UidValidity::new(validity), Uid::new(uid)) {
                (Some(uid_validity), Some(uid)) => ResponseCode::AppendUid(AppendUid { uid_validity, uid }),
                _ => return Err(lexer.error("APPENDUID values must be non-zero")),
            }
        }
        _ => ResponseCode::Unknown(atom.to_string()),
    };

    // Skip arguments of codes we do not interpret
    while lexer.peek() != Some(b']') && !lexer.is_eof() {
        lexer.advance();
    }
    lexer.expect(Token::RBracket)?;

    Ok(code)
}

/// Parses space-separated capability atoms.
pub fn parse_capability_data(lexer: &mut Lexer<'_>) -> Result<Vec<Capability>> {
    let mut caps = Vec::new();

    while lexer.peek() == Some(b' ') {
        lexer.advance();
        if let Token::Atom(s) = lexer.next_token()? {
            caps.push(Capability::parse(s));
        }
    }

    Ok(caps)
}

/// Reads text until CRLF, consuming the CRLF.
pub fn read_text_until_crlf(lexer: &mut Lexer<'_>) -> String {
    let remaining = lexer.remaining();
    let end = remaining
        .windows(2)
        .position(|w| w == b"\r\n")
        .unwrap_or(remaining.len());

    lexer.skip(end + 2);

    String::from_utf8_lossy(&remaining[..end]).into_owned()
}
