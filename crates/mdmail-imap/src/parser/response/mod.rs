//! IMAP response parser.
//!
//! Parses server responses according to RFC 9051 grammar.

#![allow(clippy::missing_errors_doc)]

mod helpers;
mod types;

pub use types::UntaggedResponse;

use crate::parser::lexer::{Lexer, Token};
use crate::types::{ResponseCode, Status, Tag};
use crate::{Error, Result};

use helpers::{parse_capability_data, parse_response_code, read_text_until_crlf};

/// A parsed IMAP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Tagged response (command completion).
    Tagged {
        /// The command tag.
        tag: Tag,
        /// Response status.
        status: Status,
        /// Optional response code.
        code: Option<ResponseCode>,
        /// Human-readable text.
        text: String,
    },
    /// Untagged response (server data).
    Untagged(UntaggedResponse),
    /// Continuation request.
    Continuation {
        /// Optional text/data.
        text: Option<String>,
    },
}

/// Response parser.
pub struct ResponseParser;

impl ResponseParser {
    /// Parses a complete response line.
    pub fn parse(input: &[u8]) -> Result<Response> {
        let mut lexer = Lexer::new(input);

        match lexer.next_token()? {
            Token::Asterisk => Self::parse_untagged(&mut lexer),
            Token::Plus => Ok(Self::parse_continuation(&mut lexer)),
            Token::Atom(tag) => Self::parse_tagged(&mut lexer, tag),
            token => Err(Error::Parse {
                position: 0,
                message: format!("Expected *, +, or tag, got {token:?}"),
            }),
        }
    }

    fn parse_tagged(lexer: &mut Lexer<'_>, tag: &str) -> Result<Response> {
        lexer.expect_space()?;
        let status = Self::parse_status(lexer)?;
        let (code, text) = Self::parse_resp_text(lexer)?;

        Ok(Response::Tagged {
            tag: Tag::new(tag),
            status,
            code,
            text,
        })
    }

    fn parse_untagged(lexer: &mut Lexer<'_>) -> Result<Response> {
        lexer.expect_space()?;
        let rest = lexer.remaining();

        let untagged = match lexer.next_token()? {
            Token::Atom(keyword) => {
                if let Some(status) = Status::from_keyword(keyword) {
                    let (code, text) = Self::parse_resp_text(lexer)?;
                    UntaggedResponse::Status { status, code, text }
                } else if keyword.eq_ignore_ascii_case("CAPABILITY") {
                    UntaggedResponse::Capability(parse_capability_data(lexer)?)
                } else {
                    UntaggedResponse::Other(Self::line_text(rest))
                }
            }
            Token::Number(n) => {
                lexer.expect_space()?;
                if lexer.read_atom_string()?.eq_ignore_ascii_case("EXISTS") {
                    UntaggedResponse::Exists(n)
                } else {
                    UntaggedResponse::Other(Self::line_text(rest))
                }
            }
            _ => UntaggedResponse::Other(Self::line_text(rest)),
        };

        Ok(Response::Untagged(untagged))
    }

    fn parse_continuation(lexer: &mut Lexer<'_>) -> Response {
        if lexer.peek() == Some(b' ') {
            lexer.advance();
        }
        let text = read_text_until_crlf(lexer);

        Response::Continuation {
            text: if text.is_empty() { None } else { Some(text) },
        }
    }

    fn parse_status(lexer: &mut Lexer<'_>) -> Result<Status> {
        let keyword = lexer.read_atom_string()?;
        Status::from_keyword(keyword).ok_or_else(|| Error::Parse {
            position: lexer.position(),
            message: format!("Invalid status: {keyword}"),
        })
    }

    /// Parses `[SP] ["[" resp-text-code "]" SP] text`.
    fn parse_resp_text(lexer: &mut Lexer<'_>) -> Result<(Option<ResponseCode>, String)> {
        if lexer.peek() == Some(b' ') {
            lexer.advance();
        }

        let code = if lexer.peek() == Some(b'[') {
            Some(parse_response_code(lexer)?)
        } else {
            None
        };

        if lexer.peek() == Some(b' ') {
            lexer.advance();
        }

        Ok((code, read_text_until_crlf(lexer)))
    }

    fn line_text(bytes: &[u8]) -> String {
        let text = String::from_utf8_lossy(bytes);
        text.trim_end_matches(['\r', '\n']).to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use crate::types::{AppendUid, Capability, ResponseCode, Uid, UidValidity};

    use super::*;

    #[test]
    fn test_parse_greeting() {
        let input = b"* OK [CAPABILITY IMAP4rev1 UIDPLUS AUTH=PLAIN] Dovecot ready.\r\n";

        match ResponseParser::parse(input).unwrap() {
            Response::Untagged(UntaggedResponse::Status {
                status: Status::Ok,
                code: Some(ResponseCode::Capability(caps)),
                text,
            }) => {
                assert_eq!(
                    caps,
                    vec![
                        Capability::Imap4Rev1,
                        Capability::UidPlus,
                        Capability::Auth("PLAIN".to_string())
                    ]
                );
                assert_eq!(text, "Dovecot ready.");
            }
            other => panic!("Expected greeting, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_tagged_ok() {
        let response = ResponseParser::parse(b"A0001 OK LOGIN completed\r\n").unwrap();

        assert_eq!(
            response,
            Response::Tagged {
                tag: Tag::new("A0001"),
                status: Status::Ok,
                code: None,
                text: "LOGIN completed".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_tagged_no_with_code() {
        let input = b"A0001 NO [AUTHENTICATIONFAILED] Invalid credentials (Failure)\r\n";

        match ResponseParser::parse(input).unwrap() {
            Response::Tagged {
                status, code, text, ..
            } => {
                assert_eq!(status, Status::No);
                assert_eq!(code, Some(ResponseCode::AuthenticationFailed));
                assert_eq!(text, "Invalid credentials (Failure)");
            }
            other => panic!("Expected tagged NO, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_appenduid() {
        let input = b"A0002 OK [APPENDUID 38505 3955] APPEND completed\r\n";

        match ResponseParser::parse(input).unwrap() {
            Response::Tagged { code, .. } => assert_eq!(
                code,
                Some(ResponseCode::AppendUid(AppendUid {
                    uid_validity: UidValidity::new(38505).unwrap(),
                    uid: Uid::new(3955).unwrap(),
                }))
            ),
            other => panic!("Expected tagged OK, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_unknown_code_is_skipped() {
        let input = b"* OK [PERMANENTFLAGS (\\Draft \\*)] Limited\r\n";

        match ResponseParser::parse(input).unwrap() {
            Response::Untagged(UntaggedResponse::Status { code, text, .. }) => {
                assert_eq!(code, Some(ResponseCode::Unknown("PERMANENTFLAGS".to_string())));
                assert_eq!(text, "Limited");
            }
            other => panic!("Expected untagged OK, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_capability() {
        let input = b"* CAPABILITY IMAP4rev2 LOGINDISABLED\r\n";

        assert_eq!(
            ResponseParser::parse(input).unwrap(),
            Response::Untagged(UntaggedResponse::Capability(vec![
                Capability::Imap4Rev2,
                Capability::LoginDisabled
            ]))
        );
    }

    #[test]
    fn test_parse_other_untagged_data() {
        assert_eq!(
            ResponseParser::parse(b"* 3 EXISTS\r\n").unwrap(),
            Response::Untagged(UntaggedResponse::Exists(3))
        );
        assert_eq!(
            ResponseParser::parse(b"* ID (\"name\" \"imap\")\r\n").unwrap(),
            Response::Untagged(UntaggedResponse::Other("ID (\"name\" \"imap\")".to_string()))
        );
        assert_eq!(
            ResponseParser::parse(b"* 1 FETCH (FLAGS (\\Seen))\r\n").unwrap(),
            Response::Untagged(UntaggedResponse::Other("1 FETCH (FLAGS (\\Seen))".to_string()))
        );
    }

    #[test]
    fn test_parse_continuation() {
        assert_eq!(
            ResponseParser::parse(b"+ Ready for literal data\r\n").unwrap(),
            Response::Continuation {
                text: Some("Ready for literal data".to_string())
            }
        );
        assert_eq!(
            ResponseParser::parse(b"+\r\n").unwrap(),
            Response::Continuation { text: None }
        );
    }

    #[test]
    fn test_parse_bye() {
        match ResponseParser::parse(b"* BYE Too many connections\r\n").unwrap() {
            Response::Untagged(UntaggedResponse::Status {
                status: Status::Bye,
                text,
                ..
            }) => {
                assert_eq!(text, "Too many connections");
            }
            other => panic!("Expected BYE, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(ResponseParser::parse(b"(oops)\r\n").is_err());
        assert!(ResponseParser::parse(b"A0001 MAYBE fine\r\n").is_err());
    }
}
