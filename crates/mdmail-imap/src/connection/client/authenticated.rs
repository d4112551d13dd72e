//! Implementation for the authenticated state.

use chrono::{DateTime, FixedOffset};
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::debug;

use super::Client;
use super::states::Authenticated;
use crate::command::Command;
use crate::parser::{Response, ResponseParser};
use crate::types::{AppendUid, Flag, Mailbox, ResponseCode, Status};
use crate::{Error, Result};

impl<S> Client<S, Authenticated>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Appends a message to a mailbox.
    ///
    /// The message is sent as a synchronizing literal once the server
    /// answers the command line with a continuation. Returns the
    /// `[APPENDUID]` assigned by a UIDPLUS server, if any.
    pub async fn append(
        &mut self,
        mailbox: &Mailbox,
        flags: &[Flag],
        internal_date: Option<&DateTime<FixedOffset>>,
        message: &[u8],
    ) -> Result<Option<AppendUid>> {
        let tag = self.tag_gen.next();
        let command = Command::Append {
            mailbox: mailbox.clone(),
            flags: flags.to_vec(),
            internal_date: internal_date.copied(),
            size: message.len(),
        };
        self.send(&command, &tag).await?;

        self.await_continuation(&tag).await?;
        debug!(bytes = message.len(), "sending message literal");
        self.stream.write_literal(message).await?;

        let responses = self.read_until_tagged(&tag).await?;
        let code = Self::check_tagged_ok(&responses, &tag)?;

        let uid = match code {
            Some(ResponseCode::AppendUid(uid)) => Some(uid),
            _ => None,
        };
        debug!(%mailbox, appenduid = ?uid, "message appended");
        Ok(uid)
    }

    /// Waits for `+`, skipping untagged data the server sends first.
    async fn await_continuation(&mut self, tag: &str) -> Result<()> {
        loop {
            let response = self.stream.read_response().await?;
            match ResponseParser::parse(&response)? {
                Response::Continuation { .. } => return Ok(()),
                Response::Untagged(_) => {}
                Response::Tagged {
                    tag: resp_tag,
                    status,
                    code,
                    text,
                } if resp_tag.as_str() == tag => {
                    return match status {
                        Status::No => Err(Error::No { code, text }),
                        Status::Bad => Err(Error::Bad { code, text }),
                        _ => Err(Error::Protocol(format!(
                            "APPEND completed without a continuation: {text}"
                        ))),
                    };
                }
                Response::Tagged { tag: resp_tag, .. } => {
                    return Err(Error::Protocol(format!(
                        "unexpected tagged response {resp_tag} during APPEND"
                    )));
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tokio_test::io::Builder;

    use super::*;
    use crate::types::{Uid, UidValidity};

    #[tokio::test]
    async fn test_append_rejected_before_continuation() {
        let mock = Builder::new()
            .read(b"* PREAUTH ready\r\n")
            .write(b"A0001 APPEND Nope () {4}\r\n")
            .read(b"A0001 NO [TRYCREATE] Mailbox does not exist\r\n")
            .build();

        let client = Client::from_stream(mock).await.unwrap();
        let mut client = client.login("u", "p").await.unwrap();

        let err = client
            .append(&Mailbox::new("Nope"), &[], None, b"body")
            .await
            .unwrap_err();
        assert_eq!(err.response_code(), Some(&ResponseCode::TryCreate));
    }

    #[tokio::test]
    async fn test_append_skips_untagged_before_continuation() {
        let mock = Builder::new()
            .read(b"* PREAUTH ready\r\n")
            .write(b"A0001 APPEND Drafts (\\Draft) {4}\r\n")
            .read(b"* 12 EXISTS\r\n")
            .read(b"+ go ahead\r\n")
            .write(b"body")
            .write(b"\r\n")
            .read(b"A0001 OK [APPENDUID 1 12] done\r\n")
            .build();

        let client = Client::from_stream(mock).await.unwrap();
        let mut client = client.login("u", "p").await.unwrap();

        let uid = client
            .append(&Mailbox::new("Drafts"), &[Flag::Draft], None, b"body")
            .await
            .unwrap();
        assert_eq!(
            uid,
            Some(AppendUid {
                uid_validity: UidValidity::new(1).unwrap(),
                uid: Uid::new(12).unwrap(),
            })
        );
    }
}
