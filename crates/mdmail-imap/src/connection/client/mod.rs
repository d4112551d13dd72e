//! Type-state IMAP client connection.
//!
//! Uses the type-state pattern to enforce valid state transitions at compile time.
//! The IMAP connection states are:
//!
//! - `NotAuthenticated`: Initial state after the greeting
//! - `Authenticated`: After successful LOGIN, or a PREAUTH greeting
//!
//! Each state only exposes methods that are valid for that state. LOGOUT is
//! valid in every state.

#![allow(clippy::missing_errors_doc)]

mod authenticated;
mod not_authenticated;
mod states;

use std::io;
use std::marker::PhantomData;

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::debug;

pub use self::states::{Authenticated, NotAuthenticated};
use super::framed::{FramedStream, ResponseAccumulator};
use crate::command::{Command, TagGenerator};
use crate::parser::{Response, ResponseParser, UntaggedResponse};
use crate::types::{Capability, ResponseCode, Status};
use crate::{Error, Result};

/// IMAP client connection with type-state.
///
/// The type parameter `State` tracks the connection state at compile time.
pub struct Client<S, State> {
    pub(crate) stream: FramedStream<S>,
    pub(crate) tag_gen: TagGenerator,
    pub(crate) capabilities: Vec<Capability>,
    pub(crate) pre_authenticated: bool,
    _state: PhantomData<State>,
}

impl<S, State> std::fmt::Debug for Client<S, State> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("tag_gen", &self.tag_gen)
            .field("capabilities", &self.capabilities)
            .field("pre_authenticated", &self.pre_authenticated)
            .finish_non_exhaustive()
    }
}

/// Shared implementation for all states.
impl<S, State> Client<S, State>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Moves the connection into another state.
    fn transition<Next>(self) -> Client<S, Next> {
        Client {
            stream: self.stream,
            tag_gen: self.tag_gen,
            capabilities: self.capabilities,
            pre_authenticated: self.pre_authenticated,
            _state: PhantomData,
        }
    }

    /// Returns the server capabilities.
    #[must_use]
    pub fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }

    /// Checks if the server has a specific capability.
    #[must_use]
    pub fn has_capability(&self, cap: &Capability) -> bool {
        self.capabilities.contains(cap)
    }

    /// Returns true if the server supports UIDPLUS (RFC 4315).
    #[must_use]
    pub fn supports_uidplus(&self) -> bool {
        self.has_capability(&Capability::UidPlus)
    }

    /// Returns true if LOGIN is disabled.
    #[must_use]
    pub fn login_disabled(&self) -> bool {
        self.has_capability(&Capability::LoginDisabled)
    }

    /// Returns true if the server greeted with PREAUTH.
    #[must_use]
    pub const fn is_pre_authenticated(&self) -> bool {
        self.pre_authenticated
    }

    /// Sends a NOOP command.
    pub async fn noop(&mut self) -> Result<()> {
        let tag = self.tag_gen.next();
        self.send(&Command::Noop, &tag).await?;

        let responses = self.read_until_tagged(&tag).await?;
        Self::check_tagged_ok(&responses, &tag)?;

        Ok(())
    }

    /// Sends a CAPABILITY command and updates the stored capabilities.
    pub async fn capability(&mut self) -> Result<Vec<Capability>> {
        let tag = self.tag_gen.next();
        self.send(&Command::Capability, &tag).await?;

        let responses = self.read_until_tagged(&tag).await?;
        self.absorb_capabilities(&responses);
        Self::check_tagged_ok(&responses, &tag)?;

        Ok(self.capabilities.clone())
    }

    /// Ends the session with LOGOUT.
    ///
    /// A server that closes the connection right after its BYE is treated
    /// as a clean logout.
    pub async fn logout(mut self) -> Result<()> {
        let tag = self.tag_gen.next();
        self.send(&Command::Logout, &tag).await?;

        match self.read_until_tagged(&tag).await {
            Ok(responses) => {
                Self::check_tagged_ok(&responses, &tag)?;
            }
            Err(Error::Io(e)) if e.kind() == io::ErrorKind::UnexpectedEof => {
                debug!("server closed the connection during LOGOUT");
            }
            Err(e) => return Err(e),
        }

        debug!("logged out");
        Ok(())
    }

    /// Serializes and writes a command.
    pub(crate) async fn send(&mut self, command: &Command, tag: &str) -> Result<()> {
        // LOGIN carries the password; never trace command bytes
        debug!(tag, command = command.name(), "sending command");
        self.stream.write_command(&command.serialize(tag)).await
    }

    /// Reads responses until we get a tagged response matching our tag.
    pub(crate) async fn read_until_tagged(&mut self, tag: &str) -> Result<Vec<Vec<u8>>> {
        let mut accumulator = ResponseAccumulator::new(tag);
        accumulator.read_until_tagged(&mut self.stream).await
    }

    /// Replaces the stored capabilities with any untagged CAPABILITY data.
    pub(crate) fn absorb_capabilities(&mut self, responses: &[Vec<u8>]) {
        for response_bytes in responses {
            if let Ok(Response::Untagged(UntaggedResponse::Capability(caps))) =
                ResponseParser::parse(response_bytes)
            {
                self.capabilities = caps;
            }
        }
    }

    /// Checks that the tagged response is OK and returns its response code.
    pub(crate) fn check_tagged_ok(
        responses: &[Vec<u8>],
        tag: &str,
    ) -> Result<Option<ResponseCode>> {
        for response_bytes in responses.iter().rev() {
            if let Ok(Response::Tagged {
                tag: resp_tag,
                status,
                code,
                text,
            }) = ResponseParser::parse(response_bytes)
                && resp_tag.as_str() == tag
            {
                return Self::status_result(status, code, text);
            }
        }

        Err(Error::Protocol("missing tagged response".to_string()))
    }

    fn status_result(
        status: Status,
        code: Option<ResponseCode>,
        text: String,
    ) -> Result<Option<ResponseCode>> {
        match status {
            Status::Ok | Status::PreAuth => Ok(code),
            Status::No => Err(Error::No { code, text }),
            Status::Bad => Err(Error::Bad { code, text }),
            Status::Bye => Err(Error::Bye(text)),
        }
    }
}
