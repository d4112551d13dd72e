//! Implementation for the not-authenticated state.

use std::marker::PhantomData;

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, warn};

use super::Client;
use super::states::{Authenticated, NotAuthenticated};
use crate::command::{Command, TagGenerator};
use crate::connection::config::Config;
use crate::connection::framed::FramedStream;
use crate::connection::stream::{ImapStream, connect_tls};
use crate::parser::{Response, ResponseParser, UntaggedResponse};
use crate::types::{ResponseCode, Status};
use crate::{Error, Result};

impl Client<ImapStream, NotAuthenticated> {
    /// Opens a TLS connection and reads the server greeting.
    ///
    /// Every read and write on the session is bounded by
    /// [`Config::io_timeout`].
    pub async fn connect(config: &Config) -> Result<Self> {
        let stream = connect_tls(config).await?;
        let framed = FramedStream::new(stream).with_timeout(config.io_timeout);
        Self::from_framed(framed).await
    }
}

impl<S> Client<S, NotAuthenticated>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Creates a new client from a connected stream.
    ///
    /// Reads the server greeting and initial capabilities.
    pub async fn from_stream(stream: S) -> Result<Self> {
        Self::from_framed(FramedStream::new(stream)).await
    }

    /// Creates a new client from a framed stream, reading the greeting.
    pub async fn from_framed(mut framed: FramedStream<S>) -> Result<Self> {
        let greeting = framed.read_response().await?;

        let (code, pre_authenticated) = match ResponseParser::parse(&greeting)? {
            Response::Untagged(UntaggedResponse::Status { status, code, text }) => match status {
                Status::Ok | Status::PreAuth => {
                    debug!(%status, %text, "server greeting");
                    (code, status == Status::PreAuth)
                }
                Status::Bye => return Err(Error::Bye(text)),
                Status::No | Status::Bad => {
                    return Err(Error::Protocol(format!("unexpected greeting: {status} {text}")));
                }
            },
            other => {
                return Err(Error::Protocol(format!("unexpected greeting: {other:?}")));
            }
        };

        let capabilities = match code {
            Some(ResponseCode::Capability(caps)) => caps,
            _ => Vec::new(),
        };

        Ok(Self {
            stream: framed,
            tag_gen: TagGenerator::default(),
            capabilities,
            pre_authenticated,
            _state: PhantomData,
        })
    }

    /// Authenticates with the server using LOGIN.
    ///
    /// Consumes self and returns an authenticated client on success. On
    /// failure the unauthenticated client is handed back alongside the error
    /// so the caller can still log out.
    ///
    /// A PREAUTH session skips LOGIN. A server advertising `LOGINDISABLED`
    /// is refused before any credentials are sent, as are credentials with
    /// control characters, which a quoted string cannot carry. A NO to LOGIN
    /// becomes [`Error::Auth`].
    pub async fn login(
        mut self,
        username: &str,
        password: &str,
    ) -> std::result::Result<Client<S, Authenticated>, (Error, Self)> {
        if self.pre_authenticated {
            debug!("session is pre-authenticated, skipping LOGIN");
            return Ok(self.transition());
        }

        if self.capabilities.is_empty()
            && let Err(e) = self.capability().await
        {
            return Err((e, self));
        }

        if self.login_disabled() {
            warn!("server advertises LOGINDISABLED");
            return Err((
                Error::Auth("server does not accept LOGIN on this connection".to_string()),
                self,
            ));
        }

        if [username, password].iter().any(|s| s.chars().any(|c| c.is_ascii_control())) {
            return Err((
                Error::Auth("credentials contain control characters".to_string()),
                self,
            ));
        }

        match self.send_login(username, password).await {
            Ok(()) => {
                debug!("logged in");
                Ok(self.transition())
            }
            Err(Error::No { text, .. }) => Err((Error::Auth(text), self)),
            Err(e) => Err((e, self)),
        }
    }

    async fn send_login(&mut self, username: &str, password: &str) -> Result<()> {
        let tag = self.tag_gen.next();
        let command = Command::Login {
            username: username.to_string(),
            password: password.to_string(),
        };
        self.send(&command, &tag).await?;

        let responses = self.read_until_tagged(&tag).await?;
        self.absorb_capabilities(&responses);
        Self::check_tagged_ok(&responses, &tag)?;

        Ok(())
    }
}
