//! Draft upload over IMAP.
//!
//! The uploader talks to the server through two small traits so the whole
//! connect → login → append → logout sequence can be driven by a fake in
//! tests. [`ImapOpener`] is the real implementation on top of
//! [`mdmail_imap::Client`].

use chrono::{DateTime, FixedOffset};
use mdmail_imap::{
    AppendUid, Authenticated, Client, Error as ImapError, ImapStream, Mailbox, NotAuthenticated,
};
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{Error, Stage};
use crate::Result;

/// Opens IMAP sessions.
#[allow(async_fn_in_trait)]
pub trait SessionOpener {
    /// Session type handed out by [`SessionOpener::open`].
    type Session: DraftSession;

    /// Connects and reads the server greeting.
    async fn open(&self, config: &mdmail_imap::Config) -> std::result::Result<Self::Session, ImapError>;
}

/// The operations a draft upload performs on an open session.
#[allow(async_fn_in_trait)]
pub trait DraftSession {
    /// Authenticates with LOGIN.
    async fn login(&mut self, username: &str, password: &str) -> std::result::Result<(), ImapError>;

    /// Appends `message` to `mailbox` with no flags.
    async fn append(
        &mut self,
        mailbox: &Mailbox,
        date: &DateTime<FixedOffset>,
        message: &[u8],
    ) -> std::result::Result<Option<AppendUid>, ImapError>;

    /// Ends the session. Valid in any state.
    async fn logout(self) -> std::result::Result<(), ImapError>;
}

/// Opens TLS sessions with [`Client::connect`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ImapOpener;

impl SessionOpener for ImapOpener {
    type Session = ImapSession<ImapStream>;

    async fn open(&self, config: &mdmail_imap::Config) -> std::result::Result<Self::Session, ImapError> {
        Client::connect(config).await.map(ImapSession::new)
    }
}

/// [`DraftSession`] over the type-state IMAP client.
#[derive(Debug)]
pub struct ImapSession<S> {
    state: SessionState<S>,
}

#[derive(Debug)]
enum SessionState<S> {
    Connected(Client<S, NotAuthenticated>),
    LoggedIn(Client<S, Authenticated>),
    Closed,
}

impl<S> ImapSession<S> {
    /// Wraps a client that has read the greeting.
    #[must_use]
    pub const fn new(client: Client<S, NotAuthenticated>) -> Self {
        Self {
            state: SessionState::Connected(client),
        }
    }
}

impl<S> DraftSession for ImapSession<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    async fn login(&mut self, username: &str, password: &str) -> std::result::Result<(), ImapError> {
        match std::mem::replace(&mut self.state, SessionState::Closed) {
            SessionState::Connected(client) => match client.login(username, password).await {
                Ok(client) => {
                    self.state = SessionState::LoggedIn(client);
                    Ok(())
                }
                Err((e, client)) => {
                    self.state = SessionState::Connected(client);
                    Err(e)
                }
            },
            state => {
                self.state = state;
                Err(ImapError::Protocol("session is not awaiting LOGIN".to_string()))
            }
        }
    }

    async fn append(
        &mut self,
        mailbox: &Mailbox,
        date: &DateTime<FixedOffset>,
        message: &[u8],
    ) -> std::result::Result<Option<AppendUid>, ImapError> {
        match &mut self.state {
            SessionState::LoggedIn(client) => client.append(mailbox, &[], Some(date), message).await,
            _ => Err(ImapError::Protocol("APPEND before LOGIN".to_string())),
        }
    }

    async fn logout(self) -> std::result::Result<(), ImapError> {
        match self.state {
            SessionState::Connected(client) => client.logout().await,
            SessionState::LoggedIn(client) => client.logout().await,
            SessionState::Closed => Ok(()),
        }
    }
}

/// Uploads `message` as a draft to the configured mailbox.
///
/// Once a session is open, LOGOUT is attempted on every exit path. A failing
/// logout is logged and never replaces the result of the upload.
///
/// # Errors
///
/// Returns [`Error::Connection`], [`Error::Auth`], [`Error::Append`] or
/// [`Error::Timeout`] tagged with the failing [`Stage`].
pub async fn upload_draft<O: SessionOpener>(
    opener: &O,
    config: &Config,
    message: &[u8],
    date: &DateTime<FixedOffset>,
) -> Result<Option<AppendUid>> {
    let mut session = opener
        .open(&config.imap())
        .await
        .map_err(|e| Error::network(Stage::Connect, e))?;
    info!(server = %config.server, "connected");

    let outcome = deliver(&mut session, config, message, date).await;

    match session.logout().await {
        Ok(()) => debug!("session closed"),
        Err(e) => warn!(error = %e, "logout failed"),
    }
    outcome
}

async fn deliver<S: DraftSession>(
    session: &mut S,
    config: &Config,
    message: &[u8],
    date: &DateTime<FixedOffset>,
) -> Result<Option<AppendUid>> {
    session
        .login(&config.username, config.password.expose())
        .await
        .map_err(|e| Error::network(Stage::Login, e))?;
    info!("logged in");

    let mailbox = Mailbox::new(config.drafts_mailbox.as_str());
    let uid = session
        .append(&mailbox, date, message)
        .await
        .map_err(|e| Error::network(Stage::Append, e))?;
    info!(%mailbox, bytes = message.len(), appenduid = ?uid, "draft appended");

    Ok(uid)
}
