//! Runtime configuration.
//!
//! Built once at the process boundary and handed to the pipeline.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use mdmail_imap::IMPLICIT_TLS_PORT;

use crate::error::ConfigError;

/// `host:port` of the IMAP server.
pub const SERVER_VAR: &str = "IMAP_SERVER";
/// Login name.
pub const USER_VAR: &str = "IMAP_USER";
/// Login name, accepted when [`USER_VAR`] is unset.
pub const USERNAME_VAR: &str = "IMAP_USERNAME";
/// Login password.
pub const PASSWORD_VAR: &str = "IMAP_PASSWORD";
/// Destination mailbox for drafts.
pub const MAILBOX_VAR: &str = "MDMAIL_DRAFTS_MAILBOX";
/// Network time budget in seconds.
pub const TIMEOUT_VAR: &str = "MDMAIL_TIMEOUT_SECS";

/// Drafts folder used when [`MAILBOX_VAR`] is unset.
pub const DEFAULT_DRAFTS_MAILBOX: &str = "[Gmail]/Drafts";
/// Network time budget used when [`TIMEOUT_VAR`] is unset.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A password that never shows up in `Debug` or `Display` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    /// Wraps a password.
    #[must_use]
    pub fn new(password: impl Into<String>) -> Self {
        Self(password.into())
    }

    /// Returns the password for the LOGIN command.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

impl fmt::Display for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

/// IMAP server address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerAddress {
    /// Hostname.
    pub host: String,
    /// Port, 993 unless given.
    pub port: u16,
}

impl FromStr for ServerAddress {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (host, port) = match s.rsplit_once(':') {
            Some((host, port)) => {
                let port = port
                    .parse::<u16>()
                    .ok()
                    .filter(|&port| port != 0)
                    .ok_or_else(|| format!("`{port}` is not a valid port"))?;
                (host, port)
            }
            None => (s, IMPLICIT_TLS_PORT),
        };

        if host.is_empty() {
            return Err("host is empty".to_string());
        }
        if host.contains(|c: char| c.is_whitespace() || c == ':' || c == '/') {
            return Err(format!("`{host}` is not a host name"));
        }

        Ok(Self {
            host: host.to_string(),
            port,
        })
    }
}

impl fmt::Display for ServerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Everything the pipeline needs from its environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// IMAP server.
    pub server: ServerAddress,
    /// Login name.
    pub username: String,
    /// Login password.
    pub password: Password,
    /// Mailbox drafts are appended to.
    pub drafts_mailbox: String,
    /// Bound on TCP connect, TLS handshake and every read or write.
    pub timeout: Duration,
}

impl Config {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// See [`Config::from_lookup`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to
    /// its value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when the server, username or password
    /// is unset or empty, and [`ConfigError::Invalid`] for an unparseable
    /// server address or timeout.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let server = get(SERVER_VAR)
            .ok_or(ConfigError::Missing(SERVER_VAR))?
            .parse::<ServerAddress>()
            .map_err(|reason| ConfigError::Invalid {
                variable: SERVER_VAR,
                reason,
            })?;
        let username = get(USER_VAR)
            .or_else(|| get(USERNAME_VAR))
            .ok_or(ConfigError::Missing(USER_VAR))?;
        // Passwords may legitimately start or end with spaces
        let password = lookup(PASSWORD_VAR)
            .filter(|value| !value.is_empty())
            .map(Password::new)
            .ok_or(ConfigError::Missing(PASSWORD_VAR))?;
        let drafts_mailbox = get(MAILBOX_VAR).map_or_else(
            || DEFAULT_DRAFTS_MAILBOX.to_string(),
            |mailbox| mailbox.trim().to_string(),
        );
        let timeout = match get(TIMEOUT_VAR) {
            Some(value) => parse_timeout(&value)?,
            None => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            server,
            username,
            password,
            drafts_mailbox,
            timeout,
        })
    }

    /// Connection settings for the IMAP client.
    #[must_use]
    pub fn imap(&self) -> mdmail_imap::Config {
        mdmail_imap::Config::builder(self.server.host.clone())
            .port(self.server.port)
            .timeout(self.timeout)
            .build()
    }
}

fn parse_timeout(value: &str) -> Result<Duration, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|&secs| secs > 0)
        .map(Duration::from_secs)
        .ok_or_else(|| ConfigError::Invalid {
            variable: TIMEOUT_VAR,
            reason: format!("`{value}` is not a positive number of seconds"),
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    const BASE: [(&str, &str); 3] = [
        (SERVER_VAR, "imap.gmail.com:993"),
        (USER_VAR, "jane@example.com"),
        (PASSWORD_VAR, "app password"),
    ];

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&BASE)).unwrap();

        assert_eq!(
            config.server,
            ServerAddress {
                host: "imap.gmail.com".to_string(),
                port: 993
            }
        );
        assert_eq!(config.username, "jane@example.com");
        assert_eq!(config.password.expose(), "app password");
        assert_eq!(config.drafts_mailbox, "[Gmail]/Drafts");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_overrides() {
        let mut vars = BASE.to_vec();
        vars.push((MAILBOX_VAR, "Drafts"));
        vars.push((TIMEOUT_VAR, "5"));
        let config = Config::from_lookup(lookup(&vars)).unwrap();

        assert_eq!(config.drafts_mailbox, "Drafts");
        assert_eq!(config.timeout, Duration::from_secs(5));

        let imap = config.imap();
        assert_eq!(imap.host, "imap.gmail.com");
        assert_eq!(imap.io_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_username_fallback() {
        let vars = [
            (SERVER_VAR, "imap.example.com"),
            (USERNAME_VAR, "jane"),
            (PASSWORD_VAR, "pw"),
        ];
        let config = Config::from_lookup(lookup(&vars)).unwrap();

        assert_eq!(config.username, "jane");
        assert_eq!(config.server.port, 993);
    }

    #[test]
    fn test_missing_values() {
        assert_eq!(
            Config::from_lookup(lookup(&[])).unwrap_err(),
            ConfigError::Missing(SERVER_VAR)
        );

        let vars = [(SERVER_VAR, "imap.example.com"), (USER_VAR, "  "), (PASSWORD_VAR, "pw")];
        assert_eq!(
            Config::from_lookup(lookup(&vars)).unwrap_err(),
            ConfigError::Missing(USER_VAR)
        );

        let vars = [(SERVER_VAR, "imap.example.com"), (USER_VAR, "jane")];
        assert_eq!(
            Config::from_lookup(lookup(&vars)).unwrap_err(),
            ConfigError::Missing(PASSWORD_VAR)
        );
    }

    #[test]
    fn test_invalid_values() {
        for server in ["imap.example.com:http", ":993", "imap.example.com:0", "bad host:993"] {
            let mut vars = BASE.to_vec();
            vars[0] = (SERVER_VAR, server);
            assert!(matches!(
                Config::from_lookup(lookup(&vars)).unwrap_err(),
                ConfigError::Invalid { variable: SERVER_VAR, .. }
            ));
        }

        let mut vars = BASE.to_vec();
        vars.push((TIMEOUT_VAR, "0"));
        assert!(matches!(
            Config::from_lookup(lookup(&vars)).unwrap_err(),
            ConfigError::Invalid { variable: TIMEOUT_VAR, .. }
        ));
    }

    #[test]
    fn test_password_redacted() {
        let config = Config::from_lookup(lookup(&BASE)).unwrap();
        let debug = format!("{config:?}");

        assert!(!debug.contains("app password"));
        assert!(debug.contains("<redacted>"));
        assert_eq!(config.password.to_string(), "<redacted>");
    }
}
