//! Where and how long to connect.

use std::time::Duration;

/// Port for IMAP over implicit TLS.
pub const IMPLICIT_TLS_PORT: u16 = 993;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings. TLS is always implicit; there is no STARTTLS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Server hostname, also used for SNI and certificate verification.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Bound on TCP connect and the TLS handshake, each.
    pub connect_timeout: Duration,
    /// Bound on every read and write once connected.
    pub io_timeout: Duration,
}

impl Config {
    /// Port 993 and 30 second timeouts.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: IMPLICIT_TLS_PORT,
            connect_timeout: DEFAULT_TIMEOUT,
            io_timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Starts from [`Config::new`] and adjusts from there.
    #[must_use]
    pub fn builder(host: impl Into<String>) -> ConfigBuilder {
        ConfigBuilder(Self::new(host))
    }
}

/// Builder for [`Config`].
#[derive(Debug, Clone)]
#[must_use]
pub struct ConfigBuilder(Config);

impl ConfigBuilder {
    /// Server port.
    pub const fn port(mut self, port: u16) -> Self {
        self.0.port = port;
        self
    }

    /// Bound on TCP connect and on the TLS handshake.
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.0.connect_timeout = timeout;
        self
    }

    /// Bound on each read and write.
    pub const fn io_timeout(mut self, timeout: Duration) -> Self {
        self.0.io_timeout = timeout;
        self
    }

    /// One bound for connecting and for every read and write.
    pub const fn timeout(self, timeout: Duration) -> Self {
        self.connect_timeout(timeout).io_timeout(timeout)
    }

    /// Finishes the configuration.
    pub fn build(self) -> Config {
        self.0
    }
}
