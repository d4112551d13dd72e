//! IMAP connection management.
//!
//! This module provides connection handling for IMAP servers:
//! - Configuration (host, port, timeouts)
//! - TLS stream over rustls
//! - Framed I/O for IMAP protocol, with per-operation timeouts
//! - Type-state connection wrapper

mod client;
mod config;
mod framed;
mod stream;

pub use client::{Authenticated, Client, NotAuthenticated};
pub use config::{Config, ConfigBuilder, IMPLICIT_TLS_PORT};
pub use framed::{FramedStream, ResponseAccumulator};
pub use stream::{ImapStream, connect_tls, create_tls_connector};
