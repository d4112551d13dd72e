//! Session states.
//!
//! Each state is a zero-sized marker on [`super::Client`], so only the
//! commands valid in that state can be called.

/// Greeting read; LOGIN is the next step.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotAuthenticated;

/// Logged in (or PREAUTH); APPEND is available.
#[derive(Debug, Clone, Copy, Default)]
pub struct Authenticated;
