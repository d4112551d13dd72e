//! Command-line arguments.

use std::ffi::OsString;
use std::path::PathBuf;

use mdmail_core::config::{
    DEFAULT_DRAFTS_MAILBOX, DEFAULT_TIMEOUT, MAILBOX_VAR, PASSWORD_VAR, SERVER_VAR, TIMEOUT_VAR,
    USER_VAR, USERNAME_VAR,
};
use thiserror::Error;

pub const USAGE: &str = "Usage: mdmail [options] <message.md>...";

/// What the user asked for.
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    /// Save each file as a draft, in order.
    Run(Vec<PathBuf>),
    Help,
    Version,
}

#[derive(Debug, PartialEq, Eq, Error)]
pub enum UsageError {
    #[error("unknown option `{0}`")]
    UnknownOption(String),

    #[error("no message files given")]
    NoFiles,
}

/// Parses arguments, program name excluded.
///
/// `--help` and `--version` win over everything else; `--` ends option
/// parsing so files starting with `-` can still be passed.
pub fn parse<I>(args: I) -> Result<Command, UsageError>
where
    I: IntoIterator<Item = OsString>,
{
    let mut files = Vec::new();
    let mut options_done = false;

    for arg in args {
        if options_done {
            files.push(PathBuf::from(arg));
            continue;
        }
        match arg.to_str() {
            Some("-h" | "--help") => return Ok(Command::Help),
            Some("-V" | "--version") => return Ok(Command::Version),
            Some("--") => options_done = true,
            Some(option) if option.starts_with('-') && option.len() > 1 => {
                return Err(UsageError::UnknownOption(option.to_string()));
            }
            _ => files.push(PathBuf::from(arg)),
        }
    }

    if files.is_empty() {
        return Err(UsageError::NoFiles);
    }
    Ok(Command::Run(files))
}

pub fn help() -> String {
    format!(
        "mdmail - compose email using Markdown

Converts each Markdown file, with its YAML frontmatter, to an HTML email
and saves it as a draft on your IMAP server.

{USAGE}

Options:
  -h, --help     Print this help
  -V, --version  Print version

Environment:
  {SERVER_VAR:<22} Server as host[:port], port 993 by default
  {USER_VAR:<22} Login name ({USERNAME_VAR} is also accepted)
  {PASSWORD_VAR:<22} Login password
  {MAILBOX_VAR:<22} Drafts mailbox (default: {DEFAULT_DRAFTS_MAILBOX})
  {TIMEOUT_VAR:<22} Network timeout in seconds (default: {timeout})
  {log:<22} Log filter, e.g. mdmail_imap=debug

Example:

  $ export {SERVER_VAR}=imap.gmail.com:993
  $ export {USER_VAR}=you@gmail.com
  $ export {PASSWORD_VAR}=your-app-password
  $ mdmail message.md
",
        timeout = DEFAULT_TIMEOUT.as_secs(),
        log = "RUST_LOG",
    )
}
