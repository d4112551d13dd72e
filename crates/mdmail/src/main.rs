//! `mdmail` - write email in Markdown, save it as an IMAP draft.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod cli;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use mdmail_core::{Config, ImapOpener, process_file};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::Command;

const DEFAULT_LOG_FILTER: &str = "mdmail=info,mdmail_core=info,mdmail_imap=warn";

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let files = match cli::parse(std::env::args_os().skip(1)) {
        Ok(Command::Run(files)) => files,
        Ok(Command::Help) => {
            print!("{}", cli::help());
            return ExitCode::SUCCESS;
        }
        Ok(Command::Version) => {
            println!("mdmail {}", env!("CARGO_PKG_VERSION"));
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("mdmail: {e}\n{}\nTry 'mdmail --help' for more information.", cli::USAGE);
            return ExitCode::from(2);
        }
    };

    match run(&files) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(failed) => {
            error!(failed, total = files.len(), "some documents were not saved");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("mdmail: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Saves every file as a draft and returns how many failed.
fn run(files: &[PathBuf]) -> anyhow::Result<usize> {
    let config = Config::from_env().context("invalid configuration")?;
    info!(server = %config.server, mailbox = %config.drafts_mailbox, "configuration loaded");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("cannot start the async runtime")?;

    Ok(runtime.block_on(save_all(files, &config)))
}

// One session per document; a failure never stops the batch.
async fn save_all(files: &[PathBuf], config: &Config) -> usize {
    let mut failed = 0;
    for path in files {
        if let Err(e) = save(path, config).await {
            failed += 1;
            eprintln!("{}: {e:#}", path.display());
        }
    }
    failed
}

async fn save(path: &Path, config: &Config) -> anyhow::Result<()> {
    let saved = process_file(path, config, &ImapOpener).await?;
    println!(
        "{}: draft \"{}\" saved to {}",
        path.display(),
        saved.subject,
        saved.mailbox
    );
    Ok(())
}
