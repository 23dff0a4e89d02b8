//! Subcommands and their dispatch.

mod import_file;
mod import_html;
mod inboxes;
mod listen;
mod whoami;

use std::io::{self, Write};

use airparser_core::AirparserService;
use clap::Subcommand;
pub use import_file::ImportFileArgs;
pub use import_html::ImportHtmlArgs;
pub use listen::ListenArgs;

/// Operations offered by the CLI.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run the credential test and print the account.
    Whoami,
    /// List inboxes as JSON lines.
    Inboxes,
    /// Upload a binary document to an inbox.
    ImportFile(ImportFileArgs),
    /// Upload HTML or plain text to an inbox.
    ImportHtml(ImportHtmlArgs),
    /// Subscribe to inbox events and print deliveries as JSON lines.
    Listen(ListenArgs),
}

impl Command {
    /// Returns the subcommand name as typed on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Whoami => "whoami",
            Self::Inboxes => "inboxes",
            Self::ImportFile(_) => "import-file",
            Self::ImportHtml(_) => "import-html",
            Self::Listen(_) => "listen",
        }
    }
}

/// Runs `command` against `service`, writing results to stdout.
pub async fn dispatch(command: Command, service: AirparserService) -> anyhow::Result<()> {
    match command {
        Command::Whoami => whoami::run(&service, &mut io::stdout()).await,
        Command::Inboxes => inboxes::run(&service, &mut io::stdout()).await,
        Command::ImportFile(args) => import_file::run(&service, args, &mut io::stdout()).await,
        Command::ImportHtml(args) => import_html::run(&service, args, &mut io::stdout()).await,
        Command::Listen(args) => listen::run(service, args, io::stdout()).await,
    }
}

/// Writes `value` as one line of JSON.
pub(crate) fn write_json_line<T>(out: &mut impl Write, value: &T) -> anyhow::Result<()>
where
    T: serde::Serialize + ?Sized,
{
    serde_json::to_writer(&mut *out, value)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}
