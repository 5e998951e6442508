//! s3edit - fetch an S3 object, edit it locally, write it back
//!
//! This is the main entry point for the s3edit command-line interface.

mod cli;
mod commands;
mod output;
mod version;

use clap::error::ErrorKind;
use clap::Parser;
use s3edit_core::Error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::Cli;

/// Exit code for connection-level failures (sysexits EX_UNAVAILABLE)
const EXIT_TRANSPORT: i32 = 69;

#[tokio::main]
async fn main() {
    // clap exits 2 on usage errors by default; this tool's contract is
    // usage to stderr with exit 1, while --help/--version still exit 0
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
            _ => {
                let _ = err.print();
                std::process::exit(1);
            }
        },
    };

    init_tracing(cli.verbose, cli.quiet);

    if let Err(err) = commands::edit::run(cli).await {
        std::process::exit(report(&err));
    }
}

/// Print the failure and pick its exit code.
///
/// Remote rejections use the HTTP status verbatim (the OS masks it to
/// 8 bits, as the protocol contract expects); transport faults get a
/// dedicated code; everything else is a plain fatal error.
fn report(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<Error>() {
        Some(Error::RemoteStatus { status, body, .. }) => {
            eprintln!("{}", body);
            i32::from(*status)
        }
        Some(Error::Transport(source)) => {
            output::error(&format!("connection failure: {}", source));
            EXIT_TRANSPORT
        }
        _ => {
            output::error(&err.to_string());
            1
        }
    }
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            // stdout/stderr carry protocol output, so default to warnings
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
