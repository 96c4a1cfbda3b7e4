#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod command;
mod config;
mod error;
mod status;
mod vault;

use std::io::IsTerminal;
use std::process::ExitCode;

use clap::Parser;
use clap::Subcommand;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;

use crate::command::Outcome;
use crate::config::ConnectionArgs;

#[allow(clippy::doc_markdown)]
/// Report the seal and HA status of a HashiCorp Vault server
#[derive(Parser, Debug)]
#[clap(author, version, about)]
pub struct Args {
    /// Level directive for stderr logging.
    #[clap(long, env = "RUST_LOG", default_value = DEFAULT_LOG_LEVEL, global = true)]
    log_level: String,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Outputs status of whether Vault is sealed and if HA mode is enabled.
    ///
    /// The exit code reflects the seal status: 0 unsealed, 1 sealed, 2 error.
    Status(ConnectionArgs),
}

/// Usage errors exit with this code; help and version output exit 0.
const USAGE_EXIT_CODE: u8 = 1;

/// Failures are logged below this level, so by default stderr carries only
/// the one-line error message.
const DEFAULT_LOG_LEVEL: &str = "warn";

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            // Nowhere left to report a failure to write the usage message.
            err.print().ok();
            return if err.use_stderr() {
                ExitCode::from(USAGE_EXIT_CODE)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    if let Err(err) = setup_logging(&args.log_level) {
        eprintln!("Error initializing logging: {err:#}");
        return Outcome::Error.into();
    }

    match args.command {
        Command::Status(connection) => {
            let result = command::status(&connection).await;
            let mut out = std::io::stdout().lock();
            let mut err = std::io::stderr().lock();
            command::report(&result, &mut out, &mut err).into()
        }
    }
}

fn setup_logging(log_level: &str) -> anyhow::Result<()> {
    let ansi = std::io::stderr().is_terminal();
    let subscriber = build_subscriber(log_level, std::io::stderr, ansi);

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

fn build_subscriber<W>(
    log_level: &str,
    writer: W,
    ansi: bool,
) -> impl tracing::Subscriber + Send + Sync
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let fmt_filter = tracing_subscriber::filter::EnvFilter::builder()
        .with_default_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .parse_lossy(log_level);
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi)
        .with_filter(fmt_filter);

    tracing_subscriber::Registry::default().with(fmt_layer)
}
