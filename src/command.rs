use std::io::Write;
use std::process::ExitCode;

use tracing::debug;
use tracing::info;

use crate::config::ConnectionArgs;
use crate::error::StatusError;
use crate::status::DerivedStatus;
use crate::vault::StatusSource;
use crate::vault::VaultClient;

/// Exit code contract for scripts: 0 unsealed, 1 sealed, 2 error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Unsealed = 0,
    Sealed = 1,
    Error = 2,
}

impl Outcome {
    pub fn of(result: &Result<DerivedStatus, StatusError>) -> Self {
        match result {
            Err(_) => Outcome::Error,
            Ok(status) if status.sealed => Outcome::Sealed,
            Ok(_) => Outcome::Unsealed,
        }
    }
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        ExitCode::from(outcome as u8)
    }
}

/// Resolve connection settings, build the client and query it.
pub async fn status(args: &ConnectionArgs) -> Result<DerivedStatus, StatusError> {
    info!(phase = "config", "Resolving connection settings");
    let client = connect(args).await.map_err(|err| {
        debug!(phase = "config", "Failed initializing client");
        StatusError::ClientInit(err)
    })?;

    query(&client).await
}

async fn connect(args: &ConnectionArgs) -> anyhow::Result<VaultClient> {
    let config = args.resolve().await?;
    VaultClient::new(config).await
}

/// Seal status first, then leader; the first failure ends the run.
pub async fn query<S>(source: &S) -> Result<DerivedStatus, StatusError>
where
    S: StatusSource + Sync + ?Sized,
{
    info!(phase = "seal", "Checking status");
    let seal_status = source.get_seal_status().await.map_err(|err| {
        debug!(phase = "seal", "Failed checking status");
        StatusError::SealQuery(err)
    })?;

    info!(phase = "leader", "Checking status");
    let leader_status = source.get_leader().await.map_err(|err| {
        debug!(phase = "leader", "Failed checking status");
        StatusError::LeaderQuery(err)
    })?;

    Ok(DerivedStatus::derive(&seal_status, &leader_status))
}

/// Print the outcome of a run and return the code to exit with.
///
/// The status template goes to `out` only on success; a failure writes its
/// single message line to `err` and nothing to `out`.
pub fn report(
    result: &Result<DerivedStatus, StatusError>,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Outcome {
    let written = match result {
        Ok(status) => writeln!(out, "{status}"),
        Err(error) => writeln!(err, "{error}"),
    };
    if let Err(io_err) = written {
        debug!(%io_err, "Failed writing report");
    }
    Outcome::of(result)
}
