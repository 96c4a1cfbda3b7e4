use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use secrecy::ExposeSecret;
use secrecy::SecretString;
use serde::Deserialize;
use tracing::debug;

pub const DEFAULT_ADDRESS: &str = "http://127.0.0.1:8200";

const TOKEN_ENV: &str = "VAULT_TOKEN";

/// Connection settings read from an optional HCL file.
///
/// ```hcl
/// address         = "https://vault.internal:8200"
/// ca_cert         = "/etc/vault/ca.pem"
/// tls_skip_verify = false
/// ```
#[derive(Default, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub address: Option<String>,
    pub ca_cert: Option<PathBuf>,
    pub ca_path: Option<PathBuf>,
    pub tls_skip_verify: Option<bool>,
}

impl Config {
    pub async fn load(path: &Path) -> anyhow::Result<Self> {
        debug!(phase = "config", path = %path.display(), "Loading config file");
        let contents = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed reading config file {}", path.display()))?;
        let config: Config = hcl::from_str(&contents)
            .with_context(|| format!("failed parsing config file {}", path.display()))?;
        Ok(config)
    }
}

/// Flags for reaching the Vault server.
#[derive(clap::Args, Debug, Default)]
pub struct ConnectionArgs {
    /// Address of the Vault server expressed as a URL and port.
    ///
    /// Defaults to http://127.0.0.1:8200 when neither this nor the config file
    /// sets one.
    #[clap(long, env = "VAULT_ADDR")]
    pub address: Option<String>,

    /// Path to a PEM encoded CA cert file used to verify the Vault server
    /// certificate.
    #[clap(long, env = "VAULT_CACERT")]
    pub ca_cert: Option<PathBuf>,

    /// Path to a directory of PEM encoded CA cert files used to verify the
    /// Vault server certificate.
    ///
    /// If both `ca_cert` and `ca_path` are set, `ca_path` is used.
    #[clap(long, env = "VAULT_CAPATH")]
    pub ca_path: Option<PathBuf>,

    /// Do not verify the server's TLS certificate.
    #[clap(
        long,
        env = "VAULT_SKIP_VERIFY",
        action = clap::ArgAction::SetTrue,
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub insecure: bool,

    /// HCL file holding default connection settings.
    #[clap(long, env = "VAULT_STATUS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Read from `VAULT_TOKEN` only; there is no flag for it.
    #[clap(skip = token_from_env())]
    pub token: Option<SecretString>,
}

fn token_from_env() -> Option<SecretString> {
    std::env::var(TOKEN_ENV)
        .ok()
        .filter(|token| !token.is_empty())
        .map(SecretString::from)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaSource {
    File(PathBuf),
    Dir(PathBuf),
}

/// Fully resolved settings handed to the HTTP client.
#[derive(Debug)]
pub struct ConnectionConfig {
    pub address: url::Url,
    pub ca: Option<CaSource>,
    pub insecure: bool,
    pub token: Option<SecretString>,
}

impl ConnectionArgs {
    /// Read the config file, if any, and layer flags and env on top of it.
    pub async fn resolve(&self) -> anyhow::Result<ConnectionConfig> {
        let file = match &self.config {
            Some(path) => Config::load(path).await?,
            None => Config::default(),
        };
        self.merge(file)
    }

    fn merge(&self, file: Config) -> anyhow::Result<ConnectionConfig> {
        let raw_address = self
            .address
            .clone()
            .or(file.address)
            .unwrap_or(DEFAULT_ADDRESS.to_owned());
        let address = parse_address(&raw_address)?;

        let ca_cert = self.ca_cert.clone().or(file.ca_cert);
        let ca_path = self.ca_path.clone().or(file.ca_path);
        let ca = ca_path.map(CaSource::Dir).or(ca_cert.map(CaSource::File));

        let insecure = self.insecure || file.tls_skip_verify.unwrap_or(false);

        debug!(
            phase = "config",
            %address,
            insecure,
            has_ca = ca.is_some(),
            "Resolved connection settings"
        );

        Ok(ConnectionConfig {
            address,
            ca,
            insecure,
            token: self
                .token
                .as_ref()
                .map(|token| SecretString::from(token.expose_secret().to_owned())),
        })
    }
}

/// Parses the server address so that relative API paths join underneath it,
/// including when Vault is mounted behind a path prefix.
fn parse_address(raw: &str) -> anyhow::Result<url::Url> {
    let mut address =
        url::Url::parse(raw).with_context(|| format!("invalid Vault address {raw:?}"))?;
    if address.cannot_be_a_base() {
        return Err(anyhow::anyhow!("invalid Vault address {raw:?}"));
    }
    if !address.path().ends_with('/') {
        let path = format!("{}/", address.path());
        address.set_path(&path);
    }
    Ok(address)
}
