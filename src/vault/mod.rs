pub mod models;

use std::path::Path;

use anyhow::Context;
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::CaSource;
use crate::config::ConnectionConfig;
use crate::vault::models::sys::leader::*;
use crate::vault::models::sys::seal_status::*;

const TOKEN_HEADER: &str = "X-Vault-Token";

/// The two queries the status command needs from a server.
#[async_trait::async_trait]
pub trait StatusSource {
    async fn get_seal_status(&self) -> anyhow::Result<GetSealStatusResponse>;

    async fn get_leader(&self) -> anyhow::Result<GetLeaderResponse>;
}

pub struct VaultClient {
    pub addr: url::Url,
    pub http: reqwest::Client,
    token: Option<secrecy::SecretString>,
}

impl VaultClient {
    pub async fn new(config: ConnectionConfig) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder().danger_accept_invalid_certs(config.insecure);

        if let Some(ca) = &config.ca {
            for cert in load_ca_certs(ca).await? {
                builder = builder.add_root_certificate(cert);
            }
        }

        let http = builder.build().context("failed building HTTP client")?;

        Ok(Self {
            addr: config.address,
            http,
            token: config.token,
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> anyhow::Result<T> {
        let endpoint = self.addr.join(path)?;
        debug!(%endpoint, "Sending request");

        let mut request = self.http.get(endpoint);
        if let Some(token) = &self.token {
            request = request.header(TOKEN_HEADER, token.expose_secret());
        }

        let response: T = request.send().await?.error_for_status()?.json().await?;

        Ok(response)
    }
}

#[async_trait::async_trait]
impl StatusSource for VaultClient {
    async fn get_seal_status(&self) -> anyhow::Result<GetSealStatusResponse> {
        self.get("v1/sys/seal-status").await
    }

    async fn get_leader(&self) -> anyhow::Result<GetLeaderResponse> {
        self.get("v1/sys/leader").await
    }
}

async fn load_ca_certs(source: &CaSource) -> anyhow::Result<Vec<reqwest::Certificate>> {
    match source {
        CaSource::File(path) => read_pem_bundle(path).await,
        CaSource::Dir(dir) => {
            let mut entries = tokio::fs::read_dir(dir)
                .await
                .with_context(|| format!("failed reading CA directory {}", dir.display()))?;

            let mut paths = Vec::new();
            while let Some(entry) = entries.next_entry().await? {
                if entry.file_type().await?.is_file() {
                    paths.push(entry.path());
                }
            }
            paths.sort();

            let mut certs = Vec::new();
            for path in paths {
                certs.extend(read_pem_bundle(&path).await?);
            }
            Ok(certs)
        }
    }
}

async fn read_pem_bundle(path: &Path) -> anyhow::Result<Vec<reqwest::Certificate>> {
    debug!(path = %path.display(), "Loading CA certificates");
    let contents = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed reading CA certificate {}", path.display()))?;
    let certs = reqwest::Certificate::from_pem_bundle(&contents)
        .with_context(|| format!("failed parsing CA certificate {}", path.display()))?;
    if certs.is_empty() {
        return Err(anyhow::anyhow!(
            "no certificates found in {}",
            path.display()
        ));
    }
    Ok(certs)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn connection(ca: Option<CaSource>) -> ConnectionConfig {
        ConnectionConfig {
            address: url::Url::parse("https://vault.internal:8200/").unwrap(),
            ca,
            insecure: false,
            token: None,
        }
    }

    #[tokio::test]
    async fn builds_without_ca_material() {
        let client = VaultClient::new(connection(None)).await.unwrap();

        assert_eq!(
            client.addr.join("v1/sys/seal-status").unwrap().as_str(),
            "https://vault.internal:8200/v1/sys/seal-status"
        );
    }

    #[tokio::test]
    async fn missing_ca_cert_fails() {
        let ca = CaSource::File(PathBuf::from("/nonexistent/ca.pem"));

        let err = VaultClient::new(connection(Some(ca))).await.err().unwrap();

        assert!(err.to_string().contains("failed reading CA certificate"));
    }

    #[tokio::test]
    async fn ca_file_without_certificates_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ca.pem");
        std::fs::write(&path, "this is not a certificate\n").unwrap();

        let err = VaultClient::new(connection(Some(CaSource::Dir(dir.path().to_owned()))))
            .await
            .err()
            .unwrap();

        assert!(err.to_string().contains("no certificates found"));
    }
}
