use serde::Deserialize;

/// Response body of `GET /v1/sys/seal-status`.
///
/// Only `sealed`, `t`, `n` and `progress` feed the status output. Everything
/// else is kept so the full body deserializes regardless of server version.
#[derive(Default, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GetSealStatusResponse {
    pub r#type: String,
    pub initialized: bool,
    pub sealed: bool,
    pub t: i64,
    pub n: i64,
    pub progress: i64,
    pub nonce: String,
    pub version: String,
    pub build_date: String,
    pub migration: bool,
    pub cluster_name: Option<String>,
    pub cluster_id: Option<String>,
    pub recovery_seal: bool,
    pub storage_type: String,
}
