use serde::Deserialize;

/// Response body of `GET /v1/sys/leader`.
#[derive(Default, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GetLeaderResponse {
    pub ha_enabled: bool,
    pub is_self: bool,
    pub leader_address: String,
    pub leader_cluster_address: String,
    pub performance_standby: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_standby_node() {
        let body = r#"{
            "ha_enabled": true,
            "is_self": false,
            "active_time": "0001-01-01T00:00:00Z",
            "leader_address": "https://10.0.0.4:8200",
            "leader_cluster_address": "https://10.0.0.4:8201",
            "performance_standby": false,
            "performance_standby_last_remote_wal": 0
        }"#;

        let leader: GetLeaderResponse = serde_json::from_str(body).unwrap();

        assert!(leader.ha_enabled);
        assert!(!leader.is_self);
        assert_eq!(leader.leader_address, "https://10.0.0.4:8200");
    }

    #[test]
    fn single_node_reports_empty_address() {
        let leader: GetLeaderResponse =
            serde_json::from_str(r#"{"ha_enabled": false, "is_self": false, "leader_address": ""}"#)
                .unwrap();

        assert!(!leader.ha_enabled);
        assert!(leader.leader_address.is_empty());
    }
}
