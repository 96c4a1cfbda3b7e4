use std::borrow::Cow;
use std::fmt;

use crate::vault::models::sys::leader::GetLeaderResponse;
use crate::vault::models::sys::seal_status::GetSealStatusResponse;

const UNKNOWN_WHILE_SEALED: &str = "unknown while sealed";
const NOT_APPLICABLE: &str = "n/a";

/// How much of the leader response can be shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaderVisibility {
    /// The node is sealed, so whatever it said about leadership is not trusted.
    Unknown,
    /// HA is disabled and leadership means nothing.
    NotApplicable,
    Known { is_self: bool, address: String },
}

/// Combined view of one seal-status and one leader response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedStatus {
    pub sealed: bool,
    pub key_shares: i64,
    pub key_threshold: i64,
    pub unseal_progress: i64,
    pub ha_enabled: bool,
    pub leader: LeaderVisibility,
}

impl DerivedStatus {
    pub fn derive(seal: &GetSealStatusResponse, leader: &GetLeaderResponse) -> Self {
        let visibility = if seal.sealed {
            LeaderVisibility::Unknown
        } else if !leader.ha_enabled {
            LeaderVisibility::NotApplicable
        } else {
            LeaderVisibility::Known {
                is_self: leader.is_self,
                address: leader.leader_address.clone(),
            }
        };

        Self {
            sealed: seal.sealed,
            key_shares: seal.n,
            key_threshold: seal.t,
            unseal_progress: seal.progress,
            ha_enabled: leader.ha_enabled,
            leader: visibility,
        }
    }

    pub fn is_leader(&self) -> Cow<'static, str> {
        match &self.leader {
            LeaderVisibility::Unknown => Cow::Borrowed(UNKNOWN_WHILE_SEALED),
            LeaderVisibility::NotApplicable => Cow::Borrowed(NOT_APPLICABLE),
            LeaderVisibility::Known { is_self, .. } => Cow::Owned(is_self.to_string()),
        }
    }

    pub fn leader_address(&self) -> &str {
        match &self.leader {
            LeaderVisibility::Unknown => UNKNOWN_WHILE_SEALED,
            LeaderVisibility::NotApplicable => NOT_APPLICABLE,
            LeaderVisibility::Known { address, .. } => address,
        }
    }
}

impl fmt::Display for DerivedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Sealed: {}", self.sealed)?;
        writeln!(f, "\tKey Shares: {}", self.key_shares)?;
        writeln!(f, "\tKey Threshold: {}", self.key_threshold)?;
        writeln!(f, "\tUnseal Progress: {}", self.unseal_progress)?;
        writeln!(f, "HA Enabled: {}", self.ha_enabled)?;
        writeln!(f, "\tIs Leader: {}", self.is_leader())?;
        write!(f, "\tLeader Address: {}", self.leader_address())
    }
}
