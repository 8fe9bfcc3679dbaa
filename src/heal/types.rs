use std::collections::HashMap;
use std::fmt;

use derivative::Derivative;
use serde::{Deserialize, Serialize};

use crate::utils::{self, DateTime};

pub const DRIVE_STATE_OK: &str = "ok";
pub const DRIVE_STATE_UNFORMATTED: &str = "unformatted";

/// On-disk state of a drive as reported by the cluster.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DriveState {
    Ok,
    Unformatted,
    // Offline, corrupt, faulty, ... anything else the cluster reports.
    Other(String),
}

impl DriveState {
    pub fn is_ok(&self) -> bool {
        matches!(self, DriveState::Ok)
    }

    pub fn as_str(&self) -> &str {
        match self {
            DriveState::Ok => DRIVE_STATE_OK,
            DriveState::Unformatted => DRIVE_STATE_UNFORMATTED,
            DriveState::Other(s) => s,
        }
    }
}

impl Default for DriveState {
    fn default() -> Self {
        DriveState::Other(String::new())
    }
}

impl From<String> for DriveState {
    fn from(s: String) -> Self {
        match s.as_str() {
            DRIVE_STATE_OK => DriveState::Ok,
            DRIVE_STATE_UNFORMATTED => DriveState::Unformatted,
            _ => DriveState::Other(s),
        }
    }
}

impl From<&str> for DriveState {
    fn from(s: &str) -> Self {
        DriveState::from(s.to_owned())
    }
}

impl From<DriveState> for String {
    fn from(state: DriveState) -> Self {
        state.as_str().to_owned()
    }
}

impl fmt::Display for DriveState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Progress of a drive being healed.
#[derive(Derivative, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[derivative(Default)]
#[serde(default)]
pub struct HealingDisk {
    pub id: String,
    pub heal_id: String,
    pub pool_index: usize,
    pub set_index: usize,
    pub disk_index: usize,
    pub endpoint: String,
    pub path: String,
    #[derivative(Default(value = "utils::zero_time()"))]
    pub started: DateTime,
    #[derivative(Default(value = "utils::zero_time()"))]
    pub last_update: DateTime,
    pub objects_total_count: u64,
    pub objects_total_size: u64,
    pub items_healed: u64,
    pub items_failed: u64,
    pub bytes_done: u64,
    pub bytes_failed: u64,
}

impl HealingDisk {
    // Items processed so far, healed or not.
    pub fn items_done(&self) -> u64 {
        self.items_healed.saturating_add(self.items_failed)
    }
}

/// A drive record of the snapshot.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Disk {
    #[serde(default)]
    pub endpoint: String,
    #[serde(rename = "rootDisk", default)]
    pub root_disk: bool,
    #[serde(rename = "path", default)]
    pub drive_path: String,
    #[serde(default)]
    pub healing: bool,
    #[serde(default)]
    pub state: DriveState,
    #[serde(default)]
    pub uuid: String,
    #[serde(rename = "totalspace", default)]
    pub total_space: u64,
    #[serde(rename = "usedspace", default)]
    pub used_space: u64,
    #[serde(rename = "availspace", default)]
    pub available_space: u64,
    #[serde(rename = "heal_info", default, skip_serializing_if = "Option::is_none")]
    pub heal_info: Option<HealingDisk>,
    #[serde(default)]
    pub pool_index: usize,
    #[serde(default)]
    pub set_index: usize,
    #[serde(default)]
    pub disk_index: usize,
}

impl Disk {
    // Online and available for reads, i.e. neither failed nor healing.
    pub fn is_capable(&self) -> bool {
        self.state.is_ok() && !self.healing
    }
}

/// One erasure set of the snapshot with its member drives.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetStatus {
    pub id: String,
    pub pool_index: usize,
    pub set_index: usize,
    pub heal_status: String,
    pub heal_priority: String,
    pub disks: Vec<Disk>,
}

/// Background heal state of the whole cluster, as returned by the admin API.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BgHealState {
    #[serde(rename = "offline_nodes")]
    pub offline_endpoints: Vec<String>,
    pub scanned_items_count: i64,
    pub heal_disks: Vec<String>,
    pub sets: Vec<SetStatus>,
    #[serde(rename = "sc_parity")]
    pub sc_parity: HashMap<String, usize>,
}

impl BgHealState {
    /// All drives of every set, in snapshot order.
    pub fn all_disks(&self) -> Vec<&Disk> {
        self.sets.iter().flat_map(|set| set.disks.iter()).collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::utils::DateTimeExt;

    const SNAPSHOT: &str = r#"{
        "offline_nodes": ["10.0.0.4:9000"],
        "scanned_items_count": 42,
        "heal_disks": ["http://10.0.0.2:9000/data2"],
        "sets": [{
            "id": "0-0",
            "pool_index": 0,
            "set_index": 0,
            "disks": [
                {
                    "endpoint": "http://10.0.0.1:9000/data1",
                    "path": "/data1",
                    "state": "ok",
                    "totalspace": 1000,
                    "usedspace": 400,
                    "pool_index": 0,
                    "set_index": 0,
                    "disk_index": 0
                },
                {
                    "endpoint": "http://10.0.0.2:9000/data2",
                    "path": "/data2",
                    "state": "ok",
                    "healing": true,
                    "totalspace": 1000,
                    "usedspace": 100,
                    "pool_index": 0,
                    "set_index": 0,
                    "disk_index": 1,
                    "heal_info": {
                        "started": "2022-03-01T10:00:00Z",
                        "last_update": "0001-01-01T00:00:00Z",
                        "items_healed": 10,
                        "items_failed": 2,
                        "bytes_done": 2048,
                        "some_future_field": true
                    }
                },
                {
                    "endpoint": "http://10.0.0.3:9000/data3",
                    "state": "offline",
                    "disk_index": 2
                }
            ]
        }],
        "sc_parity": {"STANDARD": 2, "REDUCED_REDUNDANCY": 1}
    }"#;

    #[test]
    fn test_deserialize_snapshot() {
        let state: BgHealState = serde_json::from_str(SNAPSHOT).unwrap();
        assert_eq!(state.offline_endpoints, vec!["10.0.0.4:9000".to_owned()]);
        assert_eq!(state.sc_parity.get("STANDARD"), Some(&2));

        let disks = state.all_disks();
        assert_eq!(disks.len(), 3);
        assert_eq!(disks[0].state, DriveState::Ok);
        assert!(disks[0].is_capable());
        assert!(!disks[1].is_capable());
        assert_eq!(disks[2].state, DriveState::Other("offline".to_owned()));
        assert_eq!(disks[2].used_space, 0);

        let heal_info = disks[1].heal_info.as_ref().unwrap();
        assert_eq!(
            heal_info.started,
            Utc.with_ymd_and_hms(2022, 3, 1, 10, 0, 0).unwrap()
        );
        assert!(heal_info.last_update.is_zero());
        assert_eq!(heal_info.items_done(), 12);
        assert_eq!(heal_info.bytes_failed, 0);
    }

    #[test]
    fn test_drive_state_round_trip() {
        let cases = [
            ("ok", DriveState::Ok),
            ("unformatted", DriveState::Unformatted),
            ("faulty", DriveState::Other("faulty".to_owned())),
        ];
        for (s, state) in cases {
            assert_eq!(DriveState::from(s), state);
            assert_eq!(state.to_string(), s);
            assert_eq!(serde_json::to_string(&state).unwrap(), format!("\"{}\"", s));
        }
    }
}
