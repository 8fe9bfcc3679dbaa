use std::collections::HashSet;
use std::time::Duration;

use serde::Serialize;
use strum::Display;

use super::{drive_tolerance, remaining_time, Disk, DriveState, PoolInfo, SetIndex, Topology};
use crate::utils::{self, DateTime};

/// Classification of a drive for display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum DriveStatus {
    #[strum(serialize = "OK")]
    Online,
    #[strum(serialize = "HEALING")]
    Healing,
    #[strum(serialize = "OFFLINE")]
    Offline,
}

impl DriveStatus {
    pub fn of(disk: &Disk) -> DriveStatus {
        match (&disk.state, disk.healing) {
            (DriveState::Ok, true) => DriveStatus::Healing,
            (DriveState::Ok, false) => DriveStatus::Online,
            _ => DriveStatus::Offline,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DriveView {
    pub path: String,
    pub endpoint: String,
    pub set: SetIndex,
    pub disk_index: usize,
    pub state: DriveState,
    pub status: DriveStatus,
    pub used_space: u64,
    pub total_space: u64,
    // Estimated time left, only for healing drives with a usable signal.
    #[serde(serialize_with = "utils::serialize_opt_secs")]
    pub remaining: Option<Duration>,
    // Further drive failures the set can take, when tolerance is available.
    pub tolerance: Option<isize>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ServerView {
    pub endpoint: String,
    pub offline: bool,
    pub drives: Vec<DriveView>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PoolView {
    pub index: usize,
    pub tolerance: Option<usize>,
    pub servers: Vec<ServerView>,
}

fn drive_view(
    disk: &Disk,
    topology: &Topology<'_>,
    parity: Option<usize>,
    now: DateTime,
) -> DriveView {
    let set = SetIndex::of(disk);
    let set_info = topology.sets.get(&set).copied().unwrap_or_default();
    let remaining = match (&disk.heal_info, disk.healing) {
        (Some(heal_info), true) => remaining_time(
            disk.used_space,
            set_info.max_used_space,
            heal_info.started,
            now,
        ),
        _ => None,
    };
    DriveView {
        path: disk.drive_path.clone(),
        endpoint: disk.endpoint.clone(),
        set,
        disk_index: disk.disk_index,
        state: disk.state.clone(),
        status: DriveStatus::of(disk),
        used_space: disk.used_space,
        total_space: disk.total_space,
        remaining,
        tolerance: parity.map(|parity| drive_tolerance(parity, &set_info)),
    }
}

/// Pools in ascending order, each with its servers sorted by endpoint and
/// their drives in snapshot order. Servers listed in `offline_endpoints` are
/// reported without drives.
pub fn build_pool_views(
    topology: &Topology<'_>,
    pools_info: &[PoolInfo],
    offline_endpoints: &[String],
    parity: Option<usize>,
    now: DateTime,
) -> Vec<PoolView> {
    let offline: HashSet<&str> = offline_endpoints.iter().map(|e| e.as_str()).collect();
    pools_info
        .iter()
        .map(|pool| {
            let servers = pool
                .endpoints
                .iter()
                .map(|endpoint| {
                    if offline.contains(endpoint.as_str()) {
                        return ServerView {
                            endpoint: endpoint.clone(),
                            offline: true,
                            drives: Vec::new(),
                        };
                    }
                    let drives = topology
                        .servers
                        .get(endpoint)
                        .map(|server| {
                            server
                                .disks
                                .iter()
                                .filter(|d| d.pool_index == pool.index)
                                .map(|d| drive_view(d, topology, parity, now))
                                .collect()
                        })
                        .unwrap_or_default();
                    ServerView {
                        endpoint: endpoint.clone(),
                        offline: false,
                        drives,
                    }
                })
                .collect();
            PoolView {
                index: pool.index,
                tolerance: pool.tolerance,
                servers,
            }
        })
        .collect()
}
