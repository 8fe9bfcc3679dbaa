use std::collections::HashMap;

use log::{debug, warn};
use serde::Serialize;

use super::{BgHealState, ServerInfo, SetIndex, SetInfo, Topology};
use crate::config::storageclass;

/// Parity count per storage class. Class names are kept in canonical form
/// so that lookups are case-insensitive.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ParityConfig(HashMap<String, usize>);

impl ParityConfig {
    pub fn new<I, K>(parity: I) -> ParityConfig
    where
        I: IntoIterator<Item = (K, usize)>,
        K: AsRef<str>,
    {
        ParityConfig(
            parity
                .into_iter()
                .map(|(sc, n)| (storageclass::normalize_name(sc.as_ref()), n))
                .collect(),
        )
    }

    pub fn from_snapshot(state: &BgHealState) -> ParityConfig {
        ParityConfig::new(state.sc_parity.iter().map(|(sc, n)| (sc, *n)))
    }

    pub fn set(&mut self, sc: &str, parity: usize) {
        self.0.insert(storageclass::normalize_name(sc), parity);
    }

    pub fn get(&self, sc: &str) -> Option<usize> {
        self.0.get(&storageclass::normalize_name(sc)).copied()
    }

    pub fn standard(&self) -> Option<usize> {
        self.get(storageclass::STANDARD)
    }

    pub fn reduced_redundancy(&self) -> Option<usize> {
        self.get(storageclass::RRS)
    }

    /// Parity used for tolerance, or `None` when no storage class was
    /// requested or the class has no parity entry.
    pub fn for_tolerance(&self, sc: Option<&str>) -> Option<usize> {
        let sc = sc?;
        let parity = self.get(sc);
        if parity.is_none() {
            debug!("no parity found for storage class '{}', tolerance unavailable", sc);
        }
        parity
    }
}

/// Servers and tolerance of one pool.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PoolInfo {
    pub index: usize,
    // Servers that can be shut down at once; `None` when unavailable.
    pub tolerance: Option<usize>,
    pub endpoints: Vec<String>,
    pub set_count: usize,
    pub drives_per_set: usize,
}

/// Number of servers of `pool` that can be powered off at the same time
/// without any erasure set of the pool dropping below `total - parity`
/// online drives.
///
/// Servers are visited in ascending endpoint order. For every set, servers
/// holding drives of the set are shut down one after another until the next
/// one would break the set; the pool tolerance is the smallest count over
/// its sets.
pub fn compute_pool_tolerance(pool: usize, parity: usize, topology: &Topology<'_>) -> usize {
    let endpoints = topology.pool_endpoints(pool);
    let sets = topology.pool_sets(pool);
    if sets.is_empty() {
        warn!(
            "pool {} has no erasure sets, tolerance falls back to its {} server(s)",
            pool,
            endpoints.len()
        );
        return endpoints.len();
    }

    let servers: Vec<_> = endpoints
        .iter()
        .filter_map(|endpoint| topology.servers.get(endpoint))
        .collect();

    let mut min_tolerance = servers.len();
    for (index, set) in sets {
        let tolerance = set_tolerance(index, &set, parity, &servers);
        min_tolerance = min_tolerance.min(tolerance);
    }
    min_tolerance
}

fn set_tolerance(
    index: SetIndex,
    set: &SetInfo,
    parity: usize,
    servers: &[&ServerInfo<'_>],
) -> usize {
    let min_disks = set.total_disks.saturating_sub(parity);
    let mut online = set.online_disks();
    let mut tolerance = 0;
    for server in servers {
        let (set_found, count) = server.online_disks_for_set(index);
        if !set_found {
            continue;
        }
        // Shutting this server down would leave `online - count` drives.
        if online < min_disks + count {
            break;
        }
        tolerance += 1;
        online -= count;
    }
    tolerance
}

/// Per pool summary, in ascending pool order. `parity` is `None` when
/// tolerance is unavailable for this run.
pub fn compute_pools_info(topology: &Topology<'_>, parity: Option<usize>) -> Vec<PoolInfo> {
    topology
        .pools
        .iter()
        .map(|&pool| {
            let sets = topology.pool_sets(pool);
            PoolInfo {
                index: pool,
                tolerance: parity.map(|parity| compute_pool_tolerance(pool, parity, topology)),
                endpoints: topology.pool_endpoints(pool),
                set_count: sets.len(),
                drives_per_set: sets.iter().map(|(_, s)| s.total_disks).max().unwrap_or(0),
            }
        })
        .collect()
}

/// Drives of the set that may still fail before the set breaks its parity
/// guarantee. Negative when it already has.
pub fn drive_tolerance(parity: usize, set: &SetInfo) -> isize {
    parity as isize - set.incapable_disks as isize
}
