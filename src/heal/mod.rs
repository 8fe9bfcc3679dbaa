//! Derived health views of a background heal snapshot: how many servers
//! each pool can lose, and how far the healing of new drives has come.
//!
//! Everything here is a pure function of one snapshot, the parity
//! configuration and the current time.

mod progress;
mod tolerance;
pub(crate) mod topology;
mod types;
mod view;

use serde::Serialize;

pub use progress::*;
pub use tolerance::*;
pub use topology::{
    generate_servers_status, generate_sets_status, pool_endpoints, pool_indexes,
    server_endpoint, ServerInfo, SetIndex, SetInfo, Topology,
};
pub use types::*;
pub use view::*;

use crate::utils::DateTime;

/// Everything derived from one snapshot.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HealReport {
    // Storage class tolerance was requested for, in canonical form.
    pub storage_class: Option<String>,
    // Parity of that class; `None` means tolerance is unavailable.
    pub parity: Option<usize>,
    // More than one server in the cluster.
    pub distributed: bool,
    pub pools_info: Vec<PoolInfo>,
    pub pools: Vec<PoolView>,
    pub summary: HealProgress,
}

impl HealReport {
    pub fn tolerance_available(&self) -> bool {
        self.parity.is_some()
    }
}

/// Runs the whole aggregation over `state`. `storage_class` selects the
/// parity used for server tolerance.
pub fn analyze(
    state: &BgHealState,
    parity: &ParityConfig,
    storage_class: Option<&str>,
    now: DateTime,
) -> HealReport {
    let topology = Topology::new(state.all_disks());
    let tolerance_parity = parity.for_tolerance(storage_class);
    let pools_info = compute_pools_info(&topology, tolerance_parity);
    let pools = build_pool_views(
        &topology,
        &pools_info,
        &state.offline_endpoints,
        tolerance_parity,
        now,
    );
    HealReport {
        storage_class: storage_class.map(|sc| sc.to_owned()),
        parity: tolerance_parity,
        distributed: topology.servers.len() > 1,
        pools_info,
        pools,
        summary: summarize(state, parity, now),
    }
}
