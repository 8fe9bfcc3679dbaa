//! Cluster wide progress of an in-flight heal, extrapolated from one
//! snapshot.

use std::time::Duration;

use log::debug;
use serde::Serialize;

use super::{generate_sets_status, BgHealState, Disk, DriveState, ParityConfig, SetIndex, SetStatus};
use crate::utils::{self, DateTime, DateTimeExt};

/// Healed fraction (`0.0..=1.0`) of a drive whose set holds at most
/// `max_used_space` bytes on one drive. A zero baseline carries no progress
/// signal and is reported as `0.0`.
pub fn completion(used_space: u64, max_used_space: u64) -> f64 {
    if max_used_space == 0 {
        debug!("zero max used space in erasure set, healing completion unknown");
        return 0.0;
    }
    (used_space as f64 / max_used_space as f64).min(1.0)
}

/// Linear extrapolation of the time left until a healing drive holding
/// `used_space` bytes catches up with `max_used_space`, given the heal
/// started at `started`. `None` when there is no usable throughput signal.
pub fn remaining_time(
    used_space: u64,
    max_used_space: u64,
    started: DateTime,
    now: DateTime,
) -> Option<Duration> {
    if started.is_zero() || used_space == 0 || max_used_space == 0 {
        return None;
    }
    let elapsed = now.duration_since(started)?;
    // scan speed = used / elapsed, remaining = (max - used) / speed
    let remaining = max_used_space.saturating_sub(used_space) as f64 * elapsed.as_secs_f64()
        / used_space as f64;
    // Out of range for a `Duration` when the drive has barely started.
    Duration::try_from_secs_f64(remaining).ok()
}

/// Whether `candidate` has healed further than `best`. Ties go to the lowest
/// drive index.
fn is_further(candidate: &Disk, best: Option<&Disk>) -> bool {
    let best = match best {
        Some(best) => best,
        None => return true,
    };
    let done = |d: &Disk| d.heal_info.as_ref().map_or(0, |h| h.items_done());
    match done(candidate).cmp(&done(best)) {
        std::cmp::Ordering::Greater => true,
        std::cmp::Ordering::Equal => candidate.disk_index < best.disk_index,
        std::cmp::Ordering::Less => false,
    }
}

/// Heal estimate of one erasure set.
#[derive(Clone, Debug, PartialEq)]
pub struct SetEstimate<'a> {
    pub index: SetIndex,
    // Drives missing from the set: failed ones plus those being healed.
    pub missing_disks: usize,
    // Failed drives, not counting unformatted ones.
    pub offline_disks: usize,
    // Drive whose numbers represent the set in the summary.
    pub furthest: Option<&'a Disk>,
    // Lowest completion among the healing drives of the set.
    pub least_completion: Option<f64>,
    // Latest estimated completion among the healing drives of the set.
    pub remaining: Option<Duration>,
}

pub fn estimate_set(set: &SetStatus, now: DateTime) -> SetEstimate<'_> {
    let sets_status = generate_sets_status(&set.disks);
    let mut estimate = SetEstimate {
        index: SetIndex {
            pool: set.pool_index,
            set: set.set_index,
        },
        missing_disks: 0,
        offline_disks: 0,
        furthest: None,
        least_completion: None,
        remaining: None,
    };

    for disk in &set.disks {
        if !disk.state.is_ok() {
            if disk.state != DriveState::Unformatted {
                estimate.missing_disks += 1;
                estimate.offline_disks += 1;
            }
            continue;
        }
        let heal_info = match &disk.heal_info {
            Some(heal_info) => heal_info,
            None => continue,
        };
        estimate.missing_disks += 1;

        let max_used_space = sets_status
            .get(&SetIndex::of(disk))
            .map_or(0, |s| s.max_used_space);
        let pct = completion(disk.used_space, max_used_space);
        estimate.least_completion = Some(estimate.least_completion.map_or(pct, |p| p.min(pct)));

        if let Some(remaining) =
            remaining_time(disk.used_space, max_used_space, heal_info.started, now)
        {
            estimate.remaining = Some(estimate.remaining.map_or(remaining, |r| r.max(remaining)));
        }

        if is_further(disk, estimate.furthest) {
            estimate.furthest = Some(disk);
        }
    }
    estimate
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HealRate {
    pub items_per_sec: f64,
    pub bytes_per_sec: f64,
}

/// Cluster wide heal numbers, summed over the furthest along drive of
/// every set.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HealSummary {
    pub items_healed: u64,
    pub items_failed: u64,
    pub bytes_healed: u64,
    pub bytes_failed: u64,
    // Completion of the least healed drive, in percent.
    pub percent_complete: f64,
    // Present only when some heal has a non-empty active window.
    pub rate: Option<HealRate>,
    #[serde(serialize_with = "utils::serialize_secs")]
    pub remaining: Duration,
    // Latest heal start among the represented drives.
    pub started_at: Option<DateTime>,
    #[serde(serialize_with = "utils::serialize_secs")]
    pub accumulated_elapsed: Duration,
    pub offline_disks: usize,
    pub total_sets: usize,
    pub sets_exceeding_standard: usize,
    pub sets_exceeding_reduced: usize,
    pub standard_parity: Option<usize>,
    pub reduced_parity: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum HealProgress {
    // Nothing is being healed.
    Idle { offline_disks: usize },
    Active(HealSummary),
}

impl HealProgress {
    pub fn offline_disks(&self) -> usize {
        match self {
            HealProgress::Idle { offline_disks } => *offline_disks,
            HealProgress::Active(summary) => summary.offline_disks,
        }
    }
}

/// Rolls the estimates of every set of `state` into the cluster summary.
pub fn summarize(state: &BgHealState, parity: &ParityConfig, now: DateTime) -> HealProgress {
    let standard_parity = parity.standard();
    let reduced_parity = parity.reduced_redundancy();

    let mut summary = HealSummary {
        items_healed: 0,
        items_failed: 0,
        bytes_healed: 0,
        bytes_failed: 0,
        percent_complete: 100.0,
        rate: None,
        remaining: Duration::ZERO,
        started_at: None,
        accumulated_elapsed: Duration::ZERO,
        offline_disks: 0,
        total_sets: state.sets.len(),
        sets_exceeding_standard: 0,
        sets_exceeding_reduced: 0,
        standard_parity,
        reduced_parity,
    };
    let mut least_completion = 1.0_f64;
    let mut items_per_sec = 0.0;
    let mut bytes_per_sec = 0.0;

    for set in &state.sets {
        let estimate = estimate_set(set, now);
        summary.offline_disks += estimate.offline_disks;
        if let Some(pct) = estimate.least_completion {
            least_completion = least_completion.min(pct);
        }
        if let Some(remaining) = estimate.remaining {
            summary.remaining = summary.remaining.max(remaining);
        }
        if matches!(standard_parity, Some(n) if estimate.missing_disks > n) {
            summary.sets_exceeding_standard += 1;
        }
        if matches!(reduced_parity, Some(n) if estimate.missing_disks > n) {
            summary.sets_exceeding_reduced += 1;
        }

        let heal_info = match estimate.furthest.and_then(|d| d.heal_info.as_ref()) {
            Some(heal_info) => heal_info,
            None => continue,
        };
        // Approximate values
        summary.items_healed += heal_info.items_healed;
        summary.items_failed += heal_info.items_failed;
        summary.bytes_healed += heal_info.bytes_done;
        summary.bytes_failed += heal_info.bytes_failed;

        if heal_info.started.is_zero() {
            continue;
        }
        if summary.started_at.map_or(true, |t| heal_info.started >= t) {
            summary.started_at = Some(heal_info.started);
        }
        if heal_info.last_update.is_zero() {
            continue;
        }
        match heal_info.last_update.duration_since(heal_info.started) {
            Some(window) => {
                summary.accumulated_elapsed += window;
                let secs = window.as_secs_f64();
                bytes_per_sec += heal_info.bytes_done as f64 / secs;
                items_per_sec += heal_info.items_done() as f64 / secs;
            }
            None => debug!(
                "heal of drive {} in set {:?} has no active window yet",
                heal_info.disk_index, estimate.index
            ),
        }
    }

    if summary.started_at.is_none() && summary.items_healed == 0 {
        return HealProgress::Idle {
            offline_disks: summary.offline_disks,
        };
    }

    summary.percent_complete = least_completion * 100.0;
    if summary.accumulated_elapsed > Duration::ZERO {
        summary.rate = Some(HealRate {
            items_per_sec,
            bytes_per_sec,
        });
    }
    HealProgress::Active(summary)
}
