use std::fmt::Write;

use serde::Serialize;

use super::Theme;
use crate::heal::{DriveStatus, DriveView, HealProgress, HealReport, HealSummary};
use crate::utils;

pub const STATUS_SUCCESS: &str = "success";

/// A message the CLI prints, either as text or as JSON.
pub trait StatusMessage: Serialize {
    fn write_text<W: Write>(&self, theme: &Theme, w: &mut W) -> std::fmt::Result;

    fn to_text(&self, theme: &Theme) -> anyhow::Result<String> {
        let mut msg = String::new();
        self.write_text(theme, &mut msg)?;
        Ok(msg)
    }

    fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// Percentage with at most one decimal, trailing zeros dropped.
fn percent(pct: f64) -> String {
    let s = format!("{:.1}", pct);
    match s.strip_suffix(".0") {
        Some(s) => s.to_owned(),
        None => s,
    }
}

/// The cluster wide heal summary.
#[derive(Clone, Debug, Serialize)]
pub struct ShortStatusMessage<'a> {
    pub status: &'static str,
    pub summary: &'a HealProgress,
}

impl<'a> ShortStatusMessage<'a> {
    pub fn new(summary: &'a HealProgress) -> ShortStatusMessage<'a> {
        ShortStatusMessage {
            status: STATUS_SUCCESS,
            summary,
        }
    }
}

fn write_summary<W: Write>(summary: &HealSummary, w: &mut W) -> std::fmt::Result {
    writeln!(
        w,
        "Objects Healed: {}, {} ({}%)",
        utils::comma(summary.items_healed),
        utils::ibytes(summary.bytes_healed),
        percent(summary.percent_complete)
    )?;
    writeln!(w, "Objects Failed: {}", utils::comma(summary.items_failed))?;
    if let Some(rate) = &summary.rate {
        writeln!(
            w,
            "Heal rate: {} obj/s, {}/s",
            rate.items_per_sec as u64,
            utils::ibytes(rate.bytes_per_sec as u64)
        )?;
    }
    writeln!(
        w,
        "Estimated Completion: {}",
        utils::format_duration(summary.remaining)
    )?;

    if summary.offline_disks > 0 {
        write!(w, "\n{} offline drive(s) found.", summary.offline_disks)?;
    }
    if let (n, Some(parity)) = (summary.sets_exceeding_standard, summary.standard_parity) {
        if n > 0 {
            write!(
                w,
                "\n{} of {} sets exceeds standard parity count EC:{} lost/offline drives",
                n, summary.total_sets, parity
            )?;
        }
    }
    if let (n, Some(parity)) = (summary.sets_exceeding_reduced, summary.reduced_parity) {
        if n > 0 {
            write!(
                w,
                "\n{} of {} sets exceeds reduced parity count EC:{} lost/offline drives",
                n, summary.total_sets, parity
            )?;
        }
    }
    Ok(())
}

impl<'a> StatusMessage for ShortStatusMessage<'a> {
    fn write_text<W: Write>(&self, _theme: &Theme, w: &mut W) -> std::fmt::Result {
        match self.summary {
            HealProgress::Idle { offline_disks } => {
                write!(w, "No active healing is detected for new drives")?;
                if *offline_disks > 0 {
                    write!(w, ", though {} offline drive(s) found.", offline_disks)
                } else {
                    write!(w, ".")
                }
            }
            HealProgress::Active(summary) => write_summary(summary, w),
        }
    }
}

/// Per pool, per server and per drive status followed by the summary.
#[derive(Clone, Debug, Serialize)]
pub struct VerboseStatusMessage<'a> {
    pub status: &'static str,
    #[serde(flatten)]
    pub report: &'a HealReport,
}

impl<'a> VerboseStatusMessage<'a> {
    pub fn new(report: &'a HealReport) -> VerboseStatusMessage<'a> {
        VerboseStatusMessage {
            status: STATUS_SUCCESS,
            report,
        }
    }
}

fn drive_state_text(drive: &DriveView, theme: &Theme) -> String {
    match drive.status {
        DriveStatus::Online => theme.drive_ok(&drive.status.to_string()),
        DriveStatus::Healing => theme.drive_healing(&drive.status.to_string()),
        DriveStatus::Offline => {
            let state = drive.state.as_str();
            if state.is_empty() {
                theme.drive_failed(&drive.status.to_string())
            } else {
                theme.drive_failed(state)
            }
        }
    }
}

impl<'a> StatusMessage for VerboseStatusMessage<'a> {
    fn write_text<W: Write>(&self, theme: &Theme, w: &mut W) -> std::fmt::Result {
        let report = self.report;
        let plural = if report.distributed { "s" } else { "" };
        writeln!(w, "Server{} status:", plural)?;
        writeln!(w, "==============")?;

        for pool in &report.pools {
            writeln!(w, "Pool {}:", utils::ordinal(pool.index + 1))?;
            for server in &pool.servers {
                if server.offline {
                    writeln!(w, "  {}: {}", server.endpoint, theme.node_failed("OFFLINE"))?;
                    continue;
                }
                match pool.tolerance {
                    Some(tolerance) => writeln!(
                        w,
                        "  {}: (Tolerance: {} server(s))",
                        server.endpoint, tolerance
                    )?,
                    None => writeln!(w, "  {}:", server.endpoint)?,
                }
                for drive in &server.drives {
                    writeln!(w, "  +  {} : {}", drive.path, drive_state_text(drive, theme))?;
                    if let Some(remaining) = drive.remaining {
                        writeln!(w, "  |__ Estimated: {}", utils::format_duration(remaining))?;
                    }
                    writeln!(
                        w,
                        "  |__  Capacity: {}/{}",
                        utils::ibytes(drive.used_space),
                        utils::ibytes(drive.total_space)
                    )?;
                    if let Some(tolerance) = drive.tolerance {
                        writeln!(w, "  |__ Tolerance: {} drive(s)", tolerance)?;
                    }
                }
                writeln!(w)?;
            }
        }

        if report.tolerance_available() {
            writeln!(w)?;
            writeln!(w, "Server Failure Tolerance:")?;
            writeln!(w, "========================")?;
            for pool in &report.pools_info {
                writeln!(w, "Pool {}:", utils::ordinal(pool.index + 1))?;
                writeln!(w, "   Tolerance : {} server(s)", pool.tolerance.unwrap_or(0))?;
                write!(w, "       Nodes :")?;
                for endpoint in &pool.endpoints {
                    write!(w, " {}", endpoint)?;
                }
                writeln!(w)?;
            }
        } else if let Some(sc) = &report.storage_class {
            writeln!(w)?;
            writeln!(w, "Server Failure Tolerance:")?;
            writeln!(w, "========================")?;
            writeln!(
                w,
                "   Tolerance : unavailable, no parity configured for storage class {}",
                sc
            )?;
        }

        writeln!(w)?;
        writeln!(w, "Summary:")?;
        writeln!(w, "=======")?;
        ShortStatusMessage::new(&report.summary).write_text(theme, w)?;
        writeln!(w)
    }
}
