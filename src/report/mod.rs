//! Presentation of heal reports: colored text for terminals, indented JSON
//! for scripts.

mod status;
mod theme;

pub use status::*;
pub use theme::*;

use crate::heal::HealReport;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Text(Theme),
    Json,
}

impl Format {
    pub fn new(json: bool, color: bool) -> Format {
        if json {
            Format::Json
        } else {
            Format::Text(Theme::new(color))
        }
    }
}

fn render_message<M: StatusMessage>(msg: &M, format: Format) -> anyhow::Result<String> {
    match format {
        Format::Text(theme) => msg.to_text(&theme),
        Format::Json => msg.to_json(),
    }
}

/// Renders the summary only, or the full per pool status when `verbose`.
pub fn render(report: &HealReport, verbose: bool, format: Format) -> anyhow::Result<String> {
    if verbose {
        render_message(&VerboseStatusMessage::new(report), format)
    } else {
        render_message(&ShortStatusMessage::new(&report.summary), format)
    }
}
