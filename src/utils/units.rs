use std::time::Duration;

use byte_unit::Byte;
use itertools::Itertools;

pub const MINUTE: u64 = 60;
pub const HOUR: u64 = MINUTE * 60;

pub const fn seconds(n: u64) -> Duration {
    Duration::from_secs(n)
}

pub const fn minutes(n: u64) -> Duration {
    Duration::from_secs(MINUTE * n)
}

pub const fn hours(n: u64) -> Duration {
    Duration::from_secs(HOUR * n)
}

/// Formats `n` as an English ordinal, e.g. `1st`, `2nd`, `11th`, `23rd`.
pub fn ordinal(n: usize) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}

/// Formats `n` with thousands separators, e.g. `1,234,567`.
pub fn comma(n: u64) -> String {
    let digits = n.to_string();
    let first = digits.len() % 3;
    let mut groups = Vec::with_capacity(digits.len() / 3 + 1);
    if first > 0 {
        groups.push(&digits[..first]);
    }
    for i in (first..digits.len()).step_by(3) {
        groups.push(&digits[i..i + 3]);
    }
    groups.into_iter().join(",")
}

/// Formats a byte count with binary (IEC) units, e.g. `1.50 GiB`.
pub fn ibytes(n: u64) -> String {
    Byte::from_bytes(n as u128)
        .get_appropriate_unit(true)
        .to_string()
}

/// Human readable duration rounded to whole seconds, e.g. `1h 2m 3s`.
pub fn format_duration(d: Duration) -> String {
    if d.as_secs() == 0 {
        return "less than a second".to_owned();
    }
    humantime::format_duration(Duration::from_secs(d.as_secs())).to_string()
}

// Serializes a duration as fractional seconds.
pub fn serialize_secs<S>(d: &Duration, s: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    s.serialize_f64(d.as_secs_f64())
}

pub fn serialize_opt_secs<S>(d: &Option<Duration>, s: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match d {
        Some(d) => s.serialize_some(&d.as_secs_f64()),
        None => s.serialize_none(),
    }
}
