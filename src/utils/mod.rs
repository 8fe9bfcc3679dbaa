mod datetime;
mod units;

pub use datetime::*;
pub use units::*;

pub fn parse_bool(s: &str) -> anyhow::Result<bool> {
    match s {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        _ => Err(anyhow::anyhow!("provided string was not a boolean string")),
    }
}

pub fn parse_bool_ext(s: &str) -> anyhow::Result<bool> {
    match s {
        "on" | "ON" | "On" | "enabled" | "ENABLED" | "Enabled" => Ok(true),
        "off" | "OFF" | "Off" | "disabled" | "DISABLED" | "Disabled" => Ok(false),
        _ => parse_bool(s),
    }
}
