use std::io::Read;

use anyhow::Context;
use clap::{crate_authors, Arg, ArgMatches, Command};
use colored::Colorize;
use log::{debug, info};

use healstat::config::{self, status, storageclass, KVS};
use healstat::errors::HealStatusError;
use healstat::heal::{self, BgHealState, ParityConfig};
use healstat::{logger, report, utils};

const STDIN: &str = "-";
const ENV_LOG_LEVEL: &str = "HEALSTAT_LOG_LEVEL";
const DEFAULT_LOG_LEVEL: &str = "warning";

fn cli(version_info: &str) -> Command<'_> {
    Command::new("healstat")
        .about("Summarize the background heal status of an erasure coded cluster")
        .author(crate_authors!())
        .version(version_info)
        .long_version(version_info)
        .arg(
            Arg::new("snapshot")
                .value_name("SNAPSHOT")
                .required(true)
                .help("Background heal state in JSON, '-' reads it from stdin"),
        )
        .arg(
            Arg::new("storage-class")
                .long("storage-class")
                .takes_value(true)
                .value_name("SC")
                .help("Show server/drive failure tolerance for the given storage class"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Show per pool, server and drive status"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print the status as JSON"),
        )
        .arg(
            Arg::new("no-color")
                .long("no-color")
                .help("Disable colored output"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .takes_value(true)
                .value_name("LEVEL")
                .help("Log level written to stderr (critical, error, warning, info, debug, trace)"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .takes_value(true)
                .value_name("KVS")
                .help("heal_status settings, e.g. \"storage_class=standard standard=EC:4\""),
        )
}

fn lookup_config(matches: &ArgMatches) -> anyhow::Result<status::Config> {
    let kvs = match matches.value_of("config") {
        Some(input) => KVS::parse(input, &status::DEFAULT_KVS.keys())
            .with_context(|| format!("invalid {} config", config::HEAL_STATUS_SUB_SYS))?,
        None => KVS::default(),
    };
    let mut cfg = status::lookup_config(&kvs)?;

    if let Some(sc) = matches.value_of("storage-class") {
        cfg.storage_class = match sc.trim() {
            "" => None,
            sc => Some(storageclass::normalize_name(sc)),
        };
    }
    if matches.is_present("verbose") {
        cfg.verbose = true;
    }
    if matches.is_present("json") {
        cfg.json = true;
    }
    if matches.is_present("no-color") || cfg.json {
        cfg.color = false;
    }
    Ok(cfg)
}

fn read_snapshot(source: &str) -> anyhow::Result<BgHealState> {
    let data = if source == STDIN {
        let mut data = String::new();
        std::io::stdin()
            .read_to_string(&mut data)
            .with_context(|| HealStatusError::SnapshotUnreadable("stdin".to_owned()))?;
        data
    } else {
        std::fs::read_to_string(source)
            .with_context(|| HealStatusError::SnapshotUnreadable(source.to_owned()))?
    };
    let state: BgHealState = serde_json::from_str(&data)
        .map_err(|err| HealStatusError::SnapshotMalformed(err.to_string()))?;
    debug!(
        "loaded snapshot with {} set(s), {} offline server(s)",
        state.sets.len(),
        state.offline_endpoints.len()
    );
    Ok(state)
}

fn parity_config(state: &BgHealState, cfg: &status::Config) -> ParityConfig {
    let mut parity = ParityConfig::from_snapshot(state);
    if let Some(n) = cfg.standard_parity {
        parity.set(storageclass::STANDARD, n);
    }
    if let Some(n) = cfg.rrs_parity {
        parity.set(storageclass::RRS, n);
    }
    parity
}

fn status_output(
    state: &BgHealState,
    cfg: &status::Config,
    now: utils::DateTime,
) -> anyhow::Result<String> {
    let parity = parity_config(state, cfg);
    let storage_class = cfg.storage_class.as_deref();
    let report = heal::analyze(state, &parity, storage_class, now);
    if let (Some(sc), false) = (storage_class, report.tolerance_available()) {
        info!("no parity configured for storage class {}, tolerance unavailable", sc);
    }
    report::render(&report, cfg.verbose, report::Format::new(cfg.json, cfg.color))
}

fn run(matches: &ArgMatches) -> anyhow::Result<()> {
    let level = matches
        .value_of("log-level")
        .map(|s| s.to_owned())
        .or_else(|| std::env::var(ENV_LOG_LEVEL).ok())
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_owned());
    let _log_guard = logger::init(logger::parse_level(&level)?)?;

    let cfg = lookup_config(matches)?;
    if !cfg.color {
        colored::control::set_override(false);
    }

    // Required by clap.
    let source = matches.value_of("snapshot").unwrap_or(STDIN);
    let state = read_snapshot(source)?;

    println!("{}", status_output(&state, &cfg, utils::now())?);
    Ok(())
}

fn main() {
    let build_time = option_env!("HEALSTAT_BUILD_TIME");
    let version_info = healstat::version::healstat_version_info(build_time);
    let matches = cli(&version_info).get_matches();

    if let Err(err) = run(&matches) {
        if matches.is_present("json") {
            let msg = serde_json::json!({
                "status": "error",
                "error": format!("{:#}", err),
            });
            println!("{}", msg);
        } else {
            eprintln!("{} {:#}", "healstat:".red().bold(), err);
        }
        std::process::exit(1);
    }
}
