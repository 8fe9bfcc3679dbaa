use slog::Drain;

/// Keeps the global slog logger and the `log` bridge installed; dropping it
/// restores the no-op logger.
pub struct LogGuard {
    _scope_guard: slog_scope::GlobalLoggerGuard,
}

/// Installs a terminal logger writing to stderr as the global logger and
/// routes the `log` macros through it.
pub fn init(level: super::Level) -> anyhow::Result<LogGuard> {
    let decorator = slog_term::TermDecorator::new().stderr().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();
    let drain = slog::LevelFilter::new(drain, level).fuse();
    let logger = slog::Logger::root(drain, slog::o!("app" => "healstat"));

    let scope_guard = slog_scope::set_global_logger(logger);
    slog_stdlog::init_with_level(super::as_log_level(level))?;
    Ok(LogGuard {
        _scope_guard: scope_guard,
    })
}
