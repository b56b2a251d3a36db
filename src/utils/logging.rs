//! Logging initialization for the CLI and the gateway

use anyhow::Result;
use env_logger::{Builder, Target};
use log::LevelFilter;
use std::io::Write;

/// Map `-v`/`-q` flags to a level filter
pub fn cli_level(verbose: u8, quiet: bool) -> LevelFilter {
    match (quiet, verbose) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Info,
        (false, 1) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    }
}

/// Initialize logging for the tvremote CLI (stderr, so stdout stays scriptable)
pub fn init_cli_logging(verbose: u8, quiet: bool) -> Result<()> {
    let level = cli_level(verbose, quiet);

    Builder::from_default_env()
        .target(Target::Stderr)
        .filter_level(level)
        .format_timestamp_secs()
        .format_module_path(false)
        .try_init()?;

    #[cfg(debug_assertions)]
    log_panics::init();

    log::debug!("tvremote logging initialized with level: {:?}", level);
    Ok(())
}

/// Initialize logging for the gateway
pub fn init_server_logging(
    structured: bool,
    log_file: Option<&str>,
    level: Option<LevelFilter>,
) -> Result<()> {
    let level = level.unwrap_or(LevelFilter::Info);

    if structured {
        init_json_logger(level, log_file)?;
    } else {
        init_human_readable_server_logger(level)?;
    }

    // Always initialize panic logging for server
    log_panics::init();

    log::info!("tvremote gateway logging initialized with level: {:?}", level);
    Ok(())
}

/// One log record as a single JSON line
pub fn json_line(record: &log::Record) -> serde_json::Value {
    serde_json::json!({
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "level": record.level().to_string(),
        "module": record.module_path().unwrap_or("unknown"),
        "message": record.args().to_string(),
        "target": record.target(),
    })
}

/// Initialize JSON structured logging for server
fn init_json_logger(level: LevelFilter, log_file: Option<&str>) -> Result<()> {
    use std::fs::OpenOptions;

    let target: Box<dyn Write + Send> = if let Some(file_path) = log_file {
        Box::new(
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(file_path)?,
        )
    } else {
        Box::new(std::io::stdout())
    };

    Builder::from_default_env()
        .target(Target::Pipe(target))
        .filter_level(level)
        .format(|buf, record| writeln!(buf, "{}", json_line(record)))
        .try_init()?;

    Ok(())
}

/// Initialize human-readable logging for server
fn init_human_readable_server_logger(level: LevelFilter) -> Result<()> {
    Builder::from_default_env()
        .target(Target::Stdout)
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {}: {}",
                buf.timestamp(),
                record.level(),
                record.module_path().unwrap_or("unknown"),
                record.args()
            )
        })
        .try_init()?;

    Ok(())
}
